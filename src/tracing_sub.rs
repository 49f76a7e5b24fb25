//! Tracing setup.
//!
//! Hosts that draw their own UI cannot let log lines hit stderr, so a
//! process-wide [`EventLogHandle`] can be installed; the subscriber writes
//! there when it exists and to stderr otherwise.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, OnceLock};

use tracing::Level;

pub const DEFAULT_MAX_LINES: usize = 2000;

static GLOBAL_LOG: OnceLock<EventLogHandle> = OnceLock::new();

/// Installs `handle` as the process-wide log sink. Only the first call wins.
pub fn set_global_event_log(handle: EventLogHandle) -> bool {
    GLOBAL_LOG.set(handle).is_ok()
}

pub fn global_event_log() -> Option<EventLogHandle> {
    GLOBAL_LOG.get().cloned()
}

#[derive(Debug)]
struct LogBuffer {
    lines: VecDeque<String>,
    max_lines: usize,
}

impl LogBuffer {
    fn push_line(&mut self, line: String) {
        self.lines.push_back(line);
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
        }
    }
}

/// Shared ring buffer of formatted log lines.
#[derive(Clone, Debug)]
pub struct EventLogHandle {
    inner: Arc<Mutex<LogBuffer>>,
}

impl Default for EventLogHandle {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINES)
    }
}

impl EventLogHandle {
    pub fn new(max_lines: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(LogBuffer {
                lines: VecDeque::new(),
                max_lines: max_lines.max(1),
            })),
        }
    }

    pub fn push(&self, line: impl Into<String>) {
        if let Ok(mut buffer) = self.inner.lock() {
            buffer.push_line(line.into());
        }
    }

    /// The most recent `count` lines, oldest first.
    pub fn tail(&self, count: usize) -> Vec<String> {
        let Ok(buffer) = self.inner.lock() else {
            return Vec::new();
        };
        let skip = buffer.lines.len().saturating_sub(count);
        buffer.lines.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|buffer| buffer.lines.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn writer(&self) -> EventLogWriter {
        EventLogWriter {
            handle: self.clone(),
            pending: Vec::new(),
        }
    }
}

/// Line-buffered writer into an [`EventLogHandle`].
#[derive(Debug)]
pub struct EventLogWriter {
    handle: EventLogHandle,
    pending: Vec<u8>,
}

impl EventLogWriter {
    fn flush_pending(&mut self, force: bool) {
        let end = if force {
            self.pending.len()
        } else {
            match self.pending.iter().rposition(|b| *b == b'\n') {
                Some(pos) => pos + 1,
                None => return,
            }
        };
        let drained: Vec<u8> = self.pending.drain(..end).collect();
        let text = String::from_utf8_lossy(&drained);
        for line in text.split('\n').filter(|line| !line.is_empty()) {
            self.handle.push(line);
        }
    }
}

impl Write for EventLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        self.flush_pending(false);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_pending(true);
        Ok(())
    }
}

impl Drop for EventLogWriter {
    fn drop(&mut self) {
        self.flush_pending(true);
    }
}

pub struct DelegatingWriter {
    inner: DelegatingInner,
}

enum DelegatingInner {
    Log(EventLogWriter),
    Stderr(io::Stderr),
}

impl DelegatingWriter {
    fn new() -> Self {
        let inner = match global_event_log() {
            Some(handle) => DelegatingInner::Log(handle.writer()),
            None => DelegatingInner::Stderr(io::stderr()),
        };
        DelegatingWriter { inner }
    }
}

impl Write for DelegatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.inner {
            DelegatingInner::Log(w) => w.write(buf),
            DelegatingInner::Stderr(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.inner {
            DelegatingInner::Log(w) => w.flush(),
            DelegatingInner::Stderr(s) => s.flush(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SubscriberMakeWriter;

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SubscriberMakeWriter {
    type Writer = DelegatingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        DelegatingWriter::new()
    }
}

/// Initialize the tracing subscriber at `DEBUG`. Writes go to the global
/// event log when one is installed, otherwise to stderr. Safe to call more
/// than once; later calls leave the first subscriber in place.
pub fn init_default() {
    init_with_level(Level::DEBUG);
}

pub fn init_with_level(level: Level) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(SubscriberMakeWriter)
        .with_target(false)
        .with_thread_names(false)
        .with_ansi(false)
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_buffer_keeps_latest_lines() {
        let log = EventLogHandle::new(2);
        log.push("one");
        log.push("two");
        log.push("three");
        assert_eq!(log.tail(10), vec!["two", "three"]);
        assert_eq!(log.tail(1), vec!["three"]);
    }

    #[test]
    fn writer_splits_on_newlines_and_flushes_partial_lines() {
        let log = EventLogHandle::default();
        let mut writer = log.writer();
        writer.write_all(b"first\nsec").unwrap();
        assert_eq!(log.tail(10), vec!["first"]);
        writer.write_all(b"ond\nthird").unwrap();
        writer.flush().unwrap();
        assert_eq!(log.tail(10), vec!["first", "second", "third"]);
    }
}
