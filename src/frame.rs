//! Work deferred to a later frame.
//!
//! Some layout work can only run once a previous mutation has been painted:
//! measuring items after an insertion, or turning transitions back on after
//! an order commit. Containers queue that work here and drain it from their
//! frame tick.

/// Queue of tasks keyed by value, each due after a number of frames.
///
/// Scheduling a task that is already queued replaces its countdown but keeps
/// its place in the queue, so the latest request wins without reordering.
#[derive(Debug, Clone)]
pub struct FrameScheduler<T> {
    pending: Vec<(T, u32)>,
}

impl<T> Default for FrameScheduler<T> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<T: Copy + PartialEq> FrameScheduler<T> {
    /// Queues `task` to run after `frames` ticks. Zero means the next tick.
    pub fn schedule(&mut self, task: T, frames: u32) {
        let frames = frames.max(1);
        if let Some(entry) = self.pending.iter_mut().find(|(queued, _)| *queued == task) {
            entry.1 = frames;
        } else {
            self.pending.push((task, frames));
        }
    }

    pub fn cancel(&mut self, task: T) {
        self.pending.retain(|(queued, _)| *queued != task);
    }

    pub fn is_pending(&self, task: T) -> bool {
        self.pending.iter().any(|(queued, _)| *queued == task)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Advances one frame and returns the tasks now due, in enqueue order.
    pub fn tick(&mut self) -> Vec<T> {
        let mut due = Vec::new();
        self.pending.retain_mut(|(task, frames)| {
            *frames -= 1;
            if *frames == 0 {
                due.push(*task);
                false
            } else {
                true
            }
        });
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Task {
        Measure,
        Unfreeze,
    }

    #[test]
    fn tasks_fire_after_their_frame_count() {
        let mut scheduler = FrameScheduler::default();
        scheduler.schedule(Task::Measure, 2);
        scheduler.schedule(Task::Unfreeze, 1);
        assert_eq!(scheduler.tick(), vec![Task::Unfreeze]);
        assert_eq!(scheduler.tick(), vec![Task::Measure]);
        assert!(scheduler.tick().is_empty());
        assert!(scheduler.is_empty());
    }

    #[test]
    fn rescheduling_restarts_the_countdown() {
        let mut scheduler = FrameScheduler::default();
        scheduler.schedule(Task::Measure, 2);
        assert!(scheduler.tick().is_empty());
        scheduler.schedule(Task::Measure, 2);
        assert!(scheduler.tick().is_empty());
        assert_eq!(scheduler.tick(), vec![Task::Measure]);
    }

    #[test]
    fn cancelled_tasks_never_fire() {
        let mut scheduler = FrameScheduler::default();
        scheduler.schedule(Task::Measure, 1);
        scheduler.cancel(Task::Measure);
        assert!(!scheduler.is_pending(Task::Measure));
        assert!(scheduler.tick().is_empty());
    }
}
