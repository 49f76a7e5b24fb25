//! Short-lived cache of drop-target rectangles.
//!
//! Hit testing measures every target on every pointer move. Targets that are
//! not moving can answer from here for [`BOUNDS_CACHE_TTL`]; anything that
//! moves or resizes a target must invalidate its entry.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::constants::BOUNDS_CACHE_TTL;
use crate::geometry::Rect;

#[derive(Debug, Clone, Copy)]
struct Entry {
    bounds: Option<Rect>,
    measured_at: Instant,
}

#[derive(Debug, Clone)]
pub struct BoundsCache {
    ttl: Duration,
    entries: HashMap<String, Entry>,
}

impl Default for BoundsCache {
    fn default() -> Self {
        Self::new(BOUNDS_CACHE_TTL)
    }
}

impl BoundsCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Cached rectangle for `id`, measuring with `measure` when the entry is
    /// missing or older than the TTL at `now`.
    pub fn get_or_measure(
        &mut self,
        id: &str,
        now: Instant,
        measure: impl FnOnce() -> Option<Rect>,
    ) -> Option<Rect> {
        if let Some(entry) = self.entries.get(id)
            && now.saturating_duration_since(entry.measured_at) < self.ttl
        {
            return entry.bounds;
        }
        let bounds = measure();
        self.entries.insert(
            id.to_string(),
            Entry {
                bounds,
                measured_at: now,
            },
        );
        bounds
    }

    pub fn invalidate(&mut self, id: &str) {
        self.entries.remove(id);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn entries_expire_after_ttl() {
        let mut cache = BoundsCache::new(Duration::from_millis(100));
        let calls = Cell::new(0);
        let measure = || {
            calls.set(calls.get() + 1);
            Some(Rect::new(0.0, 0.0, 5.0, 5.0))
        };
        let start = Instant::now();
        cache.get_or_measure("a", start, measure);
        cache.get_or_measure("a", start + Duration::from_millis(50), measure);
        assert_eq!(calls.get(), 1);
        cache.get_or_measure("a", start + Duration::from_millis(100), measure);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn invalidate_forces_remeasure() {
        let mut cache = BoundsCache::default();
        let now = Instant::now();
        cache.get_or_measure("a", now, || None);
        cache.invalidate("a");
        assert!(cache.is_empty());
        let rect = cache.get_or_measure("a", now, || Some(Rect::new(1.0, 1.0, 1.0, 1.0)));
        assert_eq!(rect, Some(Rect::new(1.0, 1.0, 1.0, 1.0)));
    }
}
