//! Repaint coalescing for the committed annotation layer
//!
//! Repaint requests only mark the layer dirty. The frame loop asks
//! `should_paint` once per tick, so any number of requests within one tick
//! collapse into a single paint, and paints never come closer together than
//! `min_interval`.

use std::time::{Duration, Instant};

/// Default minimum spacing between two paints (about 60 FPS)
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Clone)]
pub struct FrameScheduler {
    dirty: bool,
    last_paint: Option<Instant>,
    min_interval: Duration,
}

impl FrameScheduler {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            dirty: false,
            last_paint: None,
            min_interval,
        }
    }

    /// Mark the layer as needing a repaint
    pub fn request(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether a paint should happen on the tick at `now`
    pub fn should_paint(&self, now: Instant) -> bool {
        if !self.dirty {
            return false;
        }
        match self.last_paint {
            Some(last) => now.saturating_duration_since(last) >= self.min_interval,
            None => true,
        }
    }

    /// Record that a paint happened at `now`
    pub fn mark_painted(&mut self, now: Instant) {
        self.dirty = false;
        self.last_paint = Some(now);
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_scheduler_never_paints() {
        let scheduler = FrameScheduler::default();
        assert!(!scheduler.should_paint(Instant::now()));
    }

    #[test]
    fn many_requests_collapse_into_one_paint() {
        let mut scheduler = FrameScheduler::default();
        let start = Instant::now();
        for _ in 0..10 {
            scheduler.request();
        }
        assert!(scheduler.should_paint(start));
        scheduler.mark_painted(start);
        assert!(!scheduler.should_paint(start + Duration::from_millis(40)));
    }

    #[test]
    fn paints_are_throttled_to_the_frame_interval() {
        let mut scheduler = FrameScheduler::default();
        let start = Instant::now();
        scheduler.request();
        scheduler.mark_painted(start);

        scheduler.request();
        assert!(!scheduler.should_paint(start + Duration::from_millis(5)));
        assert!(scheduler.should_paint(start + Duration::from_millis(16)));
    }
}
