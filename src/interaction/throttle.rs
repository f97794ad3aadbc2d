use std::time::{Duration, Instant};

/// Rate limit for high-frequency pointer moves during a drag.
///
/// Dropped frames are harmless: commits recompute from the release position.
#[derive(Debug, Clone)]
pub struct MoveThrottle {
    window: Duration,
    last: Option<Instant>,
}

impl MoveThrottle {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// True if a move at `now` should be processed.
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.window => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// Forget the last frame, e.g. when a gesture ends.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
