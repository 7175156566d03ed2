//! Time source abstraction for the animator and frame driver

use std::time::{Duration, Instant};

/// Millisecond time source
///
/// Readings must be non-decreasing. The absolute origin is irrelevant, only
/// differences between readings are used.
pub trait Clock: Send + Sync {
    /// Current time in milliseconds
    fn now_millis(&self) -> u64;

    /// Block the calling thread for roughly `duration`
    fn sleep(&self, duration: Duration);
}

/// Monotonic wall clock measured from construction
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
