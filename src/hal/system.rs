//! Host clock using `std::time::Instant`.

use std::time::Instant;

use crate::traits::Clock;

/// Monotonic clock counting milliseconds since it was created.
///
/// # Example
///
/// ```rust
/// use rs_tractor::hal::SystemClock;
/// use rs_tractor::traits::Clock;
///
/// let clock = SystemClock::new();
/// let start = clock.now_ms();
/// assert!(clock.now_ms() >= start);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    /// Creates a clock whose zero is now.
    #[inline]
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    #[inline]
    fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }
}
