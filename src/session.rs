//! Round timer.
//!
//! A round lasts a fixed number of seconds. When it runs out the timer
//! reports the final collected-item count exactly once, for the game-over
//! screen. [`fraction_remaining`](RoundTimer::fraction_remaining) drives the
//! HUD timer bar.
//!
//! # Example
//!
//! ```rust
//! use rs_tractor::{RoundOutcome, RoundTimer};
//!
//! let mut timer = RoundTimer::new(2.0);
//! assert_eq!(timer.tick(1.5, 3), None);
//! assert_eq!(timer.tick(1.0, 4), Some(RoundOutcome::Finished { collected: 4 }));
//! assert_eq!(timer.tick(1.0, 5), None); // reported once
//! ```

use crate::config::SessionConfig;

/// How a round ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoundOutcome {
    /// Time ran out.
    Finished {
        /// Items collected during the round.
        collected: u32,
    },
}

/// Countdown for one round.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoundTimer {
    duration: f32,
    remaining: f32,
    reported: bool,
}

impl RoundTimer {
    /// Create a timer for a round of `seconds`. Negative or non-finite
    /// durations become 0.
    pub fn new(seconds: f32) -> Self {
        let duration = if seconds.is_finite() {
            seconds.max(0.0)
        } else {
            0.0
        };
        Self {
            duration,
            remaining: duration,
            reported: false,
        }
    }

    /// Advance by `dt` seconds.
    ///
    /// Returns the outcome on the tick the round ends, `None` before and
    /// after.
    pub fn tick(&mut self, dt: f32, collected: u32) -> Option<RoundOutcome> {
        if self.reported {
            return None;
        }
        if dt.is_finite() && dt > 0.0 {
            self.remaining = (self.remaining - dt).max(0.0);
        }
        if self.remaining > 0.0 {
            return None;
        }
        self.reported = true;
        tracing::info!(collected, "round finished");
        Some(RoundOutcome::Finished { collected })
    }

    /// Seconds left.
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Round length in seconds.
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Remaining time as a fraction of the round, 1.0 at start.
    pub fn fraction_remaining(&self) -> f32 {
        if self.duration <= 0.0 {
            0.0
        } else {
            self.remaining / self.duration
        }
    }

    /// Returns true once no time is left.
    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Start the round over.
    pub fn reset(&mut self) {
        self.remaining = self.duration;
        self.reported = false;
    }
}

impl Default for RoundTimer {
    fn default() -> Self {
        Self::from(&SessionConfig::default())
    }
}

impl From<&SessionConfig> for RoundTimer {
    fn from(config: &SessionConfig) -> Self {
        Self::new(config.round_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_is_five_seconds() {
        let timer = RoundTimer::default();
        assert_eq!(timer.duration(), 5.0);
        assert_eq!(timer.fraction_remaining(), 1.0);
        assert!(!timer.is_expired());
    }

    #[test]
    fn fraction_tracks_elapsed_time() {
        let mut timer = RoundTimer::new(4.0);
        timer.tick(1.0, 0);
        assert_eq!(timer.remaining(), 3.0);
        assert_eq!(timer.fraction_remaining(), 0.75);
    }

    #[test]
    fn expiry_reports_once() {
        let mut timer = RoundTimer::new(1.0);
        assert_eq!(
            timer.tick(5.0, 7),
            Some(RoundOutcome::Finished { collected: 7 })
        );
        assert!(timer.is_expired());
        assert_eq!(timer.remaining(), 0.0);
        assert_eq!(timer.tick(1.0, 8), None);
    }

    #[test]
    fn bad_dt_does_not_advance() {
        let mut timer = RoundTimer::new(1.0);
        assert_eq!(timer.tick(-3.0, 0), None);
        assert_eq!(timer.tick(f32::NAN, 0), None);
        assert_eq!(timer.remaining(), 1.0);
    }

    #[test]
    fn zero_length_round_ends_on_first_tick() {
        let mut timer = RoundTimer::new(-2.0);
        assert_eq!(timer.fraction_remaining(), 0.0);
        assert_eq!(
            timer.tick(0.0, 0),
            Some(RoundOutcome::Finished { collected: 0 })
        );
    }

    #[test]
    fn reset_restarts_round() {
        let mut timer = RoundTimer::new(1.0);
        timer.tick(2.0, 1);
        timer.reset();
        assert_eq!(timer.remaining(), 1.0);
        assert!(timer.tick(2.0, 2).is_some());
    }
}
