//! Bounded speed ramping and velocity integration.
//!
//! Each physics tick the [`SpeedController`] picks a target speed from the
//! active gear and steps the current speed towards it by at most
//! `rate * dt`, where the rate is the brake force while braking and the
//! acceleration rate otherwise. The step never overshoots the target.
//!
//! | Gear | Target | Rate |
//! |------|--------|------|
//! | Forward | `max_speed` | `acceleration_rate` |
//! | Reverse | `reverse_speed` | `acceleration_rate` |
//! | Neutral | 0 | `acceleration_rate` |
//! | Brake | 0 | `brake_force` |
//!
//! # Example
//!
//! ```rust
//! use rs_tractor::speed::move_toward;
//!
//! assert_eq!(move_toward(0.0, 10.0, 3.0), 3.0);
//! assert_eq!(move_toward(9.0, 10.0, 3.0), 10.0); // clamps at target
//! assert_eq!(move_toward(10.0, 0.0, 4.0), 6.0);
//! ```

use crate::config::VehicleConfig;
use crate::gear::Gear;
use crate::motion::Vec2;
use crate::state::VehicleState;

/// Step `current` towards `target` by at most `max_delta`, without overshoot.
///
/// A NaN or non-positive `max_delta` leaves `current` unchanged; an infinite
/// one reaches `target`.
pub fn move_toward(current: f32, target: f32, max_delta: f32) -> f32 {
    if max_delta.is_nan() || max_delta <= 0.0 {
        return current;
    }
    let diff = target - current;
    if diff.abs() <= max_delta {
        target
    } else {
        current + max_delta.copysign(diff)
    }
}

/// Speed caps and ramp rates.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpeedTuning {
    /// Forward speed cap.
    pub max_speed: f32,
    /// Reverse speed cap.
    pub reverse_speed: f32,
    /// Ramp rate (speed units per second) outside the brake.
    pub acceleration_rate: f32,
    /// Ramp rate (speed units per second) while braking.
    pub brake_force: f32,
}

impl Default for SpeedTuning {
    fn default() -> Self {
        Self {
            max_speed: 50.0,
            reverse_speed: 25.0,
            acceleration_rate: 5.0,
            brake_force: 10.0,
        }
    }
}

impl From<&VehicleConfig> for SpeedTuning {
    fn from(config: &VehicleConfig) -> Self {
        Self {
            max_speed: config.max_speed,
            reverse_speed: config.reverse_speed,
            acceleration_rate: config.acceleration_rate,
            brake_force: config.brake_force,
        }
    }
}

/// Converts gear and elapsed time into speed and velocity.
#[derive(Clone, Debug, Default)]
pub struct SpeedController {
    tuning: SpeedTuning,
}

impl SpeedController {
    /// Create a controller with the given tuning.
    pub fn new(tuning: SpeedTuning) -> Self {
        Self { tuning }
    }

    /// The active tuning constants.
    pub fn tuning(&self) -> &SpeedTuning {
        &self.tuning
    }

    /// Target speed for a gear.
    pub fn target_for(&self, gear: Gear) -> f32 {
        match gear {
            Gear::Forward => self.tuning.max_speed,
            Gear::Reverse => self.tuning.reverse_speed,
            Gear::Neutral | Gear::Brake => 0.0,
        }
    }

    /// Ramp rate for a gear.
    pub fn rate_for(&self, gear: Gear) -> f32 {
        match gear {
            Gear::Brake => self.tuning.brake_force,
            _ => self.tuning.acceleration_rate,
        }
    }

    /// Advance the speed ramp by `dt` seconds and return the velocity to apply.
    ///
    /// Negative or non-finite `dt` is treated as zero.
    pub fn tick(&self, state: &mut VehicleState, dt: f32) -> Vec2 {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        let gear = state.current_gear();

        state.target_speed = self.target_for(gear);
        state.current_speed = move_toward(
            state.current_speed,
            state.target_speed,
            self.rate_for(gear) * dt,
        )
        .max(0.0);

        Self::velocity(state.move_dir, state.current_speed, gear, dt)
    }

    /// Velocity for a move vector, speed, and gear over `dt` seconds.
    ///
    /// Reverse drives opposite to the move vector. A zero move vector yields
    /// zero velocity regardless of speed.
    pub fn velocity(move_dir: Vec2, speed: f32, gear: Gear, dt: f32) -> Vec2 {
        let v = move_dir.normalized() * (speed * dt);
        if gear == Gear::Reverse {
            -v
        } else {
            v
        }
    }
}
