//! Read-only vehicle telemetry for UI collaborators.
//!
//! HUD text, the round timer, and the game-over screen all need the same
//! three values. They depend on this trait instead of on a concrete
//! controller type, so local-input and link-input builds look identical to
//! them.

use crate::gear::Gear;

/// Read-only view of the vehicle.
///
/// # Example
///
/// ```rust
/// use rs_tractor::traits::VehicleTelemetry;
/// use rs_tractor::{Gear, VehicleConfig, VehicleController};
/// use rs_tractor::hal::MockBody;
///
/// fn hud_line(v: &impl VehicleTelemetry) -> String {
///     format!("{} | {:.0} | {}", v.collected_count(), v.current_speed(), v.current_gear().label())
/// }
///
/// let controller = VehicleController::new(MockBody::new(), VehicleConfig::default());
/// assert_eq!(hud_line(&controller), "0 | 0 | Neutral");
/// ```
pub trait VehicleTelemetry {
    /// Items collected this round.
    fn collected_count(&self) -> u32;

    /// Current scalar speed.
    fn current_speed(&self) -> f32;

    /// Active gear.
    fn current_gear(&self) -> Gear;
}
