//! Vehicle state owned by the controller.

use crate::gear::{Gear, GearStateMachine};
use crate::motion::{Direction, Vec2};

/// Complete mutable state of the simulated vehicle.
///
/// Only [`VehicleController`](crate::VehicleController) holds one of these.
/// The gear machine and speed controller mutate it through crate-internal
/// access; everything outside the crate sees it read-only.
#[derive(Clone, Debug, Default)]
pub struct VehicleState {
    pub(crate) current_speed: f32,
    pub(crate) target_speed: f32,
    pub(crate) gears: GearStateMachine,
    pub(crate) move_dir: Vec2,
    pub(crate) facing: Direction,
    pub(crate) collected_count: u32,
}

impl VehicleState {
    /// Fresh state: stationary, Neutral, facing right, nothing collected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current scalar speed (always `>= 0`).
    #[inline]
    pub fn current_speed(&self) -> f32 {
        self.current_speed
    }

    /// Speed the ramp is heading towards.
    #[inline]
    pub fn target_speed(&self) -> f32 {
        self.target_speed
    }

    /// Active gear.
    #[inline]
    pub fn current_gear(&self) -> Gear {
        self.gears.current()
    }

    /// Gear saved on the last entry into the brake.
    #[inline]
    pub fn previous_gear(&self) -> Gear {
        self.gears.previous()
    }

    /// Requested move vector.
    #[inline]
    pub fn move_dir(&self) -> Vec2 {
        self.move_dir
    }

    /// Facing direction.
    #[inline]
    pub fn facing(&self) -> Direction {
        self.facing
    }

    /// Number of items collected this round.
    #[inline]
    pub fn collected_count(&self) -> u32 {
        self.collected_count
    }
}
