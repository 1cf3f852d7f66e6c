//! Main vehicle controller that ties gear, speed and input together.
//!
//! This module provides [`VehicleController`], the single owner of
//! [`VehicleState`]. It is configured (not subclassed) for one input source:
//!
//! - [`InputMode::Local`]: [`gather_input`](VehicleController::gather_input)
//!   reads keyboard axes and drive keys each frame
//! - [`InputMode::Link`]: commands decoded by [`SerialLink`](crate::SerialLink)
//!   arrive through [`LinkSink`]
//!
//! Input from the other source is ignored, so a build never mixes the two.
//!
//! # Example
//!
//! ```rust
//! use rs_tractor::{Gear, VehicleConfig, VehicleController, Vec2};
//! use rs_tractor::hal::MockBody;
//!
//! let mut controller = VehicleController::new(MockBody::new(), VehicleConfig::default());
//!
//! controller.request_gear(Gear::Forward);
//! controller.set_move_dir(Vec2::new(1.0, 0.0));
//! controller.frame_tick();
//!
//! // Fixed-rate physics, e.g. 50Hz
//! for _ in 0..50 {
//!     controller.physics_tick(0.02).unwrap();
//! }
//! assert!((controller.current_speed() - 5.0).abs() < 1e-3);
//! assert!(controller.body().velocity.x > 0.0);
//! ```
//!
//! # Collisions
//!
//! The host's collision system calls
//! [`on_item_collected`](VehicleController::on_item_collected) once per
//! collectible and removes the collectible itself.

use crate::config::{InputMode, VehicleConfig};
use crate::gear::{Gear, GearChange};
use crate::motion::{Direction, Vec2};
use crate::protocol::LinkCommand;
use crate::speed::{SpeedController, SpeedTuning};
use crate::state::VehicleState;
use crate::traits::{Body, DriveKey, KeyboardInput, LinkSink, VehicleTelemetry};

/// Main vehicle controller.
///
/// # Type Parameter
///
/// - `B`: The simulated body ([`Body`] trait)
///
/// # Thread Safety
///
/// The controller is driven from a single cooperative tick loop and holds
/// no locks.
pub struct VehicleController<B: Body> {
    body: B,
    state: VehicleState,
    speed: SpeedController,
    mode: InputMode,
    last_velocity: Vec2,
}

impl<B: Body> VehicleController<B> {
    /// Create a new controller
    pub fn new(body: B, config: VehicleConfig) -> Self {
        Self {
            body,
            state: VehicleState::new(),
            speed: SpeedController::new(SpeedTuning::from(&config)),
            mode: config.input_mode,
            last_velocity: Vec2::ZERO,
        }
    }

    /// The configured input source.
    pub fn input_mode(&self) -> InputMode {
        self.mode
    }

    /// Sample local keyboard input for this frame.
    ///
    /// Key precedence: brake held, brake released, forward pressed, reverse
    /// pressed, neutral pressed. Only the first match applies. Ignored in
    /// [`InputMode::Link`].
    pub fn gather_input(&mut self, input: &impl KeyboardInput) {
        if self.mode != InputMode::Local {
            tracing::trace!("keyboard input ignored in link mode");
            return;
        }

        self.state.move_dir = input.axes();

        let brake = input.key(DriveKey::Brake);
        if brake.held {
            self.state.gears.request(Gear::Brake);
        } else if brake.released {
            self.state.gears.release_brake();
        } else if input.key(DriveKey::Forward).pressed {
            self.state.gears.request(Gear::Forward);
        } else if input.key(DriveKey::Reverse).pressed {
            self.state.gears.request(Gear::Reverse);
        } else if input.key(DriveKey::Neutral).pressed {
            self.state.gears.request(Gear::Neutral);
        }
    }

    /// Per-frame update: resolve facing from the move vector.
    ///
    /// A zero move vector keeps the previous facing.
    pub fn frame_tick(&mut self) {
        if let Some(dir) = Direction::from_vector(self.state.move_dir) {
            self.state.facing = dir;
        }
    }

    /// Fixed-rate physics update: ramp speed and drive the body.
    ///
    /// Returns the velocity applied.
    pub fn physics_tick(&mut self, dt: f32) -> Result<Vec2, B::Error> {
        let velocity = self.speed.tick(&mut self.state, dt);
        self.body.set_velocity(velocity)?;
        self.last_velocity = velocity;
        Ok(velocity)
    }

    /// Set the move vector directly.
    pub fn set_move_dir(&mut self, dir: Vec2) {
        self.state.move_dir = dir;
    }

    /// Request a gear.
    pub fn request_gear(&mut self, gear: Gear) -> GearChange {
        self.state.gears.request(gear)
    }

    /// Leave the brake and restore the previous gear.
    pub fn release_brake(&mut self) -> GearChange {
        self.state.gears.release_brake()
    }

    /// Zero the move vector and select Neutral.
    pub fn stop(&mut self) {
        self.state.move_dir = Vec2::ZERO;
        self.state.gears.request(Gear::Neutral);
    }

    /// Count one collected item. Saturates, never decrements.
    pub fn on_item_collected(&mut self) -> u32 {
        self.state.collected_count = self.state.collected_count.saturating_add(1);
        tracing::debug!(count = self.state.collected_count, "item collected");
        self.state.collected_count
    }

    /// Read-only view of the full state.
    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    /// Get just the current speed
    pub fn current_speed(&self) -> f32 {
        self.state.current_speed
    }

    /// Get the target speed
    pub fn target_speed(&self) -> f32 {
        self.state.target_speed
    }

    /// Get the active gear
    pub fn current_gear(&self) -> Gear {
        self.state.current_gear()
    }

    /// Get the gear saved on the last brake
    pub fn previous_gear(&self) -> Gear {
        self.state.previous_gear()
    }

    /// Get the collected-item count
    pub fn collected_count(&self) -> u32 {
        self.state.collected_count
    }

    /// Get the move vector
    pub fn move_dir(&self) -> Vec2 {
        self.state.move_dir
    }

    /// Get the facing direction
    pub fn facing(&self) -> Direction {
        self.state.facing
    }

    /// Velocity applied on the last physics tick.
    pub fn last_velocity(&self) -> Vec2 {
        self.last_velocity
    }

    /// Get a reference to the body.
    pub fn body(&self) -> &B {
        &self.body
    }

    /// Get a mutable reference to the body.
    pub fn body_mut(&mut self) -> &mut B {
        &mut self.body
    }

    /// Snapshot for UI/diagnostics.
    pub fn snapshot(&self) -> VehicleSnapshot {
        VehicleSnapshot {
            speed: self.state.current_speed,
            target_speed: self.state.target_speed,
            display_speed: self.state.current_speed.round() as u32,
            gear: self.state.current_gear(),
            previous_gear: self.state.previous_gear(),
            facing: self.state.facing,
            move_dir: self.state.move_dir,
            collected_count: self.state.collected_count,
            moving: !self.last_velocity.is_zero(),
        }
    }
}

impl<B: Body> VehicleTelemetry for VehicleController<B> {
    fn collected_count(&self) -> u32 {
        self.state.collected_count
    }

    fn current_speed(&self) -> f32 {
        self.state.current_speed
    }

    fn current_gear(&self) -> Gear {
        self.state.current_gear()
    }
}

impl<B: Body> LinkSink for VehicleController<B> {
    fn apply_link_command(&mut self, cmd: LinkCommand) {
        if self.mode != InputMode::Link {
            tracing::debug!(?cmd, "link command ignored in local mode");
            return;
        }

        match cmd {
            LinkCommand::SetDirection(dir) => {
                self.state.move_dir = dir.unit_vector();
                self.state.facing = dir;
            }
            LinkCommand::SetGear(gear) => {
                self.state.gears.request(gear);
            }
            LinkCommand::Fallback => self.stop(),
            LinkCommand::Ignore => {}
        }
    }

    fn link_lost(&mut self) {
        if self.mode == InputMode::Link {
            self.stop();
        }
    }
}

/// State snapshot for UI collaborators.
///
/// # Example
///
/// ```rust
/// use rs_tractor::{Gear, VehicleConfig, VehicleController};
/// use rs_tractor::hal::MockBody;
///
/// let controller = VehicleController::new(MockBody::new(), VehicleConfig::default());
///
/// let snap = controller.snapshot();
/// assert_eq!(snap.speed, 0.0);
/// assert_eq!(snap.gear, Gear::Neutral);
/// assert_eq!(snap.gear_label(), "Neutral");
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleSnapshot {
    /// Current speed.
    pub speed: f32,
    /// Target speed for the active gear.
    pub target_speed: f32,
    /// Speed rounded for display.
    pub display_speed: u32,
    /// Active gear.
    pub gear: Gear,
    /// Gear restored when the brake is released.
    pub previous_gear: Gear,
    /// Facing direction.
    pub facing: Direction,
    /// Requested move vector.
    pub move_dir: Vec2,
    /// Items collected.
    pub collected_count: u32,
    /// Non-zero velocity was applied on the last physics tick.
    pub moving: bool,
}

impl VehicleSnapshot {
    /// HUD label for the gear.
    pub fn gear_label(&self) -> &'static str {
        self.gear.label()
    }
}
