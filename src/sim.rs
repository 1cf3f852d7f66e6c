//! Frame and physics scheduler.
//!
//! [`Simulation`] drives one vehicle, its optional control link and the
//! round timer from caller-supplied timestamps. Each
//! [`advance`](Simulation::advance) is one rendered frame:
//!
//! 1. Frame dt is the time since the previous call (0 on the first call).
//! 2. The link ticks (link mode only), then the vehicle's frame update runs.
//! 3. Whole fixed physics steps run from an accumulator, at most
//!    `max_physics_steps_per_frame` per frame. Time beyond the cap is dropped
//!    so a stalled frame cannot snowball.
//! 4. The round timer ticks and reports the final count once.
//!
//! After the round finishes the simulation is frozen: `advance` only records
//! the timestamp.
//!
//! # Example
//!
//! ```rust
//! use rs_tractor::{Config, Gear, Simulation, Vec2};
//! use rs_tractor::hal::{MockBody, MockOpener};
//!
//! let mut sim: Simulation<MockBody, MockOpener> =
//!     Simulation::new(MockBody::new(), None, &Config::default());
//!
//! sim.vehicle_mut().request_gear(Gear::Forward);
//! sim.vehicle_mut().set_move_dir(Vec2::new(1.0, 0.0));
//!
//! sim.advance(0).unwrap();
//! let frame = sim.advance(100).unwrap();
//! assert_eq!(frame.physics_steps, 5);
//! assert!(sim.vehicle().current_speed() > 0.0);
//! ```

use crate::config::{Config, InputMode, SimConfig};
use crate::controller::VehicleController;
use crate::link::{LinkTickReport, SerialLink};
use crate::session::{RoundOutcome, RoundTimer};
use crate::traits::{Body, KeyboardInput, PortOpener};

/// What one [`Simulation::advance`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Milliseconds since the previous frame.
    pub dt_ms: u64,
    /// Physics steps run this frame.
    pub physics_steps: u32,
    /// Milliseconds discarded by the per-frame step cap.
    pub dropped_ms: u64,
    /// Link activity, when a link is attached.
    pub link: Option<LinkTickReport>,
    /// Set on the frame the round ends.
    pub outcome: Option<RoundOutcome>,
}

/// One vehicle, its link and its round.
///
/// # Type Parameters
///
/// - `B`: The simulated body ([`Body`] trait)
/// - `O`: How link ports are opened ([`PortOpener`] trait)
pub struct Simulation<B: Body, O: PortOpener> {
    vehicle: VehicleController<B>,
    link: Option<SerialLink<O>>,
    timer: RoundTimer,
    sim: SimConfig,
    last_ms: Option<u64>,
    accumulator_ms: u64,
    outcome: Option<RoundOutcome>,
}

impl<B: Body, O: PortOpener> Simulation<B, O> {
    /// Build a simulation from config.
    ///
    /// A link is created only when `opener` is given and the vehicle is in
    /// [`InputMode::Link`].
    pub fn new(body: B, opener: Option<O>, config: &Config) -> Self {
        let vehicle = VehicleController::new(body, config.vehicle.clone());
        let link = match (opener, vehicle.input_mode()) {
            (Some(opener), InputMode::Link) => {
                Some(SerialLink::new(opener, config.link.clone()))
            }
            (Some(_), InputMode::Local) => {
                tracing::debug!("local input mode, control link not used");
                None
            }
            (None, _) => None,
        };

        Self {
            vehicle,
            link,
            timer: RoundTimer::from(&config.session),
            sim: config.sim.clone(),
            last_ms: None,
            accumulator_ms: 0,
            outcome: None,
        }
    }

    /// Sample local keyboard input. Call once per frame before
    /// [`advance`](Self::advance).
    pub fn gather_input(&mut self, input: &impl KeyboardInput) {
        if self.outcome.is_none() {
            self.vehicle.gather_input(input);
        }
    }

    /// Run one frame at timestamp `now_ms`.
    ///
    /// Body errors from the physics step are returned; the frame stops at
    /// the failing step.
    pub fn advance(&mut self, now_ms: u64) -> Result<FrameReport, B::Error> {
        let dt_ms = self
            .last_ms
            .map_or(0, |last| now_ms.saturating_sub(last));
        self.last_ms = Some(now_ms);

        let mut report = FrameReport {
            dt_ms,
            ..FrameReport::default()
        };
        if self.outcome.is_some() {
            return Ok(report);
        }

        if let Some(link) = self.link.as_mut() {
            report.link = Some(link.tick(&mut self.vehicle));
        }
        self.vehicle.frame_tick();

        let step_ms = u64::from(self.sim.physics_step_ms.max(1));
        let cap = u64::from(self.sim.max_physics_steps_per_frame.max(1));
        self.accumulator_ms += dt_ms;
        let mut steps = self.accumulator_ms / step_ms;
        if steps > cap {
            report.dropped_ms = (steps - cap) * step_ms;
            self.accumulator_ms -= report.dropped_ms;
            steps = cap;
            tracing::debug!(dropped_ms = report.dropped_ms, "physics fell behind");
        }

        let step_secs = self.sim.physics_step_secs();
        for _ in 0..steps {
            self.vehicle.physics_tick(step_secs)?;
            self.accumulator_ms -= step_ms;
            report.physics_steps += 1;
        }

        let dt = dt_ms as f32 / 1000.0;
        report.outcome = self.timer.tick(dt, self.vehicle.collected_count());
        self.outcome = report.outcome;
        Ok(report)
    }

    /// Count one collected item. Returns the new total.
    pub fn on_item_collected(&mut self) -> u32 {
        self.vehicle.on_item_collected()
    }

    /// Close the link. Idempotent.
    ///
    /// A link-driven vehicle loses its only input source, so it is stopped
    /// and the body halted.
    pub fn shutdown(&mut self) -> Result<(), B::Error> {
        if let Some(link) = self.link.as_mut() {
            link.shutdown();
        }
        if self.vehicle.input_mode() == InputMode::Link {
            self.vehicle.stop();
            self.vehicle.body_mut().halt()?;
        }
        Ok(())
    }

    /// Returns true once the round has ended.
    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// How the round ended, if it has.
    pub fn outcome(&self) -> Option<RoundOutcome> {
        self.outcome
    }

    /// The vehicle.
    pub fn vehicle(&self) -> &VehicleController<B> {
        &self.vehicle
    }

    /// Mutable access to the vehicle.
    pub fn vehicle_mut(&mut self) -> &mut VehicleController<B> {
        &mut self.vehicle
    }

    /// The control link, when one is attached.
    pub fn link(&self) -> Option<&SerialLink<O>> {
        self.link.as_ref()
    }

    /// The round timer.
    pub fn timer(&self) -> &RoundTimer {
        &self.timer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LinkConfig, SessionConfig, VehicleConfig};
    use crate::gear::Gear;
    use crate::hal::{MockBody, MockKeyboard, MockOpener};
    use crate::link::ConnectionState;
    use crate::motion::Vec2;
    use crate::traits::{DriveKey, KeyState};

    type MockSim = Simulation<MockBody, MockOpener>;

    fn local() -> MockSim {
        Simulation::new(MockBody::new(), None, &Config::default())
    }

    fn linked(opener: MockOpener) -> MockSim {
        let config = Config::default()
            .with_link(LinkConfig::default().with_init_byte(false))
            .with_vehicle(VehicleConfig::default().with_input_mode(InputMode::Link));
        Simulation::new(MockBody::new(), Some(opener), &config)
    }

    // =========================================================================
    // Scheduling
    // =========================================================================

    #[test]
    fn first_frame_has_zero_dt() {
        let mut sim = local();
        let report = sim.advance(12_345).unwrap();
        assert_eq!(report.dt_ms, 0);
        assert_eq!(report.physics_steps, 0);
    }

    #[test]
    fn partial_steps_carry_over() {
        let mut sim = local();
        sim.advance(0).unwrap();
        assert_eq!(sim.advance(30).unwrap().physics_steps, 1);
        assert_eq!(sim.advance(40).unwrap().physics_steps, 1);
    }

    #[test]
    fn stalled_frame_is_capped() {
        let mut sim = local();
        sim.advance(0).unwrap();
        let report = sim.advance(1_010).unwrap();
        assert_eq!(report.physics_steps, 5);
        assert_eq!(report.dropped_ms, 900);
        // 10ms remainder kept
        assert_eq!(sim.advance(1_020).unwrap().physics_steps, 1);
    }

    #[test]
    fn clock_going_backwards_is_zero_dt() {
        let mut sim = local();
        sim.advance(100).unwrap();
        assert_eq!(sim.advance(50).unwrap().dt_ms, 0);
    }

    // =========================================================================
    // Input
    // =========================================================================

    #[test]
    fn keyboard_drives_local_vehicle() {
        let mut sim = local();
        let mut keys = MockKeyboard::new();
        keys.set_axes(Vec2::new(0.0, 1.0));
        keys.set_key(DriveKey::Forward, KeyState::down());

        sim.gather_input(&keys);
        sim.advance(0).unwrap();
        sim.advance(1_000).unwrap();

        assert_eq!(sim.vehicle().current_gear(), Gear::Forward);
        assert!(sim.vehicle().body().velocity.y > 0.0);
    }

    #[test]
    fn local_mode_ignores_opener() {
        let sim = Simulation::new(MockBody::new(), Some(MockOpener::new()), &Config::default());
        assert!(sim.link().is_none());
    }

    #[test]
    fn link_ticks_before_frame_update() {
        let opener = MockOpener::new();
        let line = opener.clone();
        let mut sim = linked(opener);

        line.push_inbound(&[32, 4]);
        let report = sim.advance(0).unwrap();
        assert_eq!(report.link.map(|l| l.bytes_read), Some(2));
        assert_eq!(sim.vehicle().facing(), crate::Direction::Up);
        assert_eq!(sim.link().map(|l| l.state()), Some(ConnectionState::Open));
    }

    // =========================================================================
    // Round
    // =========================================================================

    #[test]
    fn round_reports_final_count_once() {
        let config = Config::default().with_session(SessionConfig::default().with_round_seconds(1.0));
        let mut sim: MockSim = Simulation::new(MockBody::new(), None, &config);

        sim.advance(0).unwrap();
        sim.on_item_collected();
        sim.on_item_collected();
        assert_eq!(sim.advance(500).unwrap().outcome, None);

        let report = sim.advance(1_000).unwrap();
        assert_eq!(report.outcome, Some(RoundOutcome::Finished { collected: 2 }));
        assert!(sim.is_finished());

        let report = sim.advance(1_100).unwrap();
        assert_eq!(report.outcome, None);
        assert_eq!(report.physics_steps, 0);
    }

    #[test]
    fn shutdown_closes_link() {
        let opener = MockOpener::new();
        let line = opener.clone();
        let mut sim = linked(opener);
        sim.advance(0).unwrap();
        assert!(line.is_port_open());

        sim.shutdown().unwrap();
        sim.shutdown().unwrap();
        assert!(!line.is_port_open());
    }

    #[test]
    fn shutdown_stops_link_driven_vehicle() {
        let opener = MockOpener::new();
        let line = opener.clone();
        let mut sim = linked(opener);

        line.push_inbound(&[32, 1]);
        sim.advance(0).unwrap();
        sim.advance(100).unwrap();
        assert!(sim.vehicle().body().velocity.x > 0.0);

        sim.shutdown().unwrap();
        assert_eq!(sim.vehicle().current_gear(), Gear::Neutral);
        assert_eq!(sim.vehicle().move_dir(), Vec2::ZERO);
        assert_eq!(sim.vehicle().body().velocity, Vec2::ZERO);

        sim.advance(200).unwrap();
        sim.advance(300).unwrap();
        assert_eq!(sim.vehicle().body().velocity, Vec2::ZERO);
        assert_eq!(sim.link().map(|l| l.state()), Some(ConnectionState::Closed));
    }

    #[test]
    fn shutdown_leaves_local_vehicle_alone() {
        let mut sim = local();
        sim.vehicle_mut().request_gear(Gear::Forward);
        sim.shutdown().unwrap();
        assert_eq!(sim.vehicle().current_gear(), Gear::Forward);
    }
}
