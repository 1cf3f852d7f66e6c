//! # rs-tractor
//!
//! Core of a small top-down driving game: a tractor with a gear box,
//! ramped speed, and two interchangeable control sources, the keyboard or a
//! byte-oriented serial device.
//!
//! ## Features
//!
//! - **Gear state machine**: Neutral, Forward, Reverse and Brake, with brake
//!   release restoring the gear that was active before braking
//! - **Speed ramping**: current speed moves toward a gear-dependent target at
//!   a bounded rate, never overshooting
//! - **Serial control link**: one-byte frames decoded with a pluggable table,
//!   one telemetry byte per frame carrying the collected-item count
//! - **Fault containment**: an absent or unplugged device never stops the
//!   game; the link retries each frame
//! - **Round timer**: fixed-length rounds with a one-shot final count
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `traits` - Host and link abstractions
//! - `gear` / `speed` - Vehicle rules
//! - `protocol` - Byte codec
//! - `link` - Port lifecycle and draining
//! - `controller` - Ties input, gear and speed to a body
//! - `sim` - Frame/physics scheduler
//! - `hal` - Concrete implementations (mock for testing, serial for hardware)
//!
//! ## Example
//!
//! ```rust
//! use rs_tractor::{
//!     Config, Gear, InputMode, Simulation, VehicleConfig,
//!     hal::{MockBody, MockOpener},
//! };
//!
//! let config = Config::default()
//!     .with_vehicle(VehicleConfig::default().with_input_mode(InputMode::Link));
//!
//! let opener = MockOpener::new();
//! let line = opener.clone();
//! let mut sim = Simulation::new(MockBody::new(), Some(opener), &config);
//!
//! // Device selects Drive, then steers right
//! line.push_inbound(&[32, 1]);
//! sim.advance(0).unwrap();
//! sim.advance(20).unwrap();
//!
//! assert_eq!(sim.vehicle().current_gear(), Gear::Forward);
//! assert!(sim.vehicle().body().velocity.x > 0.0);
//! ```

#![warn(missing_docs)]

/// Shared configuration with builders and JSON loading.
pub mod config;
/// Main vehicle controller that ties input, gear and speed together.
pub mod controller;
/// Control-link error types.
pub mod error;
/// Gear selection and brake/restore state machine.
pub mod gear;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Serial link lifecycle: open, drain, telemetry, shutdown.
pub mod link;
/// 2D vectors and facing directions.
pub mod motion;
/// One-byte wire codec.
pub mod protocol;
/// Round timer.
pub mod session;
/// Fixed-step frame/physics scheduler.
pub mod sim;
/// Speed ramping and velocity.
pub mod speed;
/// Per-vehicle mutable state.
pub mod state;
/// Core traits for host and link abstraction.
pub mod traits;

pub use config::{Config, InputMode, LinkConfig, SessionConfig, SimConfig, VehicleConfig};
pub use controller::{VehicleController, VehicleSnapshot};
pub use error::{LinkError, LinkOp};
pub use gear::{Gear, GearChange, GearStateMachine};
pub use link::{ConnectionState, LinkStats, LinkTickReport, SerialLink};
pub use motion::{Direction, Vec2};
pub use protocol::{decode, encode_telemetry, DecodeTable, LinkCommand, INIT_BYTE};
pub use session::{RoundOutcome, RoundTimer};
pub use sim::{FrameReport, Simulation};
pub use speed::{move_toward, SpeedController, SpeedTuning};
pub use state::VehicleState;
pub use traits::{
    Body, BytePort, Clock, DriveKey, KeyState, KeyboardInput, LinkSink, PortOpener,
    VehicleTelemetry,
};
