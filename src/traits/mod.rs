//! Trait definitions for the seams between the core and its environment.
//!
//! This module defines the abstractions that allow rs-tractor to:
//! - Drive a simulated body owned by the host (game engine, test double)
//! - Read local keyboard input without depending on a windowing library
//! - Talk to the control hardware over any byte-oriented port
//!
//! # Submodules
//!
//! - `hardware`: Simulated body, keyboard input, clock
//! - `link`: Byte port, port opener, and the sink link commands flow into
//! - `telemetry`: Read-only vehicle state for UI collaborators
//!
//! # Implementations
//!
//! Test doubles for every trait live in [`crate::hal::mock`]. The
//! `serialport`-backed opener lives in `hal::serial` (requires the `serial`
//! feature).

pub mod hardware;
pub mod link;
pub mod telemetry;

pub use hardware::*;
pub use link::*;
pub use telemetry::*;
