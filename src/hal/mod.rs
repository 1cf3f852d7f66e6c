//! Hardware Abstraction Layer implementations.
//!
//! This module contains concrete implementations of the traits
//! defined in [`crate::traits`] for various platforms.
//!
//! # Available Implementations
//!
//! - `mock`: Test implementations for desktop development
//! - `system`: Host clock backed by `std::time::Instant`
//! - `serial`: OS serial ports via the `serialport` crate (requires `serial` feature)

pub mod mock;
pub mod system;

#[cfg(feature = "serial")]
pub mod serial;

pub use mock::*;
pub use system::*;

#[cfg(feature = "serial")]
pub use serial::*;
