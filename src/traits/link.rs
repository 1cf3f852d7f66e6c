//! Control-link port abstraction.
//!
//! [`SerialLink`](crate::SerialLink) is generic over a [`PortOpener`] so the
//! same retry, drain and fault logic runs against a real serial port and
//! against the scripted [`MockOpener`](crate::hal::MockOpener) in tests.
//!
//! # Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`BytePort`] | An open port: query, read and write raw bytes |
//! | [`PortOpener`] | Produces a fresh [`BytePort`] from the link config |
//! | [`LinkSink`] | Receives decoded commands; implemented by the controller |
//!
//! Closing a port is dropping it. Openers must release the OS handle in the
//! port's `Drop`.

use std::io;

use crate::config::LinkConfig;
use crate::error::LinkError;
use crate::protocol::LinkCommand;
use crate::traits::VehicleTelemetry;

/// An open, byte-oriented port.
pub trait BytePort {
    /// Number of inbound bytes already buffered.
    ///
    /// Must not block.
    fn bytes_to_read(&mut self) -> io::Result<usize>;

    /// Read up to `buf.len()` buffered bytes, returning how many were read.
    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Write a single byte.
    fn write_byte(&mut self, byte: u8) -> io::Result<()>;
}

/// Opens ports described by a [`LinkConfig`].
pub trait PortOpener {
    /// The port type produced.
    type Port: BytePort;

    /// Try to open the configured port.
    ///
    /// Failures must be reported as [`LinkError::PortUnavailable`].
    fn open(&mut self, config: &LinkConfig) -> Result<Self::Port, LinkError>;
}

/// Destination for commands decoded off the link.
///
/// Gear is read through [`VehicleTelemetry`] before each byte is decoded,
/// and the telemetry byte is built from its collected count.
pub trait LinkSink: VehicleTelemetry {
    /// Apply one decoded command.
    fn apply_link_command(&mut self, cmd: LinkCommand);

    /// The link stopped being usable; fall back to a safe state.
    fn link_lost(&mut self);
}
