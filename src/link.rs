//! Serial control link: open/retry, bounded drain, telemetry write, shutdown.
//!
//! [`SerialLink`] is the only thing that touches the port. Call
//! [`tick`](SerialLink::tick) once per frame:
//!
//! 1. If not [`Open`](ConnectionState::Open), try to open the port. A failure
//!    is logged and retried next tick.
//! 2. Drain buffered inbound bytes, at most
//!    [`max_bytes_per_tick`](crate::LinkConfig::max_bytes_per_tick), decoding
//!    each against the sink's current gear and applying it in arrival order.
//! 3. Write one telemetry byte with the collected-item count.
//!
//! Any read or write error moves the link to
//! [`Faulted`](ConnectionState::Faulted), drops the port handle, and tells the
//! sink the link was lost. Nothing propagates out of `tick`.
//!
//! # Example
//!
//! ```rust
//! use rs_tractor::{ConnectionState, InputMode, LinkConfig, SerialLink, VehicleConfig, VehicleController, Gear};
//! use rs_tractor::hal::{MockBody, MockOpener};
//!
//! let opener = MockOpener::new();
//! let line = opener.clone();
//! let mut link = SerialLink::new(opener, LinkConfig::default().with_init_byte(false));
//! let mut vehicle = VehicleController::new(
//!     MockBody::new(),
//!     VehicleConfig::default().with_input_mode(InputMode::Link),
//! );
//!
//! line.push_inbound(&[32]); // forward
//! link.tick(&mut vehicle);
//!
//! assert_eq!(link.state(), ConnectionState::Open);
//! assert_eq!(vehicle.current_gear(), Gear::Forward);
//! assert_eq!(line.written(), vec![0]); // nothing collected yet
//! ```

use std::io;

use crate::config::{LinkConfig, MAX_DRAIN_CAPACITY};
use crate::error::LinkError;
use crate::protocol::{classify, decode, encode_telemetry, FrameKind, INIT_BYTE};
use crate::traits::{BytePort, LinkSink, PortOpener};

/// Connection lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ConnectionState {
    /// Never opened, or shut down.
    #[default]
    Closed,
    /// Port open and usable.
    Open,
    /// An I/O error closed the port; reopening is retried each tick.
    Faulted,
}

impl ConnectionState {
    /// Returns the state as a lowercase string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Closed => "closed",
            ConnectionState::Open => "open",
            ConnectionState::Faulted => "faulted",
        }
    }
}

/// Running counters for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkStats {
    /// Successful opens.
    pub opens: u64,
    /// Failed open attempts.
    pub open_failures: u64,
    /// Read/write faults on an open port.
    pub faults: u64,
    /// Inbound bytes decoded.
    pub bytes_in: u64,
    /// Outbound bytes written (including the init byte).
    pub bytes_out: u64,
    /// Inbound bytes with no table entry.
    pub malformed_frames: u64,
}

/// What one [`SerialLink::tick`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LinkTickReport {
    /// The port was opened during this tick.
    pub opened: bool,
    /// Inbound bytes decoded this tick.
    pub bytes_read: usize,
    /// The drain stopped at the per-tick bound.
    pub drain_capped: bool,
    /// Telemetry byte written this tick.
    pub telemetry_sent: Option<u8>,
    /// A read or write fault occurred this tick.
    pub faulted: bool,
}

/// Owner of the control-link port.
///
/// # Type Parameter
///
/// - `O`: How ports are opened ([`PortOpener`] trait)
pub struct SerialLink<O: PortOpener> {
    opener: O,
    config: LinkConfig,
    port: Option<O::Port>,
    state: ConnectionState,
    stats: LinkStats,
    last_error: Option<String>,
    consecutive_open_failures: u32,
    shut_down: bool,
}

impl<O: PortOpener> SerialLink<O> {
    /// Create a closed link. Nothing is opened until the first tick.
    pub fn new(opener: O, config: LinkConfig) -> Self {
        Self {
            opener,
            config,
            port: None,
            state: ConnectionState::Closed,
            stats: LinkStats::default(),
            last_error: None,
            consecutive_open_failures: 0,
            shut_down: false,
        }
    }

    /// Run one link cycle against `sink`. Never fails and never blocks
    /// beyond the port's read timeout.
    pub fn tick(&mut self, sink: &mut impl LinkSink) -> LinkTickReport {
        let mut report = LinkTickReport::default();
        if self.shut_down || !self.config.enabled {
            return report;
        }

        if self.state != ConnectionState::Open {
            if let Err(err) = self.try_open() {
                if err.is_fault() {
                    self.fault(err, sink);
                    report.faulted = true;
                }
                return report;
            }
            report.opened = true;
        }

        if let Err(err) = self.drain(sink, &mut report) {
            self.fault(err, sink);
            report.faulted = true;
            return report;
        }

        let byte = encode_telemetry(sink.collected_count());
        match self.write(byte) {
            Ok(()) => {
                tracing::trace!(byte, "telemetry sent");
                report.telemetry_sent = Some(byte);
            }
            Err(err) => {
                self.fault(err, sink);
                report.faulted = true;
            }
        }

        report
    }

    /// Close the port if open. Idempotent; later ticks do nothing.
    pub fn shutdown(&mut self) {
        if let Some(port) = self.port.take() {
            drop(port);
            tracing::info!(port = self.config.port.as_str(), "control link closed");
        }
        self.state = ConnectionState::Closed;
        self.shut_down = true;
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Returns true while the port is open.
    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
    }

    /// Returns true once [`shutdown`](Self::shutdown) has run.
    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Diagnostic counters.
    pub fn stats(&self) -> &LinkStats {
        &self.stats
    }

    /// Text of the most recent open failure or fault.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The link configuration.
    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Get a reference to the opener.
    pub fn opener(&self) -> &O {
        &self.opener
    }

    fn try_open(&mut self) -> Result<(), LinkError> {
        match self.opener.open(&self.config) {
            Ok(port) => {
                self.port = Some(port);
                self.state = ConnectionState::Open;
                self.stats.opens += 1;
                self.consecutive_open_failures = 0;
                tracing::info!(
                    port = self.config.port.as_str(),
                    baud = self.config.baud_rate,
                    table = self.config.table.as_str(),
                    "control link open"
                );
                if self.config.send_init_byte {
                    self.write(INIT_BYTE)?;
                }
                Ok(())
            }
            Err(err) => {
                self.stats.open_failures += 1;
                self.consecutive_open_failures = self.consecutive_open_failures.saturating_add(1);
                let every = self.config.log_every_failures;
                if self.consecutive_open_failures == 1
                    || (every > 0 && self.consecutive_open_failures % every == 0)
                {
                    tracing::debug!(
                        error = %err,
                        attempts = self.consecutive_open_failures,
                        "control link unavailable"
                    );
                }
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    fn drain(
        &mut self,
        sink: &mut impl LinkSink,
        report: &mut LinkTickReport,
    ) -> Result<(), LinkError> {
        let limit = self.config.drain_limit();
        let mut buf = [0u8; MAX_DRAIN_CAPACITY];

        while report.bytes_read < limit {
            let Some(port) = self.port.as_mut() else {
                break;
            };
            let available = port.bytes_to_read().map_err(LinkError::read)?;
            if available == 0 {
                break;
            }

            let want = available.min(limit - report.bytes_read);
            let n = match port.read_bytes(&mut buf[..want]) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::TimedOut => 0,
                Err(e) => return Err(LinkError::read(e)),
            };
            if n == 0 {
                break;
            }

            for &byte in &buf[..n] {
                self.handle_byte(byte, sink);
            }
            report.bytes_read += n;
        }

        report.drain_capped = report.bytes_read >= limit;
        Ok(())
    }

    fn handle_byte(&mut self, byte: u8, sink: &mut impl LinkSink) {
        self.stats.bytes_in += 1;
        let table = self.config.table;
        if classify(table, byte) == FrameKind::Unmapped {
            self.stats.malformed_frames += 1;
            tracing::debug!(error = %LinkError::MalformedFrame { byte, table }, "unmapped frame");
        }
        let cmd = decode(table, byte, sink.current_gear());
        tracing::trace!(byte, ?cmd, "frame received");
        sink.apply_link_command(cmd);
    }

    fn write(&mut self, byte: u8) -> Result<(), LinkError> {
        let Some(port) = self.port.as_mut() else {
            return Ok(());
        };
        port.write_byte(byte).map_err(LinkError::write)?;
        self.stats.bytes_out += 1;
        Ok(())
    }

    fn fault(&mut self, err: LinkError, sink: &mut impl LinkSink) {
        tracing::warn!(
            error = %err,
            port = self.config.port.as_str(),
            "control link fault"
        );
        self.stats.faults += 1;
        self.last_error = Some(err.to_string());
        self.port = None;
        self.state = ConnectionState::Faulted;
        sink.link_lost();
    }
}

impl<O: PortOpener> Drop for SerialLink<O> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
