//! Serial port backend using the `serialport` crate.
//!
//! Lines are opened 8N1 without flow control at the configured baud rate.
//! The read timeout is kept short (1ms by default) so a frame tick never
//! stalls on an idle line.

use std::io::{self, Read, Write};
use std::time::Duration;

use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};

use crate::config::LinkConfig;
use crate::error::LinkError;
use crate::traits::{BytePort, PortOpener};

/// Opens OS serial ports.
///
/// # Example
///
/// ```ignore
/// use rs_tractor::hal::SerialPortOpener;
/// use rs_tractor::{LinkConfig, SerialLink};
///
/// let config = LinkConfig::default().with_port("/dev/ttyACM0");
/// let mut link = SerialLink::new(SerialPortOpener::new(), config);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct SerialPortOpener;

impl SerialPortOpener {
    /// Creates a new opener.
    pub fn new() -> Self {
        Self
    }

    /// Names of the serial ports visible to the OS.
    pub fn available_ports() -> Vec<String> {
        serialport::available_ports()
            .map(|ports| ports.into_iter().map(|p| p.port_name).collect())
            .unwrap_or_default()
    }
}

impl PortOpener for SerialPortOpener {
    type Port = SystemPort;

    fn open(&mut self, config: &LinkConfig) -> Result<SystemPort, LinkError> {
        let port = serialport::new(config.port.as_str(), config.baud_rate)
            .timeout(Duration::from_millis(config.read_timeout_ms))
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .open()
            .map_err(|e| LinkError::PortUnavailable {
                port: config.port.to_string(),
                reason: e.to_string(),
            })?;

        Ok(SystemPort { port })
    }
}

/// An open OS serial port. Dropping it closes the handle.
pub struct SystemPort {
    port: Box<dyn SerialPort>,
}

impl SystemPort {
    /// Name of the underlying device, if the OS reports one.
    pub fn name(&self) -> Option<String> {
        self.port.name()
    }
}

impl BytePort for SystemPort {
    fn bytes_to_read(&mut self) -> io::Result<usize> {
        let n = self.port.bytes_to_read().map_err(io::Error::from)?;
        Ok(n as usize)
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.port.read(buf)
    }

    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.port.write_all(&[byte])
    }
}

impl std::fmt::Debug for SystemPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemPort")
            .field("name", &self.port.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_device_is_port_unavailable() {
        let config = LinkConfig::default().with_port("/nonexistent/tty-rs-tractor");
        let err = SerialPortOpener::new().open(&config).unwrap_err();
        match err {
            LinkError::PortUnavailable { port, .. } => {
                assert_eq!(port, "/nonexistent/tty-rs-tractor")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
