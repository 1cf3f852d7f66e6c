//! Control-link errors.
//!
//! None of these are fatal. [`SerialLink`](crate::SerialLink) turns each one
//! into a connection state change plus a log event and keeps ticking.

use std::fmt;
use std::io;

use thiserror::Error;

use crate::protocol::DecodeTable;

/// Which port operation failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkOp {
    /// Querying or reading inbound bytes.
    Read,
    /// Writing an outbound byte.
    Write,
}

impl fmt::Display for LinkOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkOp::Read => f.write_str("read"),
            LinkOp::Write => f.write_str("write"),
        }
    }
}

/// Errors raised by the control link.
#[derive(Error, Debug)]
pub enum LinkError {
    /// The port could not be opened. Retried on the next tick.
    #[error("port {port} unavailable: {reason}")]
    PortUnavailable {
        /// Port identifier that was tried.
        port: String,
        /// Reason reported by the backend.
        reason: String,
    },

    /// An I/O error on an open port. The link is marked faulted.
    #[error("link fault during {op}: {source}")]
    LinkFault {
        /// Operation that failed.
        op: LinkOp,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A byte with no entry in the active decode table.
    #[error("unmapped frame {byte:#04x} for {table} table")]
    MalformedFrame {
        /// The received byte.
        byte: u8,
        /// Table it was decoded against.
        table: DecodeTable,
    },
}

impl LinkError {
    /// Build a [`LinkError::LinkFault`] for a read failure.
    pub fn read(source: io::Error) -> Self {
        LinkError::LinkFault {
            op: LinkOp::Read,
            source,
        }
    }

    /// Build a [`LinkError::LinkFault`] for a write failure.
    pub fn write(source: io::Error) -> Self {
        LinkError::LinkFault {
            op: LinkOp::Write,
            source,
        }
    }

    /// Returns true if the error leaves an open link faulted.
    pub fn is_fault(&self) -> bool {
        matches!(self, LinkError::LinkFault { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = LinkError::PortUnavailable {
            port: "/dev/ttyUSB0".into(),
            reason: "No such file or directory".into(),
        };
        assert_eq!(
            err.to_string(),
            "port /dev/ttyUSB0 unavailable: No such file or directory"
        );

        let err = LinkError::read(io::Error::new(io::ErrorKind::BrokenPipe, "unplugged"));
        assert_eq!(err.to_string(), "link fault during read: unplugged");
        assert!(err.is_fault());

        let err = LinkError::MalformedFrame {
            byte: 9,
            table: DecodeTable::Sequential,
        };
        assert_eq!(err.to_string(), "unmapped frame 0x09 for sequential table");
        assert!(!err.is_fault());
    }
}
