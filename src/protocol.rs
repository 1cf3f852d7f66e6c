//! Single-byte control-link protocol.
//!
//! The external controller sends one byte per frame and receives one byte
//! per tick back. There is no framing beyond the raw value.
//!
//! # Inbound Tables
//!
//! Two encodings exist in deployed hardware and both are supported through
//! [`DecodeTable`]:
//!
//! | Byte | [`Guarded`](DecodeTable::Guarded) | [`Sequential`](DecodeTable::Sequential) |
//! |------|-----------------------------------|------------------------------------------|
//! | right | `1` (only in Forward/Reverse) | `1` |
//! | left | `2` (only in Forward/Reverse) | `2` |
//! | up | `4` (only in Forward/Reverse) | `3` |
//! | down | `8` (only in Forward/Reverse) | `4` |
//! | brake | `16` | `5` |
//! | forward | `32` | `6` |
//! | reverse | `64` | `7` |
//! | neutral | `128` | `8` |
//! | other | [`LinkCommand::Ignore`] | [`LinkCommand::Fallback`] |
//!
//! # Outbound
//!
//! The telemetry byte is the collected-item count saturated to `0..=255`.
//!
//! # Example
//!
//! ```rust
//! use rs_tractor::protocol::{decode, encode_telemetry, DecodeTable, LinkCommand};
//! use rs_tractor::{Direction, Gear};
//!
//! // Direction bits are ignored until a drive gear is selected
//! assert_eq!(decode(DecodeTable::Guarded, 1, Gear::Neutral), LinkCommand::Ignore);
//! assert_eq!(
//!     decode(DecodeTable::Guarded, 1, Gear::Forward),
//!     LinkCommand::SetDirection(Direction::Right)
//! );
//!
//! assert_eq!(decode(DecodeTable::Sequential, 9, Gear::Forward), LinkCommand::Fallback);
//! assert_eq!(encode_telemetry(300), 255);
//! ```

use crate::gear::Gear;
use crate::motion::Direction;

/// Byte written once after a successful open to wake the device.
pub const INIT_BYTE: u8 = 0x00;

/// Bit-flag codes for [`DecodeTable::Guarded`].
pub mod guarded {
    /// Move right.
    pub const RIGHT: u8 = 1;
    /// Move left.
    pub const LEFT: u8 = 2;
    /// Move up.
    pub const UP: u8 = 4;
    /// Move down.
    pub const DOWN: u8 = 8;
    /// Select brake.
    pub const BRAKE: u8 = 16;
    /// Select forward.
    pub const FORWARD: u8 = 32;
    /// Select reverse.
    pub const REVERSE: u8 = 64;
    /// Select neutral.
    pub const NEUTRAL: u8 = 128;
}

/// Sequential codes for [`DecodeTable::Sequential`].
pub mod sequential {
    /// Move right.
    pub const RIGHT: u8 = 1;
    /// Move left.
    pub const LEFT: u8 = 2;
    /// Move up.
    pub const UP: u8 = 3;
    /// Move down.
    pub const DOWN: u8 = 4;
    /// Select brake.
    pub const BRAKE: u8 = 5;
    /// Select forward.
    pub const FORWARD: u8 = 6;
    /// Select reverse.
    pub const REVERSE: u8 = 7;
    /// Select neutral.
    pub const NEUTRAL: u8 = 8;
}

/// Which inbound encoding the connected device speaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DecodeTable {
    /// One bit per switch; direction bits only act in a drive gear,
    /// unknown bytes are ignored.
    #[default]
    Guarded,
    /// Codes 1-8; direction codes act in any gear, unknown bytes stop the
    /// vehicle and select Neutral.
    Sequential,
}

impl DecodeTable {
    /// Returns the table name as a lowercase string.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            DecodeTable::Guarded => "guarded",
            DecodeTable::Sequential => "sequential",
        }
    }

    /// Parse a table name.
    pub fn from_text(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "guarded" | "bitflag" | "bitflags" => Some(DecodeTable::Guarded),
            "sequential" | "sequence" => Some(DecodeTable::Sequential),
            _ => None,
        }
    }

    /// What this table does with bytes it has no entry for.
    #[inline]
    pub const fn unmapped(&self) -> LinkCommand {
        match self {
            DecodeTable::Guarded => LinkCommand::Ignore,
            DecodeTable::Sequential => LinkCommand::Fallback,
        }
    }
}

impl core::fmt::Display for DecodeTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logical command decoded from one inbound byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkCommand {
    /// Move in a direction (sets the move vector and facing).
    SetDirection(Direction),
    /// Select a gear.
    SetGear(Gear),
    /// Stop: zero the move vector and select Neutral.
    Fallback,
    /// Do nothing.
    Ignore,
}

/// How a byte relates to a table, independent of gear guards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameKind {
    /// A direction code.
    Direction(Direction),
    /// A gear code.
    Gear(Gear),
    /// No entry in the table.
    Unmapped,
}

/// Look a byte up in a table without applying any guard.
pub fn classify(table: DecodeTable, byte: u8) -> FrameKind {
    match table {
        DecodeTable::Guarded => match byte {
            guarded::RIGHT => FrameKind::Direction(Direction::Right),
            guarded::LEFT => FrameKind::Direction(Direction::Left),
            guarded::UP => FrameKind::Direction(Direction::Up),
            guarded::DOWN => FrameKind::Direction(Direction::Down),
            guarded::BRAKE => FrameKind::Gear(Gear::Brake),
            guarded::FORWARD => FrameKind::Gear(Gear::Forward),
            guarded::REVERSE => FrameKind::Gear(Gear::Reverse),
            guarded::NEUTRAL => FrameKind::Gear(Gear::Neutral),
            _ => FrameKind::Unmapped,
        },
        DecodeTable::Sequential => match byte {
            sequential::RIGHT => FrameKind::Direction(Direction::Right),
            sequential::LEFT => FrameKind::Direction(Direction::Left),
            sequential::UP => FrameKind::Direction(Direction::Up),
            sequential::DOWN => FrameKind::Direction(Direction::Down),
            sequential::BRAKE => FrameKind::Gear(Gear::Brake),
            sequential::FORWARD => FrameKind::Gear(Gear::Forward),
            sequential::REVERSE => FrameKind::Gear(Gear::Reverse),
            sequential::NEUTRAL => FrameKind::Gear(Gear::Neutral),
            _ => FrameKind::Unmapped,
        },
    }
}

/// Decode one inbound byte.
///
/// `gear` is the vehicle's gear at the moment the byte is handled; only
/// the guarded table consults it.
pub fn decode(table: DecodeTable, byte: u8, gear: Gear) -> LinkCommand {
    match classify(table, byte) {
        FrameKind::Direction(dir) => match table {
            DecodeTable::Guarded if !gear.is_drive() => LinkCommand::Ignore,
            _ => LinkCommand::SetDirection(dir),
        },
        FrameKind::Gear(g) => LinkCommand::SetGear(g),
        FrameKind::Unmapped => table.unmapped(),
    }
}

/// Outbound telemetry byte for a collected-item count.
#[inline]
pub fn encode_telemetry(collected_count: u32) -> u8 {
    u8::try_from(collected_count).unwrap_or(u8::MAX)
}
