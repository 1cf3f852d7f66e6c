//! Gear selection with brake-and-restore history.
//!
//! The tractor has four gears. Every transition between them is legal; the
//! state machine exists to remember which gear was active before the brake
//! was applied so that releasing the brake can restore it.
//!
//! # Example
//!
//! ```rust
//! use rs_tractor::gear::{Gear, GearStateMachine};
//!
//! let mut gears = GearStateMachine::new();
//! gears.request(Gear::Forward);
//!
//! gears.request(Gear::Brake);
//! assert_eq!(gears.current(), Gear::Brake);
//! assert_eq!(gears.previous(), Gear::Forward);
//!
//! gears.release_brake();
//! assert_eq!(gears.current(), Gear::Forward);
//! ```

/// Drive mode of the vehicle.
///
/// # Default
///
/// Defaults to [`Neutral`](Self::Neutral).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Gear {
    /// No drive; speed ramps down to zero.
    #[default]
    Neutral,
    /// Drive forward up to the maximum speed.
    Forward,
    /// Drive backwards up to the reverse speed.
    Reverse,
    /// Braking; speed ramps down to zero at the brake rate.
    Brake,
}

impl Gear {
    /// Returns the gear as a lowercase string.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Gear::Neutral => "neutral",
            Gear::Forward => "forward",
            Gear::Reverse => "reverse",
            Gear::Brake => "brake",
        }
    }

    /// Label shown on the driver HUD.
    #[inline]
    pub const fn label(&self) -> &'static str {
        match self {
            Gear::Neutral => "Neutral",
            Gear::Forward => "Drive",
            Gear::Reverse => "Reverse",
            Gear::Brake => "Brake",
        }
    }

    /// Returns true for gears that actively drive the vehicle.
    #[inline]
    pub const fn is_drive(&self) -> bool {
        matches!(self, Gear::Forward | Gear::Reverse)
    }

    /// Parse a gear from text (`"drive"`/`"d"` are accepted for forward).
    pub fn from_text(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "neutral" | "n" => Some(Gear::Neutral),
            "forward" | "drive" | "d" | "f" => Some(Gear::Forward),
            "reverse" | "r" => Some(Gear::Reverse),
            "brake" | "b" => Some(Gear::Brake),
            _ => None,
        }
    }
}

/// Record of a gear request, returned for logging and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GearChange {
    /// Gear before the request.
    pub from: Gear,
    /// Gear after the request.
    pub to: Gear,
}

impl GearChange {
    /// Returns true if the request actually changed the gear.
    #[inline]
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Tracks the current gear and the gear to restore after braking.
#[derive(Clone, Debug, Default)]
pub struct GearStateMachine {
    current: Gear,
    previous: Gear,
}

impl GearStateMachine {
    /// Start in Neutral with no braking history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a gear.
    ///
    /// Entering [`Gear::Brake`] saves the active gear for
    /// [`release_brake`](Self::release_brake). Braking while already braked
    /// leaves the saved gear untouched.
    pub fn request(&mut self, gear: Gear) -> GearChange {
        let from = self.current;
        if gear == Gear::Brake && from != Gear::Brake {
            self.previous = from;
        }
        self.current = gear;
        let change = GearChange { from, to: gear };
        if change.changed() {
            tracing::debug!(from = from.as_str(), to = gear.as_str(), "gear change");
        }
        change
    }

    /// Leave the brake and restore the gear active before it.
    ///
    /// Does nothing when not braking.
    pub fn release_brake(&mut self) -> GearChange {
        let from = self.current;
        if from == Gear::Brake {
            self.current = self.previous;
            tracing::debug!(
                from = from.as_str(),
                to = self.current.as_str(),
                "brake released"
            );
        }
        GearChange {
            from,
            to: self.current,
        }
    }

    /// The active gear.
    #[inline]
    pub fn current(&self) -> Gear {
        self.current
    }

    /// The gear saved on the last entry into the brake.
    #[inline]
    pub fn previous(&self) -> Gear {
        self.previous
    }

    /// Returns true while the brake is engaged.
    #[inline]
    pub fn is_braking(&self) -> bool {
        self.current == Gear::Brake
    }
}
