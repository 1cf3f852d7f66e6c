//! Configuration for the vehicle, the control link, and the round.
//!
//! Uses `heapless::String` for identifiers so configs are plain fixed-size
//! values that can be cloned into every component cheaply.
//!
//! # Example
//!
//! ```rust
//! use rs_tractor::config::{Config, LinkConfig, VehicleConfig, InputMode};
//! use rs_tractor::protocol::DecodeTable;
//!
//! // Use defaults
//! let config = Config::default();
//!
//! // Or customize
//! let config = Config::default()
//!     .with_link(LinkConfig::default().with_port("COM8").with_table(DecodeTable::Sequential))
//!     .with_vehicle(VehicleConfig::default().with_input_mode(InputMode::Link));
//! ```
//!
//! With the `json-config` feature a config can also be read from JSON;
//! missing fields keep their defaults.

use heapless::String as HString;

use crate::protocol::DecodeTable;

/// Maximum length for short config strings (port names)
pub const MAX_SHORT_STRING: usize = 64;

/// Type alias for short config strings
pub type ShortString = HString<MAX_SHORT_STRING>;

/// Baud rate the control hardware runs at.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Read timeout used when opening the port.
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 1;

/// Upper bound on inbound bytes consumed per tick.
pub const DEFAULT_MAX_BYTES_PER_TICK: usize = 64;

/// Hard cap for [`LinkConfig::max_bytes_per_tick`]; the drain buffer is
/// sized to this.
pub const MAX_DRAIN_CAPACITY: usize = 256;

#[cfg(unix)]
const DEFAULT_PORT: &str = "/dev/ttyUSB0";
#[cfg(not(unix))]
const DEFAULT_PORT: &str = "COM7";

// ============================================================================
// Helper for creating heapless strings
// ============================================================================

/// Create a ShortString from a &str, truncating if too long
pub fn short_string(s: &str) -> ShortString {
    let mut hs = ShortString::new();
    let take = s.len().min(MAX_SHORT_STRING);
    // Find valid UTF-8 boundary
    let valid_end = s
        .char_indices()
        .take_while(|(i, c)| i + c.len_utf8() <= take)
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let _ = hs.push_str(&s[..valid_end]);
    hs
}

// ============================================================================
// Main Config
// ============================================================================

/// Complete application configuration
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Serial control link
    pub link: LinkConfig,
    /// Vehicle tuning and input mode
    pub vehicle: VehicleConfig,
    /// Round timing
    pub session: SessionConfig,
    /// Frame/physics scheduling
    pub sim: SimConfig,
}

impl Config {
    /// Set link configuration
    pub fn with_link(mut self, link: LinkConfig) -> Self {
        self.link = link;
        self
    }

    /// Set vehicle configuration
    pub fn with_vehicle(mut self, vehicle: VehicleConfig) -> Self {
        self.vehicle = vehicle;
        self
    }

    /// Set session configuration
    pub fn with_session(mut self, session: SessionConfig) -> Self {
        self.session = session;
        self
    }

    /// Set scheduler configuration
    pub fn with_sim(mut self, sim: SimConfig) -> Self {
        self.sim = sim;
        self
    }
}

#[cfg(feature = "json-config")]
impl Config {
    /// Parse a config from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: impl AsRef<std::path::Path>) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text).map_err(std::io::Error::from)
    }
}

// ============================================================================
// Link Config
// ============================================================================

/// Serial control-link configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LinkConfig {
    /// Port identifier (e.g., "/dev/ttyUSB0" or "COM7")
    pub port: ShortString,
    /// Baud rate
    pub baud_rate: u32,
    /// Read timeout in milliseconds
    pub read_timeout_ms: u64,
    /// Maximum inbound bytes consumed per tick
    pub max_bytes_per_tick: usize,
    /// Inbound decode table
    pub table: DecodeTable,
    /// Write the initialization byte after each successful open
    pub send_init_byte: bool,
    /// Log every Nth consecutive open failure (the first is always logged)
    pub log_every_failures: u32,
    /// Whether the link is used at all
    pub enabled: bool,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            port: short_string(DEFAULT_PORT),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            max_bytes_per_tick: DEFAULT_MAX_BYTES_PER_TICK,
            table: DecodeTable::Guarded,
            send_init_byte: true,
            log_every_failures: 100,
            enabled: true,
        }
    }
}

impl LinkConfig {
    /// Set the port identifier
    pub fn with_port(mut self, port: &str) -> Self {
        self.port = short_string(port);
        self
    }

    /// Set the baud rate
    pub fn with_baud_rate(mut self, baud: u32) -> Self {
        self.baud_rate = baud;
        self
    }

    /// Set the read timeout
    pub fn with_read_timeout_ms(mut self, ms: u64) -> Self {
        self.read_timeout_ms = ms;
        self
    }

    /// Set the per-tick drain bound (clamped to `1..=MAX_DRAIN_CAPACITY`)
    pub fn with_max_bytes_per_tick(mut self, max: usize) -> Self {
        self.max_bytes_per_tick = max.clamp(1, MAX_DRAIN_CAPACITY);
        self
    }

    /// Set the decode table
    pub fn with_table(mut self, table: DecodeTable) -> Self {
        self.table = table;
        self
    }

    /// Enable or disable the initialization byte
    pub fn with_init_byte(mut self, send: bool) -> Self {
        self.send_init_byte = send;
        self
    }

    /// Set how often repeated open failures are logged
    pub fn with_log_every_failures(mut self, n: u32) -> Self {
        self.log_every_failures = n;
        self
    }

    /// Enable or disable the link
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Drain bound actually applied, whatever was deserialized.
    pub fn drain_limit(&self) -> usize {
        self.max_bytes_per_tick.clamp(1, MAX_DRAIN_CAPACITY)
    }
}

// ============================================================================
// Vehicle Config
// ============================================================================

/// Where driving input comes from. Fixed for the lifetime of a controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum InputMode {
    /// Keyboard axes and drive keys.
    #[default]
    Local,
    /// Commands decoded from the serial link.
    Link,
}

/// Vehicle tuning configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VehicleConfig {
    /// Forward speed cap
    pub max_speed: f32,
    /// Reverse speed cap
    pub reverse_speed: f32,
    /// Ramp rate outside the brake (speed units per second)
    pub acceleration_rate: f32,
    /// Ramp rate while braking (speed units per second)
    pub brake_force: f32,
    /// Input source
    pub input_mode: InputMode,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            max_speed: 50.0,
            reverse_speed: 25.0,
            acceleration_rate: 5.0,
            brake_force: 10.0,
            input_mode: InputMode::Local,
        }
    }
}

impl VehicleConfig {
    /// Set the forward speed cap
    pub fn with_max_speed(mut self, speed: f32) -> Self {
        self.max_speed = speed.max(0.0);
        self
    }

    /// Set the reverse speed cap
    pub fn with_reverse_speed(mut self, speed: f32) -> Self {
        self.reverse_speed = speed.max(0.0);
        self
    }

    /// Set the acceleration rate
    pub fn with_acceleration_rate(mut self, rate: f32) -> Self {
        self.acceleration_rate = rate.max(0.0);
        self
    }

    /// Set the brake force
    pub fn with_brake_force(mut self, force: f32) -> Self {
        self.brake_force = force.max(0.0);
        self
    }

    /// Set the input mode
    pub fn with_input_mode(mut self, mode: InputMode) -> Self {
        self.input_mode = mode;
        self
    }
}

// ============================================================================
// Session Config
// ============================================================================

/// Round configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionConfig {
    /// Round length in seconds
    pub round_seconds: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { round_seconds: 5.0 }
    }
}

impl SessionConfig {
    /// Set the round length
    pub fn with_round_seconds(mut self, seconds: f32) -> Self {
        self.round_seconds = seconds.max(0.0);
        self
    }
}

// ============================================================================
// Sim Config
// ============================================================================

/// Frame/physics scheduler configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Fixed physics step in milliseconds
    pub physics_step_ms: u32,
    /// Most physics steps run in one frame; extra time is dropped
    pub max_physics_steps_per_frame: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            physics_step_ms: 20,
            max_physics_steps_per_frame: 5,
        }
    }
}

impl SimConfig {
    /// Set the physics step (minimum 1ms)
    pub fn with_physics_step_ms(mut self, ms: u32) -> Self {
        self.physics_step_ms = ms.max(1);
        self
    }

    /// Set the per-frame physics step cap (minimum 1)
    pub fn with_max_physics_steps_per_frame(mut self, steps: u32) -> Self {
        self.max_physics_steps_per_frame = steps.max(1);
        self
    }

    /// Physics step in seconds.
    pub fn physics_step_secs(&self) -> f32 {
        self.physics_step_ms.max(1) as f32 / 1000.0
    }
}

// ============================================================================
// Tests
// ============================================================================
