//! Mock implementations for testing without hardware.
//!
//! This module provides test doubles for every host and link trait,
//! enabling development and testing on desktop without a game engine or
//! the control hardware attached.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockBody`] | [`Body`] | Records the applied velocity |
//! | [`MockKeyboard`] | [`KeyboardInput`] | Settable axes and key states |
//! | [`MockOpener`] | [`PortOpener`] | Scripted serial line with fault injection |
//! | [`MockClock`] | [`Clock`] | Controllable time source |
//!
//! # Example
//!
//! ```rust
//! use rs_tractor::{Gear, VehicleConfig, VehicleController, Vec2};
//! use rs_tractor::hal::MockBody;
//!
//! let mut controller = VehicleController::new(MockBody::new(), VehicleConfig::default());
//! controller.request_gear(Gear::Forward);
//! controller.set_move_dir(Vec2::new(0.0, 1.0));
//! controller.physics_tick(1.0).unwrap();
//!
//! assert_eq!(controller.body().velocity, Vec2::new(0.0, 5.0));
//! ```
//!
//! [`Body`]: crate::traits::Body
//! [`KeyboardInput`]: crate::traits::KeyboardInput
//! [`PortOpener`]: crate::traits::PortOpener
//! [`Clock`]: crate::traits::Clock

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;

use crate::config::LinkConfig;
use crate::error::LinkError;
use crate::motion::Vec2;
use crate::traits::{Body, BytePort, Clock, DriveKey, KeyState, KeyboardInput, PortOpener};

// ============================================================================
// Host Mocks
// ============================================================================

/// Mock body for testing.
///
/// Records every velocity it receives. Use the public fields to inspect
/// state after test operations.
#[derive(Debug, Default)]
pub struct MockBody {
    /// Last applied velocity.
    pub velocity: Vec2,
    /// Sum of all applied velocities (the body's displacement).
    pub position: Vec2,
    /// Number of times `set_velocity` was called.
    pub updates: usize,
}

impl MockBody {
    /// Creates a new body at rest at the origin.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Body for MockBody {
    type Error = ();

    fn set_velocity(&mut self, velocity: Vec2) -> Result<(), ()> {
        self.velocity = velocity;
        self.position = Vec2::new(
            self.position.x + velocity.x,
            self.position.y + velocity.y,
        );
        self.updates += 1;
        Ok(())
    }
}

/// Mock keyboard for testing.
///
/// # Example
///
/// ```rust
/// use rs_tractor::hal::MockKeyboard;
/// use rs_tractor::traits::{DriveKey, KeyState, KeyboardInput};
///
/// let mut keys = MockKeyboard::new();
/// keys.set_key(DriveKey::Brake, KeyState::down());
/// assert!(keys.key(DriveKey::Brake).held);
///
/// keys.clear_keys();
/// assert_eq!(keys.key(DriveKey::Brake), KeyState::IDLE);
/// ```
#[derive(Debug, Default)]
pub struct MockKeyboard {
    axes: Vec2,
    brake: KeyState,
    forward: KeyState,
    reverse: KeyState,
    neutral: KeyState,
}

impl MockKeyboard {
    /// Creates a keyboard with nothing pressed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the raw axes.
    pub fn set_axes(&mut self, axes: Vec2) {
        self.axes = axes;
    }

    /// Set one key's state for the next frame.
    pub fn set_key(&mut self, key: DriveKey, state: KeyState) {
        *self.slot(key) = state;
    }

    /// Release nothing and press nothing: every key idle.
    pub fn clear_keys(&mut self) {
        self.brake = KeyState::IDLE;
        self.forward = KeyState::IDLE;
        self.reverse = KeyState::IDLE;
        self.neutral = KeyState::IDLE;
    }

    fn slot(&mut self, key: DriveKey) -> &mut KeyState {
        match key {
            DriveKey::Brake => &mut self.brake,
            DriveKey::Forward => &mut self.forward,
            DriveKey::Reverse => &mut self.reverse,
            DriveKey::Neutral => &mut self.neutral,
        }
    }
}

impl KeyboardInput for MockKeyboard {
    fn axes(&self) -> Vec2 {
        self.axes
    }

    fn key(&self, key: DriveKey) -> KeyState {
        match key {
            DriveKey::Brake => self.brake,
            DriveKey::Forward => self.forward,
            DriveKey::Reverse => self.reverse,
            DriveKey::Neutral => self.neutral,
        }
    }
}

/// Mock clock for testing.
///
/// # Example
///
/// ```rust
/// use rs_tractor::hal::MockClock;
/// use rs_tractor::traits::Clock;
///
/// let mut clock = MockClock::new();
/// clock.set(1000);
/// clock.advance(500);
/// assert_eq!(clock.now_ms(), 1500);
/// ```
#[derive(Debug, Default)]
pub struct MockClock {
    current_ms: u64,
}

impl MockClock {
    /// Creates a new mock clock starting at 0ms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the current time in milliseconds.
    pub fn set(&mut self, ms: u64) {
        self.current_ms = ms;
    }

    /// Advances the clock by the given duration.
    pub fn advance(&mut self, ms: u64) {
        self.current_ms += ms;
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.current_ms
    }
}

// ============================================================================
// Serial Line Mock
// ============================================================================

#[derive(Debug)]
struct MockLine {
    available: bool,
    inbound: VecDeque<u8>,
    written: Vec<u8>,
    chunk_size: usize,
    reads_before_failure: Option<usize>,
    fail_bytes_to_read: bool,
    time_out_next_read: bool,
    fail_next_write: bool,
    open_attempts: usize,
    port_open: bool,
}

impl Default for MockLine {
    fn default() -> Self {
        Self {
            available: true,
            inbound: VecDeque::new(),
            written: Vec::new(),
            chunk_size: 0,
            reads_before_failure: None,
            fail_bytes_to_read: false,
            time_out_next_read: false,
            fail_next_write: false,
            open_attempts: 0,
            port_open: false,
        }
    }
}

/// Mock port opener backed by a scripted serial line.
///
/// Clones share the same line, so a test keeps one clone to script input
/// and inspect output after handing the other to a
/// [`SerialLink`](crate::SerialLink).
///
/// # Example
///
/// ```rust
/// use rs_tractor::hal::MockOpener;
/// use rs_tractor::traits::{BytePort, PortOpener};
/// use rs_tractor::LinkConfig;
///
/// let mut opener = MockOpener::new();
/// let line = opener.clone();
/// line.push_inbound(&[1, 2, 3]);
///
/// let mut port = opener.open(&LinkConfig::default()).unwrap();
/// assert_eq!(port.bytes_to_read().unwrap(), 3);
/// port.write_byte(7).unwrap();
/// assert_eq!(line.written(), vec![7]);
///
/// drop(port);
/// assert!(!line.is_port_open());
/// ```
#[derive(Clone, Debug, Default)]
pub struct MockOpener {
    line: Rc<RefCell<MockLine>>,
}

impl MockOpener {
    /// Creates a line with a device attached and nothing buffered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach or detach the device. Opens fail while detached.
    pub fn set_available(&self, available: bool) {
        self.line.borrow_mut().available = available;
    }

    /// Queue inbound bytes.
    pub fn push_inbound(&self, bytes: &[u8]) {
        self.line.borrow_mut().inbound.extend(bytes.iter().copied());
    }

    /// Inbound bytes not yet read.
    pub fn pending_inbound(&self) -> usize {
        self.line.borrow().inbound.len()
    }

    /// Limit how many bytes a single read returns (0 = no limit).
    pub fn set_chunk_size(&self, size: usize) {
        self.line.borrow_mut().chunk_size = size;
    }

    /// Let `reads` more reads succeed, then fail the next one.
    pub fn fail_read_after(&self, reads: usize) {
        self.line.borrow_mut().reads_before_failure = Some(reads);
    }

    /// Fail the next query for buffered bytes.
    pub fn fail_bytes_to_read(&self) {
        self.line.borrow_mut().fail_bytes_to_read = true;
    }

    /// Make the next read time out without returning data.
    pub fn time_out_next_read(&self) {
        self.line.borrow_mut().time_out_next_read = true;
    }

    /// Fail the next write.
    pub fn fail_next_write(&self) {
        self.line.borrow_mut().fail_next_write = true;
    }

    /// All bytes written so far.
    pub fn written(&self) -> Vec<u8> {
        self.line.borrow().written.clone()
    }

    /// Take and clear the bytes written so far.
    pub fn take_written(&self) -> Vec<u8> {
        std::mem::take(&mut self.line.borrow_mut().written)
    }

    /// Number of open attempts, successful or not.
    pub fn open_attempts(&self) -> usize {
        self.line.borrow().open_attempts
    }

    /// Returns true while a port handle from this line is alive.
    pub fn is_port_open(&self) -> bool {
        self.line.borrow().port_open
    }
}

impl PortOpener for MockOpener {
    type Port = MockPort;

    fn open(&mut self, config: &LinkConfig) -> Result<MockPort, LinkError> {
        let mut line = self.line.borrow_mut();
        line.open_attempts += 1;
        if !line.available {
            return Err(LinkError::PortUnavailable {
                port: config.port.to_string(),
                reason: "device not connected".into(),
            });
        }
        line.port_open = true;
        Ok(MockPort {
            line: Rc::clone(&self.line),
        })
    }
}

/// Port handle produced by [`MockOpener`].
#[derive(Debug)]
pub struct MockPort {
    line: Rc<RefCell<MockLine>>,
}

impl BytePort for MockPort {
    fn bytes_to_read(&mut self) -> io::Result<usize> {
        let mut line = self.line.borrow_mut();
        if line.fail_bytes_to_read {
            line.fail_bytes_to_read = false;
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "device unplugged"));
        }
        Ok(line.inbound.len())
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut line = self.line.borrow_mut();
        if line.time_out_next_read {
            line.time_out_next_read = false;
            return Err(io::Error::new(io::ErrorKind::TimedOut, "read timed out"));
        }
        match line.reads_before_failure {
            Some(0) => {
                line.reads_before_failure = None;
                return Err(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "device unplugged",
                ));
            }
            Some(n) => line.reads_before_failure = Some(n - 1),
            None => {}
        }

        let mut n = buf.len().min(line.inbound.len());
        if line.chunk_size > 0 {
            n = n.min(line.chunk_size);
        }
        for slot in buf.iter_mut().take(n) {
            *slot = line.inbound.pop_front().unwrap_or_default();
        }
        Ok(n)
    }

    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        let mut line = self.line.borrow_mut();
        if line.fail_next_write {
            line.fail_next_write = false;
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "write failed"));
        }
        line.written.push(byte);
        Ok(())
    }
}

impl Drop for MockPort {
    fn drop(&mut self) {
        self.line.borrow_mut().port_open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // MockBody Tests
    // =========================================================================

    #[test]
    fn body_accumulates_position() {
        let mut body = MockBody::new();
        body.set_velocity(Vec2::new(1.0, 0.0)).unwrap();
        body.set_velocity(Vec2::new(1.0, 2.0)).unwrap();
        assert_eq!(body.position, Vec2::new(2.0, 2.0));
        assert_eq!(body.updates, 2);
    }

    // =========================================================================
    // MockOpener Tests
    // =========================================================================

    #[test]
    fn unavailable_line_refuses_open() {
        let mut opener = MockOpener::new();
        opener.set_available(false);
        let err = opener.open(&LinkConfig::default()).unwrap_err();
        assert!(matches!(err, LinkError::PortUnavailable { .. }));
        assert_eq!(opener.open_attempts(), 1);
        assert!(!opener.is_port_open());
    }

    #[test]
    fn chunked_reads() {
        let mut opener = MockOpener::new();
        opener.push_inbound(&[1, 2, 3]);
        opener.set_chunk_size(2);
        let mut port = opener.open(&LinkConfig::default()).unwrap();

        let mut buf = [0u8; 8];
        assert_eq!(port.read_bytes(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], &[1, 2]);
        assert_eq!(port.read_bytes(&mut buf).unwrap(), 1);
        assert_eq!(buf[0], 3);
    }

    #[test]
    fn injected_read_failure() {
        let mut opener = MockOpener::new();
        opener.push_inbound(&[1, 2]);
        opener.set_chunk_size(1);
        opener.fail_read_after(1);
        let mut port = opener.open(&LinkConfig::default()).unwrap();

        let mut buf = [0u8; 4];
        assert_eq!(port.read_bytes(&mut buf).unwrap(), 1);
        assert!(port.read_bytes(&mut buf).is_err());
        assert_eq!(port.read_bytes(&mut buf).unwrap(), 1);
    }

    #[test]
    fn injected_query_failure_and_timeout_are_one_shot() {
        let mut opener = MockOpener::new();
        opener.push_inbound(&[9]);
        let mut port = opener.open(&LinkConfig::default()).unwrap();

        opener.fail_bytes_to_read();
        assert!(port.bytes_to_read().is_err());
        assert_eq!(port.bytes_to_read().unwrap(), 1);

        let mut buf = [0u8; 4];
        opener.time_out_next_read();
        let err = port.read_bytes(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
        assert_eq!(port.read_bytes(&mut buf).unwrap(), 1);
    }

    #[test]
    fn injected_write_failure_is_one_shot() {
        let mut opener = MockOpener::new();
        let mut port = opener.open(&LinkConfig::default()).unwrap();
        opener.fail_next_write();
        assert!(port.write_byte(1).is_err());
        port.write_byte(2).unwrap();
        assert_eq!(opener.take_written(), vec![2]);
        assert!(opener.written().is_empty());
    }

    // =========================================================================
    // MockClock Tests
    // =========================================================================

    #[test]
    fn mock_clock_new() {
        let clock = MockClock::new();
        assert_eq!(clock.now_ms(), 0);
    }

    #[test]
    fn mock_clock_set_and_advance() {
        let mut clock = MockClock::new();
        clock.set(10_000);
        clock.advance(250);
        assert_eq!(clock.now_ms(), 10_250);
    }
}
