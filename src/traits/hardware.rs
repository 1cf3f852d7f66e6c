//! Host abstraction traits for the simulated body, keyboard input, and time.
//!
//! These traits let the vehicle core run inside any host: a game engine, a
//! headless driver binary, or the mocks used by the test suite.
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`Body`] | Receives the velocity computed each physics tick |
//! | [`KeyboardInput`] | Local-mode axes and drive keys |
//! | [`Clock`] | Millisecond time source for the scheduler |
//!
//! # Example
//!
//! ```rust
//! use rs_tractor::traits::Body;
//! use rs_tractor::hal::MockBody;
//! use rs_tractor::Vec2;
//!
//! let mut body = MockBody::new();
//! body.set_velocity(Vec2::new(0.5, 0.0)).unwrap();
//! assert_eq!(body.velocity, Vec2::new(0.5, 0.0));
//! ```

use crate::motion::Vec2;

/// The simulated rigid body the vehicle drives.
///
/// The host owns the body and its integration; the core only hands it one
/// velocity per physics tick.
pub trait Body {
    /// Error type for body operations.
    type Error;

    /// Apply the velocity for this physics tick.
    fn set_velocity(&mut self, velocity: Vec2) -> Result<(), Self::Error>;

    /// Convenience method to stop the body.
    fn halt(&mut self) -> Result<(), Self::Error> {
        self.set_velocity(Vec2::ZERO)
    }
}

/// Keys that drive the gearbox in local mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DriveKey {
    /// Held to brake, released to restore the previous gear.
    Brake,
    /// Pressed to select forward.
    Forward,
    /// Pressed to select reverse.
    Reverse,
    /// Pressed to select neutral.
    Neutral,
}

/// Per-frame state of one key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct KeyState {
    /// Key is down this frame.
    pub held: bool,
    /// Key went down this frame.
    pub pressed: bool,
    /// Key went up this frame.
    pub released: bool,
}

impl KeyState {
    /// Key not touched.
    pub const IDLE: KeyState = KeyState {
        held: false,
        pressed: false,
        released: false,
    };

    /// Key went down this frame (and is held).
    pub const fn down() -> Self {
        Self {
            held: true,
            pressed: true,
            released: false,
        }
    }

    /// Key held from an earlier frame.
    pub const fn hold() -> Self {
        Self {
            held: true,
            pressed: false,
            released: false,
        }
    }

    /// Key went up this frame.
    pub const fn up() -> Self {
        Self {
            held: false,
            pressed: false,
            released: true,
        }
    }
}

/// Local keyboard input, sampled once per frame.
///
/// Axes are raw (`-1`, `0` or `1` per axis for digital keys). Edge flags in
/// [`KeyState`] must describe the current frame only.
pub trait KeyboardInput {
    /// Horizontal and vertical axes.
    fn axes(&self) -> Vec2;

    /// State of a drive key this frame.
    fn key(&self, key: DriveKey) -> KeyState;
}

/// Time source for the frame scheduler.
///
/// Provides monotonic time in milliseconds. The core never reads the time
/// itself; the host passes timestamps to [`Simulation::advance`].
///
/// [`Simulation::advance`]: crate::Simulation::advance
///
/// # Example
///
/// ```rust
/// use rs_tractor::traits::Clock;
/// use rs_tractor::hal::MockClock;
///
/// let mut clock = MockClock::new();
/// assert_eq!(clock.now_ms(), 0);
///
/// clock.advance(100);
/// assert_eq!(clock.now_ms(), 100);
/// ```
pub trait Clock {
    /// Returns current time in milliseconds since an arbitrary epoch.
    ///
    /// Must be monotonically increasing.
    fn now_ms(&self) -> u64;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestBody {
        velocity: Vec2,
        calls: usize,
    }

    impl Body for TestBody {
        type Error = ();

        fn set_velocity(&mut self, velocity: Vec2) -> Result<(), ()> {
            self.velocity = velocity;
            self.calls += 1;
            Ok(())
        }
    }

    #[test]
    fn body_halt_default_impl() {
        let mut body = TestBody {
            velocity: Vec2::new(3.0, 4.0),
            calls: 0,
        };
        body.halt().unwrap();
        assert_eq!(body.velocity, Vec2::ZERO);
        assert_eq!(body.calls, 1);
    }

    #[test]
    fn key_state_constructors() {
        assert_eq!(KeyState::default(), KeyState::IDLE);
        assert!(KeyState::down().pressed && KeyState::down().held);
        assert!(KeyState::hold().held && !KeyState::hold().pressed);
        assert!(KeyState::up().released && !KeyState::up().held);
    }
}
