//! Planar motion primitives: the move vector and the facing direction.
//!
//! The simulated body moves on a 2-D plane. Input (keyboard axes or a decoded
//! link command) produces a [`Vec2`] move vector, and the vehicle's facing
//! [`Direction`] is derived from that vector.
//!
//! # Facing Priority
//!
//! When both axes are non-zero the X axis wins, and within an axis the
//! positive side is checked first:
//!
//! ```rust
//! use rs_tractor::motion::{Direction, Vec2};
//!
//! assert_eq!(Direction::from_vector(Vec2::new(1.0, 1.0)), Some(Direction::Right));
//! assert_eq!(Direction::from_vector(Vec2::new(0.0, -1.0)), Some(Direction::Down));
//! assert_eq!(Direction::from_vector(Vec2::ZERO), None);
//! ```

use core::ops::{Mul, Neg};

/// A 2-D vector used for move direction and velocity.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    /// Horizontal component (positive = right).
    pub x: f32,
    /// Vertical component (positive = up).
    pub y: f32,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    /// Create a vector from its components.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns true if both components are exactly zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Euclidean length.
    #[inline]
    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector in the same direction.
    ///
    /// The zero vector (or anything too short to normalize) stays zero.
    pub fn normalized(&self) -> Vec2 {
        let len = self.length();
        if len <= f32::EPSILON || !len.is_finite() {
            return Vec2::ZERO;
        }
        Vec2::new(self.x / len, self.y / len)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// Facing direction of the vehicle.
///
/// # Default
///
/// Defaults to [`Right`](Self::Right), the facing a fresh vehicle spawns with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    /// Positive Y.
    Up,
    /// Negative Y.
    Down,
    /// Negative X.
    Left,
    /// Positive X.
    #[default]
    Right,
}

impl Direction {
    /// Resolve a facing direction from a move vector.
    ///
    /// Returns `None` for the zero vector; callers keep their previous facing.
    pub fn from_vector(v: Vec2) -> Option<Direction> {
        if v.x > 0.0 {
            Some(Direction::Right)
        } else if v.x < 0.0 {
            Some(Direction::Left)
        } else if v.y > 0.0 {
            Some(Direction::Up)
        } else if v.y < 0.0 {
            Some(Direction::Down)
        } else {
            None
        }
    }

    /// Unit move vector pointing this way.
    #[inline]
    pub const fn unit_vector(&self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, 1.0),
            Direction::Down => Vec2::new(0.0, -1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }

    /// Returns the direction as a lowercase string.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Vec2 Tests
    // =========================================================================

    #[test]
    fn zero_normalizes_to_zero() {
        assert_eq!(Vec2::ZERO.normalized(), Vec2::ZERO);
    }

    #[test]
    fn diagonal_normalizes_to_unit_length() {
        let n = Vec2::new(1.0, 1.0).normalized();
        assert!((n.length() - 1.0).abs() < 1e-6);
        assert!((n.x - n.y).abs() < 1e-6);
    }

    #[test]
    fn scale_and_negate() {
        let v = Vec2::new(1.0, -2.0) * 3.0;
        assert_eq!(v, Vec2::new(3.0, -6.0));
        assert_eq!(-v, Vec2::new(-3.0, 6.0));
    }

    // =========================================================================
    // Direction Tests
    // =========================================================================

    #[test]
    fn default_facing_is_right() {
        assert_eq!(Direction::default(), Direction::Right);
    }

    #[test]
    fn x_axis_has_priority() {
        assert_eq!(
            Direction::from_vector(Vec2::new(-1.0, 1.0)),
            Some(Direction::Left)
        );
        assert_eq!(
            Direction::from_vector(Vec2::new(0.5, -1.0)),
            Some(Direction::Right)
        );
    }

    #[test]
    fn y_axis_used_when_x_is_zero() {
        assert_eq!(
            Direction::from_vector(Vec2::new(0.0, 1.0)),
            Some(Direction::Up)
        );
        assert_eq!(
            Direction::from_vector(Vec2::new(0.0, -0.3)),
            Some(Direction::Down)
        );
    }

    #[test]
    fn unit_vector_round_trips() {
        for dir in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            assert_eq!(Direction::from_vector(dir.unit_vector()), Some(dir));
        }
    }
}
