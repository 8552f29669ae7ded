//! Planar vector math for the simulation.
//!
//! Coordinates are plain `f64` in simulation units. Human-facing values are
//! multiplied by [`SCALE`] on the way in, which keeps small display
//! magnitudes far away from floating-point noise.

use serde::{Deserialize, Serialize};

/// Simulation units per display unit.
pub const SCALE: f64 = 1000.0;

/// Distance under which a mover counts as having arrived.
pub const EPSILON: f64 = 1e-10;

/// A 2D vector / point.
///
/// Equality is exact component comparison; use [`Vec2::approx_eq`] when a
/// tolerance is wanted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

/// Locations and destinations are points in the plane.
pub type Point = Vec2;

impl Vec2 {
    /// Zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new vector.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Dot product of two vectors.
    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Euclidean length.
    #[must_use]
    pub fn norm(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Distance between two points.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self - other).norm()
    }

    /// Unit vector in the same direction, or zero for the zero vector.
    #[must_use]
    pub fn normalize(self) -> Self {
        let len = self.norm();
        if len == 0.0 {
            return Self::ZERO;
        }
        self * (1.0 / len)
    }

    /// Component-wise comparison within [`EPSILON`].
    #[must_use]
    pub fn approx_eq(self, other: Self) -> bool {
        (self.x - other.x).abs() < EPSILON && (self.y - other.y).abs() < EPSILON
    }

    /// Unit heading for a bearing in radians, measured clockwise from +y.
    #[must_use]
    pub fn from_bearing(radians: f64) -> Self {
        Self::new(radians.sin(), radians.cos())
    }

    /// Convert a point in display units to simulation units.
    #[must_use]
    pub fn scaled(x: f64, y: f64) -> Self {
        Self::new(x * SCALE, y * SCALE)
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f64> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl std::ops::Div<f64> for Vec2 {
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl std::fmt::Display for Vec2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}
