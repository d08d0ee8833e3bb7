//! Immutable 2D vector.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use super::{Rotation, EPSILON};

/// A 2D vector or point in diagram coordinates.
///
/// All operations return new values; a `Vec2` is never mutated in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub const ONE: Vec2 = Vec2 { x: 1.0, y: 1.0 };

    /// Create a new vector.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared length, cheap check for zero-length deltas.
    pub fn length_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Euclidean length.
    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Component-wise maximum.
    pub fn max(&self, other: Vec2) -> Vec2 {
        Vec2::new(self.x.max(other.x), self.y.max(other.y))
    }

    /// Component-wise equality within [`EPSILON`].
    pub fn equals(&self, other: &Vec2) -> bool {
        (self.x - other.x).abs() < EPSILON && (self.y - other.y).abs() < EPSILON
    }

    /// Rotate `source` around `center` by `rotation`.
    pub fn rotated(source: Vec2, center: Vec2, rotation: Rotation) -> Vec2 {
        let sin = rotation.sin();
        let cos = rotation.cos();

        let dx = source.x - center.x;
        let dy = source.y - center.y;

        Vec2::new(
            cos * dx - sin * dy + center.x,
            sin * dx + cos * dy + center.y,
        )
    }

    /// Signed angle from `lhs` to `rhs` in degrees, in `(-180, 180]`.
    pub fn angle_between(lhs: Vec2, rhs: Vec2) -> f64 {
        let cross = lhs.x * rhs.y - lhs.y * rhs.x;
        let dot = lhs.x * rhs.x + lhs.y * rhs.y;

        cross.atan2(dot).to_degrees()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Component-wise product, used to mask deltas by a resize anchor.
impl Mul<Vec2> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x * rhs.x, self.y * rhs.y)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl From<Vec2> for Point {
    fn from(v: Vec2) -> Point {
        Point::new(v.x, v.y)
    }
}

impl From<Point> for Vec2 {
    fn from(p: Point) -> Vec2 {
        Vec2::new(p.x, p.y)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_algebra() {
        let a = Vec2::new(3.0, 4.0);
        let b = Vec2::new(1.0, 2.0);

        assert_eq!(a + b, Vec2::new(4.0, 6.0));
        assert_eq!(a - b, Vec2::new(2.0, 2.0));
        assert_eq!(a * 2.0, Vec2::new(6.0, 8.0));
        assert_eq!(a * b, Vec2::new(3.0, 8.0));
        assert_eq!(-a, Vec2::new(-3.0, -4.0));
        assert!((a.length() - 5.0).abs() < EPSILON);
    }

    #[test]
    fn test_rotated_quarter_turn() {
        let rotated = Vec2::rotated(Vec2::new(2.0, 1.0), Vec2::new(1.0, 1.0), Rotation::from_degrees(90.0));

        assert!(rotated.equals(&Vec2::new(1.0, 2.0)));
    }

    #[test]
    fn test_rotated_roundtrip() {
        let source = Vec2::new(13.0, -7.0);
        let center = Vec2::new(4.0, 2.0);
        let rotation = Rotation::from_degrees(33.0);

        let there = Vec2::rotated(source, center, rotation);
        let back = Vec2::rotated(there, center, rotation.negate());

        assert!(back.equals(&source));
    }

    #[test]
    fn test_angle_between_is_signed() {
        let right = Vec2::new(1.0, 0.0);
        let up = Vec2::new(0.0, 1.0);

        assert!((Vec2::angle_between(right, up) - 90.0).abs() < EPSILON);
        assert!((Vec2::angle_between(up, right) + 90.0).abs() < EPSILON);
    }
}
