//! Rotation value type, stored in degrees.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::EPSILON;

/// An angle normalized to `[0, 360)` degrees.
///
/// Normalization happens at construction and is idempotent;
/// [`Rotation::ZERO`] is the identity for `add` and `sub`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    degrees: f64,
}

impl Rotation {
    pub const ZERO: Rotation = Rotation { degrees: 0.0 };

    /// Create a rotation from degrees, normalizing into `[0, 360)`.
    pub fn from_degrees(degrees: f64) -> Self {
        Self {
            degrees: degrees.rem_euclid(360.0),
        }
    }

    /// Create a rotation from radians.
    pub fn from_radians(radians: f64) -> Self {
        Self::from_degrees(radians.to_degrees())
    }

    /// The normalized angle in degrees.
    pub fn degrees(&self) -> f64 {
        self.degrees
    }

    /// The angle in radians.
    pub fn radians(&self) -> f64 {
        self.degrees.to_radians()
    }

    pub fn sin(&self) -> f64 {
        self.radians().sin()
    }

    pub fn cos(&self) -> f64 {
        self.radians().cos()
    }

    pub fn add(&self, other: Rotation) -> Rotation {
        Rotation::from_degrees(self.degrees + other.degrees)
    }

    pub fn sub(&self, other: Rotation) -> Rotation {
        Rotation::from_degrees(self.degrees - other.degrees)
    }

    pub fn negate(&self) -> Rotation {
        Rotation::from_degrees(-self.degrees)
    }

    /// Equality within [`EPSILON`], wrap-around aware (359.9995° ≈ 0°).
    pub fn equals(&self, other: &Rotation) -> bool {
        let distance = (self.degrees - other.degrees + 180.0).rem_euclid(360.0) - 180.0;

        distance.abs() < EPSILON
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization() {
        assert_eq!(Rotation::from_degrees(370.0).degrees(), 10.0);
        assert_eq!(Rotation::from_degrees(-10.0).degrees(), 350.0);
        assert_eq!(Rotation::from_degrees(720.0).degrees(), 0.0);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let rotation = Rotation::from_degrees(-45.0);

        assert_eq!(Rotation::from_degrees(rotation.degrees()), rotation);
    }

    #[test]
    fn test_zero_is_identity() {
        let rotation = Rotation::from_degrees(123.0);

        assert_eq!(rotation.add(Rotation::ZERO), rotation);
        assert_eq!(rotation.sub(Rotation::ZERO), rotation);
    }

    #[test]
    fn test_negate() {
        let rotation = Rotation::from_degrees(90.0);

        assert_eq!(rotation.negate().degrees(), 270.0);
        assert_eq!(rotation.add(rotation.negate()), Rotation::ZERO);
    }

    #[test]
    fn test_equals_wraps_around() {
        assert!(Rotation::from_degrees(359.9999).equals(&Rotation::ZERO));
        assert!(!Rotation::from_degrees(180.0).equals(&Rotation::ZERO));
    }
}
