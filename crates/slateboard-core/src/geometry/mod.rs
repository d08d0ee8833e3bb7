//! Geometry value types for the manipulation engine.

mod rotation;
mod transform;
mod vec2;

pub use rotation::Rotation;
pub use transform::Transform;
pub use vec2::Vec2;

/// Tolerance used for all geometric equality checks.
///
/// Repeated no-op operations must compare equal, so every comparison in
/// the engine goes through the same tolerance.
pub const EPSILON: f64 = 1e-3;
