//! Rectangle-with-rotation value type and the bounds algebra built on it.

use kurbo::Rect;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Rotation, Vec2, EPSILON};

/// The pose of a rectangle: center position, size and rotation.
///
/// Every operation is pure and returns a new `Transform`. The size is
/// guaranteed non-negative per component; constructors clamp instead of
/// storing negative extents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    position: Vec2,
    size: Vec2,
    rotation: Rotation,
}

impl Transform {
    pub const ZERO: Transform = Transform {
        position: Vec2::ZERO,
        size: Vec2::ZERO,
        rotation: Rotation::ZERO,
    };

    /// Create a transform, clamping the size to non-negative components.
    pub fn new(position: Vec2, size: Vec2, rotation: Rotation) -> Self {
        Self {
            position,
            size: size.max(Vec2::ZERO),
            rotation,
        }
    }

    /// Create an axis-aligned transform from a bounding rectangle.
    pub fn from_rect(rect: Rect) -> Self {
        Self::new(
            rect.center().into(),
            Vec2::new(rect.width(), rect.height()),
            Rotation::ZERO,
        )
    }

    /// The center of the rectangle.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Width and height, both non-negative.
    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// The four corners in world coordinates, honoring the rotation.
    pub fn corners(&self) -> [Vec2; 4] {
        let half_w = self.size.x * 0.5;
        let half_h = self.size.y * 0.5;

        [
            Vec2::new(-half_w, -half_h),
            Vec2::new(half_w, -half_h),
            Vec2::new(half_w, half_h),
            Vec2::new(-half_w, half_h),
        ]
        .map(|corner| Vec2::rotated(corner + self.position, self.position, self.rotation))
    }

    /// Axis-aligned bounding box of the rotated rectangle.
    pub fn aabb(&self) -> Rect {
        if self.rotation.equals(&Rotation::ZERO) {
            return Rect::new(
                self.position.x - self.size.x * 0.5,
                self.position.y - self.size.y * 0.5,
                self.position.x + self.size.x * 0.5,
                self.position.y + self.size.y * 0.5,
            );
        }

        bounding_rect(self.corners().into_iter())
    }

    /// Translate by `delta`; size and rotation unchanged.
    pub fn move_by(&self, delta: Vec2) -> Transform {
        Transform::new(self.position + delta, self.size, self.rotation)
    }

    /// Move the center to `position`.
    pub fn move_to(&self, position: Vec2) -> Transform {
        Transform::new(position, self.size, self.rotation)
    }

    /// Rotate by `delta`; position and size unchanged.
    pub fn rotate_by(&self, delta: Rotation) -> Transform {
        Transform::new(self.position, self.size, self.rotation.add(delta))
    }

    /// Rotate the whole transform around an external anchor point.
    pub fn rotate_around_anchor(&self, anchor: Vec2, rotation: Rotation) -> Transform {
        Transform::new(
            Vec2::rotated(self.position, anchor, rotation),
            self.size,
            self.rotation.add(rotation),
        )
    }

    /// Grow by `delta_size` and shift the center by `delta_position`.
    ///
    /// Resizing is anchored at the corner or edge opposite the dragged
    /// handle, so the center moves; callers derive `delta_position` from
    /// the anchor and the current rotation. The new size is clamped to
    /// zero per component.
    pub fn resize_and_move_by(&self, delta_size: Vec2, delta_position: Vec2) -> Transform {
        Transform::new(
            self.position + delta_position,
            self.size + delta_size,
            self.rotation,
        )
    }

    /// Resize to `size` keeping the (rotated) top-left corner in place.
    pub fn resize_top_left(&self, size: Vec2) -> Transform {
        if self.size.equals(&size) {
            return *self;
        }

        let growth = size - self.size;

        let sin = self.rotation.sin();
        let cos = self.rotation.cos();

        let center_offset = Vec2::new(
            0.5 * (growth.x * cos - growth.y * sin),
            0.5 * (growth.x * sin + growth.y * cos),
        );

        Transform::new(self.position + center_offset, size, self.rotation)
    }

    /// Re-express this transform, assumed to be one member of a set whose
    /// aggregate was `old_bounds`, under the new aggregate `new_bounds`.
    pub fn transform_by_bounds(&self, old_bounds: &Transform, new_bounds: &Transform) -> Transform {
        if old_bounds.equals(new_bounds) {
            return *self;
        }

        let ratio_x = size_ratio(old_bounds.size.x, new_bounds.size.x);
        let ratio_y = size_ratio(old_bounds.size.y, new_bounds.size.y);

        // Local offset of our center inside the old bounds frame.
        let old_center = Vec2::rotated(
            self.position - old_bounds.position,
            Vec2::ZERO,
            old_bounds.rotation.negate(),
        );

        // Our own rotation relative to the bounds decides how much of the
        // horizontal and vertical stretch lands on each of our axes.
        let element_rotation = self.rotation.sub(old_bounds.rotation);
        let element_sin = element_rotation.sin().abs();
        let element_cos = element_rotation.cos().abs();

        let stretch_x = ratio_x - 1.0;
        let stretch_y = ratio_y - 1.0;

        let new_size = Vec2::new(
            self.size.x + element_cos * stretch_x * self.size.x + element_sin * stretch_y * self.size.x,
            self.size.y + element_cos * stretch_y * self.size.y + element_sin * stretch_x * self.size.y,
        );

        let new_center = Vec2::new(old_center.x * ratio_x, old_center.y * ratio_y);
        let new_position =
            Vec2::rotated(new_center, Vec2::ZERO, new_bounds.rotation) + new_bounds.position;

        let new_rotation = self.rotation.add(new_bounds.rotation).sub(old_bounds.rotation);

        Transform::new(new_position, new_size, new_rotation)
    }

    /// The minimal bounding transform, at the given rotation, that
    /// contains the corners of all input transforms.
    ///
    /// Degenerate input (empty slice) yields [`Transform::ZERO`].
    pub fn from_transforms_and_rotation(transforms: &[Transform], rotation: Rotation) -> Transform {
        if transforms.is_empty() {
            return Transform::ZERO;
        }

        if rotation.equals(&Rotation::ZERO) {
            let rect = bounding_rect(
                transforms
                    .iter()
                    .flat_map(|transform| transform.corners().into_iter()),
            );

            return Transform::from_rect(rect);
        }

        // Un-rotate all corners into the target rotation's frame around a
        // shared pivot, box them there, then rotate the box center back.
        let pivot = centroid(transforms);
        let negated = rotation.negate();

        let rect = bounding_rect(transforms.iter().flat_map(|transform| {
            transform
                .corners()
                .into_iter()
                .map(move |corner| Vec2::rotated(corner, pivot, negated))
        }));

        let center = Vec2::rotated(rect.center().into(), pivot, rotation);

        Transform::new(center, Vec2::new(rect.width(), rect.height()), rotation)
    }

    /// Value equality within the shared geometric tolerance.
    pub fn equals(&self, other: &Transform) -> bool {
        self.position.equals(&other.position)
            && self.size.equals(&other.size)
            && self.rotation.equals(&other.rotation)
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "position: {}, size: {}, rotation: {}",
            self.position, self.size, self.rotation
        )
    }
}

fn size_ratio(old: f64, new: f64) -> f64 {
    if old.abs() < EPSILON {
        1.0
    } else {
        new / old
    }
}

fn centroid(transforms: &[Transform]) -> Vec2 {
    let sum = transforms
        .iter()
        .fold(Vec2::ZERO, |acc, transform| acc + transform.position);

    sum * (1.0 / transforms.len() as f64)
}

fn bounding_rect(points: impl Iterator<Item = Vec2>) -> Rect {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for point in points {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    Rect::new(min_x, min_y, max_x, max_y)
}
