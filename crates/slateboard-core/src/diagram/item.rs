//! Diagram items: leaf shapes and groups.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

use crate::geometry::{Rotation, Transform, Vec2};

use super::constraint::ConstraintRef;

/// Stable, unique identifier of a diagram item.
pub type ItemId = Uuid;

/// Well-known appearance keys the engine itself cares about.
pub mod appearance {
    pub const TEXT: &str = "TEXT";
    pub const FONT_SIZE: &str = "FONT_SIZE";
}

/// Fallback font size when the appearance does not carry one.
const DEFAULT_FONT_SIZE: f64 = 10.0;

/// One item of a diagram, either a leaf shape or a group of other items.
///
/// Items are immutable: every mutator returns a new item, and the
/// external store decides whether to commit it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagramItem {
    id: ItemId,
    /// Display title, shown by adorner overlays.
    pub title: String,
    is_locked: bool,
    body: ItemBody,
}

/// The variant-specific payload of an item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ItemBody {
    Shape {
        /// The pose of the shape.
        transform: Transform,
        /// Opaque visual-kind key, interpreted by the rendering plugins.
        renderer: String,
        /// Opaque appearance properties.
        appearance: HashMap<String, Value>,
        /// Optional capability that derives or clamps the size.
        #[serde(skip)]
        constraint: Option<ConstraintRef>,
    },
    Group {
        /// Child item ids, unique within the group; order is z-order.
        child_ids: Vec<ItemId>,
        /// The group's own accumulated rotation, independent of the
        /// children's individual transforms.
        rotation: Rotation,
    },
}

impl DiagramItem {
    /// Create a leaf shape with the given renderer key and initial size.
    pub fn shape(renderer: impl Into<String>, width: f64, height: f64) -> Self {
        let renderer = renderer.into();

        Self {
            id: Uuid::new_v4(),
            title: renderer.clone(),
            is_locked: false,
            body: ItemBody::Shape {
                transform: Transform::new(Vec2::ZERO, Vec2::new(width, height), Rotation::ZERO),
                renderer,
                appearance: HashMap::new(),
                constraint: None,
            },
        }
    }

    /// Create a group over the given child ids.
    pub fn group(child_ids: Vec<ItemId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: "Group".to_string(),
            is_locked: false,
            body: ItemBody::Group {
                child_ids,
                rotation: Rotation::ZERO,
            },
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the initial transform (shapes only).
    pub fn with_transform(mut self, transform: Transform) -> Self {
        if let ItemBody::Shape { transform: t, .. } = &mut self.body {
            *t = transform;
        }
        self
    }

    /// Attach a size constraint (shapes only).
    pub fn with_constraint(mut self, constraint: ConstraintRef) -> Self {
        if let ItemBody::Shape { constraint: c, .. } = &mut self.body {
            *c = Some(constraint);
        }
        self
    }

    /// Set the initial rotation (groups only).
    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        if let ItemBody::Group { rotation: r, .. } = &mut self.body {
            *r = rotation;
        }
        self
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn is_locked(&self) -> bool {
        self.is_locked
    }

    pub fn body(&self) -> &ItemBody {
        &self.body
    }

    pub fn is_group(&self) -> bool {
        matches!(self.body, ItemBody::Group { .. })
    }

    /// The shape's own transform; `None` for groups, whose effective
    /// transform comes from the bounds resolver.
    pub fn transform(&self) -> Option<&Transform> {
        match &self.body {
            ItemBody::Shape { transform, .. } => Some(transform),
            ItemBody::Group { .. } => None,
        }
    }

    pub fn renderer(&self) -> Option<&str> {
        match &self.body {
            ItemBody::Shape { renderer, .. } => Some(renderer),
            ItemBody::Group { .. } => None,
        }
    }

    pub fn constraint(&self) -> Option<&ConstraintRef> {
        match &self.body {
            ItemBody::Shape { constraint, .. } => constraint.as_ref(),
            ItemBody::Group { .. } => None,
        }
    }

    pub fn child_ids(&self) -> Option<&[ItemId]> {
        match &self.body {
            ItemBody::Group { child_ids, .. } => Some(child_ids),
            ItemBody::Shape { .. } => None,
        }
    }

    /// The group's own rotation; `None` for shapes.
    pub fn group_rotation(&self) -> Option<Rotation> {
        match &self.body {
            ItemBody::Group { rotation, .. } => Some(*rotation),
            ItemBody::Shape { .. } => None,
        }
    }

    pub fn appearance(&self, key: &str) -> Option<&Value> {
        match &self.body {
            ItemBody::Shape { appearance, .. } => appearance.get(key),
            ItemBody::Group { .. } => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.appearance(appearance::TEXT).and_then(Value::as_str)
    }

    pub fn font_size(&self) -> f64 {
        self.appearance(appearance::FONT_SIZE)
            .and_then(Value::as_f64)
            .unwrap_or(DEFAULT_FONT_SIZE)
    }

    pub fn lock(&self) -> Self {
        let mut item = self.clone();
        item.is_locked = true;
        item
    }

    pub fn unlock(&self) -> Self {
        let mut item = self.clone();
        item.is_locked = false;
        item
    }

    /// Replace the shape's transform. No-op for groups.
    pub fn transform_to(&self, transform: Transform) -> Self {
        let mut item = self.clone();
        if let ItemBody::Shape { transform: t, .. } = &mut item.body {
            *t = transform;
        }
        item
    }

    /// Apply a pure transformer to the shape's transform. No-op for groups.
    pub fn transform_with(&self, transformer: impl FnOnce(&Transform) -> Transform) -> Self {
        match &self.body {
            ItemBody::Shape { transform, .. } => self.transform_to(transformer(transform)),
            ItemBody::Group { .. } => self.clone(),
        }
    }

    /// Retarget this item after the aggregate bounds of its selection
    /// changed from `old_bounds` to `new_bounds`.
    ///
    /// Groups only pick up the rotation difference; their effective
    /// transform follows from the children, which are retargeted
    /// individually. Shapes get the full positional and size retargeting.
    pub fn transform_by_bounds(&self, old_bounds: &Transform, new_bounds: &Transform) -> Self {
        if old_bounds.equals(new_bounds) {
            return self.clone();
        }

        match &self.body {
            ItemBody::Group { rotation, .. } => {
                let rotation = rotation
                    .add(new_bounds.rotation())
                    .sub(old_bounds.rotation());

                let mut item = self.clone();
                if let ItemBody::Group { rotation: r, .. } = &mut item.body {
                    *r = rotation;
                }
                item
            }
            ItemBody::Shape { transform, .. } => {
                self.transform_to(transform.transform_by_bounds(old_bounds, new_bounds))
            }
        }
    }

    /// Set an appearance value and re-apply the size constraint, since a
    /// content change (text, font size) can change the derived size.
    pub fn set_appearance(&self, key: impl Into<String>, value: Value) -> Self {
        let mut item = self.clone();

        if let ItemBody::Shape { appearance, .. } = &mut item.body {
            appearance.insert(key.into(), value);
        } else {
            return item;
        }

        item.apply_constraint(Some(self))
    }

    /// Re-run the constraint against the current size, resizing from the
    /// top-left corner when the constraint proposes a different one.
    pub(crate) fn apply_constraint(self, previous: Option<&DiagramItem>) -> Self {
        let ItemBody::Shape {
            transform,
            constraint: Some(constraint),
            ..
        } = &self.body
        else {
            return self;
        };

        let size = constraint.update_size(&self, transform.size(), previous);

        if size.x > 0.0 && size.y > 0.0 && !size.equals(&transform.size()) {
            let resized = transform.resize_top_left(size);
            self.transform_to(resized)
        } else {
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::TextHeightConstraint;
    use serde_json::json;
    use std::sync::Arc;

    fn transform(x: f64, y: f64, w: f64, h: f64, degrees: f64) -> Transform {
        Transform::new(
            Vec2::new(x, y),
            Vec2::new(w, h),
            Rotation::from_degrees(degrees),
        )
    }

    #[test]
    fn test_shape_accessors() {
        let item = DiagramItem::shape("Rectangle", 100.0, 50.0);

        assert!(!item.is_group());
        assert_eq!(item.renderer(), Some("Rectangle"));
        assert!(item.transform().unwrap().size().equals(&Vec2::new(100.0, 50.0)));
    }

    #[test]
    fn test_lock_is_pure() {
        let item = DiagramItem::shape("Rectangle", 10.0, 10.0);
        let locked = item.lock();

        assert!(!item.is_locked());
        assert!(locked.is_locked());
        assert_eq!(item.id(), locked.id());
    }

    #[test]
    fn test_group_transform_by_bounds_changes_rotation_only() {
        let group = DiagramItem::group(vec![Uuid::new_v4()]);

        let old_bounds = transform(0.0, 0.0, 100.0, 100.0, 0.0);
        let new_bounds = transform(50.0, 50.0, 100.0, 100.0, 30.0);

        let rotated = group.transform_by_bounds(&old_bounds, &new_bounds);

        assert!(rotated
            .group_rotation()
            .unwrap()
            .equals(&Rotation::from_degrees(30.0)));
    }

    #[test]
    fn test_shape_transform_by_bounds_retargets() {
        let item = DiagramItem::shape("Rectangle", 20.0, 20.0)
            .with_transform(transform(50.0, 50.0, 20.0, 20.0, 0.0));

        let old_bounds = transform(100.0, 100.0, 200.0, 200.0, 0.0);
        let new_bounds = transform(110.0, 100.0, 200.0, 200.0, 0.0);

        let moved = item.transform_by_bounds(&old_bounds, &new_bounds);

        assert!(moved
            .transform()
            .unwrap()
            .position()
            .equals(&Vec2::new(60.0, 50.0)));
    }

    #[test]
    fn test_set_appearance_reapplies_constraint() {
        let item = DiagramItem::shape("Label", 80.0, 24.0)
            .with_transform(transform(40.0, 12.0, 80.0, 24.0, 0.0))
            .with_constraint(Arc::new(TextHeightConstraint::new(4.0)));

        let updated = item.set_appearance(appearance::FONT_SIZE, json!(20.0));

        let expected_height = 20.0 * 1.2 + 8.0;

        assert!((updated.transform().unwrap().size().y - expected_height).abs() < 1e-9);
        assert!((updated.transform().unwrap().size().x - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_set_appearance_on_group_is_noop() {
        let group = DiagramItem::group(vec![]);
        let updated = group.set_appearance(appearance::TEXT, json!("hello"));

        assert!(updated.appearance(appearance::TEXT).is_none());
    }
}
