//! Size constraints attached to shapes.
//!
//! A constraint is a capability object: it reports which axes it derives
//! and proposes a corrected size whenever the shape's content changes.
//! An axis a constraint derives cannot be resized interactively.

use std::fmt::Debug;
use std::sync::Arc;

use crate::geometry::Vec2;

use super::item::DiagramItem;

/// Shared, dynamically typed constraint handle as stored on a shape.
pub type ConstraintRef = Arc<dyn Constraint + Send + Sync>;

pub trait Constraint: Debug {
    /// Whether the horizontal size is derived by this constraint.
    fn calculates_size_x(&self) -> bool;

    /// Whether the vertical size is derived by this constraint.
    fn calculates_size_y(&self) -> bool;

    /// Compute the effective size for `item` given a proposed size.
    /// `previous` is the item before the change that triggered the
    /// re-evaluation, when one exists.
    fn update_size(&self, item: &DiagramItem, proposed: Vec2, previous: Option<&DiagramItem>)
        -> Vec2;
}

/// Pins both dimensions to a fixed size.
#[derive(Debug, Clone, Copy)]
pub struct FixedSizeConstraint {
    size: Vec2,
}

impl FixedSizeConstraint {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: Vec2::new(width, height),
        }
    }
}

impl Constraint for FixedSizeConstraint {
    fn calculates_size_x(&self) -> bool {
        true
    }

    fn calculates_size_y(&self) -> bool {
        true
    }

    fn update_size(&self, _item: &DiagramItem, _proposed: Vec2, _previous: Option<&DiagramItem>) -> Vec2 {
        self.size
    }
}

/// Keeps both dimensions at or above a minimum, both axes stay freely
/// resizable.
#[derive(Debug, Clone, Copy)]
pub struct MinSizeConstraint {
    minimum: Vec2,
}

impl MinSizeConstraint {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            minimum: Vec2::new(width, height),
        }
    }
}

impl Constraint for MinSizeConstraint {
    fn calculates_size_x(&self) -> bool {
        false
    }

    fn calculates_size_y(&self) -> bool {
        false
    }

    fn update_size(&self, _item: &DiagramItem, proposed: Vec2, _previous: Option<&DiagramItem>) -> Vec2 {
        proposed.max(self.minimum)
    }
}

/// Derives the height from the font size, as text labels do; the width
/// stays free.
#[derive(Debug, Clone, Copy)]
pub struct TextHeightConstraint {
    padding: f64,
}

impl TextHeightConstraint {
    /// Line height factor applied to the font size.
    const LINE_HEIGHT: f64 = 1.2;

    pub fn new(padding: f64) -> Self {
        Self { padding }
    }
}

impl Constraint for TextHeightConstraint {
    fn calculates_size_x(&self) -> bool {
        false
    }

    fn calculates_size_y(&self) -> bool {
        true
    }

    fn update_size(&self, item: &DiagramItem, proposed: Vec2, _previous: Option<&DiagramItem>) -> Vec2 {
        let height = item.font_size() * Self::LINE_HEIGHT + 2.0 * self.padding;

        Vec2::new(proposed.x, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fixed_size_wins_over_proposal() {
        let constraint = FixedSizeConstraint::new(32.0, 32.0);
        let item = DiagramItem::shape("Icon", 32.0, 32.0);

        let size = constraint.update_size(&item, Vec2::new(100.0, 5.0), None);

        assert!(size.equals(&Vec2::new(32.0, 32.0)));
        assert!(constraint.calculates_size_x() && constraint.calculates_size_y());
    }

    #[test]
    fn test_min_size_clamps() {
        let constraint = MinSizeConstraint::new(20.0, 10.0);
        let item = DiagramItem::shape("Rectangle", 50.0, 50.0);

        let size = constraint.update_size(&item, Vec2::new(5.0, 30.0), None);

        assert!(size.equals(&Vec2::new(20.0, 30.0)));
        assert!(!constraint.calculates_size_x() && !constraint.calculates_size_y());
    }

    #[test]
    fn test_text_height_follows_font_size() {
        let constraint = TextHeightConstraint::new(5.0);
        let item = DiagramItem::shape("Label", 80.0, 24.0)
            .set_appearance(crate::diagram::appearance::FONT_SIZE, json!(15.0));

        let size = constraint.update_size(&item, Vec2::new(80.0, 24.0), None);

        assert!((size.y - (15.0 * 1.2 + 10.0)).abs() < 1e-9);
        assert!((size.x - 80.0).abs() < 1e-9);
        assert!(!constraint.calculates_size_x());
        assert!(constraint.calculates_size_y());
    }
}
