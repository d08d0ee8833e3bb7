//! Diagram document model: items, constraints and bounds resolution.

mod bounds;
mod constraint;
mod document;
mod item;

pub use bounds::BoundsResolver;
pub use constraint::{
    Constraint, ConstraintRef, FixedSizeConstraint, MinSizeConstraint, TextHeightConstraint,
};
pub use document::Diagram;
pub use item::{appearance, DiagramItem, ItemBody, ItemId};
