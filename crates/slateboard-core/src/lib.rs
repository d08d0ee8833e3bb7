//! Slateboard Core Library
//!
//! Geometric manipulation engine for the Slateboard diagram editor:
//! transform algebra, the diagram document model with bounds resolution,
//! snapping, and the manipulation state machine behind the selection
//! adorner.

pub mod adorner;
pub mod diagram;
pub mod error;
pub mod geometry;
pub mod input;
pub mod snap;

pub use adorner::{ManipulationController, ManipulationHost, ManipulationMode};
pub use diagram::{BoundsResolver, Diagram, DiagramItem, ItemBody, ItemId};
pub use error::ManipulationError;
pub use geometry::{Rotation, Transform, Vec2, EPSILON};
pub use input::{NudgeDirection, SnapModifiers};
pub use snap::{SnapLine, SnapManager, SnapMode, SnapResult, GRID_SIZE, SNAP_DISTANCE};
