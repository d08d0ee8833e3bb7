//! Input types fed into the manipulation controller.

use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;
use crate::snap::SnapMode;

/// Modifier keys relevant to snapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapModifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl SnapModifiers {
    /// The snap mode implied by the held modifiers: shift forces the
    /// grid, ctrl disables snapping, the default aligns with shapes.
    pub fn snap_mode(&self) -> SnapMode {
        if self.shift {
            SnapMode::Grid
        } else if self.ctrl {
            SnapMode::None
        } else {
            SnapMode::Shapes
        }
    }
}

/// Direction of a keyboard nudge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NudgeDirection {
    Left,
    Right,
    Up,
    Down,
}

impl NudgeDirection {
    /// Map a key name to a nudge direction.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Self::Left),
            "ArrowRight" => Some(Self::Right),
            "ArrowUp" => Some(Self::Up),
            "ArrowDown" => Some(Self::Down),
            _ => None,
        }
    }

    /// Unit vector of one nudge tick.
    pub fn vector(&self) -> Vec2 {
        match self {
            Self::Left => Vec2::new(-1.0, 0.0),
            Self::Right => Vec2::new(1.0, 0.0),
            Self::Up => Vec2::new(0.0, -1.0),
            Self::Down => Vec2::new(0.0, 1.0),
        }
    }
}
