//! Selection adorner: handles, hit-testing and the manipulation
//! state machine.

pub mod controller;
pub mod handles;
pub mod timer;

pub use controller::{ManipulationController, ManipulationHost, ManipulationMode};
pub use handles::{hit_test, HandleHit, ResizeHandle};
pub use timer::{RepeatTask, TaskHandle, NUDGE_INTERVAL};
