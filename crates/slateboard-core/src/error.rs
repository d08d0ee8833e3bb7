//! Error taxonomy for the manipulation engine.
//!
//! Everything here is recoverable at the component boundary: invariant
//! violations abort the affected operation, precondition violations are
//! rejected by the state-machine guards, and degenerate input takes a
//! defined no-op path before an error is ever constructed.

use thiserror::Error;

use crate::diagram::ItemId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ManipulationError {
    /// A group reaches itself through its descendants. The diagram store
    /// must make this impossible; if it does not, the bounds computation
    /// fails instead of looping.
    #[error("group {0} contains itself, directly or transitively")]
    CyclicGroup(ItemId),

    /// An item id referenced by a group or a selection does not resolve.
    #[error("item {0} does not exist in the diagram")]
    UnknownItem(ItemId),

    /// A session was started while another one (pointer or keyboard)
    /// still owns the controller.
    #[error("a manipulation session is already active")]
    SessionAlreadyActive,

    /// A session update or commit arrived without an active session.
    #[error("no manipulation session is active")]
    NoActiveSession,
}
