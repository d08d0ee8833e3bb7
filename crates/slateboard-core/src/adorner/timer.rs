//! Cancellable repeat task for keyboard nudging.
//!
//! The engine is single-threaded and owns no clock; the embedding event
//! loop schedules the actual interval and calls back with the handle it
//! was given. Generation stamping guarantees that a tick scheduled
//! before a cancel can never act on a later session.

use std::time::Duration;

/// Interval between keyboard nudge ticks.
pub const NUDGE_INTERVAL: Duration = Duration::from_millis(50);

/// A handle identifying one scheduled repeat task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskHandle {
    generation: u64,
}

/// The controller-side state of the repeat task.
#[derive(Debug, Default)]
pub struct RepeatTask {
    generation: u64,
    active: bool,
}

impl RepeatTask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new task, invalidating all previously issued handles.
    pub fn schedule(&mut self) -> TaskHandle {
        self.generation += 1;
        self.active = true;

        TaskHandle {
            generation: self.generation,
        }
    }

    /// Stop the task; outstanding handles become stale.
    pub fn cancel(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether a tick carrying this handle is still current.
    pub fn accepts(&self, handle: TaskHandle) -> bool {
        self.active && handle.generation == self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_and_accept() {
        let mut task = RepeatTask::new();
        let handle = task.schedule();

        assert!(task.is_active());
        assert!(task.accepts(handle));
    }

    #[test]
    fn test_cancel_invalidates_outstanding_handles() {
        let mut task = RepeatTask::new();
        let handle = task.schedule();

        task.cancel();

        assert!(!task.is_active());
        assert!(!task.accepts(handle));
    }

    #[test]
    fn test_stale_handle_rejected_after_reschedule() {
        let mut task = RepeatTask::new();
        let stale = task.schedule();

        task.cancel();
        let fresh = task.schedule();

        assert!(!task.accepts(stale));
        assert!(task.accepts(fresh));
    }
}
