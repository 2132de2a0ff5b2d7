//! Error types for scheduler operations.

use thiserror::Error;

use super::task::{TaskId, TaskStatus};

/// Errors produced by scheduler components.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// No record exists for the id (never issued, or already evicted).
    #[error("task not found: {0}")]
    NotFound(TaskId),
    /// The record outlived its time-to-live and was removed on lookup.
    #[error("task expired: {0}")]
    Expired(TaskId),
    /// A record with this id already exists.
    #[error("duplicate task id: {0}")]
    DuplicateTask(TaskId),
    /// The requested status change would move the task backwards or skip a state.
    #[error("invalid transition for task {id}: {from} -> {to}")]
    InvalidTransition {
        /// Task identifier.
        id: TaskId,
        /// Status held by the stored record.
        from: TaskStatus,
        /// Status that was requested.
        to: TaskStatus,
    },
    /// The pending queue reached its configured depth cap.
    #[error("queue full: depth {0}")]
    QueueFull(usize),
    /// Configuration rejected before starting.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The scheduler no longer accepts work.
    #[error("scheduler is shut down")]
    ShutDown,
}

impl SchedulerError {
    /// Whether the error means the caller should treat the task as absent.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Expired(_))
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
