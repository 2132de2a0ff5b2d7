//! Task store abstraction: the single source of truth for task status.

use serde::Serialize;

use super::task::{StatusUpdate, Task, TaskId, TaskStatus};
use super::SchedulerError;

/// Number of live records per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    /// Records waiting for a slot.
    pub queued: usize,
    /// Records whose solve call is running.
    pub processing: usize,
    /// Records finished with a token.
    pub ready: usize,
    /// Records finished with an error.
    pub failed: usize,
}

impl StatusCounts {
    /// Count one record with the given status.
    pub fn add(&mut self, status: TaskStatus) {
        match status {
            TaskStatus::Queued => self.queued += 1,
            TaskStatus::Processing => self.processing += 1,
            TaskStatus::Ready => self.ready += 1,
            TaskStatus::Failed => self.failed += 1,
        }
    }

    /// Sum over all statuses.
    pub const fn total(&self) -> usize {
        self.queued + self.processing + self.ready + self.failed
    }
}

/// Concurrency-safe mapping from task id to task record.
///
/// Every operation is atomic with respect to the others: a reader sees
/// either the record before an update or the record after it.
pub trait TaskStore: Send + Sync {
    /// Insert a new `Queued` record.
    ///
    /// # Errors
    ///
    /// `DuplicateTask` if the id is already present.
    fn create(
        &self,
        id: TaskId,
        client_tag: Option<String>,
        now_ms: u128,
    ) -> Result<Task, SchedulerError>;

    /// Fetch a copy of the record.
    ///
    /// # Errors
    ///
    /// `NotFound` if the id was never created or has been evicted.
    fn get(&self, id: &TaskId) -> Result<Task, SchedulerError>;

    /// Apply a forward status step and return the new record.
    ///
    /// # Errors
    ///
    /// `NotFound` if the record is gone; `InvalidTransition` if the step is
    /// not legal from the stored status.
    fn update_status(&self, id: &TaskId, update: StatusUpdate) -> Result<Task, SchedulerError>;

    /// Remove a record, returning it if it existed.
    fn delete(&self, id: &TaskId) -> Option<Task>;

    /// Copy of every live record.
    fn snapshot(&self) -> Vec<Task>;

    /// Number of live records.
    fn len(&self) -> usize;

    /// Whether the store holds no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live record counts by status.
    fn counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for task in self.snapshot() {
            counts.add(task.status);
        }
        counts
    }
}
