//! In-memory task store guarded by a single read/write lock.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::core::{SchedulerError, StatusCounts, StatusUpdate, Task, TaskId, TaskStore};

/// Volatile task store; records are replaced whole under the write lock.
#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    tasks: RwLock<HashMap<TaskId, Task>>,
}

impl InMemoryTaskStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TaskStore for InMemoryTaskStore {
    fn create(
        &self,
        id: TaskId,
        client_tag: Option<String>,
        now_ms: u128,
    ) -> Result<Task, SchedulerError> {
        let mut tasks = self.tasks.write();
        if tasks.contains_key(&id) {
            return Err(SchedulerError::DuplicateTask(id));
        }
        let task = Task::new(id, client_tag, now_ms);
        tasks.insert(id, task.clone());
        Ok(task)
    }

    fn get(&self, id: &TaskId) -> Result<Task, SchedulerError> {
        self.tasks
            .read()
            .get(id)
            .cloned()
            .ok_or(SchedulerError::NotFound(*id))
    }

    fn update_status(&self, id: &TaskId, update: StatusUpdate) -> Result<Task, SchedulerError> {
        let mut tasks = self.tasks.write();
        let slot = tasks.get_mut(id).ok_or(SchedulerError::NotFound(*id))?;
        let next = slot.apply(update)?;
        *slot = next.clone();
        Ok(next)
    }

    fn delete(&self, id: &TaskId) -> Option<Task> {
        self.tasks.write().remove(id)
    }

    fn snapshot(&self) -> Vec<Task> {
        self.tasks.read().values().cloned().collect()
    }

    fn len(&self) -> usize {
        self.tasks.read().len()
    }

    fn counts(&self) -> StatusCounts {
        let tasks = self.tasks.read();
        let mut counts = StatusCounts::default();
        for task in tasks.values() {
            counts.add(task.status);
        }
        counts
    }
}
