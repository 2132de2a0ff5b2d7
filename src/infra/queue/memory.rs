//! In-memory FIFO queue with an optional depth cap.

use std::collections::VecDeque;

use crate::core::{Job, JobQueue, SchedulerError};

/// First-in first-out queue of pending jobs.
///
/// Unbounded unless constructed with [`FifoQueue::bounded`].
#[derive(Debug, Default)]
pub struct FifoQueue {
    max_depth: Option<usize>,
    jobs: VecDeque<Job>,
}

impl FifoQueue {
    /// Queue that never rejects.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Queue that rejects once `max_depth` jobs are pending.
    pub fn bounded(max_depth: usize) -> Self {
        Self {
            max_depth: Some(max_depth),
            jobs: VecDeque::with_capacity(max_depth.min(1024)),
        }
    }

    /// Queue with the given optional cap.
    pub fn with_max_depth(max_depth: Option<usize>) -> Self {
        max_depth.map_or_else(Self::unbounded, Self::bounded)
    }
}

impl JobQueue for FifoQueue {
    fn push_back(&mut self, job: Job) -> Result<(), SchedulerError> {
        if let Some(max) = self.max_depth {
            if self.jobs.len() >= max {
                return Err(SchedulerError::QueueFull(max));
            }
        }
        self.jobs.push_back(job);
        Ok(())
    }

    fn pop_front(&mut self) -> Option<Job> {
        self.jobs.pop_front()
    }

    fn len(&self) -> usize {
        self.jobs.len()
    }

    fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }
}
