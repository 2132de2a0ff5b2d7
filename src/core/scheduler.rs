//! Scheduler facade wiring the store, admission queue, dispatch loop and reaper.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;

use super::admission::{AdmissionQueue, Job, JobQueue};
use super::audit::{AuditAction, AuditTrail};
use super::dispatcher::{Dispatcher, Spawn};
use super::reaper::Reaper;
use super::solver::{SolveRequest, Solver};
use super::store::{StatusCounts, TaskStore};
use super::task::{Task, TaskId};
use super::worker::Worker;
use super::SchedulerError;
use crate::util::clock::now_ms;

/// Configuration values for capacity and retention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerLimits {
    /// Maximum number of solve calls running at once.
    pub max_parallel: usize,
    /// Optional cap on pending jobs; `None` keeps the queue unbounded.
    pub max_queue_depth: Option<usize>,
    /// Age after which a record is evicted.
    pub task_ttl: Duration,
    /// Time between reaper sweeps.
    pub sweep_interval: Duration,
}

impl Default for SchedulerLimits {
    fn default() -> Self {
        Self {
            max_parallel: 5,
            max_queue_depth: None,
            task_ttl: Duration::from_secs(60 * 60),
            sweep_interval: Duration::from_secs(15 * 60),
        }
    }
}

impl SchedulerLimits {
    /// Check that every limit is usable by the dispatch loop and the reaper.
    ///
    /// # Errors
    ///
    /// A description of the first invalid limit.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_parallel == 0 {
            return Err("max_parallel must be greater than 0".into());
        }
        if self.max_queue_depth == Some(0) {
            return Err("max_queue_depth must be greater than 0 when set".into());
        }
        if self.task_ttl.is_zero() {
            return Err("task_ttl must be greater than 0".into());
        }
        if self.sweep_interval.is_zero() {
            return Err("sweep_interval must be greater than 0".into());
        }
        Ok(())
    }
}

/// Point-in-time view of scheduler load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SchedulerStats {
    /// Live records by status.
    pub counts: StatusCounts,
    /// Jobs waiting for admission.
    pub queue_depth: usize,
    /// Jobs admitted and running.
    pub in_flight: usize,
    /// Parallelism cap.
    pub max_parallel: usize,
}

/// Admission-controlled scheduler for solve jobs.
///
/// `start` spawns the dispatch loop and the reaper; `submit` and `poll` are
/// safe to call from any number of request handlers concurrently.
pub struct TaskScheduler {
    store: Arc<dyn TaskStore>,
    queue: Arc<AdmissionQueue>,
    limits: SchedulerLimits,
    audit: AuditTrail,
    shutdown: watch::Sender<bool>,
}

impl TaskScheduler {
    /// Start the background loops on `spawner` and return the scheduler.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` when `limits` fail [`SchedulerLimits::validate`];
    /// nothing is spawned in that case.
    pub fn start<S>(
        limits: SchedulerLimits,
        store: Arc<dyn TaskStore>,
        backend: Box<dyn JobQueue>,
        solver: Arc<dyn Solver>,
        audit: AuditTrail,
        spawner: S,
    ) -> Result<Self, SchedulerError>
    where
        S: Spawn + Clone + Send + Sync + 'static,
    {
        limits.validate().map_err(SchedulerError::InvalidConfig)?;
        let queue = Arc::new(AdmissionQueue::new(limits.max_parallel, backend));
        let (shutdown, shutdown_rx) = watch::channel(false);

        let worker = Worker::new(Arc::clone(&store), solver, audit.clone());
        let dispatcher = Dispatcher::new(Arc::clone(&queue), worker, spawner.clone());
        spawner.spawn(dispatcher.run(shutdown_rx.clone()));

        let reaper = Reaper::new(
            Arc::clone(&store),
            limits.task_ttl,
            limits.sweep_interval,
            audit.clone(),
        );
        spawner.spawn(reaper.run(shutdown_rx));

        tracing::info!(
            max_parallel = limits.max_parallel,
            max_queue_depth = ?limits.max_queue_depth,
            ttl_secs = limits.task_ttl.as_secs(),
            "scheduler started"
        );

        Ok(Self {
            store,
            queue,
            limits,
            audit,
            shutdown,
        })
    }

    /// Create a `Queued` record and enqueue its job. Returns immediately.
    ///
    /// # Errors
    ///
    /// `QueueFull` when a depth cap is configured and reached, `ShutDown`
    /// after `shutdown`, `DuplicateTask` on an id collision. On any error no
    /// record is left behind.
    pub fn submit(
        &self,
        request: SolveRequest,
        client_tag: Option<String>,
    ) -> Result<TaskId, SchedulerError> {
        let id = TaskId::new();
        self.store.create(id, client_tag, now_ms())?;

        if let Err(e) = self.queue.enqueue(Job { id, request }) {
            self.store.delete(&id);
            self.audit.record(id, AuditAction::Reject, Some(e.to_string()));
            tracing::warn!(task_id = %id, error = %e, "task rejected");
            return Err(e);
        }

        self.audit.record(id, AuditAction::Submit, None);
        tracing::info!(task_id = %id, pending = self.queue.depth(), "task submitted");
        Ok(id)
    }

    /// Look up a task for a client poll.
    ///
    /// A record older than the TTL is removed here and reported as
    /// `Expired` once; later lookups return `NotFound`.
    ///
    /// # Errors
    ///
    /// `NotFound` or `Expired`.
    pub fn poll(&self, id: &TaskId) -> Result<Task, SchedulerError> {
        let task = self.store.get(id)?;
        if task.is_expired(self.limits.task_ttl, now_ms()) {
            if self.store.delete(id).is_some() {
                self.audit.record(*id, AuditAction::Expire, None);
            }
            tracing::debug!(task_id = %id, "task expired on poll");
            return Err(SchedulerError::Expired(*id));
        }
        Ok(task)
    }

    /// Current load figures.
    pub fn stats(&self) -> SchedulerStats {
        SchedulerStats {
            counts: self.store.counts(),
            queue_depth: self.queue.depth(),
            in_flight: self.queue.in_flight(),
            max_parallel: self.queue.max_parallel(),
        }
    }

    /// Configured limits.
    pub const fn limits(&self) -> &SchedulerLimits {
        &self.limits
    }

    /// Shared task store.
    pub const fn store(&self) -> &Arc<dyn TaskStore> {
        &self.store
    }

    /// Stop admitting new work and stop the background loops.
    ///
    /// Workers already running finish and commit their results.
    pub fn shutdown(&self) {
        if self.shutdown.send_replace(true) {
            return;
        }
        self.queue.close();
        tracing::info!(
            pending = self.queue.depth(),
            in_flight = self.queue.in_flight(),
            "scheduler shutting down"
        );
    }

    /// Whether `shutdown` has been called.
    pub fn is_shut_down(&self) -> bool {
        *self.shutdown.borrow()
    }
}

impl Drop for TaskScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for TaskScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskScheduler")
            .field("limits", &self.limits)
            .field("queue", &self.queue)
            .finish_non_exhaustive()
    }
}
