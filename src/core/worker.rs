//! Worker: runs one admitted job and commits its terminal status.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;

use super::admission::{Job, SlotGuard};
use super::audit::{AuditAction, AuditTrail};
use super::outcome::{map_outcome, SolveError};
use super::solver::Solver;
use super::store::TaskStore;
use super::task::{StatusUpdate, TaskResult};
use super::SchedulerError;
use crate::util::clock::now_ms;

/// Executes a single job to completion.
///
/// Never returns an error: every failure of the solve call becomes a
/// `Failed` record, and the slot is released when `run` returns.
#[derive(Clone)]
pub struct Worker {
    store: Arc<dyn TaskStore>,
    solver: Arc<dyn Solver>,
    audit: AuditTrail,
}

impl Worker {
    /// Create a worker sharing the scheduler's store and solver.
    pub fn new(store: Arc<dyn TaskStore>, solver: Arc<dyn Solver>, audit: AuditTrail) -> Self {
        Self {
            store,
            solver,
            audit,
        }
    }

    /// Run `job`, holding `slot` until the outcome is committed.
    pub async fn run(self, job: Job, slot: SlotGuard) {
        let _slot = slot;
        let id = job.id;

        match self
            .store
            .update_status(&id, StatusUpdate::Start { started_at_ms: now_ms() })
        {
            Ok(_) => {}
            Err(SchedulerError::NotFound(_)) => {
                tracing::debug!(task_id = %id, "task evicted before start, skipping");
                return;
            }
            Err(e) => {
                tracing::warn!(task_id = %id, error = %e, "could not mark task processing");
                return;
            }
        }
        self.audit.record(id, AuditAction::Start, None);
        tracing::debug!(task_id = %id, url = %job.request.url, "solve started");

        let started = Instant::now();
        let outcome = AssertUnwindSafe(self.solver.solve(&job.request))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(SolveError::from_panic(panic.as_ref())));
        let result = map_outcome(outcome, started.elapsed());

        let (action, detail) = match &result {
            TaskResult::Solved { .. } => (AuditAction::Complete, None),
            TaskResult::Failed { error, .. } => (AuditAction::Fail, Some(error.clone())),
        };
        let solve_time = result.solve_time();

        match self.store.update_status(&id, StatusUpdate::Finish(result)) {
            Ok(task) => {
                self.audit.record(id, action, detail);
                tracing::info!(
                    task_id = %id,
                    status = %task.status,
                    solve_time,
                    "task finished"
                );
            }
            Err(SchedulerError::NotFound(_)) => {
                tracing::debug!(task_id = %id, "task evicted while running, discarding result");
            }
            Err(e) => {
                tracing::error!(task_id = %id, error = %e, "failed to commit task result");
            }
        }
    }
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker").field("audit", &self.audit).finish_non_exhaustive()
    }
}
