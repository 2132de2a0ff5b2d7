//! Builder that wires a `TaskScheduler` from configuration.

use std::sync::Arc;

use crate::config::SchedulerConfig;
use crate::core::{
    AuditSink, AuditTrail, JobQueue, SchedulerError, SchedulerLimits, Solver, Spawn, TaskScheduler,
    TaskStore,
};
use crate::infra::{FifoQueue, InMemoryTaskStore};
use crate::runtime::TokioSpawner;

/// Assembles a scheduler. Store and queue default to the in-memory backends.
///
/// ```rust,ignore
/// let scheduler = SchedulerBuilder::new(config.scheduler.clone(), Arc::new(solver))
///     .audit(Arc::new(InMemoryAuditSink::new(1_000)))
///     .build()?;
/// ```
pub struct SchedulerBuilder {
    limits: SchedulerLimits,
    validation: Result<(), String>,
    solver: Arc<dyn Solver>,
    store: Option<Arc<dyn TaskStore>>,
    queue: Option<Box<dyn JobQueue>>,
    audit: AuditTrail,
}

impl SchedulerBuilder {
    /// Start from a configuration and the solving capability.
    pub fn new(config: SchedulerConfig, solver: Arc<dyn Solver>) -> Self {
        let limits = config.limits();
        let validation = config.validate().and_then(|()| limits.validate());
        Self {
            limits,
            validation,
            solver,
            store: None,
            queue: None,
            audit: AuditTrail::disabled(),
        }
    }

    /// Start from already-derived limits.
    pub fn from_limits(limits: SchedulerLimits, solver: Arc<dyn Solver>) -> Self {
        let validation = limits.validate();
        Self {
            limits,
            validation,
            solver,
            store: None,
            queue: None,
            audit: AuditTrail::disabled(),
        }
    }

    /// Use a custom task store.
    #[must_use]
    pub fn store(mut self, store: Arc<dyn TaskStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Use a custom pending-job queue.
    #[must_use]
    pub fn queue(mut self, queue: Box<dyn JobQueue>) -> Self {
        self.queue = Some(queue);
        self
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn audit(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit = AuditTrail::new(sink);
        self
    }

    /// Limits the scheduler will run with.
    pub const fn limits(&self) -> &SchedulerLimits {
        &self.limits
    }

    /// Start the scheduler on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Invalid configuration.
    ///
    /// # Panics
    ///
    /// When called outside a tokio runtime.
    pub fn build(self) -> Result<TaskScheduler, SchedulerError> {
        self.build_on(TokioSpawner::current())
    }

    /// Start the scheduler with an explicit spawner.
    ///
    /// # Errors
    ///
    /// Invalid configuration.
    pub fn build_on<S>(self, spawner: S) -> Result<TaskScheduler, SchedulerError>
    where
        S: Spawn + Clone + Send + Sync + 'static,
    {
        self.validation.map_err(SchedulerError::InvalidConfig)?;
        let store: Arc<dyn TaskStore> = match self.store {
            Some(store) => store,
            None => Arc::new(InMemoryTaskStore::new()),
        };
        let queue: Box<dyn JobQueue> = match self.queue {
            Some(queue) => queue,
            None => Box::new(FifoQueue::with_max_depth(self.limits.max_queue_depth)),
        };
        TaskScheduler::start(
            self.limits,
            store,
            queue,
            self.solver,
            self.audit,
            spawner,
        )
    }
}

impl std::fmt::Debug for SchedulerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulerBuilder")
            .field("limits", &self.limits)
            .field("audit", &self.audit)
            .finish_non_exhaustive()
    }
}
