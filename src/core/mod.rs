//! Core scheduling abstractions: task lifecycle, admission and execution.

pub mod admission;
pub mod audit;
pub mod dispatcher;
pub mod error;
pub mod outcome;
pub mod reaper;
pub mod scheduler;
pub mod solver;
pub mod store;
pub mod task;
pub mod worker;

pub use admission::{Admission, AdmissionQueue, Job, JobQueue, SlotGuard};
pub use audit::{AuditAction, AuditEvent, AuditSink, AuditTrail, InMemoryAuditSink};
pub use dispatcher::{Dispatcher, Spawn};
pub use error::{AppResult, SchedulerError};
pub use outcome::{map_outcome, Outcome, SolveError, UNKNOWN_ERROR};
pub use reaper::Reaper;
pub use scheduler::{SchedulerLimits, SchedulerStats, TaskScheduler};
pub use solver::{SolveRequest, Solver};
pub use store::{StatusCounts, TaskStore};
pub use task::{StatusUpdate, Task, TaskId, TaskResult, TaskStatus};
pub use worker::Worker;
