//! # Solve Scheduler
//!
//! An admission-controlled job scheduler for slow, externally-bounded solve
//! calls, with an HTTP API for submitting jobs and polling their results.
//!
//! Clients submit a job and receive a task id immediately. Jobs wait in a
//! FIFO queue until one of `P` execution slots frees up; a worker then calls
//! the external [`core::Solver`], records the outcome and releases the slot.
//! Finished records stay available for polling until a background reaper
//! evicts them after their time-to-live.
//!
//! ## Key Features
//!
//! - **Bounded Parallelism**: at most `P` solve calls run at once, enforced by a semaphore
//! - **FIFO Admission**: jobs start in the order they were accepted
//! - **Event-Driven Dispatch**: no polling loop; enqueue and slot release wake the dispatcher
//! - **Monotonic Lifecycle**: `Queued → Processing → Ready | Failed`, each result written once
//! - **TTL Eviction**: a reaper deletes stale records regardless of status
//! - **Fault Isolation**: solver errors and panics become `Failed` tasks, never crash the loop
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use solve_scheduler::builders::SchedulerBuilder;
//! use solve_scheduler::config::SchedulerConfig;
//! use solve_scheduler::core::SolveRequest;
//! use solve_scheduler::infra::HttpSolver;
//!
//! let solver = HttpSolver::new("http://127.0.0.1:8191/solve", Duration::from_secs(300))?;
//! let scheduler = SchedulerBuilder::new(SchedulerConfig::default(), Arc::new(solver)).build()?;
//!
//! let id = scheduler.submit(SolveRequest::new("https://site.test", "key"), None)?;
//! let task = scheduler.poll(&id)?;
//! ```
//!
//! For complete flows, see `tests/scheduler_test.rs` and `tests/http_api_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling abstractions: task lifecycle, admission, workers, reaper.
pub mod core;
/// Configuration models for the scheduler and the service binary.
pub mod config;
/// Builders to construct a scheduler from configuration.
pub mod builders;
/// Infrastructure adapters for stores, queues and solvers.
pub mod infra;
/// Runtime adapters: tokio spawning and the HTTP API surface.
pub mod runtime;
/// Shared utilities.
pub mod util;
