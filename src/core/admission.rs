//! Admission queue: pending FIFO plus a cap on concurrently running jobs.
//!
//! Producers never wait. The single consumer (the dispatch loop) is woken by
//! a `Notify` when a job is enqueued and by the semaphore when a slot frees
//! up, so there is no polling interval.

use std::pin::pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{Notify, OwnedSemaphorePermit, Semaphore};

use super::solver::SolveRequest;
use super::task::TaskId;
use super::SchedulerError;

/// A pending unit of work waiting for admission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Record the job belongs to.
    pub id: TaskId,
    /// Arguments for the solve call.
    pub request: SolveRequest,
}

/// Abstraction for pending-job queue backends.
pub trait JobQueue: Send {
    /// Append a job at the back.
    ///
    /// # Errors
    ///
    /// `QueueFull` if the backend enforces a depth cap and it is reached.
    fn push_back(&mut self, job: Job) -> Result<(), SchedulerError>;
    /// Remove the job at the front.
    fn pop_front(&mut self) -> Option<Job>;
    /// Current depth.
    fn len(&self) -> usize;
    /// Whether nothing is pending.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Depth cap, if any.
    fn max_depth(&self) -> Option<usize>;
}

/// Occupied execution slot. Dropping it frees the slot exactly once.
#[derive(Debug)]
pub struct SlotGuard {
    in_flight: Arc<AtomicUsize>,
    _permit: OwnedSemaphorePermit,
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}

/// A job that has been admitted together with the slot it occupies.
#[derive(Debug)]
pub struct Admission {
    /// The admitted job.
    pub job: Job,
    /// Slot released when the worker is done.
    pub slot: SlotGuard,
}

/// FIFO of pending jobs gated by a maximum parallelism.
pub struct AdmissionQueue {
    pending: Mutex<Box<dyn JobQueue>>,
    job_ready: Notify,
    slots: Arc<Semaphore>,
    in_flight: Arc<AtomicUsize>,
    max_parallel: usize,
}

impl AdmissionQueue {
    /// Create a queue admitting at most `max_parallel` jobs at a time.
    pub fn new(max_parallel: usize, backend: Box<dyn JobQueue>) -> Self {
        Self {
            pending: Mutex::new(backend),
            job_ready: Notify::new(),
            slots: Arc::new(Semaphore::new(max_parallel)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_parallel,
        }
    }

    /// Append a job. Never blocks.
    ///
    /// # Errors
    ///
    /// `QueueFull` when the backend has a depth cap; `ShutDown` once closed.
    pub fn enqueue(&self, job: Job) -> Result<(), SchedulerError> {
        if self.is_closed() {
            return Err(SchedulerError::ShutDown);
        }
        self.pending.lock().push_back(job)?;
        self.job_ready.notify_one();
        Ok(())
    }

    /// Wait for the next job in FIFO order and a free slot for it.
    ///
    /// Intended for a single consumer. Returns `None` once the queue is
    /// closed. Cancel-safe: a job is only popped after its slot is held.
    pub async fn admit(&self) -> Option<Admission> {
        loop {
            loop {
                let mut notified = pin!(self.job_ready.notified());
                notified.as_mut().enable();
                if self.is_closed() {
                    return None;
                }
                if self.has_pending() {
                    break;
                }
                notified.await;
            }

            let permit = Arc::clone(&self.slots).acquire_owned().await.ok()?;
            let next = self.pending.lock().pop_front();
            let Some(job) = next else {
                continue;
            };
            self.in_flight.fetch_add(1, Ordering::AcqRel);
            return Some(Admission {
                job,
                slot: SlotGuard {
                    in_flight: Arc::clone(&self.in_flight),
                    _permit: permit,
                },
            });
        }
    }

    /// Stop admitting. Pending jobs stay queued; running jobs keep their slots.
    pub fn close(&self) {
        self.slots.close();
        self.job_ready.notify_waiters();
    }

    /// Whether `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.slots.is_closed()
    }

    fn has_pending(&self) -> bool {
        !self.pending.lock().is_empty()
    }

    /// Jobs waiting for admission.
    pub fn depth(&self) -> usize {
        self.pending.lock().len()
    }

    /// Jobs currently admitted and running.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Parallelism cap.
    pub const fn max_parallel(&self) -> usize {
        self.max_parallel
    }
}

impl std::fmt::Debug for AdmissionQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdmissionQueue")
            .field("depth", &self.depth())
            .field("in_flight", &self.in_flight())
            .field("max_parallel", &self.max_parallel)
            .finish_non_exhaustive()
    }
}
