//! Dispatch loop: admits queued jobs while capacity allows and launches workers.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

use super::admission::{Admission, AdmissionQueue};
use super::worker::Worker;

/// Abstraction for spawning task execution on a runtime.
pub trait Spawn {
    /// Spawn a detached future.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

/// The single consumer of the admission queue.
pub struct Dispatcher<S> {
    queue: Arc<AdmissionQueue>,
    worker: Worker,
    spawner: S,
}

impl<S> Dispatcher<S>
where
    S: Spawn + Send + Sync + 'static,
{
    /// Create a dispatcher that launches `worker` clones through `spawner`.
    pub const fn new(queue: Arc<AdmissionQueue>, worker: Worker, spawner: S) -> Self {
        Self {
            queue,
            worker,
            spawner,
        }
    }

    /// Admit jobs until `shutdown` flips to `true` or the queue is closed.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            max_parallel = self.queue.max_parallel(),
            "dispatch loop started"
        );
        loop {
            if *shutdown.borrow() {
                break;
            }
            let admission = tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
                admission = self.queue.admit() => admission,
            };
            let Some(admission) = admission else {
                break;
            };
            self.launch(admission);
        }
        tracing::info!(pending = self.queue.depth(), "dispatch loop stopped");
    }

    fn launch(&self, admission: Admission) {
        let Admission { job, slot } = admission;
        tracing::debug!(
            task_id = %job.id,
            in_flight = self.queue.in_flight(),
            pending = self.queue.depth(),
            "admitted task"
        );
        let worker = self.worker.clone();
        self.spawner.spawn(worker.run(job, slot));
    }
}
