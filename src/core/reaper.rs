//! Reaper: periodic eviction of task records older than the time-to-live.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use super::audit::{AuditAction, AuditTrail};
use super::store::TaskStore;
use crate::util::clock::now_ms;

/// Deletes stale records regardless of status.
///
/// Running workers are not cancelled; their final write then finds the
/// record gone and is dropped.
#[derive(Clone)]
pub struct Reaper {
    store: Arc<dyn TaskStore>,
    ttl: Duration,
    interval: Duration,
    audit: AuditTrail,
}

impl Reaper {
    /// Create a reaper evicting records older than `ttl` every `interval`.
    pub fn new(
        store: Arc<dyn TaskStore>,
        ttl: Duration,
        interval: Duration,
        audit: AuditTrail,
    ) -> Self {
        Self {
            store,
            ttl,
            interval,
            audit,
        }
    }

    /// Evict every record older than the TTL at `now_ms`. Returns the count.
    ///
    /// Records created while the sweep runs are left for the next pass.
    pub fn sweep(&self, now_ms: u128) -> usize {
        let expired: Vec<_> = self
            .store
            .snapshot()
            .into_iter()
            .filter(|task| task.is_expired(self.ttl, now_ms))
            .map(|task| task.id)
            .collect();

        let mut removed = 0;
        for id in expired {
            if self.store.delete(&id).is_some() {
                self.audit.record(id, AuditAction::Expire, None);
                removed += 1;
            }
        }
        removed
    }

    /// Sweep on every tick until `shutdown` flips to `true`.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(
            ttl_secs = self.ttl.as_secs(),
            interval_secs = self.interval.as_secs(),
            "reaper started"
        );
        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    let removed = self.sweep(now_ms());
                    if removed > 0 {
                        tracing::info!(
                            removed,
                            remaining = self.store.len(),
                            "evicted expired tasks"
                        );
                    }
                }
            }
        }
        tracing::info!("reaper stopped");
    }
}

impl std::fmt::Debug for Reaper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reaper")
            .field("ttl", &self.ttl)
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}
