//! Audit trail of task lifecycle events.
//!
//! Sinks receive one event per transition the scheduler makes; the
//! in-memory sink keeps a bounded window for inspection and tests.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use super::task::TaskId;
use crate::util::clock::now_ms;

/// Lifecycle action recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Record created and job enqueued.
    Submit,
    /// Submission refused (queue full or shut down).
    Reject,
    /// Job admitted; solve call starting.
    Start,
    /// Solve finished with a token.
    Complete,
    /// Solve finished with an error.
    Fail,
    /// Record evicted after its time-to-live.
    Expire,
}

impl AuditAction {
    /// Lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Reject => "reject",
            Self::Start => "start",
            Self::Complete => "complete",
            Self::Fail => "fail",
            Self::Expire => "expire",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audit event structure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEvent {
    /// Related task identifier.
    pub task_id: TaskId,
    /// Action taken.
    pub action: AuditAction,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
    /// Additional context.
    pub detail: Option<String>,
}

impl AuditEvent {
    /// Build an event stamped with the current time.
    pub fn now(task_id: TaskId, action: AuditAction, detail: Option<String>) -> Self {
        Self {
            task_id,
            action,
            created_at_ms: now_ms(),
            detail,
        }
    }
}

/// Audit sink abstraction.
pub trait AuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: AuditEvent);
}

/// In-memory audit sink for testing and dev. Oldest events are dropped first.
#[derive(Debug)]
pub struct InMemoryAuditSink {
    events: Mutex<VecDeque<AuditEvent>>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::with_capacity(max_events.min(4096))),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().iter().cloned().collect()
    }

    /// Actions recorded for one task, oldest first.
    pub fn actions_for(&self, task_id: &TaskId) -> Vec<AuditAction> {
        self.events
            .lock()
            .iter()
            .filter(|e| &e.task_id == task_id)
            .map(|e| e.action)
            .collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&self, event: AuditEvent) {
        if self.max_events == 0 {
            return;
        }
        let mut events = self.events.lock();
        if events.len() >= self.max_events {
            events.pop_front();
        }
        events.push_back(event);
    }
}

/// Optional, cheaply clonable handle to an audit sink.
#[derive(Clone, Default)]
pub struct AuditTrail(Option<Arc<dyn AuditSink>>);

impl AuditTrail {
    /// Trail that discards everything.
    pub const fn disabled() -> Self {
        Self(None)
    }

    /// Trail writing into `sink`.
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self(Some(sink))
    }

    /// Whether events are kept anywhere.
    pub const fn is_enabled(&self) -> bool {
        self.0.is_some()
    }

    /// Record an action for a task.
    pub fn record(&self, task_id: TaskId, action: AuditAction, detail: Option<String>) {
        if let Some(sink) = &self.0 {
            sink.record(AuditEvent::now(task_id, action, detail));
        }
    }
}

impl fmt::Debug for AuditTrail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AuditTrail").field(&self.is_enabled()).finish()
    }
}
