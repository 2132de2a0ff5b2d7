//! Task records and the lifecycle state machine.
//!
//! A task only ever moves `Queued -> Processing -> {Ready | Failed}`.
//! Expiry is not a stored state: the record is deleted instead.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::SchedulerError;

/// Opaque task identifier. Random, so identifiers are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Status of a task in the scheduler lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Accepted and waiting for a free slot.
    Queued,
    /// Admitted; the solve call is running.
    Processing,
    /// Finished with a token.
    Ready,
    /// Finished with an error.
    Failed,
}

impl TaskStatus {
    /// Lowercase wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }

    /// `Ready` and `Failed` are terminal.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }

    /// Whether `next` is the one legal step forward from `self`.
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Queued, Self::Processing) | (Self::Processing, Self::Ready | Self::Failed)
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal payload of a task. `solve_time` is seconds with two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskResult {
    /// The solver produced a token.
    Solved {
        /// Opaque token returned by the solver.
        token: String,
        /// Time spent in the solve call.
        solve_time: f64,
    },
    /// The solver reported or raised a failure.
    Failed {
        /// Human-readable failure description.
        error: String,
        /// Time spent in the solve call.
        solve_time: f64,
    },
}

impl TaskResult {
    /// Status this result moves a task into.
    pub const fn status(&self) -> TaskStatus {
        match self {
            Self::Solved { .. } => TaskStatus::Ready,
            Self::Failed { .. } => TaskStatus::Failed,
        }
    }

    /// Seconds spent solving.
    pub const fn solve_time(&self) -> f64 {
        match self {
            Self::Solved { solve_time, .. } | Self::Failed { solve_time, .. } => *solve_time,
        }
    }
}

/// A single forward step applied to a stored record.
///
/// Finishing always carries its result, so a terminal status without a
/// result cannot be written.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusUpdate {
    /// Move to `Processing`, stamping the start time.
    Start {
        /// Milliseconds since epoch at admission.
        started_at_ms: u128,
    },
    /// Move to `Ready` or `Failed` depending on the result.
    Finish(TaskResult),
}

impl StatusUpdate {
    /// Status the update moves the task into.
    pub const fn target(&self) -> TaskStatus {
        match self {
            Self::Start { .. } => TaskStatus::Processing,
            Self::Finish(result) => result.status(),
        }
    }
}

/// One unit of solving work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier.
    pub id: TaskId,
    /// Current lifecycle status.
    pub status: TaskStatus,
    /// Creation time in milliseconds since epoch.
    pub created_at_ms: u128,
    /// Admission time in milliseconds since epoch.
    pub started_at_ms: Option<u128>,
    /// Caller-supplied correlation string, never interpreted.
    pub client_tag: Option<String>,
    /// Terminal payload, set once on entering `Ready` or `Failed`.
    pub result: Option<TaskResult>,
}

impl Task {
    /// New `Queued` record.
    pub const fn new(id: TaskId, client_tag: Option<String>, created_at_ms: u128) -> Self {
        Self {
            id,
            status: TaskStatus::Queued,
            created_at_ms,
            started_at_ms: None,
            client_tag,
            result: None,
        }
    }

    /// Age of the record at `now_ms`.
    pub const fn age_ms(&self, now_ms: u128) -> u128 {
        now_ms.saturating_sub(self.created_at_ms)
    }

    /// Whether the record has outlived `ttl` at `now_ms`.
    pub fn is_expired(&self, ttl: Duration, now_ms: u128) -> bool {
        self.age_ms(now_ms) > ttl.as_millis()
    }

    /// Produce the record that results from applying `update`.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` when the update is not the next legal step.
    pub fn apply(&self, update: StatusUpdate) -> Result<Self, SchedulerError> {
        let to = update.target();
        if !self.status.can_transition_to(to) {
            return Err(SchedulerError::InvalidTransition {
                id: self.id,
                from: self.status,
                to,
            });
        }
        let mut next = self.clone();
        next.status = to;
        match update {
            StatusUpdate::Start { started_at_ms } => next.started_at_ms = Some(started_at_ms),
            StatusUpdate::Finish(result) => next.result = Some(result),
        }
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solved() -> TaskResult {
        TaskResult::Solved {
            token: "abc".into(),
            solve_time: 1.5,
        }
    }

    #[test]
    fn forward_transitions_only() {
        use TaskStatus::{Failed, Processing, Queued, Ready};
        assert!(Queued.can_transition_to(Processing));
        assert!(Processing.can_transition_to(Ready));
        assert!(Processing.can_transition_to(Failed));

        assert!(!Queued.can_transition_to(Ready));
        assert!(!Queued.can_transition_to(Failed));
        assert!(!Processing.can_transition_to(Queued));
        assert!(!Ready.can_transition_to(Failed));
        assert!(!Failed.can_transition_to(Processing));
        assert!(!Processing.can_transition_to(Processing));
    }

    #[test]
    fn apply_sets_start_then_result() {
        let task = Task::new(TaskId::new(), Some("tag".into()), 1_000);
        assert!(task.result.is_none());

        let started = task.apply(StatusUpdate::Start { started_at_ms: 1_200 }).unwrap();
        assert_eq!(started.status, TaskStatus::Processing);
        assert_eq!(started.started_at_ms, Some(1_200));
        assert!(started.result.is_none());

        let done = started.apply(StatusUpdate::Finish(solved())).unwrap();
        assert_eq!(done.status, TaskStatus::Ready);
        assert_eq!(done.result, Some(solved()));
        assert_eq!(done.client_tag.as_deref(), Some("tag"));
        assert_eq!(done.created_at_ms, 1_000);
    }

    #[test]
    fn finishing_a_queued_task_is_rejected() {
        let task = Task::new(TaskId::new(), None, 0);
        let err = task.apply(StatusUpdate::Finish(solved())).unwrap_err();
        assert!(matches!(
            err,
            SchedulerError::InvalidTransition {
                from: TaskStatus::Queued,
                to: TaskStatus::Ready,
                ..
            }
        ));
    }

    #[test]
    fn second_terminal_write_is_rejected() {
        let task = Task::new(TaskId::new(), None, 0)
            .apply(StatusUpdate::Start { started_at_ms: 1 })
            .unwrap()
            .apply(StatusUpdate::Finish(solved()))
            .unwrap();
        let again = task.apply(StatusUpdate::Finish(TaskResult::Failed {
            error: "late".into(),
            solve_time: 0.0,
        }));
        assert!(again.is_err());
        assert_eq!(task.result, Some(solved()));
    }

    #[test]
    fn expiry_is_strictly_after_ttl() {
        let task = Task::new(TaskId::new(), None, 10_000);
        let ttl = Duration::from_secs(1);
        assert!(!task.is_expired(ttl, 10_999));
        assert!(!task.is_expired(ttl, 11_000));
        assert!(task.is_expired(ttl, 11_001));
        assert!(!task.is_expired(ttl, 5_000));
    }

    #[test]
    fn task_id_round_trips_through_text() {
        let id = TaskId::new();
        let parsed: TaskId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-task".parse::<TaskId>().is_err());
    }
}
