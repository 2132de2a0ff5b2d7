//! Typed solver outcomes and their mapping onto terminal task results.

use std::any::Any;
use std::time::Duration;

use thiserror::Error;

use super::task::TaskResult;
use crate::util::clock::round_secs;

/// Reason recorded when a solver fails without saying why.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Result reported by a solver for one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The challenge was solved.
    Success {
        /// Opaque response token.
        token: String,
    },
    /// The solver gave up.
    Failure {
        /// Description of what went wrong.
        reason: String,
    },
}

/// Errors a solver may raise instead of returning an `Outcome`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// Any failure the solver could describe.
    #[error("{0}")]
    Failed(String),
    /// The solve call panicked.
    #[error("solver panicked: {0}")]
    Panicked(String),
}

impl SolveError {
    /// Convenience constructor for `Failed`.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }

    /// Build a `Panicked` error from a caught panic payload.
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Self::Panicked(message)
    }
}

/// Map a solver result and its elapsed time onto a terminal task result.
pub fn map_outcome(outcome: Result<Outcome, SolveError>, elapsed: Duration) -> TaskResult {
    let solve_time = round_secs(elapsed);
    match outcome {
        Ok(Outcome::Success { token }) => TaskResult::Solved { token, solve_time },
        Ok(Outcome::Failure { reason }) => TaskResult::Failed {
            error: non_empty(reason),
            solve_time,
        },
        Err(err) => TaskResult::Failed {
            error: non_empty(err.to_string()),
            solve_time,
        },
    }
}

fn non_empty(reason: String) -> String {
    if reason.trim().is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        reason
    }
}
