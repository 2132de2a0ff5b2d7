//! The external solving capability and its request payload.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::outcome::{Outcome, SolveError};

/// Parameters for one solve call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveRequest {
    /// Page hosting the challenge.
    pub url: String,
    /// Site key of the challenge widget.
    pub sitekey: String,
}

impl SolveRequest {
    /// Build a request from its two parts.
    pub fn new(url: impl Into<String>, sitekey: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            sitekey: sitekey.into(),
        }
    }
}

/// Black-box capability that turns a challenge into a token.
///
/// Implementations own their retries and timeouts. The scheduler only looks
/// at which `Outcome` variant comes back; an `Err` is treated the same as
/// `Outcome::Failure`, and a panic inside `solve` is caught by the worker.
///
/// # Example
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use solve_scheduler::core::{Outcome, SolveError, SolveRequest, Solver};
///
/// struct EchoSolver;
///
/// #[async_trait]
/// impl Solver for EchoSolver {
///     async fn solve(&self, request: &SolveRequest) -> Result<Outcome, SolveError> {
///         Ok(Outcome::Success { token: format!("token-for-{}", request.sitekey) })
///     }
/// }
/// ```
#[async_trait]
pub trait Solver: Send + Sync + 'static {
    /// Run one solve attempt.
    async fn solve(&self, request: &SolveRequest) -> Result<Outcome, SolveError>;
}
