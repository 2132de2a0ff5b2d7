//! Adapter for synchronous solver routines.

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::{Outcome, SolveError, SolveRequest, Solver};

/// Runs a blocking solve routine on tokio's blocking thread pool so it never
/// stalls the async workers.
pub struct BlockingSolver<F> {
    routine: Arc<F>,
}

impl<F> BlockingSolver<F>
where
    F: Fn(&SolveRequest) -> Result<Outcome, SolveError> + Send + Sync + 'static,
{
    /// Wrap a synchronous routine.
    pub fn new(routine: F) -> Self {
        Self {
            routine: Arc::new(routine),
        }
    }
}

#[async_trait]
impl<F> Solver for BlockingSolver<F>
where
    F: Fn(&SolveRequest) -> Result<Outcome, SolveError> + Send + Sync + 'static,
{
    async fn solve(&self, request: &SolveRequest) -> Result<Outcome, SolveError> {
        let routine = Arc::clone(&self.routine);
        let request = request.clone();
        match tokio::task::spawn_blocking(move || routine(&request)).await {
            Ok(outcome) => outcome,
            Err(join) if join.is_panic() => Err(SolveError::from_panic(join.into_panic().as_ref())),
            Err(join) => Err(SolveError::failed(join.to_string())),
        }
    }
}

impl<F> std::fmt::Debug for BlockingSolver<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingSolver").finish_non_exhaustive()
    }
}
