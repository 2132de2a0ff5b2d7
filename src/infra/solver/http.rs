//! Solver that delegates to a remote solving service over HTTP.
//!
//! The service receives `{"url": ..., "sitekey": ...}` and answers with
//! `{"token": ...}` on success or `{"error": ...}` on failure.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::{Outcome, SolveError, SolveRequest, Solver, UNKNOWN_ERROR};

#[derive(Debug, Serialize)]
struct SolveBody<'a> {
    url: &'a str,
    sitekey: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct SolveReply {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// `reqwest`-backed client for a remote solving service.
#[derive(Debug, Clone)]
pub struct HttpSolver {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSolver {
    /// Create a client posting to `endpoint`, giving up after `timeout`.
    ///
    /// # Errors
    ///
    /// The HTTP client could not be constructed.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, endpoint))
    }

    /// Use an existing client.
    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Endpoint requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Solver for HttpSolver {
    async fn solve(&self, request: &SolveRequest) -> Result<Outcome, SolveError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&SolveBody {
                url: &request.url,
                sitekey: &request.sitekey,
            })
            .send()
            .await
            .map_err(|e| SolveError::failed(format!("solver request failed: {e}")))?;

        let status = response.status();
        let reply = match response.json::<SolveReply>().await {
            Ok(reply) => reply,
            // Error pages from proxies are often not JSON; the status says enough.
            Err(_) if !status.is_success() => SolveReply::default(),
            Err(e) => {
                return Err(SolveError::failed(format!("invalid solver reply: {e}")));
            }
        };

        if !status.is_success() {
            let reason = reply
                .error
                .unwrap_or_else(|| format!("solver returned HTTP {status}"));
            return Err(SolveError::Failed(reason));
        }

        Ok(match (reply.token, reply.error) {
            (Some(token), _) if !token.is_empty() => Outcome::Success { token },
            (_, Some(reason)) => Outcome::Failure { reason },
            _ => Outcome::Failure {
                reason: UNKNOWN_ERROR.to_string(),
            },
        })
    }
}
