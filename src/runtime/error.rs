//! Client-facing API errors and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use super::api::ErrorBody;
use crate::core::SchedulerError;

/// Message returned for unknown or evicted task ids.
pub const TASK_NOT_FOUND: &str = "Task not found";
/// Message returned once for a task found past its time-to-live.
pub const TASK_EXPIRED: &str = "Task expired";

/// Errors surfaced to API clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed request fields.
    #[error("{0}")]
    Validation(String),
    /// Missing or unknown `clientKey`.
    #[error("Invalid API key")]
    Unauthorized,
    /// Unknown or evicted task id.
    #[error("Task not found")]
    NotFound,
    /// Task found past its time-to-live and removed.
    #[error("Task expired")]
    Expired,
    /// Admission refused for now.
    #[error("{0}")]
    Unavailable(String),
    /// Anything unexpected; the detail is logged, not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound | Self::Expired => StatusCode::NOT_FOUND,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the response body.
    pub fn client_message(&self) -> String {
        match self {
            Self::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<SchedulerError> for ApiError {
    fn from(err: SchedulerError) -> Self {
        match err {
            SchedulerError::NotFound(_) => Self::NotFound,
            SchedulerError::Expired(_) => Self::Expired,
            SchedulerError::QueueFull(_) => Self::Unavailable("Queue is full".into()),
            SchedulerError::ShutDown => Self::Unavailable("Service is shutting down".into()),
            other @ (SchedulerError::DuplicateTask(_)
            | SchedulerError::InvalidTransition { .. }
            | SchedulerError::InvalidConfig(_)) => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            tracing::error!(error = %detail, "request failed");
        }
        let status = self.status_code();
        (status, Json(ErrorBody::new(self.client_message()))).into_response()
    }
}
