//! Tests for error types

use axum::http::StatusCode;
use solve_scheduler::core::{SchedulerError, SolveError, TaskId, TaskStatus};
use solve_scheduler::runtime::ApiError;

#[test]
fn test_queue_full_error() {
    let err = SchedulerError::QueueFull(100);
    assert_eq!(format!("{err}"), "queue full: depth 100");
}

#[test]
fn test_shut_down_error() {
    assert_eq!(format!("{}", SchedulerError::ShutDown), "scheduler is shut down");
}

#[test]
fn test_invalid_transition_error() {
    let id = TaskId::new();
    let err = SchedulerError::InvalidTransition {
        id,
        from: TaskStatus::Ready,
        to: TaskStatus::Processing,
    };
    assert_eq!(
        format!("{err}"),
        format!("invalid transition for task {id}: ready -> processing")
    );
}

#[test]
fn test_not_found_kinds() {
    let id = TaskId::new();
    assert!(SchedulerError::NotFound(id).is_not_found());
    assert!(SchedulerError::Expired(id).is_not_found());
    assert!(!SchedulerError::ShutDown.is_not_found());
}

#[test]
fn test_solve_error_display() {
    assert_eq!(format!("{}", SolveError::failed("timeout")), "timeout");
    assert_eq!(
        format!("{}", SolveError::Panicked("boom".into())),
        "solver panicked: boom"
    );
}

#[test]
fn test_api_error_statuses() {
    assert_eq!(
        ApiError::Validation("x".into()).status_code(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(ApiError::Unauthorized.client_message(), "Invalid API key");
    assert_eq!(ApiError::NotFound.client_message(), "Task not found");
    assert_eq!(ApiError::Expired.client_message(), "Task expired");
    assert_eq!(
        ApiError::Internal("db down".into()).client_message(),
        "Internal server error"
    );
}
