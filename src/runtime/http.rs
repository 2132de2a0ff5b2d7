//! HTTP routes, API-key guard and server entry point.

use std::any::Any;
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::{debug, warn};

use super::api::{
    CreateTaskRequest, CreateTaskResponse, CreateTaskUrlRequest, GetTaskResultRequest,
    HealthResponse, SolveService, TaskResultResponse,
};
use super::error::ApiError;

/// Largest request body the key guard will buffer.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Set of accepted `clientKey` values.
#[derive(Debug, Clone, Default)]
pub struct ApiKeys(HashSet<String>);

impl ApiKeys {
    /// Accept exactly the given keys.
    pub fn new<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self(keys.into_iter().map(Into::into).collect())
    }

    /// Whether `key` is accepted.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }
}

/// Build the router.
///
/// Routes:
/// - POST /createTask - submit a job for the default target
/// - POST /createTaskUrl - submit a job for a given target
/// - POST /getTaskResult - poll a task
/// - GET /health - load figures, no key required
///
/// A panicking handler yields a generic 500 instead of a dropped connection.
pub fn router(service: SolveService, keys: ApiKeys) -> Router {
    Router::new()
        .route("/createTask", post(create_task))
        .route("/createTaskUrl", post(create_task_url))
        .route("/getTaskResult", post(get_task_result))
        .route_layer(middleware::from_fn_with_state(
            Arc::new(keys),
            require_api_key,
        ))
        .route("/health", get(health))
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(Arc::new(service))
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");
    ApiError::Internal(format!("handler panicked: {detail}")).into_response()
}

/// Serve `router` on `listener` until `shutdown` resolves.
///
/// # Errors
///
/// I/O failure of the listener.
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "listening");
    }
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}

#[derive(Deserialize)]
struct KeyProbe {
    #[serde(rename = "clientKey")]
    client_key: Option<String>,
}

/// Reject requests whose JSON body lacks an accepted `clientKey`.
///
/// The body is buffered and handed on unchanged.
async fn require_api_key(
    State(keys): State<Arc<ApiKeys>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| ApiError::Validation(format!("unreadable request body: {e}")))?;

    let key = serde_json::from_slice::<KeyProbe>(&bytes)
        .ok()
        .and_then(|probe| probe.client_key);
    match key {
        Some(key) if keys.contains(&key) => {}
        _ => {
            warn!(path = %parts.uri.path(), "rejected request with invalid api key");
            return Err(ApiError::Unauthorized);
        }
    }

    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(inner)| inner)
        .map_err(|rejection| ApiError::Validation(rejection.body_text()))
}

/// POST /createTask
async fn create_task(
    State(service): State<Arc<SolveService>>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<Json<CreateTaskResponse>, ApiError> {
    let req = body(payload)?;
    let reply = service.create_task(req)?;
    debug!(task_id = %reply.task_id, "createTask accepted");
    Ok(Json(reply))
}

/// POST /createTaskUrl
async fn create_task_url(
    State(service): State<Arc<SolveService>>,
    payload: Result<Json<CreateTaskUrlRequest>, JsonRejection>,
) -> Result<Json<CreateTaskResponse>, ApiError> {
    let req = body(payload)?;
    let reply = service.create_task_url(req)?;
    debug!(task_id = %reply.task_id, "createTaskUrl accepted");
    Ok(Json(reply))
}

/// POST /getTaskResult
async fn get_task_result(
    State(service): State<Arc<SolveService>>,
    payload: Result<Json<GetTaskResultRequest>, JsonRejection>,
) -> Result<Json<TaskResultResponse>, ApiError> {
    let req = body(payload)?;
    service.get_task_result(req).map(Json)
}

/// GET /health
async fn health(State(service): State<Arc<SolveService>>) -> Json<HealthResponse> {
    Json(service.health())
}
