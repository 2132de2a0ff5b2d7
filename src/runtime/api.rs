//! API-facing request/response models and the service operations behind the
//! HTTP routes.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ApiError;
use crate::core::{SolveRequest, Task, TaskId, TaskResult, TaskScheduler, TaskStatus};
use crate::util::clock::{now_ms, secs_between};

/// Body of `POST /createTask`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateTaskRequest {
    /// Caller's API key.
    pub client_key: Option<String>,
    /// Opaque correlation value stored with the task.
    pub client_tag: Option<String>,
}

/// Body of `POST /createTaskUrl`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateTaskUrlRequest {
    /// Caller's API key.
    pub client_key: Option<String>,
    /// Opaque correlation value stored with the task.
    pub client_tag: Option<String>,
    /// Target page.
    pub url: Option<String>,
    /// Site key on the target page.
    pub sitekey: Option<String>,
}

/// Body of `POST /getTaskResult`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetTaskResultRequest {
    /// Caller's API key.
    pub client_key: Option<String>,
    /// Id returned by a create call. Kept as raw JSON so that a non-string id
    /// reads as an unknown task rather than a malformed body.
    pub task_id: Option<Value>,
}

/// Reply to a successful create call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskResponse {
    /// Always `1`.
    pub success: u8,
    /// Id to poll with.
    pub task_id: String,
}

impl CreateTaskResponse {
    fn new(id: TaskId) -> Self {
        Self {
            success: 1,
            task_id: id.to_string(),
        }
    }
}

/// Reply to `POST /getTaskResult` for a live task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResultResponse {
    /// `1` unless the task failed.
    pub success: u8,
    /// `processing`, `ready` or `failed`.
    pub message: String,
    /// Seconds since creation while the task is pending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_time: Option<f64>,
    /// Token of a ready task.
    #[serde(rename = "gRecaptchaResponse", skip_serializing_if = "Option::is_none")]
    pub g_recaptcha_response: Option<String>,
    /// Failure description of a failed task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Seconds spent solving, once terminal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solve_time: Option<f64>,
}

impl TaskResultResponse {
    /// Render a task as seen by a client at `now_ms`.
    pub fn from_task(task: &Task, now_ms: u128, include_timings: bool) -> Self {
        let timing = |v: f64| include_timings.then_some(v);
        match &task.result {
            Some(TaskResult::Solved { token, solve_time }) => Self {
                success: 1,
                message: TaskStatus::Ready.as_str().to_string(),
                elapsed_time: None,
                g_recaptcha_response: Some(token.clone()),
                error: None,
                solve_time: timing(*solve_time),
            },
            Some(TaskResult::Failed { error, solve_time }) => Self {
                success: 0,
                message: TaskStatus::Failed.as_str().to_string(),
                elapsed_time: None,
                g_recaptcha_response: None,
                error: Some(error.clone()),
                solve_time: timing(*solve_time),
            },
            // Queued and Processing look the same to clients.
            None => Self {
                success: 1,
                message: "processing".to_string(),
                elapsed_time: timing(secs_between(task.created_at_ms, now_ms)),
                g_recaptcha_response: None,
                error: None,
                solve_time: None,
            },
        }
    }
}

/// Reply to `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Always `ok` while the process serves requests.
    pub status: String,
    /// Live records.
    pub task_count: usize,
    /// Records waiting for a slot.
    pub queued_tasks: usize,
    /// Records being solved.
    pub processing_tasks: usize,
    /// Records holding a token.
    pub ready_tasks: usize,
    /// Records holding a failure.
    pub failed_tasks: usize,
    /// Jobs waiting for admission.
    pub queue_length: usize,
    /// Jobs currently running.
    pub in_flight: usize,
    /// Parallelism cap.
    pub max_parallel: usize,
    /// Milliseconds since the Unix epoch.
    pub server_time: u128,
}

/// Body of every error reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Always `0`.
    pub success: u8,
    /// Client-facing message.
    pub message: String,
}

impl ErrorBody {
    /// Error body carrying `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: 0,
            message: message.into(),
        }
    }
}

/// Service operations shared by the HTTP handlers.
#[derive(Debug, Clone)]
pub struct SolveService {
    scheduler: Arc<TaskScheduler>,
    default_url: String,
    default_sitekey: String,
    include_timings: bool,
}

impl SolveService {
    /// Wrap a running scheduler with the default target used by `create_task`.
    pub fn new(
        scheduler: Arc<TaskScheduler>,
        default_url: impl Into<String>,
        default_sitekey: impl Into<String>,
        include_timings: bool,
    ) -> Self {
        Self {
            scheduler,
            default_url: default_url.into(),
            default_sitekey: default_sitekey.into(),
            include_timings,
        }
    }

    /// Underlying scheduler.
    pub const fn scheduler(&self) -> &Arc<TaskScheduler> {
        &self.scheduler
    }

    /// Submit a job for the default target.
    ///
    /// # Errors
    ///
    /// Admission failures mapped to [`ApiError`].
    pub fn create_task(&self, req: CreateTaskRequest) -> Result<CreateTaskResponse, ApiError> {
        let request = SolveRequest::new(self.default_url.clone(), self.default_sitekey.clone());
        let tag = req.client_tag.or(req.client_key);
        let id = self.scheduler.submit(request, tag)?;
        Ok(CreateTaskResponse::new(id))
    }

    /// Submit a job for a caller-chosen target.
    ///
    /// # Errors
    ///
    /// `Validation` when `url` or `sitekey` is missing or blank; admission
    /// failures otherwise.
    pub fn create_task_url(
        &self,
        req: CreateTaskUrlRequest,
    ) -> Result<CreateTaskResponse, ApiError> {
        let url = non_blank(req.url);
        let sitekey = non_blank(req.sitekey);
        let (Some(url), Some(sitekey)) = (url, sitekey) else {
            return Err(ApiError::Validation("URL and sitekey are required".into()));
        };
        let tag = req.client_tag.or(req.client_key);
        let id = self.scheduler.submit(SolveRequest::new(url, sitekey), tag)?;
        Ok(CreateTaskResponse::new(id))
    }

    /// Report the state of a task.
    ///
    /// # Errors
    ///
    /// `Validation` for a missing or blank id, `NotFound` for unknown,
    /// unparseable or non-string ids, `Expired` once for a task past its time-to-live.
    pub fn get_task_result(
        &self,
        req: GetTaskResultRequest,
    ) -> Result<TaskResultResponse, ApiError> {
        let id: TaskId = match req.task_id {
            None | Some(Value::Null) => {
                return Err(ApiError::Validation("taskId is required".into()));
            }
            Some(Value::String(raw)) if raw.trim().is_empty() => {
                return Err(ApiError::Validation("taskId is required".into()));
            }
            Some(Value::String(raw)) => raw.parse().map_err(|_| ApiError::NotFound)?,
            Some(_) => return Err(ApiError::NotFound),
        };
        let task = self.scheduler.poll(&id)?;
        Ok(TaskResultResponse::from_task(
            &task,
            now_ms(),
            self.include_timings,
        ))
    }

    /// Current load figures.
    pub fn health(&self) -> HealthResponse {
        let stats = self.scheduler.stats();
        HealthResponse {
            status: "ok".to_string(),
            task_count: stats.counts.total(),
            queued_tasks: stats.counts.queued,
            processing_tasks: stats.counts.processing,
            ready_tasks: stats.counts.ready,
            failed_tasks: stats.counts.failed,
            queue_length: stats.queue_depth,
            in_flight: stats.in_flight,
            max_parallel: stats.max_parallel,
            server_time: now_ms(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
