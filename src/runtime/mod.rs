//! Runtime adapters: tokio spawning, the HTTP API and its wire models.

pub mod api;
pub mod error;
pub mod http;
pub mod tokio_spawner;

pub use api::{
    CreateTaskRequest, CreateTaskResponse, CreateTaskUrlRequest, ErrorBody, GetTaskResultRequest,
    HealthResponse, SolveService, TaskResultResponse,
};
pub use error::{ApiError, TASK_EXPIRED, TASK_NOT_FOUND};
pub use http::{router, serve, ApiKeys, MAX_BODY_BYTES};
pub use tokio_spawner::TokioSpawner;
