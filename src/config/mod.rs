//! Configuration models for the scheduler and the HTTP service.

pub mod scheduler;
pub mod service;

pub use scheduler::SchedulerConfig;
pub use service::ServiceConfig;
