//! Adapters connecting the scheduler to a concrete solving capability.

pub mod blocking;
pub mod http;

pub use blocking::BlockingSolver;
pub use http::HttpSolver;
