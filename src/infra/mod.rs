//! Infrastructure adapters: store and queue backends, solver clients.

pub mod queue;
pub mod solver;
pub mod store;

pub use queue::FifoQueue;
pub use solver::{BlockingSolver, HttpSolver};
pub use store::InMemoryTaskStore;
