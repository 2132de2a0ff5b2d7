//! Pending-job queue backends.

pub mod memory;

pub use memory::FifoQueue;
