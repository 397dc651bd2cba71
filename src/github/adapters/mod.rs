//! Adapter implementations of the host ports.

pub mod memory;
pub mod tokio_sleeper;

pub use tokio_sleeper::TokioSleeper;
