//! In-memory host and sleeper used by tests and local dry runs.

mod host;
mod sleeper;

pub use host::{HostCall, InMemoryIssueHost};
pub use sleeper::RecordingSleeper;
