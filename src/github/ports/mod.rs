//! Port contracts for the hosted issue tracker.
//!
//! Ports define infrastructure-agnostic interfaces used by the workflow and
//! translation services.

pub mod host;
pub mod sleeper;

pub use host::{HostError, HostResult, IssueHost};
pub use sleeper::Sleeper;
