//! Hosted issue tracker context shared by the workflow engine and the
//! translation synchronizer.
//!
//! The engine never talks to a live API client directly. It reads snapshot
//! values and issues explicit commands through the [`ports::IssueHost`]
//! contract, and every write is paced by [`services::RateLimiter`]:
//!
//! - Identifiers and snapshots in [`domain`]
//! - Host and sleeper contracts in [`ports`]
//! - In-memory host and tokio sleeper in [`adapters`]
//! - Quota and write pacing in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
