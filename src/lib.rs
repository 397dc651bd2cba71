//! Issue workflow automation and translation tracking for repositories on a
//! GitHub-style host.
//!
//! - [`github`]: identifiers, snapshots, the host port and rate limiting
//! - [`workflow`]: declarative condition/action rules dispatched per event
//! - [`translation`]: locating translation work and reconciling pull
//!   requests with task issues
//! - [`settings`]: process settings read from the environment

pub mod github;
pub mod settings;
pub mod translation;
pub mod workflow;

#[cfg(test)]
mod test_support;
