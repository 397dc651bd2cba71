//! Port contracts for translation tracking.

pub mod git;

pub use git::{GitError, GitRepository, GitResult};
