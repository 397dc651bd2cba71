//! Adapter implementations for translation tracking.

pub mod git_cli;
pub mod issue_cache;
pub mod memory;

pub use git_cli::GitCli;
pub use issue_cache::{CachedIssue, IssueCacheError, IssueCacheFile};
