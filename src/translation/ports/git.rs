//! Version-control port over one checked-out working tree.

use crate::translation::domain::CommitId;
use chrono::{DateTime, FixedOffset};
use std::sync::Arc;
use thiserror::Error;

/// Result type for version-control operations.
pub type GitResult<T> = Result<T, GitError>;

/// Read-only view of a working tree's history.
///
/// Paths are repository-relative with `/` separators.
pub trait GitRepository: Send + Sync {
    /// Lists tracked files.
    ///
    /// # Errors
    ///
    /// Returns [`GitError`] when the listing cannot be produced.
    fn list_files(&self) -> GitResult<Vec<String>>;

    /// Returns the latest commit touching `path`, or `None` when the path
    /// has no history.
    ///
    /// # Errors
    ///
    /// Returns [`GitError`] when history cannot be read.
    fn last_commit(&self, path: &str) -> GitResult<Option<CommitId>>;

    /// Returns the commit time of `commit`.
    ///
    /// # Errors
    ///
    /// Returns [`GitError`] when the commit is unknown.
    fn commit_time(&self, commit: &CommitId) -> GitResult<DateTime<FixedOffset>>;

    /// Returns the latest commit touching `path` at or before `time`.
    ///
    /// # Errors
    ///
    /// Returns [`GitError`] when history cannot be read.
    fn commit_before(
        &self,
        path: &str,
        time: DateTime<FixedOffset>,
    ) -> GitResult<Option<CommitId>>;

    /// Returns the textual diff of `path` from `new` to `old`.
    ///
    /// # Errors
    ///
    /// Returns [`GitError`] when either commit is unknown.
    fn diff(&self, path: &str, new: &CommitId, old: &CommitId) -> GitResult<String>;
}

/// Errors returned by version-control adapters.
#[derive(Debug, Clone, Error)]
pub enum GitError {
    /// The tool exited unsuccessfully.
    #[error("git {args} failed with {status}: {stderr}")]
    Command {
        /// Arguments passed to the tool.
        args: String,
        /// Exit status description.
        status: String,
        /// Captured standard error.
        stderr: String,
    },

    /// The tool printed something that could not be interpreted.
    #[error("unexpected git output: {0}")]
    InvalidOutput(String),

    /// The commit does not exist.
    #[error("unknown commit '{0}'")]
    UnknownCommit(CommitId),

    /// The tool could not be started.
    #[error("failed to run git: {0}")]
    Spawn(Arc<std::io::Error>),
}
