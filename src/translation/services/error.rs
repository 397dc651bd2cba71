//! Error types for translation services.

use crate::github::ports::HostError;
use crate::translation::adapters::IssueCacheError;
use crate::translation::domain::RepositoryConfigError;
use crate::translation::ports::GitError;
use thiserror::Error;

/// Errors raised while locating new and stale files.
#[derive(Debug, Clone, Error)]
pub enum LocateError {
    /// The branch or language is not configured correctly.
    #[error(transparent)]
    Config(#[from] RepositoryConfigError),

    /// History could not be read.
    #[error(transparent)]
    Git(#[from] GitError),
}

/// Result type for file location.
pub type LocateResult<T> = Result<T, LocateError>;

/// Errors raised by a synchronization pass.
#[derive(Debug, Clone, Error)]
pub enum SyncError {
    /// The branch or language is not configured correctly.
    #[error(transparent)]
    Config(#[from] RepositoryConfigError),

    /// A host call failed.
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Result type for synchronization.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors raised while creating or caching task issues.
#[derive(Debug, Clone, Error)]
pub enum TaskIssueError {
    /// The branch or language is not configured correctly.
    #[error(transparent)]
    Config(#[from] RepositoryConfigError),

    /// A host call failed.
    #[error(transparent)]
    Host(#[from] HostError),

    /// The issue cache could not be read or written.
    #[error(transparent)]
    Cache(#[from] IssueCacheError),

    /// An issue body template failed to render.
    #[error("failed to render issue body for '{path}': {reason}")]
    Template {
        /// File the body describes.
        path: String,
        /// Renderer diagnostic.
        reason: String,
    },
}

/// Result type for task issue operations.
pub type TaskIssueResult<T> = Result<T, TaskIssueError>;
