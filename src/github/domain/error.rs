//! Error types for host-side value validation.

use thiserror::Error;

/// Errors returned while constructing host domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GithubDomainError {
    /// The repository name does not follow `owner/repo` format.
    #[error("invalid repository name '{0}', expected owner/repo")]
    InvalidRepository(String),

    /// The issue number is invalid.
    #[error("invalid issue number {0}, expected a positive integer")]
    InvalidIssueNumber(u64),

    /// The issue state is neither `open` nor `closed`.
    #[error("unknown issue state: {0}")]
    InvalidIssueState(String),
}
