//! Error types for repository descriptors.

use crate::github::domain::GithubDomainError;
use thiserror::Error;

/// Errors raised while loading or querying repository descriptors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryConfigError {
    /// The descriptor document could not be parsed.
    #[error("invalid repository configuration: {0}")]
    Parse(String),

    /// No descriptor carries the requested name.
    #[error("repository '{0}' is not configured")]
    UnknownRepository(String),

    /// No branch carries the requested name.
    #[error("branch '{0}' is not configured")]
    UnknownBranch(String),

    /// No language carries the requested name.
    #[error("language '{0}' is not configured")]
    UnknownLanguage(String),

    /// A branch ignore pattern is not a valid regular expression.
    #[error("invalid ignore pattern '{pattern}': {reason}")]
    InvalidIgnorePattern {
        /// Configured pattern text.
        pattern: String,
        /// Compiler diagnostic.
        reason: String,
    },

    /// The owner/repository pair does not form a valid repository name.
    #[error(transparent)]
    Repository(#[from] GithubDomainError),
}
