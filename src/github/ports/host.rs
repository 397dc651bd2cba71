//! Host port: reads snapshots and applies explicit mutations.

use crate::github::domain::{
    CommentSnapshot, IssueNumber, IssueSnapshot, IssueState, PullRequestSnapshot,
    RateLimitStatus, RepositoryFullName, SearchQuery,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for host operations.
pub type HostResult<T> = Result<T, HostError>;

/// Issue tracker contract.
///
/// Reads return detached snapshots. Writes are explicit commands and are not
/// paced by implementations; callers route them through
/// [`crate::github::services::RateLimiter`].
#[async_trait]
pub trait IssueHost: Send + Sync {
    /// Fetches an issue snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::NotFound`] when the issue does not exist.
    async fn issue(&self, repo: &RepositoryFullName, number: IssueNumber)
    -> HostResult<IssueSnapshot>;

    /// Attaches a label to an issue.
    async fn add_label(
        &self,
        repo: &RepositoryFullName,
        number: IssueNumber,
        label: &str,
    ) -> HostResult<()>;

    /// Detaches a label from an issue.
    async fn remove_label(
        &self,
        repo: &RepositoryFullName,
        number: IssueNumber,
        label: &str,
    ) -> HostResult<()>;

    /// Posts a comment on an issue or pull request.
    async fn create_comment(
        &self,
        repo: &RepositoryFullName,
        number: IssueNumber,
        body: &str,
    ) -> HostResult<CommentSnapshot>;

    /// Adds assignees to an issue.
    async fn add_assignees(
        &self,
        repo: &RepositoryFullName,
        number: IssueNumber,
        logins: &[String],
    ) -> HostResult<()>;

    /// Opens or closes an issue.
    async fn set_state(
        &self,
        repo: &RepositoryFullName,
        number: IssueNumber,
        state: IssueState,
    ) -> HostResult<()>;

    /// Creates an issue and returns its snapshot.
    async fn create_issue(
        &self,
        repo: &RepositoryFullName,
        title: &str,
        body: &str,
    ) -> HostResult<IssueSnapshot>;

    /// Returns whether `login` may be assigned issues in the repository.
    async fn is_assignable(&self, repo: &RepositoryFullName, login: &str) -> HostResult<bool>;

    /// Searches issues.
    async fn search_issues(&self, query: &SearchQuery) -> HostResult<Vec<IssueSnapshot>>;

    /// Searches pull requests.
    async fn search_pull_requests(
        &self,
        query: &SearchQuery,
    ) -> HostResult<Vec<PullRequestSnapshot>>;

    /// Fetches a pull request snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::NotFound`] when the pull request does not exist.
    async fn pull_request(
        &self,
        repo: &RepositoryFullName,
        number: IssueNumber,
    ) -> HostResult<PullRequestSnapshot>;

    /// Lists repository-relative paths changed by a pull request.
    async fn pull_request_files(
        &self,
        repo: &RepositoryFullName,
        number: IssueNumber,
    ) -> HostResult<Vec<String>>;

    /// Lists the conversation comments of an issue or pull request, oldest
    /// first.
    async fn comments(
        &self,
        repo: &RepositoryFullName,
        number: IssueNumber,
    ) -> HostResult<Vec<CommentSnapshot>>;

    /// Reports the current core and search quota.
    async fn rate_limits(&self) -> HostResult<RateLimitStatus>;
}

/// Errors returned by host implementations.
#[derive(Debug, Clone, Error)]
pub enum HostError {
    /// The addressed issue, pull request or repository does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The host rejected the request.
    #[error("host api error {status}: {message}")]
    Api {
        /// HTTP-style status code.
        status: u16,
        /// Message returned by the host.
        message: String,
    },

    /// Transport or authentication failure.
    #[error("host unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl HostError {
    /// Wraps a transport-layer error.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }

    /// Returns whether the error means the addressed object does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
