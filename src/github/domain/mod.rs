//! Value objects describing repositories, issues, pull requests and quota.

mod error;
mod ids;
mod issue;
mod pull_request;
mod rate_limit;
mod search;

pub use error::GithubDomainError;
pub use ids::{IssueNumber, RepositoryFullName, RunId};
pub use issue::{CommentSnapshot, IssueSnapshot, IssueState};
pub use pull_request::PullRequestSnapshot;
pub use rate_limit::{QuotaWindow, RateLimitStatus};
pub use search::{IssueKind, SearchQuery};
