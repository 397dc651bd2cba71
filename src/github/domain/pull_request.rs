//! Pull request snapshots read from the host.

use super::{IssueNumber, IssueState};
use serde::{Deserialize, Serialize};

/// Point-in-time view of a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestSnapshot {
    /// Pull request number.
    pub number: IssueNumber,
    /// Pull request title.
    pub title: String,
    /// Login of the pull request author.
    pub author: String,
    /// Branch the pull request merges into.
    pub base_ref: String,
    /// Branch the pull request merges from.
    pub head_ref: String,
    /// Whether the pull request has been merged.
    pub merged: bool,
    /// Open/closed state.
    pub state: IssueState,
    /// Attached label names.
    pub labels: Vec<String>,
    /// Browser URL of the pull request.
    pub html_url: String,
}
