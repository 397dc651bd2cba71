//! Issue and comment snapshots read from the host.

use super::{GithubDomainError, IssueNumber};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Open/closed state of an issue or pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueState {
    /// The issue is open.
    Open,
    /// The issue is closed.
    Closed,
}

impl IssueState {
    /// Returns the host's wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl TryFrom<&str> for IssueState {
    type Error = GithubDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            _ => Err(GithubDomainError::InvalidIssueState(value.to_owned())),
        }
    }
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time view of an issue.
///
/// Snapshots are plain data: mutating the issue goes through the host port,
/// after which a fresh snapshot must be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSnapshot {
    /// Issue number.
    pub number: IssueNumber,
    /// Issue title.
    pub title: String,
    /// Issue body, if any.
    pub body: Option<String>,
    /// Open/closed state.
    pub state: IssueState,
    /// Attached label names.
    pub labels: Vec<String>,
    /// Assignee logins; the first entry is the primary assignee.
    pub assignees: Vec<String>,
    /// Browser URL of the issue.
    pub html_url: String,
}

impl IssueSnapshot {
    /// Creates an open, unlabelled, unassigned snapshot.
    #[must_use]
    pub fn new(number: IssueNumber, title: impl Into<String>, html_url: impl Into<String>) -> Self {
        Self {
            number,
            title: title.into(),
            body: None,
            state: IssueState::Open,
            labels: Vec::new(),
            assignees: Vec::new(),
            html_url: html_url.into(),
        }
    }

    /// Sets the issue body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the issue state.
    #[must_use]
    pub const fn with_state(mut self, state: IssueState) -> Self {
        self.state = state;
        self
    }

    /// Sets the attached labels.
    #[must_use]
    pub fn with_labels(mut self, labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the assignees.
    #[must_use]
    pub fn with_assignees(
        mut self,
        assignees: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.assignees = assignees.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the primary assignee, if any.
    #[must_use]
    pub fn assignee(&self) -> Option<&str> {
        self.assignees.first().map(String::as_str)
    }

    /// Returns whether the named label is attached.
    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|attached| attached == label)
    }

    /// Returns whether every label in `required` is attached.
    #[must_use]
    pub fn has_all_labels<S: AsRef<str>>(&self, required: &[S]) -> bool {
        required.iter().all(|label| self.has_label(label.as_ref()))
    }
}

/// Comment attached to an issue or pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentSnapshot {
    /// Comment identifier assigned by the host.
    pub id: u64,
    /// Login of the comment author.
    pub author: String,
    /// Markdown body.
    pub body: String,
    /// Browser URL of the comment.
    pub html_url: String,
}
