//! Normalized inbound event context.

use crate::github::domain::{IssueNumber, RepositoryFullName};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Event families a workflow can react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowEvent {
    /// An issue was opened; the command text is `opened`.
    OnIssue,
    /// A comment was posted; the command text is the comment body.
    OnComment,
}

impl WorkflowEvent {
    /// Returns the configuration key for the event.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OnIssue => "on_issue",
            Self::OnComment => "on_comment",
        }
    }
}

impl fmt::Display for WorkflowEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One inbound event: where it happened, who sent it, and the command text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    repo: RepositoryFullName,
    issue: IssueNumber,
    sender: String,
    command: String,
}

impl Subject {
    /// Command text used for newly opened issues.
    pub const OPENED: &'static str = "opened";

    /// Creates a subject.
    #[must_use]
    pub fn new(
        repo: RepositoryFullName,
        issue: IssueNumber,
        sender: impl Into<String>,
        command: impl Into<String>,
    ) -> Self {
        Self {
            repo,
            issue,
            sender: sender.into(),
            command: command.into(),
        }
    }

    /// Returns the repository the event belongs to.
    #[must_use]
    pub const fn repo(&self) -> &RepositoryFullName {
        &self.repo
    }

    /// Returns the issue or pull request number.
    #[must_use]
    pub const fn issue(&self) -> IssueNumber {
        self.issue
    }

    /// Returns the login of the user who triggered the event.
    #[must_use]
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Returns the command text matched against triggers.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }
}
