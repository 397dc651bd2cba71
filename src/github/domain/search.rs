//! Typed issue search queries.

use super::{IssueState, RepositoryFullName};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a search targets issues or pull requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Plain issues.
    Issue,
    /// Pull requests.
    PullRequest,
}

impl IssueKind {
    const fn qualifier(self) -> &'static str {
        match self {
            Self::Issue => "issue",
            Self::PullRequest => "pr",
        }
    }
}

/// Structured search over issues and pull requests.
///
/// Adapters either render it with [`SearchQuery::to_query_string`] for a
/// keyword search endpoint or evaluate the fields directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Restricts results to one repository.
    pub repository: Option<RepositoryFullName>,
    /// Restricts results to issues or pull requests.
    pub kind: Option<IssueKind>,
    /// Restricts results to one state.
    pub state: Option<IssueState>,
    /// Every label a result must carry.
    pub labels: Vec<String>,
    /// Required assignee login.
    pub assignee: Option<String>,
    /// Text that must occur in the title.
    pub title: Option<String>,
    /// Lower bound on creation time.
    pub created_since: Option<DateTime<Utc>>,
}

impl SearchQuery {
    /// Creates a query scoped to one repository.
    #[must_use]
    pub fn in_repository(repository: RepositoryFullName) -> Self {
        Self {
            repository: Some(repository),
            ..Self::default()
        }
    }

    /// Restricts results to issues or pull requests.
    #[must_use]
    pub const fn of_kind(mut self, kind: IssueKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Restricts results to one state.
    #[must_use]
    pub const fn with_state(mut self, state: IssueState) -> Self {
        self.state = Some(state);
        self
    }

    /// Adds required labels.
    #[must_use]
    pub fn with_labels(mut self, labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.labels.extend(labels.into_iter().map(Into::into));
        self
    }

    /// Requires the given assignee.
    #[must_use]
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// Requires the given text in the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Requires results created at or after `since`.
    #[must_use]
    pub const fn created_since(mut self, since: DateTime<Utc>) -> Self {
        self.created_since = Some(since);
        self
    }

    /// Renders the query in the host's keyword search syntax.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut terms = Vec::new();
        if let Some(repository) = &self.repository {
            terms.push(format!("repo:{repository}"));
        }
        if let Some(kind) = self.kind {
            terms.push(format!("type:{}", kind.qualifier()));
        }
        if let Some(state) = self.state {
            terms.push(format!("is:{state}"));
        }
        for label in &self.labels {
            terms.push(format!("label:{}", quote_if_needed(label)));
        }
        if let Some(assignee) = &self.assignee {
            terms.push(format!("assignee:{assignee}"));
        }
        if let Some(created) = self.created_since {
            terms.push(format!("created:>={}", created.format("%Y-%m-%dT%H:%M:%SZ")));
        }
        if let Some(title) = &self.title {
            terms.push(format!("in:title {}", quote_if_needed(title)));
        }
        terms.join(" ")
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

fn quote_if_needed(value: &str) -> String {
    if value.chars().any(char::is_whitespace) {
        format!("\"{value}\"")
    } else {
        value.to_owned()
    }
}
