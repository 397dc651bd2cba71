//! Identifier and validated scalar types for the host domain.

use super::GithubDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Correlation identifier for one dispatch or synchronization pass.
///
/// Carried on tracing spans so every host call made on behalf of one event
/// can be grouped in the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    /// Creates a new random run identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Positive issue or pull request number.
///
/// Issues and pull requests share one number space per repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct IssueNumber(u64);

impl IssueNumber {
    /// Creates a validated issue number.
    ///
    /// # Errors
    ///
    /// Returns [`GithubDomainError::InvalidIssueNumber`] when the value is
    /// zero.
    pub const fn new(value: u64) -> Result<Self, GithubDomainError> {
        if value == 0 {
            return Err(GithubDomainError::InvalidIssueNumber(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for IssueNumber {
    type Error = GithubDomainError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<IssueNumber> for u64 {
    fn from(value: IssueNumber) -> Self {
        value.0
    }
}

impl fmt::Display for IssueNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalized repository identifier in `owner/repo` format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepositoryFullName(String);

impl RepositoryFullName {
    /// Creates a validated repository name.
    ///
    /// # Errors
    ///
    /// Returns [`GithubDomainError::InvalidRepository`] if the value does not
    /// contain exactly one slash-delimited owner and repository segment.
    pub fn new(value: impl Into<String>) -> Result<Self, GithubDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        let mut segments = normalized.split('/');
        let owner = segments.next().unwrap_or_default();
        let repo = segments.next().unwrap_or_default();
        let has_more_segments = segments.next().is_some();
        let is_valid = !owner.is_empty()
            && !repo.is_empty()
            && !has_more_segments
            && !normalized.chars().any(char::is_whitespace);

        if !is_valid {
            return Err(GithubDomainError::InvalidRepository(raw));
        }

        Ok(Self(normalized.to_owned()))
    }

    /// Builds a repository name from separate owner and repository parts.
    ///
    /// # Errors
    ///
    /// Returns [`GithubDomainError::InvalidRepository`] when either part is
    /// empty or contains a slash.
    pub fn from_owner_and_name(owner: &str, name: &str) -> Result<Self, GithubDomainError> {
        Self::new(format!("{owner}/{name}"))
    }

    /// Returns the repository name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RepositoryFullName {
    type Error = GithubDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RepositoryFullName> for String {
    fn from(value: RepositoryFullName) -> Self {
        value.0
    }
}

impl AsRef<str> for RepositoryFullName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for RepositoryFullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
