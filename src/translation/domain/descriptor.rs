//! Repository descriptors: where sources and translations live and how task
//! issues are labelled.

use super::{IgnoreList, RepositoryConfigError};
use crate::github::domain::RepositoryFullName;
use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Top-level descriptor document keyed by repository name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoriesFile {
    /// Descriptors by name.
    pub repositories: BTreeMap<String, RepositoryDescriptor>,
}

impl RepositoriesFile {
    /// Parses a YAML descriptor document.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryConfigError::Parse`] when the document does not
    /// match the descriptor schema.
    pub fn from_yaml_str(source: &str) -> Result<Self, RepositoryConfigError> {
        serde_yaml::from_str(source).map_err(|err| RepositoryConfigError::Parse(err.to_string()))
    }

    /// Returns the descriptor with the given name.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryConfigError::UnknownRepository`] when absent.
    pub fn repository(&self, name: &str) -> Result<&RepositoryDescriptor, RepositoryConfigError> {
        self.repositories
            .get(name)
            .ok_or_else(|| RepositoryConfigError::UnknownRepository(name.to_owned()))
    }
}

/// Everything needed to track translations of one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
    /// Location of the source-language tree.
    pub source: SourceConfig,
    /// Checked-out branches.
    pub branches: Vec<BranchConfig>,
    /// Target languages.
    pub languages: Vec<LanguageConfig>,
    /// Code and task repositories on the host.
    pub github: GithubConfig,
    /// Status label names.
    pub status: StatusLabels,
    /// Extensions of tracked files, with or without the leading dot.
    pub valid_extensions: Vec<String>,
    /// Labels attached to every task issue.
    #[serde(default)]
    pub labels: Vec<String>,
}

/// Source-language tree location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Repository-relative directory.
    pub path: String,
}

/// One checked-out branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchConfig {
    /// Branch name used in commands.
    pub name: String,
    /// Local checkout directory.
    pub path: String,
    /// Base branch pull requests must target.
    pub target_branch: String,
    /// Patterns excluding relative paths from new-file results.
    #[serde(default)]
    pub ignore: Vec<String>,
    /// Labels identifying task issues for this branch.
    #[serde(default)]
    pub labels: Vec<String>,
    /// Link prefixes for generated issue bodies.
    pub url_prefix: UrlPrefix,
}

/// Link prefixes for a branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlPrefix {
    /// Prefix for links to source files.
    pub source: String,
    /// Prefix for links to the rendered site.
    pub web: String,
}

/// One target language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageConfig {
    /// Language name used in commands.
    pub name: String,
    /// Repository-relative directory of translations.
    pub path: String,
    /// Labels identifying task issues for this language.
    #[serde(default)]
    pub labels: Vec<String>,
    /// Labels carried by pull requests in this language.
    #[serde(default)]
    pub target_labels: Vec<String>,
}

/// Host repositories of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Repository receiving translation pull requests.
    pub code: RepositoryRef,
    /// Repository holding task issues.
    pub task: RepositoryRef,
}

/// Owner and name of a host repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRef {
    /// Owning user or organization.
    pub owner: String,
    /// Repository name.
    pub repository: String,
}

impl RepositoryRef {
    /// Returns the validated `owner/repository` name.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryConfigError::Repository`] when either part is
    /// empty or contains a slash.
    pub fn full_name(&self) -> Result<RepositoryFullName, RepositoryConfigError> {
        Ok(RepositoryFullName::from_owner_and_name(
            &self.owner,
            &self.repository,
        )?)
    }
}

/// Progress of a tracked task issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncStatus {
    /// Nobody has started.
    Pending,
    /// A pull request is open.
    Working,
    /// The pull request was merged.
    Pushed,
    /// The task is complete.
    Merged,
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::Working => "working",
            Self::Pushed => "pushed",
            Self::Merged => "merged",
        })
    }
}

/// Label names for each [`SyncStatus`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusLabels {
    /// Label for [`SyncStatus::Pending`].
    pub pending: String,
    /// Label for [`SyncStatus::Working`].
    pub working: String,
    /// Label for [`SyncStatus::Pushed`].
    pub pushed: String,
    /// Label for [`SyncStatus::Merged`].
    pub merged: String,
}

impl StatusLabels {
    /// Returns the label for `status`.
    #[must_use]
    pub fn label(&self, status: SyncStatus) -> &str {
        match status {
            SyncStatus::Pending => &self.pending,
            SyncStatus::Working => &self.working,
            SyncStatus::Pushed => &self.pushed,
            SyncStatus::Merged => &self.merged,
        }
    }

    /// Returns every status label in progression order.
    #[must_use]
    pub fn all(&self) -> [&str; 4] {
        [&self.pending, &self.working, &self.pushed, &self.merged]
    }
}

impl RepositoryDescriptor {
    /// Returns the branch with the given name.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryConfigError::UnknownBranch`] when absent.
    pub fn branch(&self, name: &str) -> Result<&BranchConfig, RepositoryConfigError> {
        self.branches
            .iter()
            .find(|branch| branch.name == name)
            .ok_or_else(|| RepositoryConfigError::UnknownBranch(name.to_owned()))
    }

    /// Returns the language with the given name.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryConfigError::UnknownLanguage`] when absent.
    pub fn language(&self, name: &str) -> Result<&LanguageConfig, RepositoryConfigError> {
        self.languages
            .iter()
            .find(|language| language.name == name)
            .ok_or_else(|| RepositoryConfigError::UnknownLanguage(name.to_owned()))
    }

    /// Labels for a new task issue: repository, then branch, then language
    /// labels.
    ///
    /// # Errors
    ///
    /// Returns an error when the branch or language is not configured.
    pub fn default_labels(
        &self,
        branch: &str,
        language: &str,
    ) -> Result<Vec<String>, RepositoryConfigError> {
        let mut labels = self.labels.clone();
        labels.extend(self.search_labels(branch, language)?);
        Ok(labels)
    }

    /// Labels identifying existing task issues: branch, then language labels.
    ///
    /// # Errors
    ///
    /// Returns an error when the branch or language is not configured.
    pub fn search_labels(
        &self,
        branch: &str,
        language: &str,
    ) -> Result<Vec<String>, RepositoryConfigError> {
        let mut labels = self.branch(branch)?.labels.clone();
        labels.extend(self.language(language)?.labels.iter().cloned());
        Ok(labels)
    }

    /// Returns the repository holding task issues.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryConfigError::Repository`] for an invalid name.
    pub fn task_repository(&self) -> Result<RepositoryFullName, RepositoryConfigError> {
        self.github.task.full_name()
    }

    /// Returns the repository receiving pull requests.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryConfigError::Repository`] for an invalid name.
    pub fn code_repository(&self) -> Result<RepositoryFullName, RepositoryConfigError> {
        self.github.code.full_name()
    }

    /// Compiles the branch's ignore patterns.
    ///
    /// # Errors
    ///
    /// Returns an error when the branch is unknown or a pattern is invalid.
    pub fn ignore_list(&self, branch: &str) -> Result<IgnoreList, RepositoryConfigError> {
        IgnoreList::new(&self.branch(branch)?.ignore)
    }

    /// Link to a source file on the branch.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryConfigError::UnknownBranch`] when absent.
    pub fn source_url(&self, branch: &str, path: &str) -> Result<String, RepositoryConfigError> {
        Ok(join_url(&self.branch(branch)?.url_prefix.source, path))
    }

    /// Link to the rendered page of a file on the branch.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryConfigError::UnknownBranch`] when absent.
    pub fn web_url(&self, branch: &str, path: &str) -> Result<String, RepositoryConfigError> {
        Ok(join_url(&self.branch(branch)?.url_prefix.web, path))
    }

    /// Returns `true` when `path` ends in one of the tracked extensions.
    #[must_use]
    pub fn has_valid_extension(&self, path: &str) -> bool {
        Utf8Path::new(path).extension().is_some_and(|extension| {
            self.valid_extensions
                .iter()
                .any(|valid| valid.trim_start_matches('.') == extension)
        })
    }
}

fn join_url(prefix: &str, path: &str) -> String {
    format!(
        "{}/{}",
        prefix.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
