//! File trees and ignore lists used to locate translation work.

use super::RepositoryConfigError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Commit identifier as printed by the version-control tool.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitId(String);

impl CommitId {
    /// Wraps a commit hash.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the hash text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Set of paths below one directory, relative to it and without a leading
/// slash.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileTree {
    prefix: String,
    paths: BTreeSet<String>,
}

impl FileTree {
    /// Builds a tree from a full tracked-file listing.
    ///
    /// Keeps paths below `prefix` (matched on whole path segments) for which
    /// `keep` returns `true`, with the prefix stripped.
    pub fn from_listing<'a>(
        listing: impl IntoIterator<Item = &'a str>,
        prefix: &str,
        keep: impl Fn(&str) -> bool,
    ) -> Self {
        let directory = normalize_prefix(prefix);
        let paths = listing
            .into_iter()
            .filter(|path| keep(path))
            .filter_map(|path| strip_directory(path, &directory))
            .map(str::to_owned)
            .collect();
        Self {
            prefix: directory,
            paths,
        }
    }

    /// Returns the directory the paths are relative to.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the repository-relative path of a tree-relative path.
    #[must_use]
    pub fn full_path(&self, relative: &str) -> String {
        if self.prefix.is_empty() {
            relative.to_owned()
        } else {
            format!("{}/{relative}", self.prefix)
        }
    }

    /// Iterates relative paths in lexical order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    /// Returns `true` when the tree holds `relative`.
    #[must_use]
    pub fn contains(&self, relative: &str) -> bool {
        self.paths.contains(relative)
    }

    /// Returns the number of paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Returns `true` when the tree is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Strips `prefix` from `path` when `path` lies below it.
///
/// An empty prefix keeps every path.
pub(crate) fn strip_directory<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let relative = path.trim_start_matches('/');
    if prefix.is_empty() {
        return Some(relative);
    }
    relative
        .strip_prefix(prefix)?
        .strip_prefix('/')
        .filter(|rest| !rest.is_empty())
}

fn normalize_prefix(prefix: &str) -> String {
    prefix.trim_matches('/').to_owned()
}

/// Compiled ignore patterns; a pattern excludes a path it matches from the
/// start.
#[derive(Debug, Clone, Default)]
pub struct IgnoreList {
    patterns: Vec<Regex>,
}

impl IgnoreList {
    /// Compiles the given patterns.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryConfigError::InvalidIgnorePattern`] for the first
    /// pattern that does not compile.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, RepositoryConfigError> {
        let compiled = patterns
            .iter()
            .map(AsRef::as_ref)
            .map(|source| {
                Regex::new(&format!("^(?:{source})")).map_err(|err| {
                    RepositoryConfigError::InvalidIgnorePattern {
                        pattern: source.to_owned(),
                        reason: err.to_string(),
                    }
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { patterns: compiled })
    }

    /// Returns `true` when any pattern matches `path`.
    #[must_use]
    pub fn is_ignored(&self, path: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(path))
    }
}
