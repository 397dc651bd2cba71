//! Flat JSON cache of previously seen task issues.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::{Deserialize, Serialize};
use std::io;
use std::sync::Arc;
use thiserror::Error;

/// One cached issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedIssue {
    /// Issue number.
    pub number: u64,
    /// Issue title.
    pub title: String,
    /// Attached label names.
    #[serde(default)]
    pub labels: Vec<String>,
}

/// Errors raised while reading or writing the cache file.
#[derive(Debug, Clone, Error)]
pub enum IssueCacheError {
    /// The path has no file name component.
    #[error("cache path '{0}' must name a file")]
    InvalidPath(Utf8PathBuf),

    /// Filesystem access failed.
    #[error("cache file '{path}' is not accessible: {source}")]
    Io {
        /// Cache file path.
        path: Utf8PathBuf,
        /// Underlying error.
        source: Arc<io::Error>,
    },

    /// The file does not hold a list of cached issues.
    #[error("cache file '{path}' is malformed: {reason}")]
    Malformed {
        /// Cache file path.
        path: Utf8PathBuf,
        /// Decoder diagnostic.
        reason: String,
    },
}

/// Location of an issue cache file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueCacheFile {
    path: Utf8PathBuf,
}

impl IssueCacheFile {
    /// Points at a cache file; nothing is read until [`Self::load`].
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the cache file path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Reads every cached issue.
    ///
    /// # Errors
    ///
    /// Returns [`IssueCacheError`] when the file cannot be read or decoded.
    pub fn load(&self) -> Result<Vec<CachedIssue>, IssueCacheError> {
        let (dir, file_name) = self.open_parent()?;
        let contents = dir.read_to_string(file_name).map_err(|err| self.io(err))?;
        serde_json::from_str(&contents).map_err(|err| IssueCacheError::Malformed {
            path: self.path.clone(),
            reason: err.to_string(),
        })
    }

    /// Replaces the file with `issues` as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`IssueCacheError`] when the file cannot be written.
    pub fn save(&self, issues: &[CachedIssue]) -> Result<(), IssueCacheError> {
        let (dir, file_name) = self.open_parent()?;
        let contents =
            serde_json::to_string_pretty(issues).map_err(|err| IssueCacheError::Malformed {
                path: self.path.clone(),
                reason: err.to_string(),
            })?;
        dir.write(file_name, contents).map_err(|err| self.io(err))
    }

    fn open_parent(&self) -> Result<(Dir, &str), IssueCacheError> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| IssueCacheError::InvalidPath(self.path.clone()))?;
        let parent = self
            .path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|err| self.io(err))?;
        Ok((dir, file_name))
    }

    fn io(&self, err: io::Error) -> IssueCacheError {
        IssueCacheError::Io {
            path: self.path.clone(),
            source: Arc::new(err),
        }
    }
}
