//! Git port backed by the `git` executable.

use crate::translation::domain::CommitId;
use crate::translation::ports::{GitError, GitRepository, GitResult};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, FixedOffset};
use std::process::Command;
use std::sync::Arc;
use tracing::debug;

/// Runs `git -C <root> ...` for every query.
#[derive(Debug, Clone)]
pub struct GitCli {
    root: Utf8PathBuf,
    program: String,
}

impl GitCli {
    /// Creates an adapter for the working tree at `root` using `git` from
    /// the search path.
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            root: root.into(),
            program: "git".to_owned(),
        }
    }

    /// Uses a different git executable.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Returns the working tree root.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn run(&self, args: &[&str]) -> GitResult<String> {
        debug!(root = %self.root, ?args, "running git");
        let output = Command::new(&self.program)
            .arg("-C")
            .arg(self.root.as_std_path())
            .args(args)
            .output()
            .map_err(|err| GitError::Spawn(Arc::new(err)))?;
        if !output.status.success() {
            return Err(GitError::Command {
                args: args.join(" "),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }
        String::from_utf8(output.stdout).map_err(|err| GitError::InvalidOutput(err.to_string()))
    }

    fn optional_commit(output: &str) -> Option<CommitId> {
        let hash = output.trim();
        (!hash.is_empty()).then(|| CommitId::new(hash))
    }
}

impl GitRepository for GitCli {
    fn list_files(&self) -> GitResult<Vec<String>> {
        let output = self.run(&["ls-files"])?;
        Ok(output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect())
    }

    fn last_commit(&self, path: &str) -> GitResult<Option<CommitId>> {
        let output = self.run(&["log", "-1", "--pretty=format:%H", "--", path])?;
        Ok(Self::optional_commit(&output))
    }

    fn commit_time(&self, commit: &CommitId) -> GitResult<DateTime<FixedOffset>> {
        let output = self.run(&["log", "-1", "--pretty=format:%cI", commit.as_str()])?;
        DateTime::parse_from_rfc3339(output.trim())
            .map_err(|err| GitError::InvalidOutput(format!("{}: {err}", output.trim())))
    }

    fn commit_before(
        &self,
        path: &str,
        time: DateTime<FixedOffset>,
    ) -> GitResult<Option<CommitId>> {
        let before = time.to_rfc3339();
        let output = self.run(&[
            "log",
            "-1",
            "--pretty=format:%H",
            "--before",
            &before,
            "--",
            path,
        ])?;
        Ok(Self::optional_commit(&output))
    }

    fn diff(&self, path: &str, new: &CommitId, old: &CommitId) -> GitResult<String> {
        let output = self.run(&["diff", new.as_str(), old.as_str(), "--", path])?;
        Ok(output.trim().to_owned())
    }
}
