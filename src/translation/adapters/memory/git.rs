//! Thread-safe in-memory commit history.

use crate::translation::domain::CommitId;
use crate::translation::ports::{GitError, GitRepository, GitResult};
use chrono::{DateTime, FixedOffset};
use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug, Clone)]
struct Revision {
    id: CommitId,
    time: DateTime<FixedOffset>,
    path: String,
    content: String,
}

/// In-memory history where every commit touches exactly one file.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGitRepository {
    revisions: Arc<RwLock<Vec<Revision>>>,
}

impl InMemoryGitRepository {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a commit of `content` to `path` at `time` and returns its id.
    pub fn commit(
        &self,
        path: &str,
        content: &str,
        time: DateTime<FixedOffset>,
    ) -> CommitId {
        let mut revisions = self
            .revisions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let id = CommitId::new(format!("c{:04}", revisions.len() + 1));
        revisions.push(Revision {
            id: id.clone(),
            time,
            path: path.to_owned(),
            content: content.to_owned(),
        });
        id
    }

    fn with_revisions<T>(&self, read: impl FnOnce(&[Revision]) -> T) -> T {
        let revisions = self
            .revisions
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        read(&revisions)
    }

    fn latest<'a>(
        revisions: &'a [Revision],
        path: &str,
        until: Option<DateTime<FixedOffset>>,
    ) -> Option<&'a Revision> {
        revisions
            .iter()
            .filter(|revision| revision.path == path)
            .filter(|revision| until.is_none_or(|limit| revision.time <= limit))
            .max_by_key(|revision| revision.time)
    }

    fn content_of(revisions: &[Revision], id: &CommitId) -> GitResult<String> {
        revisions
            .iter()
            .find(|revision| revision.id == *id)
            .map(|revision| revision.content.clone())
            .ok_or_else(|| GitError::UnknownCommit(id.clone()))
    }
}

impl GitRepository for InMemoryGitRepository {
    fn list_files(&self) -> GitResult<Vec<String>> {
        Ok(self.with_revisions(|revisions| {
            revisions
                .iter()
                .map(|revision| revision.path.clone())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        }))
    }

    fn last_commit(&self, path: &str) -> GitResult<Option<CommitId>> {
        Ok(self.with_revisions(|revisions| {
            Self::latest(revisions, path, None).map(|revision| revision.id.clone())
        }))
    }

    fn commit_time(&self, commit: &CommitId) -> GitResult<DateTime<FixedOffset>> {
        self.with_revisions(|revisions| {
            revisions
                .iter()
                .find(|revision| revision.id == *commit)
                .map(|revision| revision.time)
                .ok_or_else(|| GitError::UnknownCommit(commit.clone()))
        })
    }

    fn commit_before(
        &self,
        path: &str,
        time: DateTime<FixedOffset>,
    ) -> GitResult<Option<CommitId>> {
        Ok(self.with_revisions(|revisions| {
            Self::latest(revisions, path, Some(time)).map(|revision| revision.id.clone())
        }))
    }

    fn diff(&self, path: &str, new: &CommitId, old: &CommitId) -> GitResult<String> {
        self.with_revisions(|revisions| {
            let from = Self::content_of(revisions, new)?;
            let to = Self::content_of(revisions, old)?;
            let mut diff = format!("--- a/{path}\n+++ b/{path}");
            for line in from.lines() {
                diff.push_str("\n-");
                diff.push_str(line);
            }
            for line in to.lines() {
                diff.push_str("\n+");
                diff.push_str(line);
            }
            Ok(diff)
        })
    }
}
