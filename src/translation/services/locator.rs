//! Finding source files that are untranslated or whose translation is stale.

use super::LocateResult;
use crate::translation::domain::{FileTree, IgnoreList, RepositoryDescriptor};
use crate::translation::ports::GitRepository;
use std::collections::BTreeMap;
use tracing::debug;

/// Paths in `source` but not in `target`, sorted, without ignored paths.
#[must_use]
pub fn new_files(source: &FileTree, target: &FileTree, ignore: &IgnoreList) -> Vec<String> {
    source
        .iter()
        .filter(|path| !target.contains(path))
        .filter(|path| !ignore.is_ignored(path))
        .map(str::to_owned)
        .collect()
}

/// Paths in both trees whose translation predates the latest source change,
/// mapped to the source diff since the translated revision.
///
/// For each shared path, the source revision current when the translation
/// was last committed is reconstructed; when it differs from the latest
/// source revision the translation is stale. A source file with no revision
/// before the translation is reported with an empty diff.
///
/// Paths matching `ignore` are left out here as well as in [`new_files`], so
/// an ignored file is never reported stale.
///
/// # Errors
///
/// Returns [`super::LocateError::Git`] when history cannot be read.
pub fn updated_files<G>(
    git: &G,
    source: &FileTree,
    target: &FileTree,
    ignore: &IgnoreList,
) -> LocateResult<BTreeMap<String, String>>
where
    G: GitRepository + ?Sized,
{
    let mut updated = BTreeMap::new();
    for path in source.iter().filter(|path| target.contains(path)) {
        if ignore.is_ignored(path) {
            continue;
        }
        let source_path = source.full_path(path);
        let target_path = target.full_path(path);
        let (Some(latest), Some(translated)) = (
            git.last_commit(&source_path)?,
            git.last_commit(&target_path)?,
        ) else {
            continue;
        };
        let translated_at = git.commit_time(&translated)?;
        let diff = match git.commit_before(&source_path, translated_at)? {
            Some(base) if base == latest => continue,
            Some(base) => git.diff(&source_path, &latest, &base)?,
            None => String::new(),
        };
        debug!(path, %latest, "translation is stale");
        updated.insert(path.to_owned(), diff);
    }
    Ok(updated)
}

/// Locates translation work in one branch checkout.
pub struct FileDiffLocator<'a, G>
where
    G: GitRepository + ?Sized,
{
    git: &'a G,
    descriptor: &'a RepositoryDescriptor,
}

impl<'a, G> FileDiffLocator<'a, G>
where
    G: GitRepository + ?Sized,
{
    /// Creates a locator over the checkout `git`.
    #[must_use]
    pub const fn new(git: &'a G, descriptor: &'a RepositoryDescriptor) -> Self {
        Self { git, descriptor }
    }

    /// Builds the source tree and the tree for `language` from one listing.
    ///
    /// # Errors
    ///
    /// Returns an error when the language is unknown or the listing fails.
    pub fn trees(&self, language: &str) -> LocateResult<(FileTree, FileTree)> {
        let target_prefix = &self.descriptor.language(language)?.path;
        let listing = self.git.list_files()?;
        let valid = |path: &str| self.descriptor.has_valid_extension(path);
        let source = FileTree::from_listing(
            listing.iter().map(String::as_str),
            &self.descriptor.source.path,
            valid,
        );
        let target =
            FileTree::from_listing(listing.iter().map(String::as_str), target_prefix, valid);
        Ok((source, target))
    }

    /// Lists untranslated files for `language` on `branch`.
    ///
    /// # Errors
    ///
    /// Returns an error when the branch or language is unknown, an ignore
    /// pattern is invalid, or the listing fails.
    pub fn find_new(&self, branch: &str, language: &str) -> LocateResult<Vec<String>> {
        let ignore = self.descriptor.ignore_list(branch)?;
        let (source, target) = self.trees(language)?;
        let found = new_files(&source, &target, &ignore);
        debug!(branch, language, count = found.len(), "new files located");
        Ok(found)
    }

    /// Maps stale translations for `language` on `branch` to source diffs.
    ///
    /// The branch ignore list filters these results too.
    ///
    /// # Errors
    ///
    /// Returns an error when the branch or language is unknown, an ignore
    /// pattern is invalid, or history cannot be read.
    pub fn find_updated(
        &self,
        branch: &str,
        language: &str,
    ) -> LocateResult<BTreeMap<String, String>> {
        let ignore = self.descriptor.ignore_list(branch)?;
        let (source, target) = self.trees(language)?;
        let found = updated_files(self.git, &source, &target, &ignore)?;
        debug!(branch, language, count = found.len(), "updated files located");
        Ok(found)
    }
}
