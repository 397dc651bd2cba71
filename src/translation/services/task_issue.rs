//! Task issue creation with duplicate detection, and issue caching.

use super::{TaskIssueError, TaskIssueResult};
use crate::github::domain::{IssueKind, IssueNumber, IssueSnapshot, IssueState, SearchQuery};
use crate::github::ports::IssueHost;
use crate::github::services::RateLimiter;
use crate::translation::adapters::{CachedIssue, IssueCacheFile};
use crate::translation::domain::RepositoryDescriptor;
use minijinja::{Environment, context};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

const NEW_FILE_BODY: &str = "Source File: [{{ path }}]({{ url }})";
const UPDATED_FILE_BODY: &str =
    "Source File: [{{ path }}]({{ url }})\nDiff:\n~~~diff\n {{ diff }}\n~~~";

/// Label added to issues for untranslated files.
pub const NEW_FILE_LABEL: &str = "sync/new";
/// Label added to issues for stale translations.
pub const UPDATED_FILE_LABEL: &str = "sync/update";

/// Files needing translation work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationWork {
    /// Untranslated files.
    New(Vec<String>),
    /// Stale translations mapped to the source diff.
    Updated(BTreeMap<String, String>),
}

impl TranslationWork {
    /// Returns the number of files.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::New(paths) => paths.len(),
            Self::Updated(diffs) => diffs.len(),
        }
    }

    /// Returns `true` when there is no work.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    const fn kind_label(&self) -> &'static str {
        match self {
            Self::New(_) => NEW_FILE_LABEL,
            Self::Updated(_) => UPDATED_FILE_LABEL,
        }
    }

    fn entries(&self) -> Vec<(&str, Option<&str>)> {
        match self {
            Self::New(paths) => paths.iter().map(|path| (path.as_str(), None)).collect(),
            Self::Updated(diffs) => diffs
                .iter()
                .map(|(path, diff)| (path.as_str(), Some(diff.as_str())))
                .collect(),
        }
    }
}

/// A task issue to create unless a duplicate exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRequest {
    /// Issue title, the file's relative path.
    pub title: String,
    /// Issue body.
    pub body: String,
    /// Labels added after creation.
    pub labels: Vec<String>,
    /// Labels an existing issue must carry to count as a duplicate.
    pub search_labels: Vec<String>,
}

/// Limits for bulk issue creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskIssueOptions {
    /// Stop after creating this many issues.
    pub max_write: usize,
    /// Quota floor, and how many processed files pass between quota checks.
    pub max_result: u32,
    /// Search the host for duplicates before creating.
    pub search_online: bool,
}

impl Default for TaskIssueOptions {
    fn default() -> Self {
        Self {
            max_write: 10,
            max_result: 30,
            search_online: true,
        }
    }
}

/// Counts from a bulk creation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// Issues created.
    pub created: usize,
    /// Files skipped as duplicates.
    pub skipped: usize,
}

/// Creates task issues in the task repository.
pub struct TaskIssueService<H>
where
    H: IssueHost,
{
    limiter: RateLimiter<H>,
    descriptor: Arc<RepositoryDescriptor>,
    options: TaskIssueOptions,
    cache: Vec<CachedIssue>,
}

impl<H> TaskIssueService<H>
where
    H: IssueHost,
{
    /// Creates a service with an empty duplicate cache.
    #[must_use]
    pub const fn new(
        limiter: RateLimiter<H>,
        descriptor: Arc<RepositoryDescriptor>,
        options: TaskIssueOptions,
    ) -> Self {
        Self {
            limiter,
            descriptor,
            options,
            cache: Vec::new(),
        }
    }

    /// Uses previously cached issues for offline duplicate detection.
    #[must_use]
    pub fn with_cache(mut self, cache: Vec<CachedIssue>) -> Self {
        self.cache = cache;
        self
    }

    /// Creates the requested issue unless a duplicate exists.
    ///
    /// The first cached issue with the same title decides: it is a duplicate
    /// when its labels include every search label. With online search
    /// enabled, any open or closed issue with exactly the same title found
    /// by the host is also a duplicate. Returns `None` for duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`TaskIssueError`] when the task repository is misconfigured
    /// or a host call fails.
    pub async fn create_issue(
        &self,
        request: &IssueRequest,
    ) -> TaskIssueResult<Option<IssueSnapshot>> {
        let task = self.descriptor.task_repository()?;
        if self.is_cached_duplicate(request) {
            debug!(title = %request.title, "duplicate found in cache");
            return Ok(None);
        }
        let host = self.limiter.host();
        if self.options.search_online {
            let query = SearchQuery::in_repository(task.clone())
                .with_title(request.title.as_str())
                .with_labels(request.search_labels.iter().map(String::as_str));
            let found = host.search_issues(&query).await?;
            if found.iter().any(|issue| issue.title == request.title) {
                debug!(title = %request.title, "duplicate found online");
                return Ok(None);
            }
        }

        let mut created = self
            .limiter
            .paced(host.create_issue(&task, &request.title, &request.body))
            .await?;
        for label in &request.labels {
            self.limiter
                .paced(host.add_label(&task, created.number, label))
                .await?;
            if !created.has_label(label) {
                created.labels.push(label.clone());
            }
        }
        info!(issue = %created.number, title = %request.title, "task issue created");
        Ok(Some(created))
    }

    fn is_cached_duplicate(&self, request: &IssueRequest) -> bool {
        self.cache
            .iter()
            .find(|cached| cached.title == request.title)
            .is_some_and(|cached| {
                request
                    .search_labels
                    .iter()
                    .all(|label| cached.labels.contains(label))
            })
    }

    /// Creates one task issue per file of `work`.
    ///
    /// Issues are labelled with the branch/language defaults plus
    /// `sync/new` or `sync/update`. Creation stops once
    /// [`TaskIssueOptions::max_write`] issues exist; the quota is checked
    /// before starting and after every [`TaskIssueOptions::max_result`]
    /// processed files.
    ///
    /// # Errors
    ///
    /// Returns [`TaskIssueError`] on configuration, template or host
    /// failures; issues created before the failure remain.
    pub async fn build_issues(
        &self,
        branch: &str,
        language: &str,
        work: &TranslationWork,
    ) -> TaskIssueResult<BuildSummary> {
        let floor = self.options.max_result;
        self.limiter.wait_for_quota(floor, floor).await?;

        let mut labels = self.descriptor.default_labels(branch, language)?;
        labels.push(work.kind_label().to_owned());
        let search_labels = self.descriptor.search_labels(branch, language)?;
        let environment = Environment::new();

        let mut summary = BuildSummary::default();
        let mut since_check = 0;
        for (path, diff) in work.entries() {
            let url = self.descriptor.source_url(branch, path)?;
            let template = if diff.is_some() {
                UPDATED_FILE_BODY
            } else {
                NEW_FILE_BODY
            };
            let body = environment
                .render_str(template, context! { path, url, diff })
                .map_err(|err| TaskIssueError::Template {
                    path: path.to_owned(),
                    reason: err.to_string(),
                })?;
            let request = IssueRequest {
                title: path.to_owned(),
                body,
                labels: labels.clone(),
                search_labels: search_labels.clone(),
            };
            if self.create_issue(&request).await?.is_some() {
                summary.created += 1;
                if summary.created >= self.options.max_write {
                    break;
                }
            } else {
                summary.skipped += 1;
            }
            since_check += 1;
            if since_check >= floor {
                self.limiter.wait_for_quota(floor, floor).await?;
                since_check = 0;
            }
        }
        info!(
            branch,
            language,
            created = summary.created,
            skipped = summary.skipped,
            "task issues built"
        );
        Ok(summary)
    }

    /// Searches `query` and writes the hits to `file` for later offline
    /// duplicate detection. Returns the number of issues cached.
    ///
    /// # Errors
    ///
    /// Returns [`TaskIssueError`] when the search or the write fails.
    pub async fn cache_issues(
        &self,
        query: &SearchQuery,
        file: &IssueCacheFile,
    ) -> TaskIssueResult<usize> {
        let floor = self.options.max_result;
        self.limiter.wait_for_quota(floor, floor).await?;
        let found = self.limiter.host().search_issues(query).await?;
        let records: Vec<CachedIssue> = found
            .into_iter()
            .map(|issue| CachedIssue {
                number: issue.number.value(),
                title: issue.title,
                labels: issue.labels,
            })
            .collect();
        file.save(&records)?;
        info!(path = %file.path(), count = records.len(), "issues cached");
        Ok(records.len())
    }

    /// Reports open task issues sharing a title.
    ///
    /// # Errors
    ///
    /// Returns [`TaskIssueError`] when the task repository is misconfigured
    /// or the search fails.
    pub async fn find_duplicates(&self) -> TaskIssueResult<BTreeMap<String, Vec<IssueNumber>>> {
        let query = SearchQuery::in_repository(self.descriptor.task_repository()?)
            .of_kind(IssueKind::Issue)
            .with_state(IssueState::Open);
        let found = self.limiter.host().search_issues(&query).await?;
        Ok(duplicate_titles(&found))
    }
}

/// Groups issue numbers by title, keeping only titles used more than once.
#[must_use]
pub fn duplicate_titles(issues: &[IssueSnapshot]) -> BTreeMap<String, Vec<IssueNumber>> {
    let mut by_title: BTreeMap<String, Vec<IssueNumber>> = BTreeMap::new();
    for issue in issues {
        by_title
            .entry(issue.title.clone())
            .or_default()
            .push(issue.number);
    }
    by_title.retain(|_, numbers| numbers.len() > 1);
    for numbers in by_title.values_mut() {
        numbers.sort_unstable();
    }
    by_title
}
