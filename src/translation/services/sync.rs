//! Reconciliation of translation pull requests with task issues.

use super::SyncResult;
use crate::github::domain::{
    IssueKind, IssueNumber, IssueSnapshot, PullRequestSnapshot, RepositoryFullName, RunId,
    SearchQuery,
};
use crate::github::ports::IssueHost;
use crate::github::services::RateLimiter;
use crate::translation::domain::{
    BranchConfig, LanguageConfig, Marker, RepositoryDescriptor, SyncStatus, strip_directory,
};
use chrono::TimeDelta;
use mockable::Clock;
use std::sync::Arc;
use tracing::{Instrument, debug, info, info_span, warn};

/// Comment posted on a task issue when its pull request opens.
const PUSHED_COMMAND: &str = "/pushed";
/// Comment posted on a task issue when its pull request merges.
const MERGED_COMMAND: &str = "/merged";

/// Tuning for a synchronization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    /// How far back pull requests are searched by creation time.
    pub lookback: TimeDelta,
    /// Quota floor passed to [`RateLimiter::wait_for_quota`] for both
    /// buckets before searching.
    pub quota_floor: u32,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            lookback: TimeDelta::days(30),
            quota_floor: 30,
        }
    }
}

/// What a pass did with one pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// A terminal marker was already present.
    AlreadySettled(Marker),
    /// The pull request does not change exactly one tracked file.
    NotSingleFile {
        /// Number of tracked files changed.
        files: usize,
    },
    /// No task issue is titled after the changed file.
    NoTaskIssue {
        /// The changed file.
        path: String,
    },
    /// Several task issues are titled after the changed file.
    AmbiguousTaskIssue {
        /// The changed file.
        path: String,
        /// Matching issue numbers.
        candidates: Vec<IssueNumber>,
    },
    /// The task issue has nobody assigned.
    NoAssignee {
        /// Task issue number.
        issue: IssueNumber,
    },
    /// The task issue is assigned to someone other than the author.
    AssignedToOther {
        /// Task issue number.
        issue: IssueNumber,
        /// Current assignee.
        assignee: String,
    },
    /// The merge was reported to the task issue.
    Merged {
        /// Task issue number.
        issue: IssueNumber,
    },
    /// The task issue already reports the work as pushed.
    AlreadyPushed {
        /// Task issue number.
        issue: IssueNumber,
    },
    /// The open pull request was reported to the task issue.
    Working {
        /// Task issue number.
        issue: IssueNumber,
        /// The status label changed to working.
        relabelled: bool,
        /// Pushed notifications were posted.
        notified: bool,
    },
    /// Processing failed; other pull requests were still processed.
    Failed {
        /// Error description.
        reason: String,
    },
}

impl Disposition {
    /// Returns `true` when the pull request belongs in the audit list.
    #[must_use]
    pub const fn is_recorded(&self) -> bool {
        match self {
            Self::AssignedToOther { .. } | Self::Merged { .. } => true,
            Self::Working {
                relabelled,
                notified,
                ..
            } => *relabelled || *notified,
            _ => false,
        }
    }
}

/// One pull request and what happened to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestOutcome {
    /// Pull request number.
    pub number: IssueNumber,
    /// Browser URL of the pull request.
    pub html_url: String,
    /// What the pass did.
    pub disposition: Disposition,
}

/// Result of a synchronization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Every pull request considered, in search order.
    pub outcomes: Vec<PullRequestOutcome>,
}

impl SyncReport {
    /// URLs of pull requests that produced a recorded outcome, each once.
    #[must_use]
    pub fn urls(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.disposition.is_recorded())
            .map(|outcome| outcome.html_url.as_str())
            .collect()
    }

    /// Returns the outcome for a pull request.
    #[must_use]
    pub fn outcome(&self, number: IssueNumber) -> Option<&PullRequestOutcome> {
        self.outcomes.iter().find(|outcome| outcome.number == number)
    }
}

struct SyncContext<'a> {
    code: RepositoryFullName,
    task: RepositoryFullName,
    branch: &'a BranchConfig,
    language: &'a LanguageConfig,
    search_labels: Vec<String>,
}

struct Candidate {
    pull_request: PullRequestSnapshot,
    files: Vec<String>,
    markers: Vec<Marker>,
}

enum TaskMatch {
    One(IssueSnapshot),
    None,
    Many(Vec<IssueNumber>),
}

/// Moves task issues through their status labels as translation pull
/// requests open and merge.
///
/// Markers left on pull requests make repeated passes idempotent: a pull
/// request carrying a merged or not-applicable marker is never processed
/// again, and an open one is announced on its task issue only once.
pub struct PullRequestSynchronizer<H>
where
    H: IssueHost,
{
    limiter: RateLimiter<H>,
    descriptor: Arc<RepositoryDescriptor>,
    clock: Arc<dyn Clock + Send + Sync>,
    options: SyncOptions,
}

impl<H> PullRequestSynchronizer<H>
where
    H: IssueHost,
{
    /// Creates a synchronizer.
    #[must_use]
    pub fn new(
        limiter: RateLimiter<H>,
        descriptor: Arc<RepositoryDescriptor>,
        clock: Arc<dyn Clock + Send + Sync>,
        options: SyncOptions,
    ) -> Self {
        Self {
            limiter,
            descriptor,
            clock,
            options,
        }
    }

    /// Reconciles recent pull requests for `language` against `branch`.
    ///
    /// A failure while handling one pull request is logged and recorded as
    /// [`Disposition::Failed`]; the pass continues with the next one.
    ///
    /// # Errors
    ///
    /// Returns [`super::SyncError`] when the branch or language is not
    /// configured, or the quota check or pull request search fails.
    pub async fn sync(&self, branch: &str, language: &str) -> SyncResult<SyncReport> {
        let span = info_span!(
            "pull_request_sync",
            run_id = %RunId::new(),
            branch,
            language,
        );
        self.sync_in_span(branch, language).instrument(span).await
    }

    async fn sync_in_span(&self, branch: &str, language: &str) -> SyncResult<SyncReport> {
        let context = SyncContext {
            code: self.descriptor.code_repository()?,
            task: self.descriptor.task_repository()?,
            branch: self.descriptor.branch(branch)?,
            language: self.descriptor.language(language)?,
            search_labels: self.descriptor.search_labels(branch, language)?,
        };
        self.limiter
            .wait_for_quota(self.options.quota_floor, self.options.quota_floor)
            .await?;

        let query = SearchQuery::in_repository(context.code.clone())
            .of_kind(IssueKind::PullRequest)
            .with_labels(context.language.target_labels.iter().map(String::as_str))
            .created_since(self.clock.utc() - self.options.lookback);
        let pull_requests = self.limiter.host().search_pull_requests(&query).await?;
        info!(found = pull_requests.len(), "pull requests found");

        let mut report = SyncReport::default();
        for pull_request in pull_requests
            .into_iter()
            .filter(|pull_request| pull_request.base_ref == context.branch.target_branch)
        {
            let number = pull_request.number;
            let html_url = pull_request.html_url.clone();
            let disposition = match self.sync_pull_request(&context, pull_request).await {
                Ok(disposition) => disposition,
                Err(err) => {
                    warn!(pull_request = %number, error = %err, "pull request sync failed");
                    Disposition::Failed {
                        reason: err.to_string(),
                    }
                }
            };
            debug!(pull_request = %number, ?disposition, "pull request processed");
            report.outcomes.push(PullRequestOutcome {
                number,
                html_url,
                disposition,
            });
        }
        Ok(report)
    }

    async fn sync_pull_request(
        &self,
        context: &SyncContext<'_>,
        pull_request: PullRequestSnapshot,
    ) -> SyncResult<Disposition> {
        let candidate = self.collect(context, pull_request).await?;
        if let Some(marker) = candidate.markers.iter().find(|marker| marker.is_terminal()) {
            return Ok(Disposition::AlreadySettled(*marker));
        }

        let [path] = candidate.files.as_slice() else {
            let message = format!(
                "Only pull requests changing exactly one file under `{}` can be tracked; \
                 this one changes {}.",
                context.language.path,
                candidate.files.len()
            );
            self.mark(context, &candidate, Marker::NotApplicable, &message)
                .await?;
            return Ok(Disposition::NotSingleFile {
                files: candidate.files.len(),
            });
        };

        let issue = match self.find_task_issue(context, path).await? {
            TaskMatch::One(issue) => issue,
            TaskMatch::None => {
                warn!(path = path.as_str(), "no task issue found");
                return Ok(Disposition::NoTaskIssue {
                    path: path.clone(),
                });
            }
            TaskMatch::Many(candidates) => {
                warn!(path = path.as_str(), ?candidates, "several task issues found");
                return Ok(Disposition::AmbiguousTaskIssue {
                    path: path.clone(),
                    candidates,
                });
            }
        };

        let Some(assignee) = issue.assignee() else {
            let message = format!("Task issue {} has no assignee.", issue.html_url);
            self.mark(context, &candidate, Marker::NotApplicable, &message)
                .await?;
            return Ok(Disposition::NoAssignee {
                issue: issue.number,
            });
        };
        if assignee != candidate.pull_request.author {
            let message = format!(
                "Task issue {} is assigned to @{assignee}, not @{}.",
                issue.html_url, candidate.pull_request.author
            );
            self.mark(context, &candidate, Marker::NotApplicable, &message)
                .await?;
            return Ok(Disposition::AssignedToOther {
                issue: issue.number,
                assignee: assignee.to_owned(),
            });
        }

        let current = self
            .limiter
            .host()
            .pull_request(&context.code, candidate.pull_request.number)
            .await?;
        if current.merged {
            return self.report_merged(context, &candidate, &issue).await;
        }
        if issue.has_label(self.descriptor.status.label(SyncStatus::Pushed)) {
            return Ok(Disposition::AlreadyPushed {
                issue: issue.number,
            });
        }
        self.report_working(context, &candidate, &issue).await
    }

    async fn collect(
        &self,
        context: &SyncContext<'_>,
        pull_request: PullRequestSnapshot,
    ) -> SyncResult<Candidate> {
        let host = self.limiter.host();
        let changed = host
            .pull_request_files(&context.code, pull_request.number)
            .await?;
        let files = changed
            .iter()
            .filter(|path| self.descriptor.has_valid_extension(path))
            .filter_map(|path| strip_directory(path, context.language.path.trim_matches('/')))
            .map(str::to_owned)
            .collect();
        let comments = host.comments(&context.code, pull_request.number).await?;
        let markers = Marker::scan_all(comments.iter().map(|comment| comment.body.as_str()));
        Ok(Candidate {
            pull_request,
            files,
            markers,
        })
    }

    async fn find_task_issue(
        &self,
        context: &SyncContext<'_>,
        path: &str,
    ) -> SyncResult<TaskMatch> {
        let query = SearchQuery::in_repository(context.task.clone())
            .of_kind(IssueKind::Issue)
            .with_labels(context.search_labels.iter().map(String::as_str))
            .with_title(path);
        let found = self.limiter.host().search_issues(&query).await?;
        let mut matches: Vec<IssueSnapshot> = found
            .into_iter()
            .filter(|issue| issue.title == path && issue.has_all_labels(&context.search_labels))
            .collect();
        Ok(match matches.len() {
            0 => TaskMatch::None,
            1 => matches.pop().map_or(TaskMatch::None, TaskMatch::One),
            _ => TaskMatch::Many(matches.iter().map(|issue| issue.number).collect()),
        })
    }

    async fn report_merged(
        &self,
        context: &SyncContext<'_>,
        candidate: &Candidate,
        issue: &IssueSnapshot,
    ) -> SyncResult<Disposition> {
        if !issue.has_label(self.descriptor.status.label(SyncStatus::Pushed)) {
            self.transition(context, issue, SyncStatus::Pushed).await?;
        }
        self.comment(&context.task, issue.number, MERGED_COMMAND)
            .await?;
        let message = format!("Reported to {}.", issue.html_url);
        self.mark(context, candidate, Marker::Merged, &message)
            .await?;
        info!(issue = %issue.number, "merge reported");
        Ok(Disposition::Merged {
            issue: issue.number,
        })
    }

    async fn report_working(
        &self,
        context: &SyncContext<'_>,
        candidate: &Candidate,
        issue: &IssueSnapshot,
    ) -> SyncResult<Disposition> {
        let relabelled = !issue.has_label(self.descriptor.status.label(SyncStatus::Working));
        if relabelled {
            self.transition(context, issue, SyncStatus::Working).await?;
        }
        let notified = !candidate.markers.contains(&Marker::Pushed);
        if notified {
            let message = format!("Reported to {}.", issue.html_url);
            self.mark(context, candidate, Marker::Pushed, &message)
                .await?;
            self.comment(&context.task, issue.number, PUSHED_COMMAND)
                .await?;
            info!(issue = %issue.number, "open pull request reported");
        }
        Ok(Disposition::Working {
            issue: issue.number,
            relabelled,
            notified,
        })
    }

    /// Removes every status label on the issue, then adds the one for
    /// `status`.
    async fn transition(
        &self,
        context: &SyncContext<'_>,
        issue: &IssueSnapshot,
        status: SyncStatus,
    ) -> SyncResult<()> {
        let host = self.limiter.host();
        for label in self.descriptor.status.all() {
            if issue.has_label(label) {
                self.limiter
                    .paced(host.remove_label(&context.task, issue.number, label))
                    .await?;
            }
        }
        let label = self.descriptor.status.label(status);
        self.limiter
            .paced(host.add_label(&context.task, issue.number, label))
            .await?;
        debug!(issue = %issue.number, %status, "status label set");
        Ok(())
    }

    async fn mark(
        &self,
        context: &SyncContext<'_>,
        candidate: &Candidate,
        marker: Marker,
        message: &str,
    ) -> SyncResult<()> {
        self.comment(
            &context.code,
            candidate.pull_request.number,
            &marker.comment(message),
        )
        .await
    }

    async fn comment(
        &self,
        repo: &RepositoryFullName,
        number: IssueNumber,
        body: &str,
    ) -> SyncResult<()> {
        let host = self.limiter.host();
        self.limiter
            .paced(host.create_comment(repo, number, body))
            .await?;
        Ok(())
    }
}
