//! Thread-safe in-memory issue tracker.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use crate::github::{
    domain::{
        CommentSnapshot, IssueKind, IssueNumber, IssueSnapshot, IssueState, PullRequestSnapshot,
        QuotaWindow, RateLimitStatus, RepositoryFullName, SearchQuery,
    },
    ports::{HostError, HostResult, IssueHost},
};

/// One recorded call against the in-memory host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    /// Issue snapshot read.
    Issue(RepositoryFullName, IssueNumber),
    /// Label attached.
    AddLabel(RepositoryFullName, IssueNumber, String),
    /// Label detached.
    RemoveLabel(RepositoryFullName, IssueNumber, String),
    /// Comment posted.
    Comment(RepositoryFullName, IssueNumber, String),
    /// Assignees added.
    AddAssignees(RepositoryFullName, IssueNumber, Vec<String>),
    /// State changed.
    SetState(RepositoryFullName, IssueNumber, IssueState),
    /// Issue created with the given title.
    CreateIssue(RepositoryFullName, String),
    /// Assignability check.
    IsAssignable(RepositoryFullName, String),
    /// Issue search with the rendered query.
    SearchIssues(String),
    /// Pull request search with the rendered query.
    SearchPullRequests(String),
    /// Pull request snapshot read.
    PullRequest(RepositoryFullName, IssueNumber),
    /// Pull request file listing.
    PullRequestFiles(RepositoryFullName, IssueNumber),
    /// Comment listing.
    Comments(RepositoryFullName, IssueNumber),
    /// Quota read.
    RateLimits,
}

impl HostCall {
    /// Returns whether the call mutates host state.
    #[must_use]
    pub const fn is_write(&self) -> bool {
        matches!(
            self,
            Self::AddLabel(..)
                | Self::RemoveLabel(..)
                | Self::Comment(..)
                | Self::AddAssignees(..)
                | Self::SetState(..)
                | Self::CreateIssue(..)
        )
    }
}

/// Thread-safe in-memory issue host.
#[derive(Debug, Clone)]
pub struct InMemoryIssueHost {
    state: Arc<RwLock<InMemoryHostState>>,
}

#[derive(Debug)]
struct InMemoryHostState {
    repositories: HashMap<RepositoryFullName, RepositoryState>,
    rate_limits: RateLimitStatus,
    calls: Vec<HostCall>,
    fail_writes: bool,
    next_comment_id: u64,
}

#[derive(Debug, Default)]
struct RepositoryState {
    issues: BTreeMap<IssueNumber, StoredIssue>,
    pulls: BTreeMap<IssueNumber, StoredPullRequest>,
    comments: HashMap<IssueNumber, Vec<CommentSnapshot>>,
    assignable: HashSet<String>,
}

#[derive(Debug, Clone)]
struct StoredIssue {
    snapshot: IssueSnapshot,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct StoredPullRequest {
    snapshot: PullRequestSnapshot,
    /// Copy served by search, which lags behind the live snapshot.
    indexed: PullRequestSnapshot,
    files: Vec<String>,
    created_at: DateTime<Utc>,
}

impl Default for InMemoryIssueHost {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_error(err: impl ToString) -> HostError {
    HostError::unavailable(std::io::Error::other(err.to_string()))
}

fn not_found(repo: &RepositoryFullName, number: IssueNumber) -> HostError {
    HostError::NotFound(format!("{repo}#{number}"))
}

fn unlimited_window() -> QuotaWindow {
    QuotaWindow {
        remaining: u32::MAX,
        limit: u32::MAX,
        reset: DateTime::<Utc>::UNIX_EPOCH,
    }
}

impl InMemoryIssueHost {
    /// Creates an empty host with unlimited quota.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryHostState {
                repositories: HashMap::new(),
                rate_limits: RateLimitStatus {
                    core: unlimited_window(),
                    search: unlimited_window(),
                },
                calls: Vec::new(),
                fail_writes: false,
                next_comment_id: 1,
            })),
        }
    }

    fn with_state<T>(&self, apply: impl FnOnce(&mut InMemoryHostState) -> T) -> T {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        apply(&mut state)
    }

    /// Seeds an issue created at the Unix epoch.
    pub fn insert_issue(&self, repo: &RepositoryFullName, issue: IssueSnapshot) {
        self.insert_issue_created_at(repo, issue, DateTime::<Utc>::UNIX_EPOCH);
    }

    /// Seeds an issue with an explicit creation time.
    pub fn insert_issue_created_at(
        &self,
        repo: &RepositoryFullName,
        issue: IssueSnapshot,
        created_at: DateTime<Utc>,
    ) {
        self.with_state(|state| {
            let repository = state.repositories.entry(repo.clone()).or_default();
            repository.issues.insert(
                issue.number,
                StoredIssue {
                    snapshot: issue,
                    created_at,
                },
            );
        });
    }

    /// Seeds a pull request with its changed files.
    pub fn insert_pull_request(
        &self,
        repo: &RepositoryFullName,
        pull_request: PullRequestSnapshot,
        files: impl IntoIterator<Item = impl Into<String>>,
        created_at: DateTime<Utc>,
    ) {
        self.with_state(|state| {
            let repository = state.repositories.entry(repo.clone()).or_default();
            repository.pulls.insert(
                pull_request.number,
                StoredPullRequest {
                    indexed: pull_request.clone(),
                    snapshot: pull_request,
                    files: files.into_iter().map(Into::into).collect(),
                    created_at,
                },
            );
        });
    }

    /// Merges a seeded pull request without updating search results.
    pub fn merge_pull_request(&self, repo: &RepositoryFullName, number: IssueNumber) {
        self.with_state(|state| {
            if let Some(stored) = state
                .repositories
                .get_mut(repo)
                .and_then(|repository| repository.pulls.get_mut(&number))
            {
                stored.snapshot.merged = true;
                stored.snapshot.state = IssueState::Closed;
            }
        });
    }

    /// Seeds an existing comment without recording a call.
    pub fn insert_comment(
        &self,
        repo: &RepositoryFullName,
        number: IssueNumber,
        author: &str,
        body: &str,
    ) {
        self.with_state(|state| {
            let comment = state.next_comment(repo, number, author, body);
            let repository = state.repositories.entry(repo.clone()).or_default();
            repository.comments.entry(number).or_default().push(comment);
        });
    }

    /// Declares the logins that may be assigned issues in `repo`.
    pub fn set_assignable(
        &self,
        repo: &RepositoryFullName,
        logins: impl IntoIterator<Item = impl Into<String>>,
    ) {
        self.with_state(|state| {
            let repository = state.repositories.entry(repo.clone()).or_default();
            repository.assignable = logins.into_iter().map(Into::into).collect();
        });
    }

    /// Replaces the reported quota.
    pub fn set_rate_limits(&self, rate_limits: RateLimitStatus) {
        self.with_state(|state| state.rate_limits = rate_limits);
    }

    /// Makes every subsequent write fail with an API error.
    pub fn fail_writes(&self, fail: bool) {
        self.with_state(|state| state.fail_writes = fail);
    }

    /// Returns the current issue snapshot without recording a call.
    #[must_use]
    pub fn issue_snapshot(
        &self,
        repo: &RepositoryFullName,
        number: IssueNumber,
    ) -> Option<IssueSnapshot> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state
            .repositories
            .get(repo)
            .and_then(|repository| repository.issues.get(&number))
            .map(|stored| stored.snapshot.clone())
    }

    /// Returns comment bodies on an issue or pull request without recording
    /// a call.
    #[must_use]
    pub fn comment_bodies(&self, repo: &RepositoryFullName, number: IssueNumber) -> Vec<String> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state
            .repositories
            .get(repo)
            .and_then(|repository| repository.comments.get(&number))
            .map(|comments| comments.iter().map(|comment| comment.body.clone()).collect())
            .unwrap_or_default()
    }

    /// Returns every recorded call in order.
    #[must_use]
    pub fn calls(&self) -> Vec<HostCall> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.calls.clone()
    }

    /// Returns recorded writes in order.
    #[must_use]
    pub fn writes(&self) -> Vec<HostCall> {
        self.calls()
            .into_iter()
            .filter(HostCall::is_write)
            .collect()
    }

    fn read<T>(
        &self,
        call: HostCall,
        apply: impl FnOnce(&InMemoryHostState) -> HostResult<T>,
    ) -> HostResult<T> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.calls.push(call);
        apply(&state)
    }

    fn write<T>(
        &self,
        call: HostCall,
        apply: impl FnOnce(&mut InMemoryHostState) -> HostResult<T>,
    ) -> HostResult<T> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.calls.push(call);
        if state.fail_writes {
            return Err(HostError::Api {
                status: 500,
                message: "write rejected".to_owned(),
            });
        }
        apply(&mut state)
    }
}

impl InMemoryHostState {
    fn repository(&self, repo: &RepositoryFullName) -> HostResult<&RepositoryState> {
        self.repositories
            .get(repo)
            .ok_or_else(|| HostError::NotFound(repo.to_string()))
    }

    fn issue_mut(
        &mut self,
        repo: &RepositoryFullName,
        number: IssueNumber,
    ) -> HostResult<&mut IssueSnapshot> {
        self.repositories
            .get_mut(repo)
            .and_then(|repository| repository.issues.get_mut(&number))
            .map(|stored| &mut stored.snapshot)
            .ok_or_else(|| not_found(repo, number))
    }

    fn next_comment(
        &mut self,
        repo: &RepositoryFullName,
        number: IssueNumber,
        author: &str,
        body: &str,
    ) -> CommentSnapshot {
        let id = self.next_comment_id;
        self.next_comment_id += 1;
        CommentSnapshot {
            id,
            author: author.to_owned(),
            body: body.to_owned(),
            html_url: format!("https://github.com/{repo}/issues/{number}#issuecomment-{id}"),
        }
    }
}

fn matches_common(
    query: &SearchQuery,
    repo: &RepositoryFullName,
    title: &str,
    labels: &[String],
    state: IssueState,
    created_at: DateTime<Utc>,
) -> bool {
    let repo_matches = query.repository.as_ref().is_none_or(|wanted| wanted == repo);
    let state_matches = query.state.is_none_or(|wanted| wanted == state);
    let labels_match = query
        .labels
        .iter()
        .all(|label| labels.iter().any(|attached| attached == label));
    let title_matches = query.title.as_ref().is_none_or(|wanted| {
        title
            .to_ascii_lowercase()
            .contains(&wanted.to_ascii_lowercase())
    });
    let created_matches = query.created_since.is_none_or(|since| created_at >= since);
    repo_matches && state_matches && labels_match && title_matches && created_matches
}

#[async_trait]
impl IssueHost for InMemoryIssueHost {
    async fn issue(
        &self,
        repo: &RepositoryFullName,
        number: IssueNumber,
    ) -> HostResult<IssueSnapshot> {
        self.read(HostCall::Issue(repo.clone(), number), |state| {
            state
                .repository(repo)?
                .issues
                .get(&number)
                .map(|stored| stored.snapshot.clone())
                .ok_or_else(|| not_found(repo, number))
        })
    }

    async fn add_label(
        &self,
        repo: &RepositoryFullName,
        number: IssueNumber,
        label: &str,
    ) -> HostResult<()> {
        let call = HostCall::AddLabel(repo.clone(), number, label.to_owned());
        self.write(call, |state| {
            let issue = state.issue_mut(repo, number)?;
            if !issue.has_label(label) {
                issue.labels.push(label.to_owned());
            }
            Ok(())
        })
    }

    async fn remove_label(
        &self,
        repo: &RepositoryFullName,
        number: IssueNumber,
        label: &str,
    ) -> HostResult<()> {
        let call = HostCall::RemoveLabel(repo.clone(), number, label.to_owned());
        self.write(call, |state| {
            let issue = state.issue_mut(repo, number)?;
            if !issue.has_label(label) {
                return Err(HostError::NotFound(format!("label '{label}' on {repo}#{number}")));
            }
            issue.labels.retain(|attached| attached != label);
            Ok(())
        })
    }

    async fn create_comment(
        &self,
        repo: &RepositoryFullName,
        number: IssueNumber,
        body: &str,
    ) -> HostResult<CommentSnapshot> {
        let call = HostCall::Comment(repo.clone(), number, body.to_owned());
        self.write(call, |state| {
            let repository = state.repository(repo)?;
            let exists =
                repository.issues.contains_key(&number) || repository.pulls.contains_key(&number);
            if !exists {
                return Err(not_found(repo, number));
            }
            let comment = state.next_comment(repo, number, "transbot", body);
            let repository = state.repositories.entry(repo.clone()).or_default();
            repository
                .comments
                .entry(number)
                .or_default()
                .push(comment.clone());
            Ok(comment)
        })
    }

    async fn add_assignees(
        &self,
        repo: &RepositoryFullName,
        number: IssueNumber,
        logins: &[String],
    ) -> HostResult<()> {
        let call = HostCall::AddAssignees(repo.clone(), number, logins.to_vec());
        self.write(call, |state| {
            let issue = state.issue_mut(repo, number)?;
            for login in logins {
                if !issue.assignees.contains(login) {
                    issue.assignees.push(login.clone());
                }
            }
            Ok(())
        })
    }

    async fn set_state(
        &self,
        repo: &RepositoryFullName,
        number: IssueNumber,
        issue_state: IssueState,
    ) -> HostResult<()> {
        let call = HostCall::SetState(repo.clone(), number, issue_state);
        self.write(call, |state| {
            state.issue_mut(repo, number)?.state = issue_state;
            Ok(())
        })
    }

    async fn create_issue(
        &self,
        repo: &RepositoryFullName,
        title: &str,
        body: &str,
    ) -> HostResult<IssueSnapshot> {
        let call = HostCall::CreateIssue(repo.clone(), title.to_owned());
        self.write(call, |state| {
            let repository = state.repositories.entry(repo.clone()).or_default();
            let highest = repository
                .issues
                .keys()
                .chain(repository.pulls.keys())
                .map(|number| number.value())
                .max()
                .unwrap_or(0);
            let number = IssueNumber::new(highest + 1)
                .map_err(|err| HostError::unavailable(std::io::Error::other(err.to_string())))?;
            let snapshot = IssueSnapshot::new(
                number,
                title,
                format!("https://github.com/{repo}/issues/{number}"),
            )
            .with_body(body);
            repository.issues.insert(
                number,
                StoredIssue {
                    snapshot: snapshot.clone(),
                    created_at: DateTime::<Utc>::UNIX_EPOCH,
                },
            );
            Ok(snapshot)
        })
    }

    async fn is_assignable(&self, repo: &RepositoryFullName, login: &str) -> HostResult<bool> {
        self.read(HostCall::IsAssignable(repo.clone(), login.to_owned()), |state| {
            Ok(state.repository(repo)?.assignable.contains(login))
        })
    }

    async fn search_issues(&self, query: &SearchQuery) -> HostResult<Vec<IssueSnapshot>> {
        self.read(HostCall::SearchIssues(query.to_query_string()), |state| {
            if query.kind == Some(IssueKind::PullRequest) {
                return Ok(Vec::new());
            }
            let mut found = Vec::new();
            for (repo, repository) in &state.repositories {
                for stored in repository.issues.values() {
                    let issue = &stored.snapshot;
                    let assignee_matches = query
                        .assignee
                        .as_ref()
                        .is_none_or(|wanted| issue.assignees.contains(wanted));
                    if assignee_matches
                        && matches_common(
                            query,
                            repo,
                            &issue.title,
                            &issue.labels,
                            issue.state,
                            stored.created_at,
                        )
                    {
                        found.push(issue.clone());
                    }
                }
            }
            Ok(found)
        })
    }

    async fn search_pull_requests(
        &self,
        query: &SearchQuery,
    ) -> HostResult<Vec<PullRequestSnapshot>> {
        self.read(HostCall::SearchPullRequests(query.to_query_string()), |state| {
            if query.kind == Some(IssueKind::Issue) {
                return Ok(Vec::new());
            }
            let mut found = Vec::new();
            for (repo, repository) in &state.repositories {
                for stored in repository.pulls.values() {
                    let pull = &stored.indexed;
                    let assignee_matches = query.assignee.is_none();
                    if assignee_matches
                        && matches_common(
                            query,
                            repo,
                            &pull.title,
                            &pull.labels,
                            pull.state,
                            stored.created_at,
                        )
                    {
                        found.push(pull.clone());
                    }
                }
            }
            Ok(found)
        })
    }

    async fn pull_request(
        &self,
        repo: &RepositoryFullName,
        number: IssueNumber,
    ) -> HostResult<PullRequestSnapshot> {
        self.read(HostCall::PullRequest(repo.clone(), number), |state| {
            state
                .repository(repo)?
                .pulls
                .get(&number)
                .map(|stored| stored.snapshot.clone())
                .ok_or_else(|| not_found(repo, number))
        })
    }

    async fn pull_request_files(
        &self,
        repo: &RepositoryFullName,
        number: IssueNumber,
    ) -> HostResult<Vec<String>> {
        self.read(HostCall::PullRequestFiles(repo.clone(), number), |state| {
            state
                .repository(repo)?
                .pulls
                .get(&number)
                .map(|stored| stored.files.clone())
                .ok_or_else(|| not_found(repo, number))
        })
    }

    async fn comments(
        &self,
        repo: &RepositoryFullName,
        number: IssueNumber,
    ) -> HostResult<Vec<CommentSnapshot>> {
        self.read(HostCall::Comments(repo.clone(), number), |state| {
            Ok(state
                .repository(repo)?
                .comments
                .get(&number)
                .cloned()
                .unwrap_or_default())
        })
    }

    async fn rate_limits(&self) -> HostResult<RateLimitStatus> {
        self.read(HostCall::RateLimits, |state| Ok(state.rate_limits))
    }
}
