//! Shared world state for workflow dispatch BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use transbot::github::adapters::memory::{InMemoryIssueHost, RecordingSleeper};
use transbot::github::domain::{IssueNumber, IssueSnapshot, RepositoryFullName};
use transbot::github::services::{RateLimitPolicy, RateLimiter};
use transbot::workflow::domain::Workflow;
use transbot::workflow::services::WorkflowEngine;

const WORKFLOW_YAML: &str = r#"
workflow:
  - name: translation
    labels:
      - group: status
        labels: [status/pending, status/working, status/pushed, status/merged]
    events:
      on_comment:
        - regex: "/accept"
          conditions:
            - type: labels
              value: [status/pending]
              failed_actions:
                - type: comment
                  value: "@%operator% this task is not pending"
          actions:
            - type: assign
              value: "%operator%"
            - type: label
              value: {group: status, label: status/working, mutex: true}
        - regex: "/approve"
          conditions:
            - type: user_in_list
              value: ["%admin%"]
              failed_actions:
                - type: comment
                  value: "Only %admin_list% can approve"
          actions:
            - type: set_state
              value: closed
"#;

/// Engine type used by the BDD world.
pub type TestEngine = WorkflowEngine<InMemoryIssueHost>;

/// Scenario world for workflow dispatch behaviour tests.
pub struct DispatchWorld {
    pub host: InMemoryIssueHost,
    pub engine: TestEngine,
    pub issue: Option<IssueNumber>,
}

impl DispatchWorld {
    /// Creates a world over an empty host with `alice` and `carol` as admins.
    #[must_use]
    pub fn new() -> Self {
        let host = InMemoryIssueHost::new();
        let workflow = Workflow::load(WORKFLOW_YAML, "translation")
            .unwrap_or_else(|err| panic!("scenario workflow: {err}"));
        let limiter = RateLimiter::new(
            Arc::new(host.clone()),
            Arc::new(RecordingSleeper::new()),
            Arc::new(DefaultClock),
            RateLimitPolicy::default(),
        );
        let engine = WorkflowEngine::new(
            workflow,
            limiter,
            vec!["alice".to_owned(), "carol".to_owned()],
        );

        Self {
            host,
            engine,
            issue: None,
        }
    }

    /// Returns the current snapshot of the scenario's task issue.
    ///
    /// # Errors
    ///
    /// Returns an error when no task issue was seeded.
    pub fn task(&self) -> Result<IssueSnapshot, eyre::Report> {
        let issue = self
            .issue
            .ok_or_else(|| eyre::eyre!("missing task issue in scenario world"))?;
        self.host
            .issue_snapshot(&task_repo()?, issue)
            .ok_or_else(|| eyre::eyre!("task issue #{issue} not stored"))
    }
}

impl Default for DispatchWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> DispatchWorld {
    DispatchWorld::default()
}

/// Repository holding task issues.
pub fn task_repo() -> Result<RepositoryFullName, eyre::Report> {
    Ok(RepositoryFullName::new("acme/website-tasks")?)
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
