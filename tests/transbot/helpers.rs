//! Shared fixtures for the in-memory integration tests.

use mockable::DefaultClock;
use rstest::fixture;
use serde_json::json;
use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use tokio::runtime::Runtime;
use transbot::github::adapters::memory::{InMemoryIssueHost, RecordingSleeper};
use transbot::github::domain::{IssueNumber, RepositoryFullName};
use transbot::github::services::RateLimiter;
use transbot::settings::Settings;
use transbot::translation::domain::{RepositoriesFile, RepositoryDescriptor};
use transbot::workflow::domain::Workflow;

/// Workflow driving task issues through their status labels.
pub const WORKFLOW_YAML: &str = r#"
workflow:
  - name: translation
    labels:
      - group: status
        labels: [status/pending, status/working, status/pushed, status/merged]
    events:
      on_issue:
        - regex: opened
          actions:
            - type: label
              value: {group: status, label: status/pending, mutex: true}
      on_comment:
        - regex: "/accept"
          conditions:
            - type: labels
              value: [status/pending]
              failed_actions:
                - type: comment
                  value: "@%operator% this task is not pending"
            - type: assigned
              value: false
          actions:
            - type: assign
              value: "%operator%"
            - type: label
              value: {group: status, label: status/working, mutex: true}
        - regex: "/pushed"
          conditions:
            - type: user_in_list
              value: [transbot, "%admin%"]
          actions:
            - type: label
              value: {group: status, label: status/pushed, mutex: true}
        - regex: "/merged"
          conditions:
            - type: user_in_list
              value: [transbot, "%admin%"]
          actions:
            - type: label
              value: {group: status, label: status/merged, mutex: true}
            - type: set_state
              value: closed
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

/// Descriptor for a documentation site translated into Chinese.
pub const REPOSITORIES_YAML: &str = r"
repositories:
  website:
    source:
      path: content/en
    branches:
      - name: main
        path: /srv/website
        target_branch: main
        labels: [branch/main]
        url_prefix:
          source: https://github.com/acme/website/blob/main/content/en
          web: https://acme.io
    languages:
      - name: zh
        path: content/zh
        labels: [lang/zh]
        target_labels: [language/zh]
    github:
      code: {owner: acme, repository: website}
      task: {owner: acme, repository: website-tasks}
    status:
      pending: status/pending
      working: status/working
      pushed: status/pushed
      merged: status/merged
    valid_extensions: [md]
";

/// Provides a tokio runtime for async operations in tests.
///
/// # Errors
///
/// Returns an error if the runtime cannot be created.
#[fixture]
pub fn runtime() -> io::Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/// Settings as read from a deployment environment.
#[fixture]
pub fn settings() -> Settings {
    let env: HashMap<String, String> = [
        ("WORKFLOW", "translation"),
        ("ADMINS", "alice,carol"),
        ("INTERVAL", "0.25"),
        ("REPOSITORY", "website"),
        ("TARGET_LANG", "zh"),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_owned(), value.to_owned()))
    .collect();
    Settings::from_env(&env).unwrap_or_else(|err| panic!("test settings: {err}"))
}

/// Host and sleeper shared by the services under test.
pub struct Backend {
    pub host: InMemoryIssueHost,
    pub sleeper: RecordingSleeper,
}

impl Backend {
    /// Builds a limiter over the shared host using the settings' policy.
    #[must_use]
    pub fn limiter(&self, settings: &Settings) -> RateLimiter<InMemoryIssueHost> {
        RateLimiter::new(
            Arc::new(self.host.clone()),
            Arc::new(self.sleeper.clone()),
            Arc::new(DefaultClock),
            settings.rate_limit_policy(),
        )
    }
}

/// Provides an empty in-memory host.
#[fixture]
pub fn backend() -> Backend {
    Backend {
        host: InMemoryIssueHost::new(),
        sleeper: RecordingSleeper::new(),
    }
}

/// Loads the workflow named in the settings.
#[must_use]
pub fn workflow(settings: &Settings) -> Workflow {
    Workflow::load(WORKFLOW_YAML, settings.workflow())
        .unwrap_or_else(|err| panic!("test workflow: {err}"))
}

/// Loads the repository descriptor named in the settings.
#[must_use]
pub fn descriptor(settings: &Settings) -> Arc<RepositoryDescriptor> {
    let file = RepositoriesFile::from_yaml_str(REPOSITORIES_YAML)
        .unwrap_or_else(|err| panic!("test descriptor: {err}"));
    let name = settings.repository().unwrap_or("website");
    let found = file
        .repository(name)
        .unwrap_or_else(|err| panic!("test descriptor: {err}"));
    Arc::new(found.clone())
}

/// Parses a repository name.
#[must_use]
pub fn repo(name: &str) -> RepositoryFullName {
    RepositoryFullName::new(name).unwrap_or_else(|err| panic!("test repository: {err}"))
}

/// Builds an issue number.
#[must_use]
pub fn number(value: u64) -> IssueNumber {
    IssueNumber::new(value).unwrap_or_else(|err| panic!("test issue number: {err}"))
}

/// Renders an `issue_comment` webhook body.
#[must_use]
pub fn comment_delivery(repository: &str, issue: u64, sender: &str, body: &str) -> String {
    json!({
        "action": "created",
        "issue": {"number": issue},
        "comment": {"body": body},
        "repository": {"full_name": repository},
        "sender": {"login": sender},
    })
    .to_string()
}

/// Renders an `issues` webhook body.
#[must_use]
pub fn issue_delivery(action: &str, repository: &str, issue: u64, sender: &str) -> String {
    json!({
        "action": action,
        "issue": {"number": issue},
        "repository": {"full_name": repository},
        "sender": {"login": sender},
    })
    .to_string()
}
