//! Unit tests for the translation context.


use crate::github::domain::RepositoryFullName;
use crate::test_support::repo;
use crate::translation::domain::{RepositoriesFile, RepositoryDescriptor};
use chrono::{DateTime, FixedOffset, TimeZone};
use std::sync::Arc;

pub(super) const REPOSITORIES_YAML: &str = r"
repositories:
  website:
    source:
      path: content/en
    branches:
      - name: main
        path: /srv/website
        target_branch: main
        ignore:
          - docs/reference/
        labels: [branch/main]
        url_prefix:
          source: https://github.com/acme/website/blob/main/content/en/
          web: https://acme.io
    languages:
      - name: zh
        path: content/zh/
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
    valid_extensions: [md, .html]
    labels: [translation]
";

pub(super) fn descriptor() -> Arc<RepositoryDescriptor> {
    let file = RepositoriesFile::from_yaml_str(REPOSITORIES_YAML)
        .unwrap_or_else(|err| panic!("test descriptor: {err}"));
    let website = file
        .repository("website")
        .unwrap_or_else(|err| panic!("test descriptor: {err}"));
    Arc::new(website.clone())
}

pub(super) fn code_repo() -> RepositoryFullName {
    repo("acme/website")
}

pub(super) fn task_repo() -> RepositoryFullName {
    repo("acme/website-tasks")
}

pub(super) fn at(seconds: i64) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .and_then(|offset| offset.timestamp_opt(seconds, 0).single())
        .unwrap_or_else(|| panic!("test timestamp {seconds}"))
}
