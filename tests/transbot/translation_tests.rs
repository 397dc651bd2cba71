//! Locating translation work and turning it into task issues.

use crate::transbot::helpers::{Backend, backend, descriptor, number, repo, runtime, settings};
use chrono::{DateTime, FixedOffset, TimeZone};
use rstest::rstest;
use std::io;
use tokio::runtime::Runtime;
use transbot::github::adapters::memory::InMemoryIssueHost;
use transbot::settings::Settings;
use transbot::translation::adapters::memory::InMemoryGitRepository;
use transbot::translation::services::{
    BuildSummary, FileDiffLocator, TaskIssueService, TranslationWork,
};

const TASKS: &str = "acme/website-tasks";

fn at(seconds: i64) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(8 * 3600)
        .and_then(|offset| offset.timestamp_opt(seconds, 0).single())
        .unwrap_or_else(|| panic!("timestamp {seconds}"))
}

fn checkout() -> InMemoryGitRepository {
    let git = InMemoryGitRepository::new();
    git.commit("content/en/docs/intro.md", "Welcome\n", at(100));
    git.commit("content/zh/docs/intro.md", "Huanying\n", at(200));
    git.commit("content/en/docs/intro.md", "Welcome aboard\n", at(300));
    git.commit("content/en/docs/setup.md", "Install\n", at(100));
    git.commit("content/en/docs/logo.svg", "<svg/>", at(100));
    git
}

fn service(backend: &Backend, settings: &Settings) -> TaskIssueService<InMemoryIssueHost> {
    TaskIssueService::new(
        backend.limiter(settings),
        descriptor(settings),
        settings.task_issue_options(),
    )
}

#[rstest]
fn located_work_becomes_labelled_task_issues(
    runtime: io::Result<Runtime>,
    backend: Backend,
    settings: Settings,
) {
    let rt = runtime.unwrap_or_else(|err| panic!("runtime: {err}"));
    let website = descriptor(&settings);
    let git = checkout();
    let locator = FileDiffLocator::new(&git, &website);
    let language = settings.target_language().unwrap_or("zh");

    let new = locator
        .find_new("main", language)
        .unwrap_or_else(|err| panic!("find new: {err}"));
    let updated = locator
        .find_updated("main", language)
        .unwrap_or_else(|err| panic!("find updated: {err}"));
    assert_eq!(new, vec!["docs/setup.md"]);
    assert_eq!(updated.keys().collect::<Vec<_>>(), vec!["docs/intro.md"]);

    let tasks = service(&backend, &settings);
    let created_new = rt
        .block_on(tasks.build_issues("main", language, &TranslationWork::New(new)))
        .unwrap_or_else(|err| panic!("build new: {err}"));
    let created_updated = rt
        .block_on(tasks.build_issues("main", language, &TranslationWork::Updated(updated)))
        .unwrap_or_else(|err| panic!("build updated: {err}"));

    assert_eq!(created_new, BuildSummary { created: 1, skipped: 0 });
    assert_eq!(created_updated, BuildSummary { created: 1, skipped: 0 });
    let setup = backend
        .host
        .issue_snapshot(&repo(TASKS), number(1))
        .unwrap_or_else(|| panic!("issue 1 missing"));
    assert_eq!(setup.title, "docs/setup.md");
    assert_eq!(setup.labels, vec!["branch/main", "lang/zh", "sync/new"]);
    let intro = backend
        .host
        .issue_snapshot(&repo(TASKS), number(2))
        .unwrap_or_else(|| panic!("issue 2 missing"));
    assert!(intro.has_label("sync/update"));
    let body = intro.body.unwrap_or_default();
    assert!(body.starts_with(
        "Source File: [docs/intro.md](https://github.com/acme/website/blob/main/content/en/docs/intro.md)"
    ));
    assert!(body.contains("-Welcome aboard"));
}

#[rstest]
fn rebuilding_skips_existing_task_issues(
    runtime: io::Result<Runtime>,
    backend: Backend,
    settings: Settings,
) {
    let rt = runtime.unwrap_or_else(|err| panic!("runtime: {err}"));
    let work = TranslationWork::New(vec!["docs/setup.md".to_owned(), "docs/faq.md".to_owned()]);
    let tasks = service(&backend, &settings);

    let first = rt
        .block_on(tasks.build_issues("main", "zh", &work))
        .unwrap_or_else(|err| panic!("first build: {err}"));
    let second = rt
        .block_on(tasks.build_issues("main", "zh", &work))
        .unwrap_or_else(|err| panic!("second build: {err}"));
    let duplicates = rt
        .block_on(tasks.find_duplicates())
        .unwrap_or_else(|err| panic!("duplicates: {err}"));

    assert_eq!(first, BuildSummary { created: 2, skipped: 0 });
    assert_eq!(second, BuildSummary { created: 0, skipped: 2 });
    assert!(duplicates.is_empty());
}
