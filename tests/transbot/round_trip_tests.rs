//! A task issue's whole life: created from located work, accepted through
//! the workflow, and advanced by the synchronizer's comments.

use crate::transbot::helpers::{
    Backend, backend, comment_delivery, descriptor, issue_delivery, number, repo, runtime,
    settings, workflow,
};
use chrono::Utc;
use mockable::DefaultClock;
use rstest::rstest;
use std::io;
use std::sync::Arc;
use tokio::runtime::Runtime;
use transbot::github::adapters::memory::InMemoryIssueHost;
use transbot::github::domain::{IssueSnapshot, IssueState, PullRequestSnapshot};
use transbot::settings::Settings;
use transbot::translation::services::{
    Disposition, PullRequestSynchronizer, TaskIssueService, TranslationWork,
};
use transbot::workflow::domain::parse_webhook;
use transbot::workflow::services::WorkflowEngine;

const TASKS: &str = "acme/website-tasks";
const CODE: &str = "acme/website";

struct Bot {
    backend: Backend,
    engine: WorkflowEngine<InMemoryIssueHost>,
    synchronizer: PullRequestSynchronizer<InMemoryIssueHost>,
}

impl Bot {
    fn new(backend: Backend, settings: &Settings) -> Self {
        let engine = WorkflowEngine::new(
            workflow(settings),
            backend.limiter(settings),
            settings.admins().to_vec(),
        );
        let synchronizer = PullRequestSynchronizer::new(
            backend.limiter(settings),
            descriptor(settings),
            Arc::new(DefaultClock),
            settings.sync_options(),
        );
        Self {
            backend,
            engine,
            synchronizer,
        }
    }

    fn deliver(&self, rt: &Runtime, event_type: &str, body: &str) {
        let (event, subject) = parse_webhook(event_type, body)
            .unwrap_or_else(|err| panic!("delivery should parse: {err}"))
            .unwrap_or_else(|| panic!("delivery should be dispatchable"));
        rt.block_on(self.engine.dispatch(event, &subject))
            .unwrap_or_else(|err| panic!("dispatch failed: {err}"));
    }

    /// Feeds the newest task issue comment back as a webhook delivery.
    fn relay_last_comment(&self, rt: &Runtime) {
        let comments = self.backend.host.comment_bodies(&repo(TASKS), number(1));
        let last = comments
            .last()
            .unwrap_or_else(|| panic!("no comment to relay"));
        self.deliver(rt, "issue_comment", &comment_delivery(TASKS, 1, "transbot", last));
    }

    fn open_pull_request(&self, merged: bool) {
        let pull_request = PullRequestSnapshot {
            number: number(50),
            title: "[zh] docs/setup.md".to_owned(),
            author: "bob".to_owned(),
            base_ref: "main".to_owned(),
            head_ref: "zh-setup".to_owned(),
            merged,
            state: if merged {
                IssueState::Closed
            } else {
                IssueState::Open
            },
            labels: vec!["language/zh".to_owned()],
            html_url: "https://github.com/acme/website/pull/50".to_owned(),
        };
        self.backend.host.insert_pull_request(
            &repo(CODE),
            pull_request,
            ["content/zh/docs/setup.md"],
            Utc::now(),
        );
    }

    fn sync(&self, rt: &Runtime) -> Disposition {
        let report = rt
            .block_on(self.synchronizer.sync("main", "zh"))
            .unwrap_or_else(|err| panic!("sync failed: {err}"));
        report
            .outcome(number(50))
            .map(|outcome| outcome.disposition.clone())
            .unwrap_or_else(|| panic!("pull request 50 not processed"))
    }

    fn task(&self) -> IssueSnapshot {
        self.backend
            .host
            .issue_snapshot(&repo(TASKS), number(1))
            .unwrap_or_else(|| panic!("task issue missing"))
    }
}

#[rstest]
fn task_moves_from_creation_to_merged(
    runtime: io::Result<Runtime>,
    backend: Backend,
    settings: Settings,
) {
    let rt = runtime.unwrap_or_else(|err| panic!("runtime: {err}"));
    let tasks = TaskIssueService::new(
        backend.limiter(&settings),
        descriptor(&settings),
        settings.task_issue_options(),
    );
    rt.block_on(tasks.build_issues(
        "main",
        "zh",
        &TranslationWork::New(vec!["docs/setup.md".to_owned()]),
    ))
    .unwrap_or_else(|err| panic!("build failed: {err}"));
    let bot = Bot::new(backend, &settings);

    bot.deliver(&rt, "issues", &issue_delivery("opened", TASKS, 1, "transbot"));
    assert!(bot.task().has_label("status/pending"));

    bot.deliver(&rt, "issue_comment", &comment_delivery(TASKS, 1, "bob", "/accept"));
    assert_eq!(bot.task().assignee(), Some("bob"));
    assert!(bot.task().has_label("status/working"));

    bot.open_pull_request(false);
    assert_eq!(
        bot.sync(&rt),
        Disposition::Working {
            issue: number(1),
            relabelled: false,
            notified: true,
        }
    );
    bot.relay_last_comment(&rt);
    assert!(bot.task().has_label("status/pushed"));
    assert!(!bot.task().has_label("status/working"));

    bot.open_pull_request(true);
    assert_eq!(bot.sync(&rt), Disposition::Merged { issue: number(1) });
    bot.relay_last_comment(&rt);

    let done = bot.task();
    assert_eq!(done.state, IssueState::Closed);
    assert!(done.has_label("status/merged"));
    assert!(!done.has_label("status/pushed"));
    assert_eq!(
        bot.backend.host.comment_bodies(&repo(TASKS), number(1)),
        vec!["/pushed", "/merged"]
    );
}
