//! Webhook deliveries dispatched through the translation workflow.

use crate::transbot::helpers::{
    Backend, backend, comment_delivery, issue_delivery, number, repo, runtime, settings, workflow,
};
use rstest::rstest;
use std::io;
use std::time::Duration;
use tokio::runtime::Runtime;
use transbot::github::adapters::memory::InMemoryIssueHost;
use transbot::github::domain::{IssueSnapshot, IssueState};
use transbot::settings::Settings;
use transbot::workflow::domain::parse_webhook;
use transbot::workflow::services::{DispatchOutcome, WorkflowEngine};

const TASKS: &str = "acme/website-tasks";

fn engine(backend: &Backend, settings: &Settings) -> WorkflowEngine<InMemoryIssueHost> {
    WorkflowEngine::new(
        workflow(settings),
        backend.limiter(settings),
        settings.admins().to_vec(),
    )
}

fn seed_issue(backend: &Backend, labels: &[&str]) {
    backend.host.insert_issue(
        &repo(TASKS),
        IssueSnapshot::new(number(3), "docs/intro.md", "https://github.com/acme/website-tasks/issues/3")
            .with_labels(labels.iter().copied()),
    );
}

fn task(backend: &Backend) -> IssueSnapshot {
    backend
        .host
        .issue_snapshot(&repo(TASKS), number(3))
        .unwrap_or_else(|| panic!("task issue 3 missing"))
}

fn deliver(
    rt: &Runtime,
    engine: &WorkflowEngine<InMemoryIssueHost>,
    event_type: &str,
    body: &str,
) -> DispatchOutcome {
    let (event, subject) = parse_webhook(event_type, body)
        .unwrap_or_else(|err| panic!("delivery should parse: {err}"))
        .unwrap_or_else(|| panic!("delivery should be dispatchable"));
    rt.block_on(engine.dispatch(event, &subject))
        .unwrap_or_else(|err| panic!("dispatch failed: {err}"))
}

#[rstest]
fn opened_issue_is_marked_pending(
    runtime: io::Result<Runtime>,
    backend: Backend,
    settings: Settings,
) {
    let rt = runtime.unwrap_or_else(|err| panic!("runtime: {err}"));
    seed_issue(&backend, &["lang/zh"]);
    let engine = engine(&backend, &settings);

    let outcome = deliver(&rt, &engine, "issues", &issue_delivery("opened", TASKS, 3, "dana"));

    assert!(matches!(outcome, DispatchOutcome::Passed { .. }));
    let issue = task(&backend);
    assert_eq!(issue.labels, vec!["lang/zh", "status/pending"]);
}

#[rstest]
fn accept_then_accept_again_is_refused(
    runtime: io::Result<Runtime>,
    backend: Backend,
    settings: Settings,
) {
    let rt = runtime.unwrap_or_else(|err| panic!("runtime: {err}"));
    seed_issue(&backend, &["status/pending"]);
    let engine = engine(&backend, &settings);

    let first = deliver(&rt, &engine, "issue_comment", &comment_delivery(TASKS, 3, "bob", "/accept"));
    let second = deliver(&rt, &engine, "issue_comment", &comment_delivery(TASKS, 3, "dana", "/accept"));

    assert!(matches!(first, DispatchOutcome::Passed { .. }));
    assert_eq!(
        second,
        DispatchOutcome::ConditionFailed {
            index: 0,
            created: vec![]
        }
    );
    let issue = task(&backend);
    assert_eq!(issue.assignees, vec!["bob"]);
    assert_eq!(issue.labels, vec!["status/working"]);
    assert_eq!(
        backend.host.comment_bodies(&repo(TASKS), number(3)),
        vec!["@dana this task is not pending"]
    );
}

#[rstest]
fn approval_requires_an_admin(runtime: io::Result<Runtime>, backend: Backend, settings: Settings) {
    let rt = runtime.unwrap_or_else(|err| panic!("runtime: {err}"));
    seed_issue(&backend, &["status/pushed"]);
    let engine = engine(&backend, &settings);

    deliver(&rt, &engine, "issue_comment", &comment_delivery(TASKS, 3, "bob", "/approve"));
    let refused = task(&backend);
    deliver(&rt, &engine, "issue_comment", &comment_delivery(TASKS, 3, "carol", "/approve"));
    let approved = task(&backend);

    assert_eq!(refused.state, IssueState::Open);
    assert_eq!(approved.state, IssueState::Closed);
    assert_eq!(
        backend.host.comment_bodies(&repo(TASKS), number(3)),
        vec!["Only @alice,@carol can approve"]
    );
}

#[rstest]
fn writes_are_spaced_by_configured_interval(
    runtime: io::Result<Runtime>,
    backend: Backend,
    settings: Settings,
) {
    let rt = runtime.unwrap_or_else(|err| panic!("runtime: {err}"));
    seed_issue(&backend, &["status/pending"]);
    let engine = engine(&backend, &settings);

    deliver(&rt, &engine, "issue_comment", &comment_delivery(TASKS, 3, "bob", "/accept"));

    let waits = backend.sleeper.waits();
    assert_eq!(waits.len(), backend.host.writes().len());
    assert!(waits.iter().all(|wait| *wait == Duration::from_millis(250)));
}

#[rstest]
#[case::closed_issue("issues", r#"{"action": "closed"}"#)]
#[case::deleted_comment("issue_comment", r#"{"action": "deleted"}"#)]
#[case::push("push", "{}")]
fn irrelevant_deliveries_are_ignored(#[case] event_type: &str, #[case] body: &str) {
    let parsed = parse_webhook(event_type, body)
        .unwrap_or_else(|err| panic!("envelope should decode: {err}"));
    assert!(parsed.is_none());
}

#[rstest]
fn unmatched_comment_touches_nothing(
    runtime: io::Result<Runtime>,
    backend: Backend,
    settings: Settings,
) {
    let rt = runtime.unwrap_or_else(|err| panic!("runtime: {err}"));
    seed_issue(&backend, &["status/pending"]);
    let engine = engine(&backend, &settings);

    let outcome = deliver(
        &rt,
        &engine,
        "issue_comment",
        &comment_delivery(TASKS, 3, "bob", "thanks, /accept later"),
    );

    assert_eq!(outcome, DispatchOutcome::NoMatch);
    assert!(backend.host.calls().is_empty());
    assert_eq!(engine.workflow().name(), "translation");
}
