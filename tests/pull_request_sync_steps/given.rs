//! Given steps for pull request synchronization BDD scenarios.

use super::world::{SyncWorld, code_repo, number, task_repo};
use chrono::Utc;
use rstest_bdd_macros::given;
use transbot::github::domain::{IssueSnapshot, IssueState, PullRequestSnapshot};

#[given(
    r#"a task issue #{issue_number:u64} titled "{title}" with status "{status}" assigned to "{assignee}""#
)]
fn task_issue(
    world: &mut SyncWorld,
    issue_number: u64,
    title: String,
    status: String,
    assignee: String,
) -> Result<(), eyre::Report> {
    let issue = IssueSnapshot::new(
        number(issue_number)?,
        title,
        format!("https://github.com/acme/website-tasks/issues/{issue_number}"),
    )
    .with_labels(["branch/main".to_owned(), "lang/zh".to_owned(), format!("status/{status}")])
    .with_assignees([assignee]);
    world.host.insert_issue(&task_repo()?, issue);
    Ok(())
}

fn insert_pull_request(
    world: &SyncWorld,
    pr_number: u64,
    author: String,
    files: &str,
    merged: bool,
) -> Result<(), eyre::Report> {
    let pull_request = PullRequestSnapshot {
        number: number(pr_number)?,
        title: format!("[zh] translation #{pr_number}"),
        author,
        base_ref: "main".to_owned(),
        head_ref: format!("zh-{pr_number}"),
        merged,
        state: if merged {
            IssueState::Closed
        } else {
            IssueState::Open
        },
        labels: vec!["language/zh".to_owned()],
        html_url: format!("https://github.com/acme/website/pull/{pr_number}"),
    };
    world
        .host
        .insert_pull_request(&code_repo()?, pull_request, files.split(','), Utc::now());
    Ok(())
}

#[given(r#"an open pull request #{pr_number:u64} by "{author}" changing "{files}""#)]
fn open_pull_request(
    world: &mut SyncWorld,
    pr_number: u64,
    author: String,
    files: String,
) -> Result<(), eyre::Report> {
    insert_pull_request(world, pr_number, author, &files, false)
}

#[given(r#"a merged pull request #{pr_number:u64} by "{author}" changing "{files}""#)]
fn merged_pull_request(
    world: &mut SyncWorld,
    pr_number: u64,
    author: String,
    files: String,
) -> Result<(), eyre::Report> {
    insert_pull_request(world, pr_number, author, &files, true)
}
