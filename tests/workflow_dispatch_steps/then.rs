//! Then steps for workflow dispatch BDD scenarios.

use super::world::{DispatchWorld, task_repo};
use rstest_bdd_macros::then;
use transbot::github::domain::IssueState;

#[then(r#"the task issue is assigned to "{login}""#)]
fn task_assigned_to(world: &DispatchWorld, login: String) -> Result<(), eyre::Report> {
    let task = world.task()?;
    if task.assignees != [login.as_str()] {
        return Err(eyre::eyre!("expected assignee {login}, found {:?}", task.assignees));
    }
    Ok(())
}

#[then("the task issue has no assignee")]
fn task_unassigned(world: &DispatchWorld) -> Result<(), eyre::Report> {
    let task = world.task()?;
    if !task.assignees.is_empty() {
        return Err(eyre::eyre!("expected no assignee, found {:?}", task.assignees));
    }
    Ok(())
}

#[then(r#"the task issue is labelled "{label}""#)]
fn task_labelled(world: &DispatchWorld, label: String) -> Result<(), eyre::Report> {
    let task = world.task()?;
    if !task.has_label(&label) {
        return Err(eyre::eyre!("expected label {label}, found {:?}", task.labels));
    }
    Ok(())
}

#[then(r#"the task issue received the comment "{body}""#)]
fn task_received_comment(world: &DispatchWorld, body: String) -> Result<(), eyre::Report> {
    let task = world.task()?;
    let comments = world.host.comment_bodies(&task_repo()?, task.number);
    if !comments.contains(&body) {
        return Err(eyre::eyre!("expected comment {body:?}, found {comments:?}"));
    }
    Ok(())
}

fn expect_state(world: &DispatchWorld, expected: IssueState) -> Result<(), eyre::Report> {
    let task = world.task()?;
    if task.state != expected {
        return Err(eyre::eyre!("expected {expected}, found {}", task.state));
    }
    Ok(())
}

#[then("the task issue is open")]
fn task_open(world: &DispatchWorld) -> Result<(), eyre::Report> {
    expect_state(world, IssueState::Open)
}

#[then("the task issue is closed")]
fn task_closed(world: &DispatchWorld) -> Result<(), eyre::Report> {
    expect_state(world, IssueState::Closed)
}
