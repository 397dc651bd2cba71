//! When steps for workflow dispatch BDD scenarios.

use super::world::{DispatchWorld, run_async, task_repo};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use serde_json::json;
use transbot::workflow::domain::parse_webhook;

#[when(r#""{sender}" comments "{body}""#)]
fn user_comments(
    world: &mut DispatchWorld,
    sender: String,
    body: String,
) -> Result<(), eyre::Report> {
    let issue = world
        .issue
        .ok_or_else(|| eyre::eyre!("missing task issue in scenario world"))?;
    let delivery = json!({
        "action": "created",
        "issue": {"number": issue.value()},
        "comment": {"body": body},
        "repository": {"full_name": task_repo()?.as_str()},
        "sender": {"login": sender},
    })
    .to_string();
    let (event, subject) = parse_webhook("issue_comment", &delivery)
        .wrap_err("parse comment delivery")?
        .ok_or_else(|| eyre::eyre!("comment delivery was not dispatchable"))?;
    run_async(world.engine.dispatch(event, &subject)).wrap_err("dispatch comment")?;
    Ok(())
}
