//! Webhook ingress: turns a host delivery into a dispatchable subject.

use super::{IngressError, Subject, WorkflowEvent};
use crate::github::domain::{IssueNumber, RepositoryFullName};
use serde::Deserialize;
use serde::de::DeserializeOwned;

#[derive(Debug, Deserialize)]
struct Envelope {
    action: String,
}

#[derive(Debug, Deserialize)]
struct IssuesPayload {
    issue: PayloadIssue,
    repository: PayloadRepository,
    sender: PayloadUser,
}

#[derive(Debug, Deserialize)]
struct IssueCommentPayload {
    issue: PayloadIssue,
    comment: PayloadComment,
    repository: PayloadRepository,
    sender: PayloadUser,
}

#[derive(Debug, Deserialize)]
struct PayloadIssue {
    number: u64,
}

#[derive(Debug, Deserialize)]
struct PayloadRepository {
    full_name: String,
}

#[derive(Debug, Deserialize)]
struct PayloadUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct PayloadComment {
    body: String,
}

/// Converts a webhook delivery into a workflow event and subject.
///
/// `event_type` is the value of the delivery's event header. Opened issues
/// become [`WorkflowEvent::OnIssue`] with the command `opened`; created or
/// edited comments become [`WorkflowEvent::OnComment`] with the comment body
/// as command. Any other event type or action yields `Ok(None)`.
///
/// # Errors
///
/// Returns [`IngressError`] when the payload does not decode or names an
/// invalid repository or issue number.
pub fn parse_webhook(
    event_type: &str,
    body: &str,
) -> Result<Option<(WorkflowEvent, Subject)>, IngressError> {
    match event_type {
        "issues" => {
            let envelope: Envelope = decode(event_type, body)?;
            if envelope.action != "opened" {
                return Ok(None);
            }
            let payload: IssuesPayload = decode(event_type, body)?;
            let subject = subject(
                &payload.repository,
                &payload.issue,
                payload.sender.login,
                Subject::OPENED,
            )?;
            Ok(Some((WorkflowEvent::OnIssue, subject)))
        }
        "issue_comment" => {
            let envelope: Envelope = decode(event_type, body)?;
            if !matches!(envelope.action.as_str(), "created" | "edited") {
                return Ok(None);
            }
            let payload: IssueCommentPayload = decode(event_type, body)?;
            let subject = subject(
                &payload.repository,
                &payload.issue,
                payload.sender.login,
                payload.comment.body,
            )?;
            Ok(Some((WorkflowEvent::OnComment, subject)))
        }
        _ => Ok(None),
    }
}

fn decode<T: DeserializeOwned>(event_type: &str, body: &str) -> Result<T, IngressError> {
    serde_json::from_str(body).map_err(|err| IngressError::Payload {
        event: event_type.to_owned(),
        reason: err.to_string(),
    })
}

fn subject(
    repository: &PayloadRepository,
    issue: &PayloadIssue,
    sender: String,
    command: impl Into<String>,
) -> Result<Subject, IngressError> {
    let repo = RepositoryFullName::new(repository.full_name.as_str())?;
    let number = IssueNumber::new(issue.number)?;
    Ok(Subject::new(repo, number, sender, command))
}
