//! Error types for workflow configuration and event ingress.

use crate::github::domain::GithubDomainError;
use thiserror::Error;

/// Errors raised while loading or validating workflow configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkflowConfigError {
    /// The configuration document could not be parsed.
    #[error("invalid workflow configuration: {0}")]
    Parse(String),

    /// No workflow carries the requested name.
    #[error("workflow '{0}' is not configured")]
    UnknownWorkflow(String),

    /// A command trigger is not a valid regular expression.
    #[error("invalid trigger pattern '{pattern}': {reason}")]
    InvalidTrigger {
        /// Configured pattern text.
        pattern: String,
        /// Compiler diagnostic.
        reason: String,
    },

    /// Two label groups share a name.
    #[error("label group '{0}' is defined more than once")]
    DuplicateLabelGroup(String),

    /// A label action names a group that is not defined.
    #[error("label group '{0}' is not defined")]
    UnknownLabelGroup(String),

    /// A label action applies a label outside its group.
    #[error("label '{label}' is not a member of group '{group}'")]
    LabelNotInGroup {
        /// Group name.
        group: String,
        /// Label name.
        label: String,
    },
}

/// Errors raised while turning a webhook delivery into a subject.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IngressError {
    /// The payload is not valid JSON for the event type.
    #[error("malformed {event} payload: {reason}")]
    Payload {
        /// Webhook event type.
        event: String,
        /// Decoder diagnostic.
        reason: String,
    },

    /// The payload names an invalid repository or issue.
    #[error(transparent)]
    Domain(#[from] GithubDomainError),
}
