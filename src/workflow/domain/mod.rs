//! Domain model for workflow rules and inbound events.

mod config;
mod error;
mod ingress;
mod subject;
mod workflow;

pub use config::{
    Action, CommandConfig, Condition, ConditionRule, Flag, LabelChange, LabelGroup, NewIssue,
    SearchLimit, WorkflowConfig, WorkflowFile,
};
pub use error::{IngressError, WorkflowConfigError};
pub use ingress::parse_webhook;
pub use subject::{Subject, WorkflowEvent};
pub use workflow::{CommandRule, Workflow};
