//! Serde model of the workflow configuration document.
//!
//! Conditions and actions are closed tagged unions keyed by `type` with a
//! `value` payload, so an unknown kind is rejected when the document is
//! parsed rather than silently ignored at dispatch time.

use super::{WorkflowConfigError, WorkflowEvent};
use crate::github::domain::IssueState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level configuration document holding every named workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowFile {
    /// Configured workflows.
    pub workflow: Vec<WorkflowConfig>,
}

impl WorkflowFile {
    /// Parses a YAML configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowConfigError::Parse`] when the document is not valid
    /// YAML or does not match the configuration schema.
    pub fn from_yaml_str(source: &str) -> Result<Self, WorkflowConfigError> {
        serde_yaml::from_str(source).map_err(|err| WorkflowConfigError::Parse(err.to_string()))
    }

    /// Returns the workflow with the given name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&WorkflowConfig> {
        self.workflow.iter().find(|workflow| workflow.name == name)
    }

    /// Lists workflow names in document order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.workflow.iter().map(|workflow| workflow.name.as_str()).collect()
    }
}

/// One named workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Workflow name.
    pub name: String,
    /// Ordered command rules per event.
    #[serde(default)]
    pub events: BTreeMap<WorkflowEvent, Vec<CommandConfig>>,
    /// Label groups available to label actions.
    #[serde(default)]
    pub labels: Vec<LabelGroup>,
}

/// A named set of labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelGroup {
    /// Group name.
    pub group: String,
    /// Member labels.
    pub labels: Vec<String>,
}

impl LabelGroup {
    /// Returns `true` when `label` is a member of the group.
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|member| member == label)
    }
}

/// One command rule as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandConfig {
    /// Trigger pattern; must match the whole command text.
    pub regex: String,
    /// Conditions evaluated in order.
    #[serde(default)]
    pub conditions: Vec<ConditionRule>,
    /// Actions run when every condition passes.
    #[serde(default)]
    pub actions: Vec<Action>,
}

/// A condition together with the actions to run when it fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionRule {
    /// The predicate.
    #[serde(flatten)]
    pub condition: Condition,
    /// Actions run when the predicate is false.
    #[serde(default)]
    pub failed_actions: Vec<Action>,
}

/// Predicates over the subject and its issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Condition {
    /// Every listed label is attached to the issue.
    Labels(Vec<String>),
    /// The issue is in the given state.
    State(IssueState),
    /// Whether the issue has an assignee equals the flag.
    Assigned(Flag),
    /// Whether the sender is assignable in the repository equals the flag.
    UserIsMember(Flag),
    /// Fewer than `max` open issues match the assignee and label.
    Search(SearchLimit),
    /// The sender is among the listed logins or variables.
    UserInList(Vec<String>),
}

impl Condition {
    /// Returns the configuration name of the condition kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Labels(_) => "labels",
            Self::State(_) => "state",
            Self::Assigned(_) => "assigned",
            Self::UserIsMember(_) => "user_is_member",
            Self::Search(_) => "search",
            Self::UserInList(_) => "user_in_list",
        }
    }
}

/// Parameters of a search condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchLimit {
    /// Assignee login or variable.
    pub assignee: String,
    /// Label the counted issues must carry.
    pub label: String,
    /// Exclusive upper bound on the count.
    pub max: u32,
}

/// Side effects a workflow can apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Action {
    /// Posts the interpolated text as a comment.
    Comment(String),
    /// Applies a label from a group.
    Label(LabelChange),
    /// Adds the interpolated login(s) as assignees.
    Assign(String),
    /// Opens or closes the issue.
    SetState(IssueState),
    /// Creates a new issue in the subject's repository.
    CreateIssue(NewIssue),
}

impl Action {
    /// Returns the configuration name of the action kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Comment(_) => "comment",
            Self::Label(_) => "label",
            Self::Assign(_) => "assign",
            Self::SetState(_) => "set_state",
            Self::CreateIssue(_) => "create_issue",
        }
    }
}

/// Parameters of a label action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelChange {
    /// Label group name.
    pub group: String,
    /// Label to add.
    pub label: String,
    /// Remove the group's other labels that are currently attached.
    #[serde(default)]
    pub mutex: Flag,
}

/// Parameters of a create-issue action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIssue {
    /// Issue title.
    pub title: String,
    /// Issue body.
    #[serde(default)]
    pub body: String,
}

/// Boolean accepted either as a YAML bool or as the strings `true`/`false`
/// in any case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FlagRepr", into = "bool")]
pub struct Flag(bool);

impl Flag {
    /// Wraps a boolean.
    #[must_use]
    pub const fn new(value: bool) -> Self {
        Self(value)
    }

    /// Returns the boolean value.
    #[must_use]
    pub const fn value(self) -> bool {
        self.0
    }
}

impl From<Flag> for bool {
    fn from(flag: Flag) -> Self {
        flag.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagRepr {
    Bool(bool),
    Text(String),
}

impl TryFrom<FlagRepr> for Flag {
    type Error = String;

    fn try_from(repr: FlagRepr) -> Result<Self, Self::Error> {
        match repr {
            FlagRepr::Bool(value) => Ok(Self(value)),
            FlagRepr::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(Self(true)),
                "false" => Ok(Self(false)),
                _ => Err(format!("expected true or false, found '{text}'")),
            },
        }
    }
}
