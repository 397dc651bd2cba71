//! Validated, ready-to-dispatch workflow.

use super::{
    Action, CommandConfig, ConditionRule, LabelGroup, WorkflowConfig, WorkflowConfigError,
    WorkflowEvent, WorkflowFile,
};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

/// A command rule with its trigger compiled.
#[derive(Debug, Clone)]
pub struct CommandRule {
    pattern: String,
    trigger: Regex,
    conditions: Vec<ConditionRule>,
    actions: Vec<Action>,
}

impl CommandRule {
    /// Returns the trigger pattern as configured.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns `true` when the trigger matches the whole of `text`.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.trigger.is_match(text)
    }

    /// Returns the conditions in evaluation order.
    #[must_use]
    pub fn conditions(&self) -> &[ConditionRule] {
        &self.conditions
    }

    /// Returns the actions run when every condition passes.
    #[must_use]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }
}

/// A named workflow whose triggers compiled and whose label actions refer
/// to defined groups.
#[derive(Debug, Clone)]
pub struct Workflow {
    name: String,
    commands: BTreeMap<WorkflowEvent, Vec<CommandRule>>,
    label_groups: Vec<LabelGroup>,
}

impl Workflow {
    /// Selects `name` from a YAML document and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowConfigError`] when the document does not parse, the
    /// workflow is missing, or validation fails.
    pub fn load(source: &str, name: &str) -> Result<Self, WorkflowConfigError> {
        let file = WorkflowFile::from_yaml_str(source)?;
        let config = file
            .find(name)
            .cloned()
            .ok_or_else(|| WorkflowConfigError::UnknownWorkflow(name.to_owned()))?;
        Self::from_config(config)
    }

    /// Validates a parsed workflow.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowConfigError`] when a trigger does not compile, a
    /// label group is defined twice, or a label action names an unknown
    /// group or a label outside its group.
    pub fn from_config(config: WorkflowConfig) -> Result<Self, WorkflowConfigError> {
        let WorkflowConfig {
            name,
            events,
            labels,
        } = config;

        let mut seen = BTreeSet::new();
        for group in &labels {
            if !seen.insert(group.group.as_str()) {
                return Err(WorkflowConfigError::DuplicateLabelGroup(group.group.clone()));
            }
        }

        let mut commands = BTreeMap::new();
        for (event, rules) in events {
            let compiled = rules
                .into_iter()
                .map(|rule| compile_rule(rule, &labels))
                .collect::<Result<Vec<_>, _>>()?;
            commands.insert(event, compiled);
        }

        Ok(Self {
            name,
            commands,
            label_groups: labels,
        })
    }

    /// Returns the workflow name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the first rule for `event` whose trigger matches `text`.
    #[must_use]
    pub fn find_command(&self, event: WorkflowEvent, text: &str) -> Option<&CommandRule> {
        self.commands
            .get(&event)?
            .iter()
            .find(|rule| rule.matches(text))
    }

    /// Returns the label group with the given name.
    #[must_use]
    pub fn label_group(&self, name: &str) -> Option<&LabelGroup> {
        self.label_groups.iter().find(|group| group.group == name)
    }

    /// Returns every configured label group.
    #[must_use]
    pub fn label_groups(&self) -> &[LabelGroup] {
        &self.label_groups
    }
}

fn compile_rule(
    rule: CommandConfig,
    groups: &[LabelGroup],
) -> Result<CommandRule, WorkflowConfigError> {
    let trigger = Regex::new(&format!("^(?:{})$", rule.regex)).map_err(|err| {
        WorkflowConfigError::InvalidTrigger {
            pattern: rule.regex.clone(),
            reason: err.to_string(),
        }
    })?;

    let failure_actions = rule
        .conditions
        .iter()
        .flat_map(|condition| condition.failed_actions.iter());
    for action in rule.actions.iter().chain(failure_actions) {
        validate_action(action, groups)?;
    }

    Ok(CommandRule {
        pattern: rule.regex,
        trigger,
        conditions: rule.conditions,
        actions: rule.actions,
    })
}

fn validate_action(action: &Action, groups: &[LabelGroup]) -> Result<(), WorkflowConfigError> {
    let Action::Label(change) = action else {
        return Ok(());
    };
    let group = groups
        .iter()
        .find(|group| group.group == change.group)
        .ok_or_else(|| WorkflowConfigError::UnknownLabelGroup(change.group.clone()))?;
    if group.contains(&change.label) {
        Ok(())
    } else {
        Err(WorkflowConfigError::LabelNotInGroup {
            group: change.group.clone(),
            label: change.label.clone(),
        })
    }
}
