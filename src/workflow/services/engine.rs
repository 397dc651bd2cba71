//! Event dispatch through a workflow.

use super::{ActionExecutor, ConditionEvaluator, DispatchResult};
use crate::github::domain::{IssueSnapshot, RunId};
use crate::github::ports::IssueHost;
use crate::github::services::RateLimiter;
use crate::workflow::domain::{Action, Subject, Workflow, WorkflowEvent};
use std::sync::Arc;
use tracing::{Instrument, debug, info, info_span};

/// Result of dispatching one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No command rule matched the event text.
    NoMatch,
    /// Every condition passed and the rule's actions ran.
    Passed {
        /// Issues created by the actions.
        created: Vec<IssueSnapshot>,
    },
    /// A condition failed and its failure actions ran.
    ConditionFailed {
        /// Zero-based position of the failing condition.
        index: usize,
        /// Issues created by the failure actions.
        created: Vec<IssueSnapshot>,
    },
}

impl DispatchOutcome {
    /// Returns `true` when a command rule matched, whatever its conditions
    /// decided.
    #[must_use]
    pub const fn matched(&self) -> bool {
        !matches!(self, Self::NoMatch)
    }
}

/// Dispatches subjects through one validated workflow.
pub struct WorkflowEngine<H>
where
    H: IssueHost,
{
    workflow: Arc<Workflow>,
    limiter: RateLimiter<H>,
    admins: Arc<[String]>,
}

impl<H> WorkflowEngine<H>
where
    H: IssueHost,
{
    /// Creates an engine.
    #[must_use]
    pub fn new(workflow: Workflow, limiter: RateLimiter<H>, admins: Vec<String>) -> Self {
        Self {
            workflow: Arc::new(workflow),
            limiter,
            admins: admins.into(),
        }
    }

    /// Returns the workflow being dispatched.
    #[must_use]
    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    /// Runs the first command rule for `event` whose trigger fully matches
    /// the subject's command text.
    ///
    /// Conditions are checked in order. The first failing condition runs its
    /// failure actions and ends the dispatch; when all pass, the rule's
    /// actions run in order.
    ///
    /// # Errors
    ///
    /// Returns [`super::DispatchError`] from the first failing host call or
    /// template expansion; actions already applied are not rolled back.
    pub async fn dispatch(
        &self,
        event: WorkflowEvent,
        subject: &Subject,
    ) -> DispatchResult<DispatchOutcome> {
        let span = info_span!(
            "workflow_dispatch",
            run_id = %RunId::new(),
            workflow = self.workflow.name(),
            %event,
            repo = %subject.repo(),
            issue = %subject.issue(),
            sender = subject.sender(),
        );
        self.dispatch_in_span(event, subject).instrument(span).await
    }

    async fn dispatch_in_span(
        &self,
        event: WorkflowEvent,
        subject: &Subject,
    ) -> DispatchResult<DispatchOutcome> {
        let Some(rule) = self.workflow.find_command(event, subject.command()) else {
            debug!("no command matched");
            return Ok(DispatchOutcome::NoMatch);
        };
        info!(trigger = rule.pattern(), "command matched");

        let evaluator = ConditionEvaluator::new(self.limiter.host(), &self.admins);
        for (index, rule_condition) in rule.conditions().iter().enumerate() {
            if !evaluator.check(subject, &rule_condition.condition).await? {
                info!(
                    index,
                    condition = rule_condition.condition.kind(),
                    "condition failed"
                );
                let created = self.run(subject, &rule_condition.failed_actions).await?;
                return Ok(DispatchOutcome::ConditionFailed { index, created });
            }
        }

        let created = self.run(subject, rule.actions()).await?;
        Ok(DispatchOutcome::Passed { created })
    }

    async fn run(
        &self,
        subject: &Subject,
        actions: &[Action],
    ) -> DispatchResult<Vec<IssueSnapshot>> {
        let executor = ActionExecutor::new(&self.limiter, &self.workflow, &self.admins);
        let mut created = Vec::new();
        for action in actions {
            if let Some(issue) = executor.execute(subject, action).await? {
                created.push(issue);
            }
        }
        Ok(created)
    }
}
