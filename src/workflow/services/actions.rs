//! Action execution.

use super::{DispatchError, DispatchResult, VariableInterpolator};
use crate::github::domain::{IssueSnapshot, IssueState};
use crate::github::ports::IssueHost;
use crate::github::services::RateLimiter;
use crate::workflow::domain::{Action, LabelChange, NewIssue, Subject, Workflow};
use tracing::info;

/// Applies workflow actions through the rate limiter.
///
/// Every write goes through [`RateLimiter::paced`].
pub struct ActionExecutor<'a, H>
where
    H: IssueHost,
{
    limiter: &'a RateLimiter<H>,
    workflow: &'a Workflow,
    variables: VariableInterpolator<'a, H>,
}

impl<'a, H> ActionExecutor<'a, H>
where
    H: IssueHost,
{
    /// Creates an executor for `workflow`.
    #[must_use]
    pub fn new(limiter: &'a RateLimiter<H>, workflow: &'a Workflow, admins: &'a [String]) -> Self {
        Self {
            limiter,
            workflow,
            variables: VariableInterpolator::new(limiter.host(), admins),
        }
    }

    /// Applies one action to the subject's issue.
    ///
    /// Returns the created issue for [`Action::CreateIssue`] and `None`
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] when a host write fails, a template cannot
    /// be expanded, or a label group is missing.
    pub async fn execute(
        &self,
        subject: &Subject,
        action: &Action,
    ) -> DispatchResult<Option<IssueSnapshot>> {
        info!(action = action.kind(), issue = %subject.issue(), "executing action");
        match action {
            Action::Comment(template) => self.comment(subject, template).await?,
            Action::Label(change) => self.label(subject, change).await?,
            Action::Assign(template) => self.assign(subject, template).await?,
            Action::SetState(state) => self.set_state(subject, *state).await?,
            Action::CreateIssue(new_issue) => {
                return self.create_issue(subject, new_issue).await.map(Some);
            }
        }
        Ok(None)
    }

    async fn comment(&self, subject: &Subject, template: &str) -> DispatchResult<()> {
        let body = self.variables.translate(subject, template).await?;
        let host = self.limiter.host();
        self.limiter
            .paced(host.create_comment(subject.repo(), subject.issue(), &body))
            .await?;
        Ok(())
    }

    async fn label(&self, subject: &Subject, change: &LabelChange) -> DispatchResult<()> {
        let group = self
            .workflow
            .label_group(&change.group)
            .ok_or_else(|| DispatchError::UnknownLabelGroup(change.group.clone()))?;
        let host = self.limiter.host();
        let existing = if change.mutex.value() {
            host.issue(subject.repo(), subject.issue()).await?.labels
        } else {
            Vec::new()
        };
        for member in &group.labels {
            if *member == change.label {
                self.limiter
                    .paced(host.add_label(subject.repo(), subject.issue(), member))
                    .await?;
            } else if existing.contains(member) {
                self.limiter
                    .paced(host.remove_label(subject.repo(), subject.issue(), member))
                    .await?;
            }
        }
        Ok(())
    }

    async fn assign(&self, subject: &Subject, template: &str) -> DispatchResult<()> {
        let logins = self.variables.resolve_logins(subject, template).await?;
        let host = self.limiter.host();
        self.limiter
            .paced(host.add_assignees(subject.repo(), subject.issue(), &logins))
            .await?;
        Ok(())
    }

    async fn set_state(&self, subject: &Subject, state: IssueState) -> DispatchResult<()> {
        let host = self.limiter.host();
        self.limiter
            .paced(host.set_state(subject.repo(), subject.issue(), state))
            .await?;
        Ok(())
    }

    async fn create_issue(
        &self,
        subject: &Subject,
        new_issue: &NewIssue,
    ) -> DispatchResult<IssueSnapshot> {
        let host = self.limiter.host();
        let created = self
            .limiter
            .paced(host.create_issue(subject.repo(), &new_issue.title, &new_issue.body))
            .await?;
        Ok(created)
    }
}
