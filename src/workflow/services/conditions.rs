//! Condition evaluation.

use super::{DispatchResult, InterpolationError, Resolved, VariableInterpolator};
use crate::github::domain::{IssueKind, IssueSnapshot, IssueState, SearchQuery};
use crate::github::ports::{HostResult, IssueHost};
use crate::workflow::domain::{Condition, Flag, SearchLimit, Subject};
use tracing::debug;

/// Evaluates workflow conditions against the host.
///
/// A condition whose subject issue cannot be found evaluates to `false`
/// rather than failing the dispatch.
pub struct ConditionEvaluator<'a, H>
where
    H: IssueHost,
{
    host: &'a H,
    variables: VariableInterpolator<'a, H>,
}

impl<'a, H> ConditionEvaluator<'a, H>
where
    H: IssueHost,
{
    /// Creates an evaluator.
    #[must_use]
    pub const fn new(host: &'a H, admins: &'a [String]) -> Self {
        Self {
            host,
            variables: VariableInterpolator::new(host, admins),
        }
    }

    /// Returns whether `condition` holds for `subject`.
    ///
    /// # Errors
    ///
    /// Returns [`super::DispatchError`] for host failures other than a
    /// missing object, or when a search assignee expands to a list.
    pub async fn check(&self, subject: &Subject, condition: &Condition) -> DispatchResult<bool> {
        let passed = match condition {
            Condition::Labels(required) => self
                .with_issue(subject, |issue| issue.has_all_labels(required))
                .await?,
            Condition::State(state) => self
                .with_issue(subject, |issue| issue.state == *state)
                .await?,
            Condition::Assigned(flag) => self
                .with_issue(subject, |issue| issue.assignee().is_some() == flag.value())
                .await?,
            Condition::UserIsMember(flag) => self.sender_is_member(subject, *flag).await?,
            Condition::Search(limit) => self.below_search_limit(subject, limit).await?,
            Condition::UserInList(entries) => self.sender_in_list(subject, entries).await?,
        };
        debug!(condition = condition.kind(), passed, "condition evaluated");
        Ok(passed)
    }

    async fn with_issue(
        &self,
        subject: &Subject,
        predicate: impl FnOnce(&IssueSnapshot) -> bool + Send,
    ) -> DispatchResult<bool> {
        let issue = absent_as_none(self.host.issue(subject.repo(), subject.issue()).await)?;
        Ok(issue.as_ref().is_some_and(predicate))
    }

    async fn sender_is_member(&self, subject: &Subject, expected: Flag) -> DispatchResult<bool> {
        let assignable =
            absent_as_none(self.host.is_assignable(subject.repo(), subject.sender()).await)?;
        Ok(assignable.is_some_and(|member| member == expected.value()))
    }

    async fn below_search_limit(
        &self,
        subject: &Subject,
        limit: &SearchLimit,
    ) -> DispatchResult<bool> {
        let assignee = match self.variables.parse(subject, &limit.assignee).await? {
            Resolved::Text(login) => login,
            Resolved::List(_) => {
                return Err(InterpolationError::ListValued {
                    token: limit.assignee.clone(),
                }
                .into());
            }
        };
        let query = SearchQuery::in_repository(subject.repo().clone())
            .of_kind(IssueKind::Issue)
            .with_state(IssueState::Open)
            .with_labels([limit.label.as_str()])
            .with_assignee(assignee);
        let Some(found) = absent_as_none(self.host.search_issues(&query).await)? else {
            return Ok(false);
        };
        let count = u32::try_from(found.len()).unwrap_or(u32::MAX);
        Ok(count < limit.max)
    }

    async fn sender_in_list(&self, subject: &Subject, entries: &[String]) -> DispatchResult<bool> {
        let mut logins = Vec::new();
        for entry in entries {
            logins.extend(self.variables.parse(subject, entry).await?.into_list());
        }
        Ok(logins.iter().any(|login| login == subject.sender()))
    }
}

fn absent_as_none<T>(result: HostResult<T>) -> HostResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_not_found() => Ok(None),
        Err(err) => Err(err),
    }
}
