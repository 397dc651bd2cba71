//! `%name%` variable expansion.

use super::InterpolationError;
use crate::github::ports::IssueHost;
use crate::workflow::domain::Subject;
use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

/// Value of a resolved variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// A single string.
    Text(String),
    /// A list of logins.
    List(Vec<String>),
}

impl Resolved {
    /// Flattens the value into a list.
    #[must_use]
    pub fn into_list(self) -> Vec<String> {
        match self {
            Self::Text(text) => vec![text],
            Self::List(items) => items,
        }
    }
}

/// Expands workflow variables against a subject.
///
/// Recognized variables:
///
/// - `%operator%`: the sender's login
/// - `%admin%`: the configured admin logins, as a list
/// - `%admin_list%`: the admins as `@a,@b`
/// - `%assignee%`: the issue's current assignee logins, as a list
///
/// Unknown variables are left in place.
pub struct VariableInterpolator<'a, H>
where
    H: IssueHost,
{
    host: &'a H,
    admins: &'a [String],
}

impl<'a, H> VariableInterpolator<'a, H>
where
    H: IssueHost,
{
    /// Creates an interpolator reading from `host`.
    #[must_use]
    pub const fn new(host: &'a H, admins: &'a [String]) -> Self {
        Self { host, admins }
    }

    /// Resolves one token.
    ///
    /// Input not starting with `%` is returned verbatim as text.
    ///
    /// # Errors
    ///
    /// Returns [`InterpolationError::Host`] when `%assignee%` cannot read the
    /// issue.
    pub async fn parse(
        &self,
        subject: &Subject,
        token: &str,
    ) -> Result<Resolved, InterpolationError> {
        if !token.starts_with('%') {
            return Ok(Resolved::Text(token.to_owned()));
        }
        let resolved = match token.trim_matches('%') {
            "operator" => Resolved::Text(subject.sender().to_owned()),
            "admin" => Resolved::List(self.admins.to_vec()),
            "admin_list" => Resolved::Text(
                self.admins
                    .iter()
                    .map(|admin| format!("@{admin}"))
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            "assignee" => {
                let issue = self.host.issue(subject.repo(), subject.issue()).await?;
                Resolved::List(issue.assignees)
            }
            _ => Resolved::Text(token.to_owned()),
        };
        Ok(resolved)
    }

    /// Replaces every `%name%` token in `template` with its text value.
    ///
    /// # Errors
    ///
    /// Returns [`InterpolationError::ListValued`] when a token resolves to a
    /// list, or a host error from resolving `%assignee%`.
    pub async fn translate(
        &self,
        subject: &Subject,
        template: &str,
    ) -> Result<String, InterpolationError> {
        let mut output = String::with_capacity(template.len());
        let mut cursor = 0;
        for span in token_spans(template) {
            let token = template.get(span.clone()).unwrap_or_default();
            let Resolved::Text(value) = self.parse(subject, token).await? else {
                return Err(InterpolationError::ListValued {
                    token: token.to_owned(),
                });
            };
            output.push_str(template.get(cursor..span.start).unwrap_or_default());
            output.push_str(&value);
            cursor = span.end;
        }
        output.push_str(template.get(cursor..).unwrap_or_default());
        Ok(output)
    }

    /// Expands a template into logins.
    ///
    /// A template that is exactly one token resolves through [`Self::parse`]
    /// and is flattened; anything else is translated into a single entry.
    ///
    /// # Errors
    ///
    /// Propagates [`Self::parse`] and [`Self::translate`] failures.
    pub async fn resolve_logins(
        &self,
        subject: &Subject,
        template: &str,
    ) -> Result<Vec<String>, InterpolationError> {
        let spans = token_spans(template);
        if matches!(spans.as_slice(), [only] if *only == (0..template.len())) {
            return Ok(self.parse(subject, template).await?.into_list());
        }
        Ok(vec![self.translate(subject, template).await?])
    }
}

static TOKEN_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Finds non-overlapping `%...%` tokens, shortest first, never spanning a
/// line break.
#[expect(
    clippy::expect_used,
    reason = "the token pattern is a literal known to compile"
)]
fn token_spans(template: &str) -> Vec<Range<usize>> {
    let pattern =
        TOKEN_PATTERN.get_or_init(|| Regex::new("%.*?%").expect("token pattern compiles"));
    pattern.find_iter(template).map(|found| found.range()).collect()
}
