//! Process settings read once at start-up.
//!
//! Settings come from environment variables through the [`EnvSource`] port
//! so tests can supply a map instead of touching the process environment.

use crate::github::services::RateLimitPolicy;
use crate::translation::services::{SyncOptions, TaskIssueOptions};
use std::collections::HashMap;
use std::hash::BuildHasher;
use std::time::Duration;
use thiserror::Error;

/// Comma-separated admin logins.
pub const ADMINS: &str = "ADMINS";
/// Name of the workflow to dispatch through.
pub const WORKFLOW: &str = "WORKFLOW";
/// Seconds between consecutive host writes; fractions allowed.
pub const INTERVAL: &str = "INTERVAL";
/// Quota floor and batch size for searches.
pub const MAX_RESULT: &str = "MAX_RESULT";
/// Maximum issues created per bulk run.
pub const MAX_WRITE: &str = "MAX_WRITE";
/// Repository descriptor name.
pub const REPOSITORY: &str = "REPOSITORY";
/// Target language name.
pub const TARGET_LANG: &str = "TARGET_LANG";

/// Read access to environment variables.
pub trait EnvSource {
    /// Returns the value of `key`, or `None` when unset or not unicode.
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl<S: BuildHasher> EnvSource for HashMap<String, String, S> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Errors raised while reading settings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SettingsError {
    /// A required variable is unset or empty.
    #[error("environment variable {0} is required")]
    Missing(&'static str),

    /// A variable holds an unusable value.
    #[error("environment variable {key}={value} is invalid: {reason}")]
    Invalid {
        /// Variable name.
        key: &'static str,
        /// Offending value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Validated process settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    admins: Vec<String>,
    workflow: String,
    write_interval: Duration,
    max_result: u32,
    max_write: usize,
    repository: Option<String>,
    target_language: Option<String>,
}

impl Settings {
    /// Reads settings from `env`.
    ///
    /// `WORKFLOW` is required. `INTERVAL` defaults to one second,
    /// `MAX_RESULT` to 30 and `MAX_WRITE` to 10.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when `WORKFLOW` is missing or a numeric
    /// variable does not parse.
    pub fn from_env(env: &impl EnvSource) -> Result<Self, SettingsError> {
        let admins = env
            .var(ADMINS)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|login| !login.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();
        let workflow = non_empty(env, WORKFLOW).ok_or(SettingsError::Missing(WORKFLOW))?;
        let write_interval = match non_empty(env, INTERVAL) {
            Some(raw) => parse_interval(&raw)?,
            None => Duration::from_secs(1),
        };
        Ok(Self {
            admins,
            workflow,
            write_interval,
            max_result: parse_number(env, MAX_RESULT, 30)?,
            max_write: parse_number(env, MAX_WRITE, 10)?,
            repository: non_empty(env, REPOSITORY),
            target_language: non_empty(env, TARGET_LANG),
        })
    }

    /// Returns the admin logins.
    #[must_use]
    pub fn admins(&self) -> &[String] {
        &self.admins
    }

    /// Returns the workflow name.
    #[must_use]
    pub fn workflow(&self) -> &str {
        &self.workflow
    }

    /// Returns the gap enforced after every write.
    #[must_use]
    pub const fn write_interval(&self) -> Duration {
        self.write_interval
    }

    /// Returns the search quota floor and batch size.
    #[must_use]
    pub const fn max_result(&self) -> u32 {
        self.max_result
    }

    /// Returns the cap on issues created per bulk run.
    #[must_use]
    pub const fn max_write(&self) -> usize {
        self.max_write
    }

    /// Returns the repository descriptor name, if configured.
    #[must_use]
    pub fn repository(&self) -> Option<&str> {
        self.repository.as_deref()
    }

    /// Returns the target language name, if configured.
    #[must_use]
    pub fn target_language(&self) -> Option<&str> {
        self.target_language.as_deref()
    }

    /// Builds the write pacing policy.
    #[must_use]
    pub const fn rate_limit_policy(&self) -> RateLimitPolicy {
        RateLimitPolicy::with_write_interval(self.write_interval)
    }

    /// Builds the bulk issue creation limits.
    #[must_use]
    pub const fn task_issue_options(&self) -> TaskIssueOptions {
        TaskIssueOptions {
            max_write: self.max_write,
            max_result: self.max_result,
            search_online: true,
        }
    }

    /// Builds the synchronization options.
    #[must_use]
    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            quota_floor: self.max_result,
            ..SyncOptions::default()
        }
    }
}

fn non_empty(env: &impl EnvSource, key: &str) -> Option<String> {
    env.var(key)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parse_number<T>(
    env: &impl EnvSource,
    key: &'static str,
    default: T,
) -> Result<T, SettingsError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = non_empty(env, key) else {
        return Ok(default);
    };
    raw.parse().map_err(|err: T::Err| SettingsError::Invalid {
        key,
        value: raw.clone(),
        reason: err.to_string(),
    })
}

fn parse_interval(raw: &str) -> Result<Duration, SettingsError> {
    let invalid = |reason: String| SettingsError::Invalid {
        key: INTERVAL,
        value: raw.to_owned(),
        reason,
    };
    let seconds: f64 = raw
        .parse()
        .map_err(|err: std::num::ParseFloatError| invalid(err.to_string()))?;
    Duration::try_from_secs_f64(seconds).map_err(|err| invalid(err.to_string()))
}
