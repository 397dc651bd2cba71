//! Fixtures shared by unit tests across contexts.

use crate::github::{
    adapters::memory::{InMemoryIssueHost, RecordingSleeper},
    domain::{IssueNumber, RepositoryFullName},
    services::{RateLimitPolicy, RateLimiter},
};
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use std::sync::Arc;

/// Clock frozen at a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn at(seconds: i64) -> Self {
        Self(Utc.timestamp_opt(seconds, 0).single().unwrap_or_default())
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn repo(name: &str) -> RepositoryFullName {
    RepositoryFullName::new(name).unwrap_or_else(|err| panic!("test repository: {err}"))
}

pub fn issue_number(value: u64) -> IssueNumber {
    IssueNumber::new(value).unwrap_or_else(|err| panic!("test issue number: {err}"))
}

pub fn limiter(
    host: &InMemoryIssueHost,
    sleeper: &RecordingSleeper,
    clock: FixedClock,
) -> RateLimiter<InMemoryIssueHost> {
    RateLimiter::new(
        Arc::new(host.clone()),
        Arc::new(sleeper.clone()),
        Arc::new(clock),
        RateLimitPolicy::default(),
    )
}
