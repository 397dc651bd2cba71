//! Quota waits and write pacing.

use crate::github::{
    domain::{QuotaWindow, RateLimitStatus},
    ports::{HostResult, IssueHost, Sleeper},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Pacing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Minimum gap enforced after every write.
    pub write_interval: Duration,
    /// Extra time waited past a quota reset.
    pub safety_margin: Duration,
}

impl RateLimitPolicy {
    /// Creates a policy with the given write interval and the default margin.
    #[must_use]
    pub const fn with_write_interval(write_interval: Duration) -> Self {
        Self {
            write_interval,
            safety_margin: Duration::from_secs(2),
        }
    }
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self::with_write_interval(Duration::from_secs(1))
    }
}

/// Gatekeeper for every host call that consumes quota or mutates state.
///
/// Writes are serialized through one permit and each is followed by
/// [`RateLimitPolicy::write_interval`], so consecutive writes are always at
/// least that far apart, even when callers share the limiter across tasks.
pub struct RateLimiter<H>
where
    H: IssueHost,
{
    host: Arc<H>,
    sleeper: Arc<dyn Sleeper>,
    clock: Arc<dyn Clock + Send + Sync>,
    policy: RateLimitPolicy,
    write_gate: Arc<Mutex<()>>,
}

impl<H> Clone for RateLimiter<H>
where
    H: IssueHost,
{
    fn clone(&self) -> Self {
        Self {
            host: Arc::clone(&self.host),
            sleeper: Arc::clone(&self.sleeper),
            clock: Arc::clone(&self.clock),
            policy: self.policy,
            write_gate: Arc::clone(&self.write_gate),
        }
    }
}

impl<H> RateLimiter<H>
where
    H: IssueHost,
{
    /// Creates a rate limiter around a host.
    #[must_use]
    pub fn new(
        host: Arc<H>,
        sleeper: Arc<dyn Sleeper>,
        clock: Arc<dyn Clock + Send + Sync>,
        policy: RateLimitPolicy,
    ) -> Self {
        Self {
            host,
            sleeper,
            clock,
            policy,
            write_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Returns the wrapped host for reads.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Returns the active policy.
    #[must_use]
    pub const fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    /// Reports the host's current quota.
    ///
    /// # Errors
    ///
    /// Propagates host failures.
    pub async fn status(&self) -> HostResult<RateLimitStatus> {
        self.host.rate_limits().await
    }

    /// Blocks until neither quota is at or below its minimum.
    ///
    /// For each exhausted bucket the wait is the time to its reset plus the
    /// safety margin. Returns the total time waited, zero when no bucket was
    /// exhausted.
    ///
    /// # Errors
    ///
    /// Propagates host failures from the quota read.
    pub async fn wait_for_quota(
        &self,
        core_minimum: u32,
        search_minimum: u32,
    ) -> HostResult<Duration> {
        let status = self.host.rate_limits().await?;
        let now = self.clock.utc();
        let mut waited = Duration::ZERO;
        for (bucket, window, minimum) in [
            ("core", status.core, core_minimum),
            ("search", status.search, search_minimum),
        ] {
            if !window.is_exhausted(minimum) {
                continue;
            }
            let wait = self.wait_until_reset(&window, now);
            warn!(
                bucket,
                remaining = window.remaining,
                minimum,
                wait_secs = wait.as_secs(),
                "waiting for quota reset"
            );
            self.sleeper.sleep(wait).await;
            waited += wait;
        }
        Ok(waited)
    }

    fn wait_until_reset(&self, window: &QuotaWindow, now: DateTime<Utc>) -> Duration {
        let until_reset = (window.reset - now).to_std().unwrap_or(Duration::ZERO);
        until_reset + self.policy.safety_margin
    }

    /// Runs one host write under the write permit, then waits the write
    /// interval before releasing it.
    ///
    /// # Errors
    ///
    /// Returns the write's error unchanged; no pacing delay follows a failed
    /// write.
    pub async fn paced<T>(
        &self,
        write: impl Future<Output = HostResult<T>> + Send,
    ) -> HostResult<T> {
        let _permit = self.write_gate.lock().await;
        let value = write.await?;
        debug!(interval = ?self.policy.write_interval, "pacing after write");
        self.sleeper.sleep(self.policy.write_interval).await;
        Ok(value)
    }
}
