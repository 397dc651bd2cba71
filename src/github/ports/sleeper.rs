//! Sleeper port used for every timed wait.

use async_trait::async_trait;
use std::time::Duration;

/// Suspends the current task for a duration.
///
/// Injected so quota waits and write pacing can be observed in tests without
/// wall-clock delays.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Waits for `duration`.
    async fn sleep(&self, duration: Duration);
}
