//! Wall-clock sleeper backed by the tokio timer.

use crate::github::ports::Sleeper;
use async_trait::async_trait;
use std::time::Duration;

/// Sleeper that suspends the task with [`tokio::time::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
