//! Sleeper that records requested waits instead of suspending.

use crate::github::ports::Sleeper;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Records every requested wait and returns immediately.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    waits: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    /// Creates a sleeper with no recorded waits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns recorded waits in order.
    #[must_use]
    pub fn waits(&self) -> Vec<Duration> {
        self.waits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the sum of recorded waits.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.waits().into_iter().sum()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.waits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(duration);
    }
}
