//! Request quota reported by the host.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One quota bucket: how many calls remain and when the bucket refills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaWindow {
    /// Calls left in the current window.
    pub remaining: u32,
    /// Calls allowed per window.
    pub limit: u32,
    /// Instant the window resets.
    pub reset: DateTime<Utc>,
}

impl QuotaWindow {
    /// Returns whether the remaining count is at or below `minimum`.
    #[must_use]
    pub const fn is_exhausted(&self, minimum: u32) -> bool {
        self.remaining <= minimum
    }
}

/// Core and search quota buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitStatus {
    /// Quota for ordinary REST calls.
    pub core: QuotaWindow,
    /// Quota for search calls.
    pub search: QuotaWindow,
}
