//! Application services shared by every host caller.

mod rate_limit;

pub use rate_limit::{RateLimitPolicy, RateLimiter};
