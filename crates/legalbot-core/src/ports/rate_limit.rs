//! Rate limiting port.

use std::time::{Duration, Instant};

use crate::domain::ChatId;

/// Rate limiter trait - decides whether a chat may trigger quota-consuming work.
///
/// A check is an admission: when allowed, it is recorded against the quota.
pub trait RateLimiter: Send + Sync {
    /// Check if a request is allowed and record it if so.
    fn check(&self, chat: ChatId) -> RateLimitResult;

    /// Shorthand for `check(chat).allowed`.
    fn allow(&self, chat: ChatId) -> bool {
        self.check(chat).allowed
    }
}

/// Result of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_after: Duration,
}

/// Time source for rate limiting.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}
