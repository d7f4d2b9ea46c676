//! Rate limiting implementations.

mod memory;

pub use memory::{RateLimitConfig, SlidingWindowLimiter};
