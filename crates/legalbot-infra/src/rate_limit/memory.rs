//! In-memory sliding-window rate limiter.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use legalbot_core::domain::ChatId;
use legalbot_core::ports::{Clock, RateLimitResult, RateLimiter};

use crate::clock::SystemClock;

/// In-memory rate limiter configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum admissions per window.
    pub max_requests: u32,
    /// Window duration.
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimitConfig {
    pub fn from_env() -> Self {
        Self {
            max_requests: std::env::var("RATE_LIMIT_MAX_REQUESTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            window: Duration::from_secs(
                std::env::var("RATE_LIMIT_WINDOW_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
        }
    }
}

/// Per-chat sliding-window rate limiter.
///
/// Each chat keeps the instants of its admissions inside the trailing window.
/// Every check prunes entries at or before `now - window`, then admits if
/// fewer than `max_requests` remain. Denied checks are not recorded.
///
/// Note: Limits are per-process, not distributed across instances. A chat's
/// queue is never removed once created, but holds at most `max_requests`
/// entries.
pub struct SlidingWindowLimiter {
    config: RateLimitConfig,
    clock: Arc<dyn Clock>,
    chats: Mutex<HashMap<ChatId, VecDeque<Instant>>>,
}

impl SlidingWindowLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            chats: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_env() -> Self {
        Self::new(RateLimitConfig::from_env())
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    fn check_at(&self, chat: ChatId, now: Instant) -> RateLimitResult {
        let limit = self.config.max_requests as usize;
        let window = self.config.window;

        let mut chats = self.chats.lock().unwrap_or_else(|e| e.into_inner());
        let admitted = chats.entry(chat).or_default();

        // No cutoff means the window reaches back past the clock's origin
        if let Some(cutoff) = now.checked_sub(window) {
            while admitted.front().is_some_and(|&t| t <= cutoff) {
                admitted.pop_front();
            }
        }

        let reset_after = admitted
            .front()
            .map(|&oldest| match oldest.checked_add(window) {
                Some(reset_at) => reset_at.saturating_duration_since(now),
                None => window,
            })
            .unwrap_or(window);

        if admitted.len() >= limit {
            return RateLimitResult {
                allowed: false,
                remaining: 0,
                reset_after,
            };
        }

        admitted.push_back(now);

        RateLimitResult {
            allowed: true,
            remaining: (limit - admitted.len()) as u32,
            reset_after,
        }
    }
}

impl RateLimiter for SlidingWindowLimiter {
    fn check(&self, chat: ChatId) -> RateLimitResult {
        self.check_at(chat, self.clock.now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    const WINDOW: Duration = Duration::from_secs(60);

    fn limiter(max_requests: u32) -> (SlidingWindowLimiter, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let limiter = SlidingWindowLimiter::with_clock(
            RateLimitConfig {
                max_requests,
                window: WINDOW,
            },
            clock.clone(),
        );
        (limiter, clock)
    }

    #[test]
    fn test_burst_admits_exactly_limit() {
        for limit in [1, 2, 5, 10, 17] {
            let (limiter, _clock) = limiter(limit);
            for i in 0..limit {
                assert!(limiter.allow(ChatId(1)), "unexpected deny at {i}");
            }
            assert!(!limiter.allow(ChatId(1)), "expected deny after {limit}");
        }
    }

    #[test]
    fn test_zero_limit_always_denies() {
        let (limiter, clock) = limiter(0);
        assert!(!limiter.allow(ChatId(1)));
        clock.advance(WINDOW * 10);
        assert!(!limiter.allow(ChatId(1)));
    }

    #[test]
    fn test_allows_after_full_window() {
        let (limiter, clock) = limiter(10);
        for _ in 0..10 {
            assert!(limiter.allow(ChatId(1)));
        }
        assert!(!limiter.allow(ChatId(1)));

        clock.advance(WINDOW + Duration::from_millis(1));
        assert!(limiter.allow(ChatId(1)));
    }

    #[test]
    fn test_window_boundary_is_exclusive() {
        let (limiter, clock) = limiter(1);
        assert!(limiter.allow(ChatId(1)));

        clock.advance(WINDOW - Duration::from_nanos(1));
        assert!(!limiter.allow(ChatId(1)));

        // Exactly `window` after the admission, the old entry has expired
        clock.advance(Duration::from_nanos(1));
        assert!(limiter.allow(ChatId(1)));
    }

    #[test]
    fn test_unrepresentable_window_does_not_overflow() {
        let clock = Arc::new(ManualClock::new());
        let limiter = SlidingWindowLimiter::with_clock(
            RateLimitConfig {
                max_requests: 1,
                window: Duration::from_secs(u64::MAX),
            },
            clock,
        );

        assert!(limiter.allow(ChatId(1)));
        let denied = limiter.check(ChatId(1));
        assert!(!denied.allowed);
        assert_eq!(denied.reset_after, Duration::from_secs(u64::MAX));
    }

    #[test]
    fn test_denied_checks_are_not_recorded() {
        let (limiter, clock) = limiter(2);
        assert!(limiter.allow(ChatId(1)));
        clock.advance(Duration::from_secs(30));
        assert!(limiter.allow(ChatId(1)));

        // Denials inside the window must not push the window forward
        for _ in 0..5 {
            assert!(!limiter.allow(ChatId(1)));
        }

        clock.advance(Duration::from_secs(30));
        let result = limiter.check(ChatId(1));
        assert!(result.allowed);
        assert_eq!(result.remaining, 0);
    }

    #[test]
    fn test_sliding_not_fixed_window() {
        let (limiter, clock) = limiter(2);
        assert!(limiter.allow(ChatId(1)));
        clock.advance(Duration::from_secs(40));
        assert!(limiter.allow(ChatId(1)));

        // First admission expires at 60s, second at 100s
        clock.advance(Duration::from_secs(20));
        assert!(limiter.allow(ChatId(1)));
        assert!(!limiter.allow(ChatId(1)));
    }

    #[test]
    fn test_chats_are_independent() {
        let (limiter, _clock) = limiter(3);
        for _ in 0..3 {
            assert!(limiter.allow(ChatId(1)));
        }
        assert!(!limiter.allow(ChatId(1)));

        for _ in 0..3 {
            assert!(limiter.allow(ChatId(2)));
        }
        assert!(!limiter.allow(ChatId(2)));
    }

    #[test]
    fn test_remaining_and_reset_after() {
        let (limiter, clock) = limiter(3);

        let first = limiter.check(ChatId(1));
        assert_eq!(first.remaining, 2);
        assert_eq!(first.reset_after, WINDOW);

        clock.advance(Duration::from_secs(15));
        limiter.check(ChatId(1));
        limiter.check(ChatId(1));

        let denied = limiter.check(ChatId(1));
        assert!(!denied.allowed);
        assert_eq!(denied.reset_after, Duration::from_secs(45));
    }

    #[test]
    fn test_queue_never_exceeds_limit() {
        let (limiter, clock) = limiter(4);
        for _ in 0..50 {
            limiter.check(ChatId(9));
            clock.advance(Duration::from_secs(7));
        }
        let chats = limiter.chats.lock().unwrap();
        assert!(chats[&ChatId(9)].len() <= 4);
    }

    #[test]
    fn test_concurrent_checks_admit_exactly_limit() {
        let (limiter, _clock) = limiter(25);
        let limiter = Arc::new(limiter);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = limiter.clone();
                std::thread::spawn(move || (0..10).filter(|_| limiter.allow(ChatId(1))).count())
            })
            .collect();

        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(admitted, 25);
    }
}
