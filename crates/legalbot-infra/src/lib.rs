//! # Legalbot Infrastructure
//!
//! Concrete implementations of the ports defined in `legalbot-core`.
//! This crate contains the rate limiter, stores, and external service clients.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL result store via SeaORM
//! - `telegram` - Telegram Bot API sender
//! - `openrouter` - OpenRouter completion provider

pub mod clock;
pub mod database;
pub mod preferences;
pub mod rate_limit;

#[cfg(feature = "openrouter")]
pub mod completion;

#[cfg(feature = "telegram")]
pub mod telegram;

// Re-exports - In-Memory
pub use clock::{ManualClock, SystemClock};
pub use database::InMemoryResultStore;
pub use preferences::InMemoryPreferenceStore;
pub use rate_limit::{RateLimitConfig, SlidingWindowLimiter};

// Re-exports - External services
#[cfg(feature = "postgres")]
pub use database::{DatabaseConfig, PostgresResultStore};
#[cfg(feature = "openrouter")]
pub use completion::{OpenRouterClient, OpenRouterConfig};
#[cfg(feature = "telegram")]
pub use telegram::{TelegramConfig, TelegramSender};
