//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod completion;
mod messaging;
mod preferences;
mod rate_limit;
mod repository;

pub use completion::{CompletionError, CompletionProvider};
pub use messaging::{DeliveryError, MessageSender};
pub use preferences::PreferenceStore;
pub use rate_limit::{Clock, RateLimitResult, RateLimiter};
pub use repository::ResultStore;
