//! Outbound messaging port.

use async_trait::async_trait;

use crate::domain::ChatId;
use crate::error::Interrupted;

/// Delivers text messages to a chat.
///
/// Implementations make a single attempt per call and never retry internally.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send `text` to `chat`.
    async fn send_message(&self, chat: ChatId, text: &str) -> Result<(), DeliveryError>;
}

/// Message delivery errors.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Messaging API rejected the message: {0}")]
    Rejected(String),

    #[error(transparent)]
    Interrupted(#[from] Interrupted),
}
