//! Data Transfer Objects - the subset of the Telegram Bot API the webhook reads.

use serde::{Deserialize, Serialize};

/// An incoming update delivered to the webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_message: Option<Message>,
}

impl Update {
    /// The message carried by this update, if any. Edits are not commands.
    pub fn command_message(&self) -> Option<&Message> {
        self.message.as_ref()
    }
}

/// A chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// The chat a message was sent in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub chat_type: String,
}

/// Response returned by the health endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_update() {
        let update: Update = serde_json::from_str(
            r#"{
                "update_id": 10000,
                "message": {
                    "message_id": 1365,
                    "date": 1441645532,
                    "from": {"id": 1111111, "is_bot": false, "first_name": "Test"},
                    "chat": {"id": 1111111, "type": "private", "first_name": "Test"},
                    "text": "/claim my deposit"
                }
            }"#,
        )
        .unwrap();

        let message = update.command_message().unwrap();
        assert_eq!(message.chat.id, 1111111);
        assert_eq!(message.text.as_deref(), Some("/claim my deposit"));
    }

    #[test]
    fn test_edited_message_is_ignored() {
        let update: Update = serde_json::from_str(
            r#"{
                "update_id": 10001,
                "edited_message": {
                    "message_id": 1,
                    "chat": {"id": 5, "type": "private"},
                    "text": "/delete"
                }
            }"#,
        )
        .unwrap();

        assert!(update.command_message().is_none());
    }
}
