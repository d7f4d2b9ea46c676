//! Minimal Telegram Bot API client implementing [`MessageSender`].

use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use serde::{Deserialize, Serialize};

use legalbot_core::domain::ChatId;
use legalbot_core::ports::{DeliveryError, MessageSender};

/// Telegram client configuration.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot token issued by BotFather.
    pub token: String,
    /// API base URL, without the `/bot<token>` suffix.
    pub api_url: String,
    /// Outbound messages per second across all chats.
    pub max_sends_per_sec: u32,
    /// HTTP request timeout.
    pub request_timeout: Duration,
}

impl TelegramConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_url: "https://api.telegram.org".to_string(),
            max_sends_per_sec: 30,
            request_timeout: Duration::from_secs(10),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Returns `None` when `TELEGRAM_BOT_TOKEN` is not set.
    pub fn from_env() -> Option<Self> {
        let token = std::env::var("TELEGRAM_BOT_TOKEN").ok()?;
        let defaults = Self::new(token);
        Some(Self {
            api_url: std::env::var("TELEGRAM_API_URL").unwrap_or(defaults.api_url.clone()),
            max_sends_per_sec: std::env::var("TELEGRAM_MAX_SENDS_PER_SEC")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_sends_per_sec),
            ..defaults
        })
    }
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sends messages through the Telegram Bot API.
///
/// Sends are throttled to stay under the Bot API's global flood limit.
pub struct TelegramSender {
    client: reqwest::Client,
    send_url: String,
    throttle: DefaultDirectRateLimiter,
}

impl TelegramSender {
    pub fn new(config: TelegramConfig) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let per_sec = NonZeroU32::new(config.max_sends_per_sec).unwrap_or(NonZeroU32::MIN);

        Ok(Self {
            client,
            send_url: send_message_url(&config.api_url, &config.token),
            throttle: RateLimiter::direct(Quota::per_second(per_sec)),
        })
    }
}

#[async_trait]
impl MessageSender for TelegramSender {
    async fn send_message(&self, chat: ChatId, text: &str) -> Result<(), DeliveryError> {
        self.throttle.until_ready().await;

        let response = self
            .client
            .post(&self.send_url)
            .json(&SendMessageRequest {
                chat_id: chat.get(),
                text,
            })
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DeliveryError::Transport(e.without_url().to_string()))?;

        check_response(status.as_u16(), &body)?;

        tracing::debug!(chat_id = %chat, "Telegram message sent");
        Ok(())
    }
}

fn send_message_url(api_url: &str, token: &str) -> String {
    format!("{}/bot{}/sendMessage", api_url.trim_end_matches('/'), token)
}

/// Interpret a Bot API reply.
fn check_response(status: u16, body: &str) -> Result<(), DeliveryError> {
    if !(200..300).contains(&status) {
        return Err(DeliveryError::Rejected(format!(
            "status {status}: {}",
            body.trim()
        )));
    }

    let parsed: ApiResponse = serde_json::from_str(body)
        .map_err(|e| DeliveryError::Rejected(format!("invalid response: {e}")))?;

    if !parsed.ok {
        return Err(DeliveryError::Rejected(
            parsed
                .description
                .unwrap_or_else(|| "unknown error".to_string()),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_message_url() {
        assert_eq!(
            send_message_url("http://localhost:8081/", "TOKEN"),
            "http://localhost:8081/botTOKEN/sendMessage"
        );
    }

    #[test]
    fn test_success_response() {
        assert!(check_response(200, r#"{"ok":true,"result":{}}"#).is_ok());
    }

    #[test]
    fn test_http_error_includes_body() {
        let err = check_response(418, "boom\n").unwrap_err();
        assert!(err.to_string().contains("boom"));
        assert!(err.to_string().contains("418"));
    }

    #[test]
    fn test_api_failure_includes_description() {
        let err = check_response(200, r#"{"ok":false,"description":"fail"}"#).unwrap_err();
        assert!(matches!(err, DeliveryError::Rejected(ref msg) if msg == "fail"));
    }

    #[test]
    fn test_malformed_body() {
        assert!(check_response(200, "not json").is_err());
    }

    #[test]
    fn test_sender_builds() {
        let config = TelegramConfig {
            max_sends_per_sec: 0,
            ..TelegramConfig::new("TOKEN")
        };
        let sender = TelegramSender::new(config).unwrap();
        assert!(sender.send_url.ends_with("/botTOKEN/sendMessage"));
    }
}
