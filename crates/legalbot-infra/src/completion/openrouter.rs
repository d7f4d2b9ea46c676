//! OpenRouter chat completion client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use legalbot_core::ports::{CompletionError, CompletionProvider};

/// OpenRouter client configuration.
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub api_key: String,
    /// Chat completions endpoint.
    pub endpoint: String,
    pub model: String,
    pub request_timeout: Duration,
}

impl OpenRouterConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: "https://openrouter.ai/api/v1/chat/completions".to_string(),
            model: "openai/gpt-4o-mini".to_string(),
            request_timeout: Duration::from_secs(60),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Returns `None` when `OPENROUTER_API_KEY` is not set.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("OPENROUTER_API_KEY").ok()?;
        let defaults = Self::new(api_key);
        Some(Self {
            endpoint: std::env::var("OPENROUTER_URL").unwrap_or(defaults.endpoint.clone()),
            model: std::env::var("OPENROUTER_MODEL").unwrap_or(defaults.model.clone()),
            ..defaults
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Completion provider backed by the OpenRouter chat completions API.
pub struct OpenRouterClient {
    client: reqwest::Client,
    config: OpenRouterConfig,
}

impl OpenRouterClient {
    pub fn new(config: OpenRouterConfig) -> Result<Self, CompletionError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| CompletionError::Request(e.to_string()))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl CompletionProvider for OpenRouterClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| CompletionError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CompletionError::Request(e.to_string()))?;

        let content = parse_response(status.as_u16(), &body)?;
        tracing::debug!(model = %self.config.model, chars = content.len(), "Completion received");
        Ok(content)
    }
}

/// Extract the first choice's text from a chat completions reply.
fn parse_response(status: u16, body: &str) -> Result<String, CompletionError> {
    if !(200..300).contains(&status) {
        return Err(CompletionError::Status {
            status,
            body: body.trim().to_string(),
        });
    }

    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| CompletionError::InvalidResponse("no completion in response".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_success() {
        let body = r#"{"id":"gen-1","choices":[{"message":{"role":"assistant","content":"You may claim a refund."}}]}"#;
        assert_eq!(parse_response(200, body).unwrap(), "You may claim a refund.");
    }

    #[test]
    fn test_parse_error_status_keeps_body() {
        let err = parse_response(500, "boom").unwrap_err();
        assert!(matches!(err, CompletionError::Status { status: 500, .. }));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_parse_empty_choices() {
        let err = parse_response(200, r#"{"choices":[]}"#).unwrap_err();
        assert!(matches!(err, CompletionError::InvalidResponse(_)));
    }

    #[test]
    fn test_parse_blank_content() {
        let body = r#"{"choices":[{"message":{"content":"  "}}]}"#;
        assert!(parse_response(200, body).is_err());
    }

    #[test]
    fn test_request_shape() {
        let request = ChatRequest {
            model: "m",
            messages: [ChatMessage {
                role: "user",
                content: "hi",
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"model": "m", "messages": [{"role": "user", "content": "hi"}]})
        );
    }
}
