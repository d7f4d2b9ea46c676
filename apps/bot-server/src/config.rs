//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use legalbot_core::commands::OrchestratorConfig;
use legalbot_infra::RateLimitConfig;

#[cfg(feature = "postgres")]
use legalbot_infra::DatabaseConfig;
#[cfg(feature = "openrouter")]
use legalbot_infra::OpenRouterConfig;
#[cfg(feature = "telegram")]
use legalbot_infra::TelegramConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Expected value of the `X-Telegram-Bot-Api-Secret-Token` header.
    pub webhook_secret: Option<String>,
    /// Overall budget for handling one update.
    pub update_timeout: Duration,
    /// How long shutdown waits for cancelled updates to finish.
    pub shutdown_grace: Duration,
    pub rate_limit: RateLimitConfig,
    pub orchestrator: OrchestratorConfig,
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
    #[cfg(feature = "telegram")]
    pub telegram: Option<TelegramConfig>,
    #[cfg(feature = "openrouter")]
    pub openrouter: Option<OpenRouterConfig>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            webhook_secret: env::var("TELEGRAM_SECRET_TOKEN")
                .ok()
                .filter(|s| !s.is_empty()),
            update_timeout: Duration::from_secs(
                env::var("UPDATE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(120),
            ),
            shutdown_grace: Duration::from_secs(
                env::var("SHUTDOWN_GRACE_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            ),
            rate_limit: RateLimitConfig::from_env(),
            orchestrator: OrchestratorConfig::from_env(),
            #[cfg(feature = "postgres")]
            database: DatabaseConfig::from_env(),
            #[cfg(feature = "telegram")]
            telegram: TelegramConfig::from_env(),
            #[cfg(feature = "openrouter")]
            openrouter: OpenRouterConfig::from_env(),
        }
    }
}
