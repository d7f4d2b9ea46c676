//! Application state - shared across all handlers.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use legalbot_core::{CommandError, CommandOrchestrator, CommandOutcome};
use legalbot_core::commands::CallContext;
use legalbot_core::domain::{ChatId, Command};
use legalbot_core::ports::{
    CompletionError, CompletionProvider, DeliveryError, MessageSender, ResultStore,
};
use legalbot_infra::{InMemoryPreferenceStore, InMemoryResultStore, SlidingWindowLimiter};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::Instrument;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<CommandOrchestrator>,
    pub webhook_secret: Option<Arc<str>>,
    pub update_timeout: Duration,
    cancel: Arc<watch::Sender<bool>>,
    in_flight: Arc<Mutex<JoinSet<UpdateResult>>>,
}

type UpdateResult = Result<CommandOutcome, CommandError>;

/// How the in-flight updates ended during shutdown.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DrainReport {
    pub completed: usize,
    pub failed: usize,
    /// Still running when the grace period ran out.
    pub abandoned: usize,
}

/// Sender used when no bot token is configured - replies only go to the log.
pub struct LogOnlySender;

#[async_trait::async_trait]
impl MessageSender for LogOnlySender {
    async fn send_message(&self, chat: ChatId, text: &str) -> Result<(), DeliveryError> {
        tracing::info!(chat_id = %chat, text, "Telegram not configured - reply logged only");
        Ok(())
    }
}

/// Completion provider used when no API key is configured.
pub struct UnconfiguredCompletion;

#[async_trait::async_trait]
impl CompletionProvider for UnconfiguredCompletion {
    async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
        Err(CompletionError::Request(
            "completion provider not configured".to_string(),
        ))
    }
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let results = build_result_store(config).await;
        let sender = build_sender(config)?;
        let completion = build_completion(config)?;

        let limiter = Arc::new(SlidingWindowLimiter::new(config.rate_limit.clone()));
        let preferences = Arc::new(InMemoryPreferenceStore::new());

        let orchestrator = CommandOrchestrator::new(
            sender,
            completion,
            results,
            limiter,
            preferences,
            config.orchestrator.clone(),
        );

        if config.webhook_secret.is_none() {
            tracing::warn!(
                "TELEGRAM_SECRET_TOKEN not set. Webhook accepts unauthenticated updates."
            );
        }

        tracing::info!(
            max_requests = config.rate_limit.max_requests,
            window_secs = config.rate_limit.window.as_secs(),
            "Application state initialized"
        );

        Ok(Self::from_parts(
            orchestrator,
            config.webhook_secret.as_deref(),
            config.update_timeout,
        ))
    }

    /// Assemble state around an already-built orchestrator.
    pub fn from_parts(
        orchestrator: CommandOrchestrator,
        webhook_secret: Option<&str>,
        update_timeout: Duration,
    ) -> Self {
        let (cancel, _) = watch::channel(false);
        Self {
            orchestrator: Arc::new(orchestrator),
            webhook_secret: webhook_secret.map(Arc::from),
            update_timeout,
            cancel: Arc::new(cancel),
            in_flight: Arc::new(Mutex::new(JoinSet::new())),
        }
    }

    /// Handle a command in the background; the webhook answers without waiting.
    ///
    /// Soft failures were already reported to the user by the orchestrator.
    /// Hard failures end here and are only logged.
    pub fn dispatch(&self, update_id: i64, chat: ChatId, command: Command) {
        let orchestrator = Arc::clone(&self.orchestrator);
        let ctx = CallContext::unbounded()
            .with_timeout(self.update_timeout)
            .with_cancellation(self.cancel.subscribe());
        let span = tracing::info_span!(
            "update",
            update_id,
            request_id = %uuid::Uuid::new_v4()
        );

        let task = async move {
            let result = orchestrator.handle(&ctx, chat, command).await;
            match &result {
                Ok(outcome) => tracing::debug!(?outcome, "Update handled"),
                Err(e) if e.is_input_error() => {
                    tracing::warn!(chat_id = %chat, error = %e, "Command rejected")
                }
                Err(e) => tracing::error!(chat_id = %chat, error = %e, "Update failed"),
            }
            result
        };

        let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        // Reap finished updates so the set only holds running ones
        while in_flight.try_join_next().is_some() {}
        in_flight.spawn(task.instrument(span));
    }

    /// Cancel every in-flight update and wait up to `grace` for them to wind down.
    pub async fn shutdown(&self, grace: Duration) -> DrainReport {
        self.cancel.send_replace(true);

        let mut tasks = {
            let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
            std::mem::take(&mut *in_flight)
        };
        let mut report = DrainReport::default();

        let drained = tokio::time::timeout(grace, async {
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok(Ok(_)) => report.completed += 1,
                    Ok(Err(_)) => report.failed += 1,
                    Err(e) => {
                        tracing::error!(error = %e, "Update task panicked");
                        report.failed += 1;
                    }
                }
            }
        })
        .await;

        if drained.is_err() {
            report.abandoned = tasks.len();
            tracing::warn!(abandoned = report.abandoned, "Shutdown grace period elapsed");
            tasks.abort_all();
        }

        report
    }
}

#[cfg(feature = "postgres")]
async fn build_result_store(config: &AppConfig) -> Arc<dyn ResultStore> {
    use legalbot_infra::PostgresResultStore;
    use legalbot_infra::database::connect;

    let Some(db_config) = config.database.as_ref() else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return Arc::new(InMemoryResultStore::new());
    };

    match connect(db_config).await {
        Ok(db) => {
            tracing::info!("Database connection established");
            Arc::new(PostgresResultStore::new(db))
        }
        Err(e) => {
            tracing::error!(
                "Failed to connect to database: {}. Using in-memory fallback.",
                e
            );
            Arc::new(InMemoryResultStore::new())
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn build_result_store(_config: &AppConfig) -> Arc<dyn ResultStore> {
    tracing::info!("Running without postgres feature - using in-memory result store");
    Arc::new(InMemoryResultStore::new())
}

#[cfg(feature = "telegram")]
fn build_sender(config: &AppConfig) -> anyhow::Result<Arc<dyn MessageSender>> {
    match config.telegram.clone() {
        Some(telegram) => Ok(Arc::new(legalbot_infra::TelegramSender::new(telegram)?)),
        None => {
            tracing::warn!("TELEGRAM_BOT_TOKEN not set. Replies are logged only.");
            Ok(Arc::new(LogOnlySender))
        }
    }
}

#[cfg(not(feature = "telegram"))]
fn build_sender(_config: &AppConfig) -> anyhow::Result<Arc<dyn MessageSender>> {
    tracing::info!("Running without telegram feature - replies are logged only");
    Ok(Arc::new(LogOnlySender))
}

#[cfg(feature = "openrouter")]
fn build_completion(config: &AppConfig) -> anyhow::Result<Arc<dyn CompletionProvider>> {
    match config.openrouter.clone() {
        Some(openrouter) => Ok(Arc::new(legalbot_infra::OpenRouterClient::new(openrouter)?)),
        None => {
            tracing::warn!(
                "OPENROUTER_API_KEY not set. Claims will receive the temporary-error notice."
            );
            Ok(Arc::new(UnconfiguredCompletion))
        }
    }
}

#[cfg(not(feature = "openrouter"))]
fn build_completion(_config: &AppConfig) -> anyhow::Result<Arc<dyn CompletionProvider>> {
    tracing::info!("Running without openrouter feature - completion disabled");
    Ok(Arc::new(UnconfiguredCompletion))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use legalbot_core::commands::OrchestratorConfig;
    use legalbot_infra::RateLimitConfig;

    use super::*;

    /// Sender whose replies never complete.
    #[derive(Default)]
    struct StalledSender {
        attempts: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl MessageSender for StalledSender {
        async fn send_message(&self, _chat: ChatId, _text: &str) -> Result<(), DeliveryError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            std::future::pending::<()>().await;
            Ok(())
        }
    }

    fn state(sender: Arc<dyn MessageSender>) -> AppState {
        let orchestrator = CommandOrchestrator::new(
            sender,
            Arc::new(UnconfiguredCompletion),
            Arc::new(InMemoryResultStore::new()),
            Arc::new(SlidingWindowLimiter::new(RateLimitConfig::default())),
            Arc::new(InMemoryPreferenceStore::new()),
            OrchestratorConfig::default(),
        );
        AppState::from_parts(orchestrator, None, Duration::from_secs(600))
    }

    #[tokio::test]
    async fn test_shutdown_cancels_in_flight_update() {
        let sender = Arc::new(StalledSender::default());
        let state = state(sender.clone());

        state.dispatch(1, ChatId(7), Command::Help);
        for _ in 0..100 {
            if sender.attempts.load(Ordering::SeqCst) > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(sender.attempts.load(Ordering::SeqCst), 1);

        let report = state.shutdown(Duration::from_secs(5)).await;
        assert_eq!(
            report,
            DrainReport {
                completed: 0,
                failed: 1,
                abandoned: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_shutdown_counts_finished_updates() {
        let state = state(Arc::new(LogOnlySender));

        state.dispatch(1, ChatId(7), Command::Help);
        let report = state.shutdown(Duration::from_secs(5)).await;

        assert_eq!(report.completed, 1);
        assert_eq!(report.failed, 0);
    }

    #[tokio::test]
    async fn test_dispatch_after_shutdown_is_cancelled() {
        let sender = Arc::new(StalledSender::default());
        let state = state(sender.clone());
        state.shutdown(Duration::from_secs(1)).await;

        state.dispatch(2, ChatId(7), Command::Help);
        let report = state.shutdown(Duration::from_secs(5)).await;

        assert_eq!(report.failed, 1);
        assert_eq!(sender.attempts.load(Ordering::SeqCst), 0);
    }
}
