//! Command orchestration - sequences the limiter, completion provider,
//! result store and sender for each user command.
//!
//! Failures are split in two:
//! - provider and storage failures happen before any reply is attempted and
//!   are masked behind the generic temporary-error notice (cause logged only);
//! - a failure to deliver a message to the user has no channel left to be
//!   reported through and is returned to the caller as [`CommandError`].

mod config;
mod context;


use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::domain::{ChatId, Command, HELP_MESSAGE, Language};
use crate::error::{CommandError, Interrupted};
use crate::ports::{
    CompletionProvider, DeliveryError, MessageSender, PreferenceStore, RateLimiter, ResultStore,
};

pub use config::{Notices, OrchestratorConfig};
pub use context::CallContext;

/// Outcome of a command that did not fail hard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Every reply for the command was delivered.
    Delivered,
    /// The chat is over quota; the quota notice was delivered.
    QuotaDenied,
    /// A collaborator failed; the temporary-error notice was delivered.
    SoftFailure(SoftFailure),
    /// Local state was updated; nothing was sent.
    Applied,
}

/// Which collaborator a soft failure was absorbed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoftFailure {
    Completion,
    Storage,
}

impl fmt::Display for SoftFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completion => f.write_str("completion provider failed"),
            Self::Storage => f.write_str("result store failed"),
        }
    }
}

/// Runs user commands against the injected collaborators.
///
/// One orchestrator is shared by every request; it holds no per-invocation
/// state, so commands from different chats run fully in parallel.
pub struct CommandOrchestrator {
    sender: Arc<dyn MessageSender>,
    completion: Arc<dyn CompletionProvider>,
    results: Arc<dyn ResultStore>,
    limiter: Arc<dyn RateLimiter>,
    preferences: Arc<dyn PreferenceStore>,
    config: OrchestratorConfig,
}

impl CommandOrchestrator {
    pub fn new(
        sender: Arc<dyn MessageSender>,
        completion: Arc<dyn CompletionProvider>,
        results: Arc<dyn ResultStore>,
        limiter: Arc<dyn RateLimiter>,
        preferences: Arc<dyn PreferenceStore>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            sender,
            completion,
            results,
            limiter,
            preferences,
            config,
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Dispatch a parsed command.
    #[tracing::instrument(skip_all, fields(chat_id = %chat, command = command.name()))]
    pub async fn handle(
        &self,
        ctx: &CallContext,
        chat: ChatId,
        command: Command,
    ) -> Result<CommandOutcome, CommandError> {
        match command {
            Command::Help => self.help(ctx, chat).await,
            Command::Claim(prompt) => self.submit_claim(ctx, chat, &prompt).await,
            Command::Recent => self.recent(ctx, chat).await,
            Command::DeleteHistory => self.delete_history(ctx, chat).await,
            Command::SetLanguage(language) => Ok(self.set_language(chat, language)),
        }
    }

    /// Send a prompt to the completion provider, save the result and send it back.
    ///
    /// Oversized prompts are rejected before the quota is charged or any
    /// collaborator is called.
    pub async fn submit_claim(
        &self,
        ctx: &CallContext,
        chat: ChatId,
        prompt: &str,
    ) -> Result<CommandOutcome, CommandError> {
        let len = prompt.len();
        if len > self.config.max_prompt_bytes {
            return Err(CommandError::PayloadTooLarge {
                len,
                max: self.config.max_prompt_bytes,
            });
        }

        let quota = self.limiter.check(chat);
        if !quota.allowed {
            tracing::warn!(
                chat_id = %chat,
                reset_after_secs = quota.reset_after.as_secs(),
                "Rate limit exceeded"
            );
            self.deliver(ctx, chat, &self.config.notices.quota_exceeded).await?;
            return Ok(CommandOutcome::QuotaDenied);
        }

        let response = match self.bounded(ctx, self.completion.complete(prompt)).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(chat_id = %chat, error = %e, "Completion request failed");
                return self.soft_failure(ctx, chat, SoftFailure::Completion).await;
            }
        };

        match self.bounded(ctx, self.results.save(chat, &response)).await {
            Ok(id) => tracing::debug!(chat_id = %chat, result_id = id, "Result saved"),
            Err(e) => {
                tracing::error!(chat_id = %chat, error = %e, "Failed to save result");
                return self.soft_failure(ctx, chat, SoftFailure::Storage).await;
            }
        }

        self.deliver(ctx, chat, &response).await?;
        Ok(CommandOutcome::Delivered)
    }

    /// Send links to the chat's most recent results, one message per result.
    ///
    /// Results are sent in the order the store returns them; the first failed
    /// delivery aborts the rest.
    pub async fn recent(
        &self,
        ctx: &CallContext,
        chat: ChatId,
    ) -> Result<CommandOutcome, CommandError> {
        let records = match self
            .bounded(ctx, self.results.recent(chat, self.config.recent_limit))
            .await
        {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(chat_id = %chat, error = %e, "Failed to load recent results");
                return self.soft_failure(ctx, chat, SoftFailure::Storage).await;
            }
        };

        for record in &records {
            let link = self.config.result_link(record.id);
            self.deliver(ctx, chat, &link).await?;
        }

        tracing::debug!(chat_id = %chat, count = records.len(), "Recent results sent");
        Ok(CommandOutcome::Delivered)
    }

    /// Remove the chat's stored history and confirm.
    pub async fn delete_history(
        &self,
        ctx: &CallContext,
        chat: ChatId,
    ) -> Result<CommandOutcome, CommandError> {
        if let Err(e) = self.bounded(ctx, self.results.delete_history(chat)).await {
            tracing::error!(chat_id = %chat, error = %e, "Failed to delete history");
            return self.soft_failure(ctx, chat, SoftFailure::Storage).await;
        }

        tracing::info!(chat_id = %chat, "History deleted");
        self.deliver(ctx, chat, &self.config.notices.history_deleted).await?;
        Ok(CommandOutcome::Delivered)
    }

    /// Change the chat's language preference. Never fails and sends nothing.
    pub fn set_language(&self, chat: ChatId, language: Language) -> CommandOutcome {
        tracing::debug!(chat_id = %chat, language = %language, "Language preference updated");
        self.preferences.set_language(chat, language);
        CommandOutcome::Applied
    }

    /// The chat's current language preference.
    pub fn language(&self, chat: ChatId) -> Language {
        self.preferences.language(chat)
    }

    pub async fn help(
        &self,
        ctx: &CallContext,
        chat: ChatId,
    ) -> Result<CommandOutcome, CommandError> {
        self.deliver(ctx, chat, HELP_MESSAGE).await?;
        Ok(CommandOutcome::Delivered)
    }

    async fn soft_failure(
        &self,
        ctx: &CallContext,
        chat: ChatId,
        failure: SoftFailure,
    ) -> Result<CommandOutcome, CommandError> {
        self.deliver(ctx, chat, &self.config.notices.temporary_error).await?;
        Ok(CommandOutcome::SoftFailure(failure))
    }

    async fn deliver(
        &self,
        ctx: &CallContext,
        chat: ChatId,
        text: &str,
    ) -> Result<(), DeliveryError> {
        self.bounded(ctx, self.sender.send_message(chat, text)).await
    }

    async fn bounded<T, E, F>(&self, ctx: &CallContext, fut: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: From<Interrupted>,
    {
        ctx.run(Some(self.config.call_timeout), fut).await
    }
}
