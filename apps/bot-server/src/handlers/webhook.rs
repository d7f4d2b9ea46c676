//! Telegram webhook endpoint.
//!
//! Telegram retries any update that is not answered with 2xx, so once the
//! caller is authenticated every well-formed update is acknowledged and the
//! command runs in the background.

use actix_web::{HttpResponse, web};
use legalbot_core::domain::{ChatId, Command};
use legalbot_shared::dto::Update;

use crate::middleware::error::AppResult;
use crate::middleware::secret_token::VerifiedWebhook;
use crate::state::AppState;

/// POST /telegram/webhook
pub async fn telegram_webhook(
    _verified: VerifiedWebhook,
    state: web::Data<AppState>,
    body: web::Json<Update>,
) -> AppResult<HttpResponse> {
    let update = body.into_inner();

    let Some(message) = update.command_message() else {
        tracing::debug!(update_id = update.update_id, "Ignoring update without a message");
        return Ok(HttpResponse::Ok().finish());
    };
    let Some(command) = message.text.as_deref().and_then(Command::parse) else {
        tracing::debug!(update_id = update.update_id, "Ignoring message without a command");
        return Ok(HttpResponse::Ok().finish());
    };

    let chat = ChatId(message.chat.id);
    tracing::info!(
        update_id = update.update_id,
        chat_id = %chat,
        command = command.name(),
        "Update received"
    );
    state.dispatch(update.update_id, chat, command);

    Ok(HttpResponse::Ok().finish())
}
