//! Webhook authentication via the Telegram secret-token header.

use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};

use super::error::AppError;
use crate::state::AppState;

/// Header Telegram sets on every webhook call when a secret was registered.
pub const SECRET_TOKEN_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";

/// Proof that a request carried the configured webhook secret.
///
/// Extraction fails with 401 when the header is missing or wrong. With no
/// secret configured every request passes.
#[derive(Debug, Clone, Copy)]
pub struct VerifiedWebhook;

impl FromRequest for VerifiedWebhook {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(verify(req))
    }
}

fn verify(req: &HttpRequest) -> Result<VerifiedWebhook, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Internal("AppState not configured".to_string()))?;

    let Some(expected) = state.webhook_secret.as_deref() else {
        return Ok(VerifiedWebhook);
    };

    let provided = req
        .headers()
        .get(SECRET_TOKEN_HEADER)
        .map(|v| v.as_bytes())
        .unwrap_or_default();

    if constant_time_eq(provided, expected.as_bytes()) {
        Ok(VerifiedWebhook)
    } else {
        tracing::warn!("Webhook call with missing or invalid secret token");
        Err(AppError::Unauthorized)
    }
}

/// Compare two byte strings without short-circuiting on the first mismatch.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
