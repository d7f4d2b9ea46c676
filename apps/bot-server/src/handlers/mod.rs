//! HTTP handlers and route configuration.

mod health;
mod webhook;

use actix_web::web;

use crate::middleware::error::AppError;

/// Largest accepted update body. Telegram caps message text well below this.
const MAX_UPDATE_BYTES: usize = 256 * 1024;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::resource("/telegram/webhook")
                .app_data(
                    web::JsonConfig::default()
                        .limit(MAX_UPDATE_BYTES)
                        .error_handler(|err, _req| AppError::from(err).into()),
                )
                .route(web::post().to(webhook::telegram_webhook)),
        );
}
