//! # Legalbot Bot Server
//!
//! Actix-web server receiving Telegram webhook updates.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Legalbot server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config).await?;
    let server_state = state.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    tracing::info!("Server stopped, cancelling in-flight updates");
    let report = server_state.shutdown(config.shutdown_grace).await;
    tracing::info!(
        completed = report.completed,
        failed = report.failed,
        abandoned = report.abandoned,
        "In-flight updates drained"
    );

    Ok(())
}
