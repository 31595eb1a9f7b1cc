use anyhow::Context;
use tracing::info;

use movequote_web::config::AppConfig;
use movequote_web::{app, telemetry, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    telemetry::init(&config.telemetry).context("failed to initialise tracing")?;

    let addr = config.server.socket_addr()?;
    info!(
        currency = %config.pricing.currency,
        packages = config.pricing.packages.len(),
        "Pricing rates loaded"
    );

    let state = AppState::new(config);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
