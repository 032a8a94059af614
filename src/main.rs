use anyhow::{bail, Context};
use chrono::Utc;
use tracing_subscriber::EnvFilter;

use funeral_api::{app, config, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up JWT_SECRET, DATA_DIR, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting Funeral Platform API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        bail!("JWT_SECRET must be set outside development");
    }
    if config.is_production() && config.security.webhook_secret.is_none() {
        tracing::warn!("WEBHOOK_SECRET is not set; the mark-paid webhook is open");
    }

    let state = AppState::new(config.clone()).context("failed to initialise application state")?;

    if let (Some(email), Some(password)) = (
        config.security.bootstrap_superadmin_email.as_deref(),
        config.security.bootstrap_superadmin_password.as_deref(),
    ) {
        if state.sessions.bootstrap(email, password, Utc::now()).await? {
            tracing::info!(email = %email, "seeded superadmin account");
        }
    }

    let bind_addr = format!("{}:{}", config.server.bind_addr, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Funeral Platform API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
