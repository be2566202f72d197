//! Malaria Risk Server - entry point

use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use malaria_risk_server::{create_router, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before reading RUST_LOG and the rest of the configuration
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("Invalid configuration")?;

    // Initialize logging; JSON lines in production
    let json = config.is_production();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "malaria_risk_server=debug,malaria_risk_core=info,tower_http=debug".into()
        }))
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();

    tracing::info!("Malaria Risk Server starting ({})...", config.environment);
    tracing::info!("Model directory: {}", config.model_dir.display());

    let state = AppState::initialize(config.clone()).context("Failed to load models")?;

    // Keep the watchers alive for the life of the server
    let _watchers = if config.watch_models {
        vec![
            state
                .models
                .watch(&config.model_dir)
                .context("Failed to watch model directory")?,
            state
                .dashboard_models
                .watch(&config.dashboard_model_dir)
                .context("Failed to watch dashboard model directory")?,
        ]
    } else {
        Vec::new()
    };

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
