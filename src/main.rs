use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod error;
mod models;
mod services;
mod storage;

use config::Config;
use services::telemetry::{DeviceSource, OneStepGpsClient};

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::SqlitePool,
    pub devices: Arc<dyn DeviceSource>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration; a missing provider key is fatal
    let config = Config::load().context("failed to load configuration")?;
    tracing::info!("Starting server in {} mode", config.server.environment);

    // Open the preference store
    let db = storage::sqlite::connect(&config.database)
        .await
        .with_context(|| format!("failed to open preference store at {}", config.database.url))?;
    tracing::info!("Preference store ready at {}", config.database.url);

    let devices = OneStepGpsClient::new(&config.telemetry.base_url);

    // Create app state
    let state = AppState {
        db,
        devices: Arc::new(devices),
        config: Arc::new(config.clone()),
    };

    let app = api::router::create_app(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
