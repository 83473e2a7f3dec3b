use std::time::Duration;

use mindscan_instruments::InstrumentRegistry;
use mindscan_server::config;
use mindscan_server::state::AppState;
use mindscan_storage::{AssessmentStore, SealingKey};
use tracing_subscriber::EnvFilter;

const PURGE_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    let config_path = config::config_path()?;
    let config = config::load_or_init(&config_path)?;
    tracing::info!(
        config = %config_path.display(),
        database = %config.database_path.display(),
        retention_days = config.retention_days,
        "configuration loaded"
    );

    let mut registry = InstrumentRegistry::builtin();
    if let Some(dir) = &config.instruments_dir {
        registry = registry.load_dir(dir)?;
    }
    tracing::info!(instruments = registry.len(), "instrument registry ready");

    let key = SealingKey::derive(&config::encryption_secret(), config.encryption_salt.as_bytes());
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let store = AssessmentStore::open(&config.database_path, key, config.encryption_salt.clone())?;

    let state = AppState::new(registry, store, config.retention());
    mindscan_server::purge_expired(&state).await?;

    if state.retention.is_some() {
        let purge_state = state.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(PURGE_INTERVAL);
            interval.tick().await;
            loop {
                interval.tick().await;
                if let Err(e) = mindscan_server::purge_expired(&purge_state).await {
                    tracing::warn!(error = %e, "retention purge failed");
                }
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "mindscan server listening");
    axum::serve(listener, mindscan_server::app(state)).await?;
    Ok(())
}
