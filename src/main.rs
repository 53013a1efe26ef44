//! moji2anki server binary
//!
//! Reads an optional JSON configuration file from the path in the
//! `MOJI2ANKI_CONFIG` environment variable, creates the working directories,
//! and serves the task API until SIGTERM/SIGINT.

use moji2anki::api::AppState;
use moji2anki::config::Config;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Arc::new(load_config()?);
    config.storage.ensure_directories()?;

    tracing::info!(
        bind_address = %config.api.bind_address,
        voice_dir = %config.storage.voice_dir.display(),
        deck_dir = %config.storage.deck_dir.display(),
        "Starting moji2anki"
    );

    let state = AppState::new(config)?;
    moji2anki::run_with_shutdown(state).await?;

    tracing::info!("Caches purged, goodbye");
    Ok(())
}

fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    match std::env::var_os("MOJI2ANKI_CONFIG") {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)?;
            let config = serde_json::from_str(&raw)?;
            tracing::info!(path = %path.to_string_lossy(), "Loaded configuration file");
            Ok(config)
        }
        None => Ok(Config::default()),
    }
}
