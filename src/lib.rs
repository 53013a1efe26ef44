//! # moji2anki
//!
//! Background service that packages MOJi dictionary word lists into Anki
//! `.apkg` decks.
//!
//! ## How it works
//!
//! A client submits a word-list share URL to `GET /create-apkg/` and gets a
//! task id back immediately. A detached background task then walks the
//! paginated list, resolves the folder hierarchy into a provenance tag,
//! fetches each word's detail and pronunciation audio (one bounded retry,
//! soft failure), builds one note per word, and packages notes plus media
//! into `{task_id}.apkg`. The client polls `GET /progress-log/{task_id}`
//! until the final line is `"SUCCESS"` or `"Failed: <kind>:<message>"`, then
//! fetches the archive from `GET /download-apkg/{task_id}`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use moji2anki::{api::AppState, config::Config};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Arc::new(Config::default());
//!     config.storage.ensure_directories()?;
//!
//!     let state = AppState::new(config)?;
//!     moji2anki::run_with_shutdown(state).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Working-directory cleanup
pub mod cache;
/// Flash-card construction
pub mod cards;
/// Dictionary service client
pub mod client;
/// Configuration types
pub mod config;
/// Per-task deck assembly and packaging
pub mod deck;
/// Error types
pub mod error;
/// Bounded retry and request pacing
pub mod retry;
/// Background tasks and progress logs
pub mod tasks;
/// Dictionary service payload types
pub mod types;
/// Word list retrieval and pagination
pub mod word_list;
/// Word detail and audio retrieval
pub mod words;

// Re-export commonly used types
pub use client::MojiClient;
pub use config::Config;
pub use error::{ApiError, Error, ErrorDetail, Result, ToHttpStatus};
pub use tasks::{TaskId, TaskState, TaskStore};

/// Run the API server until a termination signal, then purge the caches.
///
/// Waits for SIGTERM/SIGINT (Ctrl+C elsewhere) while serving; once a signal
/// arrives, the transient audio and archive caches are deleted. Archives stay
/// downloadable for the whole lifetime of the process, matching the polling
/// contract.
pub async fn run_with_shutdown(state: api::AppState) -> Result<()> {
    let config = state.config.clone();

    tokio::select! {
        result = api::start_api_server(state) => result?,
        _ = wait_for_signal() => {
            tracing::info!("Termination signal received, shutting down");
        }
    }

    cache::purge_cache(&config).await
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => tracing::info!("Received SIGTERM signal"),
                _ = sigint.recv() => tracing::info!("Received SIGINT signal (Ctrl+C)"),
            }
        }
        // Restricted environments (containers, tests) can refuse signal
        // registration; fall back to ctrl_c
        _ => {
            tracing::warn!("Could not register signal handlers, using ctrl_c fallback");
            tokio::signal::ctrl_c().await.ok();
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl+C signal"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl+C signal"),
    }
}
