//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`decks`] — Deck generation tasks: create, poll, download
//! - [`system`] — Health and OpenAPI spec

use serde::{Deserialize, Serialize};

mod decks;
mod system;

pub use decks::*;
pub use system::*;

// ============================================================================
// Query/Request Types (shared across handlers)
// ============================================================================

/// Query parameters for GET /create-apkg/
#[derive(Debug, Deserialize, Serialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CreateApkgQuery {
    /// Share URL of the word list to convert
    pub url: String,
}

/// Response body for GET /create-apkg/
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CreateApkgResponse {
    /// Id of the spawned task; poll /progress-log/{task_id} with it
    pub task_id: String,
}

/// Response body for GET /progress-log/{task_id}
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ProgressLogResponse {
    /// The polled task id
    pub task_id: String,
    /// Progress lines in append order; the last line is "SUCCESS" or
    /// "Failed: <kind>:<message>" once the task is finished
    pub progress_log: Vec<String>,
}
