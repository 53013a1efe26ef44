//! Application state for the API server

use crate::client::MojiClient;
use crate::config::Config;
use crate::error::Result;
use crate::tasks::TaskStore;
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// Cloned per request (cheap Arc clones); holds the dictionary client, the
/// configuration, and the in-memory task store.
#[derive(Clone)]
pub struct AppState {
    /// Configuration
    pub config: Arc<Config>,

    /// Dictionary service client shared by all background tasks
    pub client: Arc<MojiClient>,

    /// Progress logs and states of every task started by this process
    pub tasks: Arc<TaskStore>,
}

impl AppState {
    /// Create the state, building the HTTP client from the configuration
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let client = Arc::new(MojiClient::new(config.clone())?);
        Ok(Self {
            config,
            client,
            tasks: Arc::new(TaskStore::new()),
        })
    }
}
