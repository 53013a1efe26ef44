//! Background deck-generation tasks and their progress log
//!
//! A task is created per accepted request and runs detached; the only state
//! clients observe is the append-only progress log, polled over HTTP. The
//! log's terminal entries are exactly `"SUCCESS"` or
//! `"Failed: <kind>:<message>"`, mirrored by the stored [`TaskState`] so the
//! outcome is a value, not a parsed string.

use crate::cards;
use crate::client::MojiClient;
use crate::config::Config;
use crate::deck::DeckBuild;
use crate::error::{Error, Result};
use crate::word_list;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// Unique identifier of a deck-generation task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Generate a fresh task id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a task id from its string form
    ///
    /// Returns `None` for anything that is not a UUID; besides rejecting
    /// typos, this keeps arbitrary request path segments out of filesystem
    /// joins.
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Outcome-bearing state of a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskState {
    /// The pipeline is still running
    Running,
    /// The archive was written and is ready for download
    Succeeded {
        /// Path of the written archive
        archive: PathBuf,
    },
    /// The pipeline failed; `kind` matches [`Error::kind_name`]
    Failed {
        /// Stable error kind name
        kind: String,
        /// Human-readable failure message
        message: String,
    },
}

struct TaskEntry {
    log: Vec<String>,
    state: TaskState,
}

/// In-memory store of task progress logs and states
///
/// Appends and reads take a short lock; no lock is held across await points,
/// so polling readers always observe a consistent prefix of the log.
#[derive(Default)]
pub struct TaskStore {
    tasks: RwLock<HashMap<TaskId, TaskEntry>>,
}

impl TaskStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new task, seeding its log with "Task created"
    pub fn create(&self) -> TaskId {
        let id = TaskId::new();
        self.write().insert(
            id,
            TaskEntry {
                log: vec!["Task created".to_string()],
                state: TaskState::Running,
            },
        );
        id
    }

    /// Append a progress line to a task's log
    pub fn append(&self, id: TaskId, line: impl Into<String>) {
        if let Some(entry) = self.write().get_mut(&id) {
            entry.log.push(line.into());
        }
    }

    /// Snapshot a task's progress log, or `None` for an unknown id
    pub fn log(&self, id: TaskId) -> Option<Vec<String>> {
        self.read().get(&id).map(|entry| entry.log.clone())
    }

    /// A task's current state, or `None` for an unknown id
    pub fn state(&self, id: TaskId) -> Option<TaskState> {
        self.read().get(&id).map(|entry| entry.state.clone())
    }

    /// Mark a task succeeded and append the terminal "SUCCESS" line
    pub fn complete(&self, id: TaskId, archive: PathBuf) {
        if let Some(entry) = self.write().get_mut(&id) {
            entry.log.push("SUCCESS".to_string());
            entry.state = TaskState::Succeeded { archive };
        }
    }

    /// Mark a task failed and append the terminal "Failed: ..." line
    pub fn fail(&self, id: TaskId, kind: &str, message: &str) {
        if let Some(entry) = self.write().get_mut(&id) {
            entry.log.push(format!("Failed: {kind}:{message}"));
            entry.state = TaskState::Failed {
                kind: kind.to_string(),
                message: message.to_string(),
            };
        }
    }

    // A poisoned lock only means a panic mid-append; the map itself stays usable.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<TaskId, TaskEntry>> {
        self.tasks.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<TaskId, TaskEntry>> {
        self.tasks.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Spawn the deck-generation pipeline for a task
///
/// The returned handle is informational; the task is not cancelled by
/// dropping it. Every outcome, success or failure, ends up in the task's
/// progress log — no error crosses this boundary.
pub fn spawn_generate(
    client: Arc<MojiClient>,
    config: Arc<Config>,
    store: Arc<TaskStore>,
    list_url: String,
    task_id: TaskId,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        match generate_deck(&client, &config, &store, &list_url, task_id).await {
            Ok(archive) => {
                tracing::info!(%task_id, archive = %archive.display(), "Deck generation succeeded");
                store.complete(task_id, archive);
            }
            Err(e) => {
                tracing::error!(%task_id, error = %e, "Deck generation failed");
                store.fail(task_id, e.kind_name(), &e.to_string());
            }
        }
    })
}

/// The full pipeline: list → word ids → cards → archive
async fn generate_deck(
    client: &MojiClient,
    config: &Config,
    store: &TaskStore,
    list_url: &str,
    task_id: TaskId,
) -> Result<PathBuf> {
    let list_id = word_list::extract_list_id(list_url)?;

    let word_list = word_list::fetch_word_list(client, config, &list_id, |line| {
        store.append(task_id, line);
    })
    .await?;

    tracing::info!(%task_id, entries = word_list.entries.len(), "Word list fetched");
    store.append(task_id, "Word list fetched, resolving word ids...");

    let word_ids = word_list::word_ids(&word_list.entries);
    if word_ids.is_empty() {
        return Err(Error::data("word list has no words"));
    }
    if (word_ids.len() as u32) < word_list.first_page_size {
        return Err(Error::data("not signed in, data access is restricted"));
    }

    store.append(
        task_id,
        "Fetching audio and generating cards (this can take a while)...",
    );

    let mut deck = DeckBuild::new(config, task_id).await?;
    let total = word_ids.len();
    for (n, word_id) in word_ids.iter().enumerate() {
        tracing::info!(%task_id, word_id, card = n + 1, total, "Generating card");
        store.append(task_id, format!("Generating card {}/{total}", n + 1));

        let failed_audio =
            cards::generate_card(client, config, &mut deck, word_id, &word_list.name).await?;
        if let Some(file) = failed_audio {
            tracing::warn!(%task_id, file, "Audio download failed");
            store.append(task_id, format!("Audio download failed: {file}"));
        }
    }

    deck.write_package(config, task_id).await
}
