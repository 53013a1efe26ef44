//! Working-directory cleanup
//!
//! The purge runs at process shutdown, not per task: finished archives must
//! stay downloadable until the service goes away. Deleting is idempotent and
//! tolerates directories that were never created.

use crate::config::Config;
use crate::error::Result;
use std::path::Path;

/// Delete cached audio and archives from both working directories
///
/// Removes every regular file directly under the deck directory, and every
/// regular file and per-task subdirectory under the voice directory.
pub async fn purge_cache(config: &Config) -> Result<()> {
    purge_dir(&config.storage.voice_dir, true).await?;
    purge_dir(&config.storage.deck_dir, false).await?;
    Ok(())
}

async fn purge_dir(dir: &Path, remove_subdirs: bool) -> Result<()> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let file_type = entry.file_type().await?;
        if file_type.is_file() {
            tokio::fs::remove_file(&path).await?;
            tracing::debug!(path = %path.display(), "Deleted file");
        } else if remove_subdirs && file_type.is_dir() {
            tokio::fs::remove_dir_all(&path).await?;
            tracing::debug!(path = %path.display(), "Deleted task audio directory");
        }
    }
    Ok(())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(root: &Path) -> Config {
        let mut config = Config::default();
        config.storage.voice_dir = root.join("voice");
        config.storage.deck_dir = root.join("deck");
        config.storage.font_dir = root.join("fonts");
        config
    }

    #[tokio::test]
    async fn purge_removes_files_and_task_dirs() {
        let temp = tempfile::tempdir().unwrap();
        let config = test_config(temp.path());
        config.storage.ensure_directories().unwrap();

        std::fs::write(config.storage.voice_dir.join("stray.mp3"), b"x").unwrap();
        let task_dir = config.storage.voice_dir.join("3d9c7a");
        std::fs::create_dir(&task_dir).unwrap();
        std::fs::write(task_dir.join("w1.mp3"), b"x").unwrap();
        std::fs::write(config.storage.deck_dir.join("t.apkg"), b"x").unwrap();

        purge_cache(&config).await.unwrap();

        assert!(!config.storage.voice_dir.join("stray.mp3").exists());
        assert!(!task_dir.exists());
        assert!(!config.storage.deck_dir.join("t.apkg").exists());
        // The working directories themselves survive
        assert!(config.storage.voice_dir.is_dir());
        assert!(config.storage.deck_dir.is_dir());
    }

    #[tokio::test]
    async fn purge_keeps_subdirectories_of_deck_dir() {
        let temp = tempfile::tempdir().unwrap();
        let config = test_config(temp.path());
        config.storage.ensure_directories().unwrap();

        let keep = config.storage.deck_dir.join("keep-me");
        std::fs::create_dir(&keep).unwrap();

        purge_cache(&config).await.unwrap();

        assert!(keep.is_dir());
    }

    #[tokio::test]
    async fn purge_is_idempotent_on_empty_dirs() {
        let temp = tempfile::tempdir().unwrap();
        let config = test_config(temp.path());
        config.storage.ensure_directories().unwrap();

        purge_cache(&config).await.unwrap();
        purge_cache(&config).await.unwrap();
    }

    #[tokio::test]
    async fn purge_tolerates_missing_dirs() {
        let temp = tempfile::tempdir().unwrap();
        let config = test_config(temp.path());
        // ensure_directories intentionally not called

        purge_cache(&config).await.unwrap();
    }
}
