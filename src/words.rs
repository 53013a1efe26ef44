//! Per-word detail and pronunciation audio retrieval
//!
//! Detail fetches are single requests with no retry. Audio is a two-step
//! operation: the voice endpoint issues a signed URL (errors propagate), then
//! the bytes are downloaded with one bounded retry. A failed download is a
//! soft failure reported as `false` so one missing clip never aborts a run.

use crate::client::MojiClient;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::retry;
use crate::types::{TARGET_TYPE_WORD, VoiceResult, WordDetail, WordDetailBatch};
use serde_json::json;
use std::path::Path;

/// Some endpoints reject the JSON content type despite carrying JSON bodies
const TEXT_PLAIN: &[(&str, &str)] = &[("Content-Type", "text/plain")];

/// Fetch the detail payload for a single word
pub async fn fetch_word_detail(
    client: &MojiClient,
    config: &Config,
    word_id: &str,
) -> Result<WordDetail> {
    let body = json!({"itemsJson": [{"objectId": word_id, "lfd": 0}]});
    client
        .post(&config.service.word_detail_url, body, TEXT_PLAIN)
        .await
}

/// Fetch detail payloads for many words in one request
pub async fn fetch_word_detail_batch(
    client: &MojiClient,
    config: &Config,
    word_ids: &[String],
) -> Result<Vec<WordDetail>> {
    let items: Vec<_> = word_ids.iter().map(|id| json!({"objectId": id})).collect();
    let body = json!({"itemsJson": items, "skipAccessories": false});
    let batch: WordDetailBatch = client
        .post(&config.service.word_detail_batch_url, body, TEXT_PLAIN)
        .await?;
    Ok(batch.details)
}

/// Download a word's pronunciation audio into `voice_dir`
///
/// Requests a signed URL from the voice endpoint, then downloads the bytes
/// with at most one retry on any download error. Returns `Ok(true)` once
/// `{word_id}.mp3` is written, `Ok(false)` when the download failed after
/// retries (soft failure — the caller reports it and keeps going).
///
/// # Errors
///
/// Voice-endpoint failures and file-write failures are hard errors and
/// propagate; only the byte download itself is downgraded.
pub async fn fetch_word_voice(
    client: &MojiClient,
    config: &Config,
    word_id: &str,
    voice_dir: &Path,
) -> Result<bool> {
    let body = json!({
        "tarId": word_id,
        "tarType": TARGET_TYPE_WORD,
        "voiceId": config.service.voice_id,
    });
    let ticket: VoiceResult = client
        .post(&config.service.word_voice_url, body, TEXT_PLAIN)
        .await?;

    let download = retry::retry_any(config.retry.max_retries, "audio download", || {
        let http = client.http().clone();
        let url = ticket.voice.url.clone();
        async move {
            let response = http.get(&url).send().await?;
            let response = response.error_for_status()?;
            Ok::<_, Error>(response.bytes().await?)
        }
    })
    .await;

    let audio = match download {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(word_id, error = %e, "Audio download failed, continuing without it");
            return Ok(false);
        }
    };

    tokio::fs::write(voice_dir.join(format!("{word_id}.mp3")), &audio).await?;
    Ok(true)
}
