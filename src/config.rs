//! Configuration types for moji2anki

use serde::{Deserialize, Serialize};
use std::{collections::HashMap, net::SocketAddr, path::PathBuf, time::Duration};

/// Dictionary service configuration (endpoints, credentials, protocol constants)
///
/// The application result codes, page size, sort mode, and voice id are opaque
/// values dictated by the upstream service; they are configuration, not logic.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Word list page endpoint
    #[serde(default = "default_word_list_url")]
    pub word_list_url: String,

    /// Single word detail endpoint
    #[serde(default = "default_word_detail_url")]
    pub word_detail_url: String,

    /// Batched word detail endpoint
    #[serde(default = "default_word_detail_batch_url")]
    pub word_detail_batch_url: String,

    /// Word audio (TTS) endpoint
    #[serde(default = "default_word_voice_url")]
    pub word_voice_url: String,

    /// Credential payload merged into every request body
    ///
    /// Typically `_ApplicationId`, `_ClientVersion`, `_InstallationId`, and
    /// `_SessionToken`. An empty session token limits access to public lists.
    #[serde(default = "default_credentials")]
    pub credentials: HashMap<String, String>,

    /// Header set applied to every request
    #[serde(default = "default_headers")]
    pub headers: HashMap<String, String>,

    /// Request timeout (default: 10 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,

    /// List page size (default: 50)
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// List sort mode (default: 0)
    #[serde(default)]
    pub sort_type: u32,

    /// Voice id requested from the audio endpoint (default: "f002")
    #[serde(default = "default_voice_id")]
    pub voice_id: String,

    /// Application result code meaning success (default: 200)
    #[serde(default = "default_code_success")]
    pub code_success: i64,

    /// Application result code meaning "list missing or inaccessible"
    /// (default: 100000006)
    #[serde(default = "default_code_list_unavailable")]
    pub code_list_unavailable: i64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            word_list_url: default_word_list_url(),
            word_detail_url: default_word_detail_url(),
            word_detail_batch_url: default_word_detail_batch_url(),
            word_voice_url: default_word_voice_url(),
            credentials: default_credentials(),
            headers: default_headers(),
            request_timeout: default_request_timeout(),
            page_size: default_page_size(),
            sort_type: 0,
            voice_id: default_voice_id(),
            code_success: default_code_success(),
            code_list_unavailable: default_code_list_unavailable(),
        }
    }
}

/// Working directory configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Audio cache root; each task gets its own subdirectory (default: "./voice_temp")
    #[serde(default = "default_voice_dir")]
    pub voice_dir: PathBuf,

    /// Archive output directory (default: "./deck_temp")
    #[serde(default = "default_deck_dir")]
    pub deck_dir: PathBuf,

    /// Read-only font asset directory bundled into every deck (default: "./fonts")
    #[serde(default = "default_font_dir")]
    pub font_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            voice_dir: default_voice_dir(),
            deck_dir: default_deck_dir(),
            font_dir: default_font_dir(),
        }
    }
}

impl StorageConfig {
    /// Create the voice and deck working directories if missing.
    ///
    /// The font directory is read-only input and is not created.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.voice_dir)?;
        std::fs::create_dir_all(&self.deck_dir)?;
        Ok(())
    }
}

/// Deck and note model configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeckConfig {
    /// Anki deck id (default: fixed)
    #[serde(default = "default_deck_id")]
    pub deck_id: i64,

    /// Anki deck name
    #[serde(default = "default_deck_name")]
    pub deck_name: String,

    /// Anki deck description
    #[serde(default = "default_deck_description")]
    pub deck_description: String,

    /// Note model id (default: fixed)
    #[serde(default = "default_model_id")]
    pub model_id: i64,

    /// Note model name
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Provenance tag attached to every note
    #[serde(default = "default_provenance_tag")]
    pub provenance_tag: String,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            deck_id: default_deck_id(),
            deck_name: default_deck_name(),
            deck_description: default_deck_description(),
            model_id: default_model_id(),
            model_name: default_model_name(),
            provenance_tag: default_provenance_tag(),
        }
    }
}

/// Retry configuration for the audio download step
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt (default: 1)
    ///
    /// Exhausting retries is a soft failure: the word keeps its audio
    /// reference but the media file is missing from the archive.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
        }
    }
}

/// Request pacing configuration
///
/// A randomized delay inserted between list pages and before each audio
/// fetch, to avoid tripping upstream rate limiting.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Minimum delay in milliseconds (default: 150)
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,

    /// Maximum delay in milliseconds (default: 500)
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: default_min_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

/// API server configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Address to bind to (default: 127.0.0.1:8920)
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Enable Swagger UI at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: true,
        }
    }
}

/// Main configuration for moji2anki
///
/// Fields are organized into logical sub-configs:
/// - [`service`](ServiceConfig) — dictionary endpoints, credentials, protocol constants
/// - [`storage`](StorageConfig) — working directories
/// - [`deck`](DeckConfig) — deck/model identity and provenance tag
/// - [`retry`](RetryConfig) — audio download retry policy
/// - [`pacing`](PacingConfig) — inter-request jitter
/// - [`api`](ApiConfig) — HTTP server settings
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Dictionary service settings
    #[serde(default)]
    pub service: ServiceConfig,

    /// Working directory settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Deck and note model settings
    #[serde(default)]
    pub deck: DeckConfig,

    /// Audio retry policy
    #[serde(default)]
    pub retry: RetryConfig,

    /// Request pacing
    #[serde(default)]
    pub pacing: PacingConfig,

    /// API server settings
    #[serde(default)]
    pub api: ApiConfig,
}

// Default value functions
fn default_word_list_url() -> String {
    "https://api.mojidict.com/parse/functions/folder-fetchContentAll".to_string()
}

fn default_word_detail_url() -> String {
    "https://api.mojidict.com/parse/functions/word-fetchDetails".to_string()
}

fn default_word_detail_batch_url() -> String {
    "https://api.mojidict.com/parse/functions/nlt-fetchManyLatestWords".to_string()
}

fn default_word_voice_url() -> String {
    "https://api.mojidict.com/parse/functions/tts-fetch".to_string()
}

fn default_credentials() -> HashMap<String, String> {
    HashMap::from([
        ("_ApplicationId".to_string(), "E62VyFVLMiW7kvbtVq3p".to_string()),
        ("_ClientVersion".to_string(), "js3.4.1".to_string()),
        ("_InstallationId".to_string(), String::new()),
        ("_SessionToken".to_string(), String::new()),
    ])
}

fn default_headers() -> HashMap<String, String> {
    HashMap::from([
        (
            "User-Agent".to_string(),
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
        ),
        ("Referer".to_string(), "https://www.mojidict.com/".to_string()),
    ])
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_page_size() -> u32 {
    50
}

fn default_voice_id() -> String {
    "f002".to_string()
}

fn default_code_success() -> i64 {
    200
}

fn default_code_list_unavailable() -> i64 {
    100_000_006
}

fn default_voice_dir() -> PathBuf {
    PathBuf::from("voice_temp")
}

fn default_deck_dir() -> PathBuf {
    PathBuf::from("deck_temp")
}

fn default_font_dir() -> PathBuf {
    PathBuf::from("fonts")
}

fn default_deck_id() -> i64 {
    1_812_389_241
}

fn default_deck_name() -> String {
    "MOJi Vocabulary".to_string()
}

fn default_deck_description() -> String {
    "Vocabulary deck generated from a MOJi dictionary word list".to_string()
}

fn default_model_id() -> i64 {
    1_527_266_548
}

fn default_model_name() -> String {
    "MOJi Word".to_string()
}

fn default_provenance_tag() -> String {
    "moji2anki".to_string()
}

fn default_max_retries() -> u32 {
    1
}

fn default_min_delay_ms() -> u64 {
    150
}

fn default_max_delay_ms() -> u64 {
    500
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8920))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".into()]
}

fn default_true() -> bool {
    true
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_protocol_constants() {
        let config = Config::default();

        assert_eq!(config.service.page_size, 50);
        assert_eq!(config.service.sort_type, 0);
        assert_eq!(config.service.voice_id, "f002");
        assert_eq!(config.service.code_success, 200);
        assert_eq!(config.service.code_list_unavailable, 100_000_006);
        assert_eq!(config.service.request_timeout, Duration::from_secs(10));
        assert_eq!(config.retry.max_retries, 1);
        assert_eq!(config.pacing.min_delay_ms, 150);
        assert_eq!(config.pacing.max_delay_ms, 500);
    }

    #[test]
    fn empty_json_deserializes_to_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();

        assert_eq!(config.service.page_size, 50);
        assert_eq!(config.deck.provenance_tag, "moji2anki");
        assert_eq!(config.storage.voice_dir, PathBuf::from("voice_temp"));
        assert_eq!(config.storage.deck_dir, PathBuf::from("deck_temp"));
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let config: Config = serde_json::from_str(
            r#"{
                "service": {"page_size": 25, "code_list_unavailable": 42},
                "api": {"bind_address": "0.0.0.0:9000"}
            }"#,
        )
        .unwrap();

        assert_eq!(config.service.page_size, 25);
        assert_eq!(config.service.code_list_unavailable, 42);
        assert_eq!(config.api.bind_address, "0.0.0.0:9000".parse().unwrap());
        // Untouched fields keep their defaults
        assert_eq!(config.service.voice_id, "f002");
        assert!(config.api.cors_enabled);
    }

    #[test]
    fn duration_serde_serializes_as_seconds() {
        let config = ServiceConfig::default();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["request_timeout"], 10);
    }

    #[test]
    fn ensure_directories_creates_missing_dirs() {
        let temp = tempfile::tempdir().unwrap();
        let storage = StorageConfig {
            voice_dir: temp.path().join("voice"),
            deck_dir: temp.path().join("deck"),
            font_dir: temp.path().join("fonts"),
        };

        storage.ensure_directories().unwrap();

        assert!(storage.voice_dir.is_dir());
        assert!(storage.deck_dir.is_dir());
        // Font dir is read-only input and must not be created
        assert!(!storage.font_dir.exists());
    }
}
