//! Core types for the dictionary service payloads
//!
//! Every response arrives wrapped in an envelope whose `result.code` field
//! carries the application-level result code; [`crate::client::MojiClient`]
//! strips the envelope and hands the modules below the inner payloads.
//! Field renames map the upstream camelCase and numeric JSON keys.

use serde::Deserialize;

/// Target-type discriminant marking a list entry as a word
pub const TARGET_TYPE_WORD: i64 = 102;

/// Language tag of the distinguished locale (Japanese glosses get a
/// dedicated markup wrapper in composed definitions)
pub const JAPANESE_LANG: &str = "ja";

/// One raw entry of a word-list page
///
/// Lists can contain words, example sentences, and nested folders; only
/// entries whose `target_type` equals [`TARGET_TYPE_WORD`] are promoted to
/// word identifiers.
#[derive(Debug, Clone, Deserialize)]
pub struct ListEntry {
    /// Identifier of the referenced object
    #[serde(rename = "targetId")]
    pub target_id: String,

    /// Type discriminant of the referenced object
    #[serde(rename = "targetType")]
    pub target_type: i64,

    /// Display title, informational only
    #[serde(default)]
    pub title: String,
}

/// Side payload describing the list itself and, when present, its
/// immediate parent folder
///
/// Index 0 of the `"1000"` array is the queried list; index 1, when present,
/// is the parent. The paginator climbs parents until the array has a single
/// entry.
#[derive(Debug, Clone, Deserialize)]
pub struct FolderSummary {
    /// Folder display title
    #[serde(default)]
    pub title: String,

    /// Folder identifier, used to re-query when climbing the hierarchy
    #[serde(rename = "objectId")]
    pub object_id: String,
}

/// One page of a word list
#[derive(Debug, Clone, Deserialize)]
pub struct WordListPage {
    /// Entries on this page
    #[serde(rename = "result", default)]
    pub entries: Vec<ListEntry>,

    /// The list itself plus its parent, when any
    #[serde(rename = "1000", default)]
    pub folders: Vec<FolderSummary>,

    /// Total number of pages
    #[serde(rename = "totalPage", default)]
    pub total_pages: u32,

    /// Item count reported for this response
    ///
    /// The first page's value doubles as the restricted-access heuristic:
    /// fewer resolved word ids than this means the session saw a truncated
    /// list.
    #[serde(default)]
    pub size: u32,
}

/// Lexical core of a word detail payload
#[derive(Debug, Clone, Deserialize)]
pub struct WordInfo {
    /// Spelling (kanji or kana)
    #[serde(default)]
    pub spell: String,

    /// Kana pronunciation
    #[serde(default)]
    pub pron: String,

    /// Pitch accent marker
    #[serde(default)]
    pub accent: String,

    /// Short excerpt holding bracket-delimited part-of-speech tokens
    #[serde(default)]
    pub excerpt: String,

    /// `#`-separated upstream tag string, when present
    #[serde(default)]
    pub tags: Option<String>,
}

/// One definition fragment of a word detail payload
///
/// Fragments sharing a `rela_id` belong to the same sense.
#[derive(Debug, Clone, Deserialize)]
pub struct DefinitionFragment {
    /// Relation id grouping fragments into senses
    #[serde(rename = "relaId")]
    pub rela_id: String,

    /// Language tag of this fragment
    #[serde(default)]
    pub lang: String,

    /// Fragment text
    #[serde(default)]
    pub title: String,
}

/// Per-word detail payload
#[derive(Debug, Clone, Deserialize)]
pub struct WordDetail {
    /// Lexical entries; the first one carries the card-facing fields
    #[serde(rename = "result", default)]
    pub words: Vec<WordInfo>,

    /// Definition fragments, in sense order
    #[serde(rename = "104", default)]
    pub definitions: Vec<DefinitionFragment>,
}

/// Batched word detail payload
#[derive(Debug, Clone, Deserialize)]
pub struct WordDetailBatch {
    /// One detail payload per requested word
    #[serde(rename = "result", default)]
    pub details: Vec<WordDetail>,
}

/// Signed audio URL issued by the voice endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceTicket {
    /// Time-limited download URL for the audio clip
    pub url: String,
}

/// Voice endpoint payload wrapping the ticket
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceResult {
    /// The signed ticket
    #[serde(rename = "result")]
    pub voice: VoiceTicket,
}
