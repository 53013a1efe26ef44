//! Word list retrieval: id extraction, pagination, folder hierarchy names
//!
//! A word list is addressed by the trailing segment of its share URL. The
//! first page response carries a side payload describing the list and its
//! parent folder; the parent chain is climbed to build a root-first
//! `Ancestor::Parent::List` display name used for provenance tagging.

use crate::client::MojiClient;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::retry;
use crate::types::{FolderSummary, ListEntry, TARGET_TYPE_WORD, WordListPage};
use serde_json::json;
use std::collections::HashSet;
use url::Url;

/// Path separator of the hierarchical list name (matches Anki's nested-tag
/// separator, so the provenance tag nests in the browser)
const NAME_SEPARATOR: &str = "::";

/// A fully paginated word list
#[derive(Debug, Clone)]
pub struct WordList {
    /// All entries across every page, in page order
    pub entries: Vec<ListEntry>,

    /// Hierarchical display name, root-first, `::`-joined
    pub name: String,

    /// Item count reported by the first page, kept for the
    /// restricted-access check
    pub first_page_size: u32,
}

/// Extract the list id from the final non-empty path segment of a share URL
///
/// # Errors
///
/// Returns [`Error::Data`] when the URL cannot be parsed or its path has no
/// non-empty segment (e.g. ends in `/`).
pub fn extract_list_id(list_url: &str) -> Result<String> {
    let parsed =
        Url::parse(list_url).map_err(|e| Error::data(format!("word list URL is malformed: {e}")))?;

    let id = parsed
        .path_segments()
        .and_then(|segments| segments.rev().find(|segment| !segment.is_empty()))
        .unwrap_or_default();

    if id.is_empty() {
        return Err(Error::data("word list id is malformed"));
    }
    Ok(id.to_string())
}

/// Filter list entries down to deduplicated word identifiers
///
/// Only entries tagged [`TARGET_TYPE_WORD`] are promoted; duplicates keep
/// their first-seen position.
pub fn word_ids(entries: &[ListEntry]) -> Vec<String> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .filter(|entry| entry.target_type == TARGET_TYPE_WORD)
        .filter(|entry| seen.insert(entry.target_id.clone()))
        .map(|entry| entry.target_id.clone())
        .collect()
}

/// Fetch every page of a word list and resolve its hierarchical name
///
/// Page 1 is fetched first; its side payload seeds the name resolution.
/// Remaining pages are fetched sequentially, each preceded by a pacing
/// delay. Page progress is reported through `progress`.
///
/// Client errors propagate unchanged.
pub async fn fetch_word_list<F>(
    client: &MojiClient,
    config: &Config,
    list_id: &str,
    progress: F,
) -> Result<WordList>
where
    F: Fn(&str),
{
    tracing::info!(list_id, "Fetching word list page 1");
    progress("Fetching word list page 1...");
    let first_page: WordListPage = client
        .post(&config.service.word_list_url, page_query(config, list_id, 1), &[])
        .await?;

    let name = resolve_list_name(client, config, &first_page.folders).await?;
    let total_pages = first_page.total_pages;
    let first_page_size = first_page.size;
    let mut entries = first_page.entries;

    for page in 2..=total_pages {
        retry::pace_delay(&config.pacing).await;
        tracing::info!(list_id, page, total_pages, "Fetching word list page");
        progress(&format!("Fetching word list page {page} of {total_pages}..."));
        let next: WordListPage = client
            .post(
                &config.service.word_list_url,
                page_query(config, list_id, page),
                &[],
            )
            .await?;
        entries.extend(next.entries);
    }

    Ok(WordList {
        entries,
        name,
        first_page_size,
    })
}

/// Climb the parent-folder chain and join the collected titles root-first
///
/// `folders[0]` is the queried list, `folders[1]` (when present) its parent.
/// Each parent is re-queried until a response has no further parent entry.
/// When a parent chain exists, spaces become hyphens so the joined name
/// survives as a single Anki tag; a standalone list keeps its title as-is.
async fn resolve_list_name(
    client: &MojiClient,
    config: &Config,
    folders: &[FolderSummary],
) -> Result<String> {
    let Some(own) = folders.first() else {
        tracing::warn!("Word list response carried no folder summary");
        return Ok(String::new());
    };

    let mut titles = vec![own.title.clone()];
    if let Some(parent) = folders.get(1) {
        titles.push(parent.title.clone());
        let mut parent_id = parent.object_id.clone();
        loop {
            let page: WordListPage = client
                .post(
                    &config.service.word_list_url,
                    page_query(config, &parent_id, 1),
                    &[],
                )
                .await?;
            let Some(grandparent) = page.folders.get(1) else {
                break;
            };
            titles.push(grandparent.title.clone());
            parent_id = grandparent.object_id.clone();
        }

        titles.reverse();
        for title in &mut titles {
            *title = title.replace(' ', "-");
        }
    }

    Ok(titles.join(NAME_SEPARATOR))
}

fn page_query(config: &Config, list_id: &str, page: u32) -> serde_json::Value {
    json!({
        "fid": list_id,
        "count": config.service.page_size,
        "sortType": config.service.sort_type,
        "pageIndex": page,
    })
}
