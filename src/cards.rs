//! Flash-card construction from word detail payloads
//!
//! One card per word: the front combines spelling and bracketed reading
//! (the reading is omitted for kana-only spellings), the back carries pitch
//! accent, part of speech, and the composed definition HTML. Japanese
//! definition fragments get a `jptext` span so the card CSS can style them.

use crate::client::MojiClient;
use crate::config::Config;
use crate::deck::DeckBuild;
use crate::error::{Error, Result};
use crate::retry;
use crate::types::{DefinitionFragment, JAPANESE_LANG};
use crate::words;
use regex::Regex;
use std::sync::LazyLock;

/// Bracket-delimited tokens inside a detail excerpt are part-of-speech tags
#[allow(clippy::expect_used)]
static BRACKET_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.*?)\]").expect("bracket pattern is valid"));

/// Whether every character of `word` is hiragana or katakana
///
/// Literal range comparison over the two kana blocks (U+3040–U+309F and
/// U+30A0–U+30FF). The empty string is vacuously kana-only.
pub fn is_kana(word: &str) -> bool {
    word.chars()
        .all(|c| matches!(c, '\u{3040}'..='\u{309F}' | '\u{30A0}'..='\u{30FF}'))
}

/// Concatenate all bracket-delimited tokens of an excerpt, in order
pub fn extract_part_of_speech(excerpt: &str) -> String {
    BRACKET_TOKEN
        .captures_iter(excerpt)
        .map(|c| c[1].to_string())
        .collect()
}

/// Compose the definition HTML from the fragment list
///
/// Fragments are walked in order while tracking the previous fragment's
/// relation id. A new relation id starts a new sense: a `<br>` separator
/// (after the first sense) and a `・` bullet, wrapped in a `jptext` span when
/// the fragment is Japanese. A Japanese fragment sharing the previous
/// relation id is an inline parenthesized gloss on the same sense. The
/// running relation id updates after every fragment.
pub fn compose_definition(fragments: &[DefinitionFragment]) -> String {
    let mut definition = String::new();
    let mut rela_id = "";

    for fragment in fragments {
        if fragment.rela_id != rela_id {
            if !rela_id.is_empty() {
                definition.push_str("<br>");
            }
            if fragment.lang == JAPANESE_LANG {
                definition.push_str(&format!(
                    "<span class=\"jptext\">・{}</span>",
                    fragment.title
                ));
            } else {
                definition.push_str(&format!("・{}", fragment.title));
            }
        } else if fragment.lang == JAPANESE_LANG {
            definition.push_str(&format!("<span class=\"jptext\">({})</span>", fragment.title));
        }
        rela_id = &fragment.rela_id;
    }

    definition
}

/// Build the tag set for one note
///
/// The upstream tag string splits on `#` when present; the provenance tag is
/// always appended, the list-name tag only when non-empty.
pub fn build_tags(upstream: Option<&str>, provenance_tag: &str, source: &str) -> Vec<String> {
    let mut tags: Vec<String> = match upstream {
        Some(raw) => raw.split('#').map(str::to_string).collect(),
        None => Vec::new(),
    };
    tags.push(provenance_tag.to_string());
    if !source.is_empty() {
        tags.push(source.to_string());
    }
    tags
}

/// Fetch one word's detail and audio and append its note to the deck
///
/// A pacing delay separates the detail fetch from the audio fetch; the
/// stagger keeps per-word request pairs from arriving back to back.
///
/// Returns `Some("{word_id}.mp3")` when the audio download soft-failed (the
/// note still references the file), `None` otherwise.
pub async fn generate_card(
    client: &MojiClient,
    config: &Config,
    deck: &mut DeckBuild,
    word_id: &str,
    source: &str,
) -> Result<Option<String>> {
    let detail = words::fetch_word_detail(client, config, word_id).await?;

    retry::pace_delay(&config.pacing).await;
    let voice_ok = words::fetch_word_voice(client, config, word_id, deck.voice_dir()).await?;

    let word = detail
        .words
        .first()
        .ok_or_else(|| Error::data(format!("word detail for {word_id} has no entries")))?;

    let kana_only = is_kana(&word.spell);
    let expression = if kana_only {
        word.spell.clone()
    } else {
        format!("{}[{}]", word.spell, word.pron)
    };

    let fields = [
        expression,
        word.accent.clone(),
        extract_part_of_speech(&word.excerpt),
        String::new(),
        String::new(),
        compose_definition(&detail.definitions),
        format!("[sound:{word_id}.mp3]"),
        if kana_only { String::new() } else { "1".to_string() },
        String::new(),
        String::new(),
        String::new(),
    ];
    let tags = build_tags(word.tags.as_deref(), &config.deck.provenance_tag, source);

    deck.add_note(&fields, &tags)?;

    Ok((!voice_ok).then(|| format!("{word_id}.mp3")))
}
