//! Per-task deck assembly and `.apkg` packaging
//!
//! [`DeckBuild`] is the build context created at task start: a fresh deck,
//! the shared note model, and a task-scoped audio directory. Keeping all
//! three per task means concurrent runs cannot interleave notes or race on
//! media files. Packaging itself is delegated to `genanki-rs`.

use crate::config::{Config, DeckConfig};
use crate::error::{Error, Result};
use crate::tasks::TaskId;
use genanki_rs::{Deck, Field, Model, Note, Package, Template};
use std::path::{Path, PathBuf};

/// Field order of the note model. The card templates below and the field
/// arrays built in [`crate::cards`] both depend on this order.
const NOTE_FIELDS: [&str; 11] = [
    "Expression",
    "Accent",
    "PartOfSpeech",
    "Usage",
    "Example",
    "Definition",
    "Audio",
    "ShowReading",
    "Extra1",
    "Extra2",
    "Extra3",
];

const CARD_FRONT: &str = r#"<div class="expression">{{kanji:Expression}}</div>{{Audio}}"#;

const CARD_BACK: &str = r#"{{FrontSide}}
<hr id="answer">
{{#ShowReading}}<div class="reading">{{furigana:Expression}}</div>{{/ShowReading}}
<div class="accent">{{Accent}}</div>
<div class="pos">{{PartOfSpeech}}</div>
<div class="definition">{{Definition}}</div>"#;

const CARD_CSS: &str = r#".card {
    font-family: "MOJi Sans", "Hiragino Kaku Gothic ProN", "Noto Sans CJK JP", sans-serif;
    font-size: 22px;
    text-align: center;
}
.expression { font-size: 40px; }
.reading { color: #5a5a5a; }
.pos { color: #8a8a8a; font-size: 16px; }
.definition { text-align: left; margin-top: 12px; }
.jptext { color: #2a6496; }"#;

/// Per-task deck build context
pub struct DeckBuild {
    deck: Deck,
    model: Model,
    voice_dir: PathBuf,
    note_count: usize,
}

impl DeckBuild {
    /// Create the build context for a task, including its audio subdirectory
    pub async fn new(config: &Config, task_id: TaskId) -> Result<Self> {
        let voice_dir = config.storage.voice_dir.join(task_id.to_string());
        tokio::fs::create_dir_all(&voice_dir).await?;

        let deck = Deck::new(
            config.deck.deck_id,
            &config.deck.deck_name,
            &config.deck.deck_description,
        );

        Ok(Self {
            deck,
            model: note_model(&config.deck),
            voice_dir,
            note_count: 0,
        })
    }

    /// The task-scoped directory audio clips are written into
    pub fn voice_dir(&self) -> &Path {
        &self.voice_dir
    }

    /// Number of notes accumulated so far
    pub fn note_count(&self) -> usize {
        self.note_count
    }

    /// Append one note with the given field values and tags
    ///
    /// `fields` must follow the model's field order.
    pub fn add_note(&mut self, fields: &[String], tags: &[String]) -> Result<()> {
        let field_refs: Vec<&str> = fields.iter().map(String::as_str).collect();
        let tag_refs: Vec<&str> = tags.iter().map(String::as_str).collect();
        let note = Note::new_with_options(self.model.clone(), field_refs, None, Some(tag_refs), None)
            .map_err(|e| Error::Packaging(e.to_string()))?;
        self.deck.add_note(note);
        self.note_count += 1;
        Ok(())
    }

    /// Package the deck with its media and write `{deck_dir}/{task_id}.apkg`
    ///
    /// Media is every regular file in the task's audio directory plus every
    /// regular file in the font directory (skipped with a log line when the
    /// font directory does not exist). The write runs on a blocking thread.
    pub async fn write_package(self, config: &Config, task_id: TaskId) -> Result<PathBuf> {
        let archive = config.storage.deck_dir.join(format!("{task_id}.apkg"));
        let archive_str = archive
            .to_str()
            .ok_or_else(|| Error::Packaging(format!("non-UTF-8 archive path: {archive:?}")))?
            .to_string();

        let mut media = list_files(&self.voice_dir).await?;
        match list_files(&config.storage.font_dir).await {
            Ok(fonts) => media.extend(fonts),
            Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    font_dir = %config.storage.font_dir.display(),
                    "Font directory missing, packaging without font assets"
                );
            }
            Err(e) => return Err(e),
        }

        tracing::info!(
            %task_id,
            notes = self.note_count,
            media_files = media.len(),
            archive = %archive.display(),
            "Writing deck package"
        );

        let deck = self.deck;
        tokio::task::spawn_blocking(move || -> Result<()> {
            let media_refs: Vec<&str> = media.iter().map(String::as_str).collect();
            let mut package = Package::new(vec![deck], media_refs)
                .map_err(|e| Error::Packaging(e.to_string()))?;
            package
                .write_to_file(&archive_str)
                .map_err(|e| Error::Packaging(e.to_string()))
        })
        .await
        .map_err(|e| Error::Packaging(format!("packaging task failed: {e}")))??;

        Ok(archive)
    }
}

/// Build the shared note model from configuration
fn note_model(config: &DeckConfig) -> Model {
    let fields = NOTE_FIELDS.iter().map(|name| Field::new(name)).collect();
    let templates = vec![
        Template::new("Recognition")
            .qfmt(CARD_FRONT)
            .afmt(CARD_BACK),
    ];
    Model::new(config.model_id, &config.model_name, fields, templates).css(CARD_CSS)
}

/// Collect every regular file directly inside `dir` as a UTF-8 path
async fn list_files(dir: &Path) -> Result<Vec<String>> {
    let mut files = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            let path = entry.path();
            match path.to_str() {
                Some(s) => files.push(s.to_string()),
                None => {
                    tracing::warn!(path = %path.display(), "Skipping media file with non-UTF-8 path")
                }
            }
        }
    }
    Ok(files)
}
