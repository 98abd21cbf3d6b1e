//! Speech use cases: list, read, create, edit and delete.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::validation::require;
use crate::domain::{AppError, Result, Speech, SpeechDraft, SpeechId};
use crate::infrastructure::ApiClient;

use super::rich_text::{has_visible_text, html_to_text, looks_like_html, text_to_html, word_count};

/// Where the body of a speech comes from.
#[derive(Debug, Clone)]
pub enum ContentSource {
    /// Given on the command line; plain text is converted to paragraphs.
    Inline(String),
    /// Read from a file; `.html`/`.htm` files are sent unchanged.
    File(PathBuf),
}

impl ContentSource {
    /// Build from the mutually exclusive `--content` / `--file` options.
    #[must_use]
    pub fn from_args(content: Option<String>, file: Option<PathBuf>) -> Option<Self> {
        match (content, file) {
            (Some(text), _) => Some(Self::Inline(text)),
            (None, Some(path)) => Some(Self::File(path)),
            (None, None) => None,
        }
    }

    /// Resolve to HTML markup.
    ///
    /// # Errors
    /// Returns error if the file cannot be read.
    pub fn load(&self) -> Result<String> {
        match self {
            Self::Inline(text) => Ok(to_markup(text)),
            Self::File(path) => {
                let text = fs::read_to_string(path).map_err(|e| {
                    AppError::io(format!("Failed to read {}", path.display()), e)
                })?;
                if is_html_file(path) {
                    Ok(text)
                } else {
                    Ok(to_markup(&text))
                }
            }
        }
    }
}

fn to_markup(text: &str) -> String {
    if looks_like_html(text) {
        text.to_string()
    } else {
        text_to_html(text)
    }
}

fn is_html_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
}

/// Validate a title/content pair for saving.
///
/// # Errors
/// `MissingField` when the title is blank or the content has no visible text.
pub fn validate_draft(title: &str, content: &str) -> Result<SpeechDraft> {
    require("Title", title)?;
    if !has_visible_text(content) {
        return Err(AppError::MissingField { field: "Content" });
    }

    Ok(SpeechDraft {
        title: title.trim().to_string(),
        content: content.to_string(),
    })
}

/// Length figures shown next to a speech.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeechStats {
    pub words: usize,
    /// Estimated delivery time in whole seconds.
    pub estimated_secs: u64,
}

impl SpeechStats {
    #[must_use]
    pub fn of(speech: &Speech, words_per_minute: u32) -> Self {
        let words = word_count(&html_to_text(&speech.content));
        Self {
            words,
            estimated_secs: estimate_delivery_secs(words, words_per_minute),
        }
    }
}

/// Seconds needed to deliver `words` at the given pace, rounded up.
#[must_use]
pub fn estimate_delivery_secs(words: usize, words_per_minute: u32) -> u64 {
    let wpm = u64::from(words_per_minute.max(1));
    let words = words as u64;
    (words * 60).div_ceil(wpm)
}

/// Speech operations against the API.
pub struct SpeechService<'a> {
    api: &'a ApiClient,
}

impl<'a> SpeechService<'a> {
    #[must_use]
    pub const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// # Errors
    /// Returns error on missing/expired session or API failure.
    pub async fn list(&self) -> Result<Vec<Speech>> {
        let speeches = self.api.list_speeches().await?;
        tracing::debug!(count = speeches.len(), "Fetched speeches");
        Ok(speeches)
    }

    /// # Errors
    /// `NotFound` when the speech does not exist.
    pub async fn get(&self, id: &SpeechId) -> Result<Speech> {
        self.api.get_speech(id).await
    }

    /// Validate and create a speech.
    ///
    /// # Errors
    /// Returns error on validation or API failure.
    pub async fn create(&self, title: &str, source: &ContentSource) -> Result<Option<Speech>> {
        let draft = validate_draft(title, &source.load()?)?;
        let created = self.api.create_speech(&draft).await?;
        tracing::info!(title = %draft.title, "Speech created");
        Ok(created)
    }

    /// Replace the given fields of an existing speech, keeping the others.
    ///
    /// # Errors
    /// Returns error on validation or API failure.
    pub async fn edit(
        &self,
        id: &SpeechId,
        title: Option<&str>,
        source: Option<&ContentSource>,
    ) -> Result<Speech> {
        let current = self.api.get_speech(id).await?;

        let title = title.unwrap_or(current.title.as_str());
        let content = match source {
            Some(source) => source.load()?,
            None => current.content.clone(),
        };
        let draft = validate_draft(title, &content)?;

        self.api.update_speech(id, &draft).await?;
        tracing::info!(%id, "Speech updated");

        Ok(Speech {
            id: current.id,
            title: draft.title,
            content: draft.content,
        })
    }

    /// # Errors
    /// `NotFound` when the speech does not exist.
    pub async fn delete(&self, id: &SpeechId) -> Result<()> {
        self.api.delete_speech(id).await?;
        tracing::info!(%id, "Speech deleted");
        Ok(())
    }
}
