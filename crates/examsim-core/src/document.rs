//! Paginated document sources feeding the extraction heuristic.
//!
//! A document is read page by page, the pages are handed to
//! [`extract_questions_detailed`] in one piece, and the result is either a
//! complete question list or a single user-facing error. Nothing is
//! committed on failure.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::future::try_join_all;

use crate::error::ExtractError;
use crate::extract::{extract_questions_detailed, AnswerSource, ExtractedQuestion};
use crate::model::Question;

/// Page separator used by `pdftotext` and similar converters.
pub const PAGE_BREAK: char = '\u{000C}';

/// A source of paginated text.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Human-readable name used in error messages.
    fn name(&self) -> &str;

    /// Number of pages in the document.
    async fn page_count(&self) -> Result<usize, ExtractError>;

    /// Text of the page at `index` (0-based).
    async fn page_text(&self, index: usize) -> Result<String, ExtractError>;
}

/// A plain text file whose pages are separated by form feeds.
#[derive(Debug, Clone)]
pub struct TextDocument {
    name: String,
    pages: Vec<String>,
}

impl TextDocument {
    /// Read a text document from disk.
    pub async fn open(path: &Path) -> Result<Self, ExtractError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ExtractError::Unreadable(format!("{}: {e}", path.display())))?;

        let content = String::from_utf8(bytes).map_err(|_| {
            ExtractError::Unreadable(format!("{}: not a text document", path.display()))
        })?;

        Ok(Self::from_text(path.display().to_string(), &content))
    }

    /// Build a document from in-memory text.
    pub fn from_text(name: impl Into<String>, content: &str) -> Self {
        Self {
            name: name.into(),
            pages: content.split(PAGE_BREAK).map(str::to_string).collect(),
        }
    }
}

#[async_trait]
impl DocumentSource for TextDocument {
    fn name(&self) -> &str {
        &self.name
    }

    async fn page_count(&self) -> Result<usize, ExtractError> {
        Ok(self.pages.len())
    }

    async fn page_text(&self, index: usize) -> Result<String, ExtractError> {
        self.pages.get(index).cloned().ok_or_else(|| {
            ExtractError::Unreadable(format!("{}: page {} out of range", self.name, index + 1))
        })
    }
}

/// Fetch every page, in order. The first failing page fails the whole read.
pub async fn read_pages(source: &dyn DocumentSource) -> Result<Vec<String>, ExtractError> {
    let count = source.page_count().await?;
    try_join_all((0..count).map(|i| source.page_text(i))).await
}

/// Read a document and extract its questions, with answer provenance.
pub async fn extract_from_document_detailed(
    source: &dyn DocumentSource,
) -> Result<Vec<ExtractedQuestion>, ExtractError> {
    let pages = read_pages(source).await.map_err(|e| match e {
        ExtractError::Unreadable(_) => e,
        other => ExtractError::Unreadable(format!("{}: {other}", source.name())),
    })?;

    if pages.iter().all(|p| p.trim().is_empty()) {
        return Err(ExtractError::NoText);
    }

    let extracted = extract_questions_detailed(&pages);
    if extracted.is_empty() {
        return Err(ExtractError::NoQuestions);
    }

    let defaulted = extracted
        .iter()
        .filter(|e| e.answer_source == AnswerSource::DefaultFirstOption)
        .count();
    if defaulted > 0 {
        tracing::warn!(
            "{defaulted} of {} question(s) in {} had no answer marker; the first option was assumed",
            extracted.len(),
            source.name()
        );
    }

    tracing::info!(
        "extracted {} question(s) from {} page(s) of {}",
        extracted.len(),
        pages.len(),
        source.name()
    );
    Ok(extracted)
}

/// Read a document and extract its questions.
pub async fn extract_from_document(source: &dyn DocumentSource) -> Result<Vec<Question>, ExtractError> {
    Ok(extract_from_document_detailed(source)
        .await?
        .into_iter()
        .map(|e| e.question)
        .collect())
}

/// Resolve where extracted questions should be written next to `input`.
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("json")
}
