//! Question file parser.
//!
//! Loads question sets from uploaded JSON files or text documents, and
//! validates them.

use std::collections::HashSet;
use std::path::Path;

use serde_json::Value;

use crate::document::{extract_from_document, TextDocument};
use crate::error::LoadError;
use crate::model::Question;
use crate::normalize::normalize_records;

/// Parse a JSON question file.
pub fn parse_question_file(path: &Path) -> Result<Vec<Question>, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_question_str(&content, &path.display().to_string())
}

/// Parse a JSON string into questions (useful for testing).
///
/// The top-level value must be an array. Records are normalized and the
/// malformed ones dropped; an empty result is an error of its own.
pub fn parse_question_str(content: &str, source_name: &str) -> Result<Vec<Question>, LoadError> {
    let parsed: Value = serde_json::from_str(content).map_err(|e| LoadError::InvalidJson {
        source_name: source_name.to_string(),
        message: e.to_string(),
    })?;

    let Value::Array(records) = parsed else {
        return Err(LoadError::NotAnArray);
    };

    let questions = normalize_records(&records);
    if questions.is_empty() {
        return Err(LoadError::NoValidQuestions);
    }

    tracing::info!("loaded {} question(s) from {source_name}", questions.len());
    Ok(questions)
}

/// Load questions from either a JSON file or a text document.
///
/// Files with a `.json` extension go through the upload parser; anything
/// else is treated as a document and run through the extraction heuristic.
pub async fn load_question_source(path: &Path) -> Result<Vec<Question>, LoadError> {
    if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
        parse_question_file(path)
    } else {
        let document = TextDocument::open(path).await?;
        Ok(extract_from_document(&document).await?)
    }
}

/// A warning from question set validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<i64>,
    /// Warning message.
    pub message: String,
}

/// Validate a question set for common issues.
pub fn validate_questions(questions: &[Question]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // Check for duplicate question IDs
    let mut seen_ids = HashSet::new();
    for q in questions {
        if !seen_ids.insert(q.id) {
            warnings.push(ValidationWarning {
                question_id: Some(q.id),
                message: format!("duplicate question ID: {}", q.id),
            });
        }
    }

    for q in questions {
        if !q.is_usable() {
            warnings.push(ValidationWarning {
                question_id: Some(q.id),
                message: format!("only {} option(s), at least 2 expected", q.options.len()),
            });
        }

        let mut option_ids = HashSet::new();
        for option in &q.options {
            if !option_ids.insert(option.id.as_str()) {
                warnings.push(ValidationWarning {
                    question_id: Some(q.id),
                    message: format!("duplicate option ID: {}", option.id),
                });
            }
        }

        if q.correct_option_id.is_empty() {
            warnings.push(ValidationWarning {
                question_id: Some(q.id),
                message: "correctOptionId is empty, every answer will be graded incorrect".into(),
            });
        } else if !q.options.iter().any(|o| o.id == q.correct_option_id) {
            warnings.push(ValidationWarning {
                question_id: Some(q.id),
                message: format!(
                    "correctOptionId '{}' does not match any option",
                    q.correct_option_id
                ),
            });
        }
    }

    warnings
}
