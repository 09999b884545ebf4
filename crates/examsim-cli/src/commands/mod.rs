pub mod exam;
pub mod extract;
pub mod init;
pub mod practice;
pub mod reset;
pub mod shell;
pub mod stats;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::Result;

use examsim_core::config::ExamsimConfig;
use examsim_core::model::Question;
use examsim_core::parser::load_question_source;
use examsim_core::sample::sample_questions;

/// Resolve the question source: an explicit path, then the configured file,
/// then the bundled sample.
pub async fn load_questions(path: Option<&Path>, config: &ExamsimConfig) -> Result<Vec<Question>> {
    let source: Option<PathBuf> = path
        .map(Path::to_path_buf)
        .or_else(|| config.questions.clone());

    match source {
        Some(path) => Ok(load_question_source(&path).await?),
        None => {
            tracing::debug!("no question source configured, using the bundled sample");
            Ok(sample_questions())
        }
    }
}
