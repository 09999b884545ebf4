//! The `examsim extract` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use examsim_core::document::{extract_from_document_detailed, TextDocument};
use examsim_core::extract::AnswerSource;
use examsim_core::model::Question;

pub async fn execute(input: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let document = TextDocument::open(&input).await?;
    let extracted = extract_from_document_detailed(&document).await?;

    let defaulted: Vec<i64> = extracted
        .iter()
        .filter(|e| e.answer_source == AnswerSource::DefaultFirstOption)
        .map(|e| e.question.id)
        .collect();

    let questions: Vec<Question> = extracted.into_iter().map(|e| e.question).collect();
    let json = serde_json::to_string_pretty(&questions).context("failed to serialize questions")?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!(
                "Extracted {} question(s) to {}",
                questions.len(),
                path.display()
            );
        }
        None => println!("{json}"),
    }

    if !defaulted.is_empty() {
        let ids: Vec<String> = defaulted.iter().map(|id| id.to_string()).collect();
        eprintln!(
            "Note: no answer marker found for question(s) {}; the first option was assumed correct.",
            ids.join(", ")
        );
    }

    Ok(())
}
