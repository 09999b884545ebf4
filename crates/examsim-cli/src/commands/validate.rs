//! The `examsim validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub async fn execute(questions_path: PathBuf) -> Result<()> {
    let questions = examsim_core::parser::load_question_source(&questions_path).await?;

    println!(
        "Question set: {} ({} questions)",
        questions_path.display(),
        questions.len()
    );

    let warnings = examsim_core::parser::validate_questions(&questions);
    for w in &warnings {
        let prefix = w
            .question_id
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("All questions valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
