//! The `examsim stats` command.

use std::path::PathBuf;

use anyhow::Result;

use examsim_core::config::load_config_from;
use examsim_core::session::Session;
use examsim_core::statistics::{grade, Grade};
use examsim_core::storage::AnswerStore;

use super::load_questions;

pub async fn execute(questions_path: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let questions = load_questions(questions_path.as_deref(), &config).await?;

    let mut session = Session::new(questions);
    let store = AnswerStore::new(&config.storage_path);
    match store.load()? {
        Some(snapshot) => session.restore_answers(snapshot),
        None => println!("No saved answers yet."),
    }

    let stats = session.stats();
    print_stats_table(&stats);

    let verdict = match grade(&stats, config.pass_threshold) {
        Grade::Passed => "passing",
        Grade::Failed => "below the passing grade",
    };
    println!(
        "Score {}% is {verdict} ({}% needed).",
        stats.percentage, config.pass_threshold
    );

    Ok(())
}

fn print_stats_table(stats: &examsim_core::model::ExamStats) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "Total",
        "Answered",
        "Correct",
        "Incorrect",
        "Unanswered",
        "Score",
    ]);
    table.add_row(vec![
        Cell::new(stats.total),
        Cell::new(stats.answered),
        Cell::new(stats.correct),
        Cell::new(stats.incorrect),
        Cell::new(stats.unanswered),
        Cell::new(format!("{}%", stats.percentage)),
    ]);

    println!("{table}");
}
