//! The `examsim practice` command.

use std::path::PathBuf;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use examsim_core::config::load_config_from;
use examsim_core::session::Session;
use examsim_core::storage::AnswerStore;

use super::load_questions;
use super::shell::{Flow, Shell};

pub async fn execute(
    questions_path: Option<PathBuf>,
    shuffle: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let questions = load_questions(questions_path.as_deref(), &config).await?;

    let mut session = Session::new(questions);
    let store = AnswerStore::new(&config.storage_path);
    store.restore_into(&mut session);
    if shuffle {
        session.shuffle_questions();
    }

    let restored = session.answers().len();
    println!(
        "Practice mode: {} question(s). Type h for help.",
        session.questions().len()
    );
    if restored > 0 {
        println!("Restored {restored} saved answer(s).");
    }

    let mut shell = Shell::new(session, store, config.pass_threshold, std::io::stdout());
    shell.open_first()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        shell.prompt()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if shell.handle_line(&line).await? == Flow::Quit {
            break;
        }
    }

    println!();
    Ok(())
}
