//! The `examsim exam` command.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use examsim_core::config::load_config_from;
use examsim_core::model::{ExamConfigUpdate, Mode, SessionState};
use examsim_core::session::Session;
use examsim_core::storage::AnswerStore;
use examsim_core::timer::{spawn_countdown, Countdown, Tick};

use super::load_questions;
use super::shell::{Flow, Shell};

enum Event {
    Line(Option<String>),
    Tick(Option<Tick>),
}

pub async fn execute(
    questions_path: Option<PathBuf>,
    count: Option<u32>,
    minutes: Option<u32>,
    report: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let mut exam_config = config.exam;
    exam_config.apply(ExamConfigUpdate {
        question_count: count,
        time_limit: minutes,
    });
    exam_config.validate()?;

    let questions = load_questions(questions_path.as_deref(), &config).await?;

    let mut session = Session::new(questions);
    session.set_mode(Mode::Exam);
    session.set_exam_config(ExamConfigUpdate {
        question_count: Some(exam_config.question_count),
        time_limit: Some(exam_config.time_limit),
    });
    session.start_exam()?;

    let store = AnswerStore::new(&config.storage_path);
    let mut shell = Shell::new(session, store, config.pass_threshold, std::io::stdout())
        .with_report_path(report);
    shell.announce_exam()?;
    shell.open_first()?;

    let mut countdown = Some(spawn_countdown(Duration::from_secs(1)));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        shell.prompt()?;

        let event = tokio::select! {
            line = lines.next_line() => Event::Line(line?),
            tick = next_tick(&mut countdown) => Event::Tick(tick),
        };

        match event {
            Event::Line(Some(line)) => {
                if shell.handle_line(&line).await? == Flow::Quit {
                    break;
                }
            }
            Event::Line(None) => break,
            Event::Tick(Some(_)) => {
                shell.on_tick()?;
                if shell.session().state() == SessionState::ExamInProgress {
                    // Redraw only the clock on the next loop pass.
                    print!("\r");
                    continue;
                }
            }
            Event::Tick(None) => countdown = None,
        }

        // A finished exam stops the clock; a restart needs a fresh one.
        match (shell.session().state(), countdown.is_some()) {
            (SessionState::ExamInProgress, false) => {
                countdown = Some(spawn_countdown(Duration::from_secs(1)));
            }
            (SessionState::ExamFinished, true) => {
                if let Some(mut c) = countdown.take() {
                    c.stop();
                }
            }
            _ => {}
        }
    }

    println!();
    Ok(())
}

async fn next_tick(countdown: &mut Option<Countdown>) -> Option<Tick> {
    match countdown {
        Some(c) => c.next_tick().await,
        None => std::future::pending().await,
    }
}
