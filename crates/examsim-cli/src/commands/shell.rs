//! Line-oriented interactive shell shared by `practice` and `exam`.
//!
//! The shell renders session state and turns each input line into one
//! session transition. It never reads input itself; callers feed it lines
//! (and countdown ticks) from whatever source they drive.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;

use examsim_core::model::{Mode, Question, QuestionId, SessionState, TileStatus};
use examsim_core::parser::load_question_source;
use examsim_core::report::ExamReport;
use examsim_core::session::Session;
use examsim_core::statistics::{format_remaining, time_urgency, TimeUrgency};
use examsim_core::storage::AnswerStore;

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Select an option of the current question.
    Answer(String),
    Next,
    Previous,
    Open(QuestionId),
    Close,
    Show,
    List,
    Stats,
    Shuffle,
    Original,
    Reset,
    Load(PathBuf),
    Finish,
    Restart,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

impl Input {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Input::Empty;
        }

        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        match (head.to_ascii_lowercase().as_str(), rest) {
            ("n" | "next", "") => Input::Next,
            ("p" | "prev" | "previous", "") => Input::Previous,
            ("g" | "go" | "open", id) => match id.parse() {
                Ok(id) => Input::Open(id),
                Err(_) => Input::Invalid(line.to_string()),
            },
            ("x" | "close", "") => Input::Close,
            ("v" | "show", "") => Input::Show,
            ("l" | "list", "") => Input::List,
            ("s" | "stats", "") => Input::Stats,
            ("shuffle", "") => Input::Shuffle,
            ("original", "") => Input::Original,
            ("reset", "") => Input::Reset,
            ("load", path) if !path.is_empty() => Input::Load(PathBuf::from(path)),
            ("finish" | "submit", "") => Input::Finish,
            ("restart", "") => Input::Restart,
            ("h" | "help" | "?", "") => Input::Help,
            ("q" | "quit" | "exit", "") => Input::Quit,
            (_, "") => Input::Answer(head.to_string()),
            _ => Input::Invalid(line.to_string()),
        }
    }
}

/// Whether the caller should keep feeding lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Interactive front end over a [`Session`].
pub struct Shell<W: Write> {
    session: Session,
    store: AnswerStore,
    pass_threshold: u32,
    report_path: Option<PathBuf>,
    pending_load: Option<(PathBuf, Vec<Question>)>,
    out: W,
}

impl<W: Write> Shell<W> {
    pub fn new(session: Session, store: AnswerStore, pass_threshold: u32, out: W) -> Self {
        Self {
            session,
            store,
            pass_threshold,
            report_path: None,
            pending_load: None,
            out,
        }
    }

    /// Write a results report whenever an exam finishes.
    pub fn with_report_path(mut self, path: Option<PathBuf>) -> Self {
        self.report_path = path;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Print the prompt, with the remaining time while an exam runs.
    pub fn prompt(&mut self) -> Result<()> {
        match (self.session.state(), self.session.remaining_secs()) {
            (SessionState::ExamInProgress, Some(secs)) => {
                let marker = match time_urgency(secs) {
                    TimeUrgency::Normal => "",
                    TimeUrgency::Low => " !",
                    TimeUrgency::Critical => " !!",
                };
                write!(self.out, "[{}{marker}] > ", format_remaining(secs))?;
            }
            (SessionState::ExamFinished, _) if self.session.results_visible() => {
                write!(self.out, "[results] > ")?
            }
            _ => write!(self.out, "> ")?,
        }
        self.out.flush()?;
        Ok(())
    }

    /// Select the first question of the active set and show it.
    pub fn open_first(&mut self) -> Result<()> {
        if let Some(id) = self.session.questions().first().map(|q| q.id) {
            self.session.open_question(id);
            self.show_current()?;
        }
        Ok(())
    }

    /// Handle one line of input.
    pub async fn handle_line(&mut self, line: &str) -> Result<Flow> {
        if let Some((path, questions)) = self.pending_load.take() {
            let reply = line.trim().to_ascii_lowercase();
            if reply == "y" || reply == "yes" {
                self.replace_questions(&path, questions)?;
            } else {
                writeln!(self.out, "Load cancelled.")?;
            }
            return Ok(Flow::Continue);
        }

        match Input::parse(line) {
            Input::Answer(option) => self.answer(&option)?,
            Input::Next => self.step(true)?,
            Input::Previous => self.step(false)?,
            Input::Open(id) => {
                if self.session.open_question(id) {
                    self.show_current()?;
                } else {
                    writeln!(self.out, "No question {id} in this set.")?;
                }
            }
            Input::Close if self.session.results_visible() => {
                self.session.close_exam_results();
                writeln!(self.out, "Results closed.")?;
            }
            Input::Close => {
                self.session.close_question();
                writeln!(self.out, "Question closed.")?;
            }
            Input::Show => self.show_current()?,
            Input::List => self.show_tiles()?,
            Input::Stats => self.show_stats()?,
            Input::Shuffle if self.practice_only("shuffle")? => {
                self.session.shuffle_questions();
                writeln!(self.out, "Questions shuffled.")?;
            }
            Input::Original if self.practice_only("original")? => {
                self.session.reset_to_original();
                self.persist();
                writeln!(self.out, "Original order restored; answers cleared.")?;
            }
            Input::Reset if self.practice_only("reset")? => {
                self.session.reset_answers();
                self.persist();
                writeln!(self.out, "Answers cleared.")?;
            }
            Input::Load(path) if self.practice_only("load")? => self.load(path).await?,
            Input::Shuffle | Input::Original | Input::Reset | Input::Load(_) => {}
            Input::Finish => {
                if self.session.finish_exam() {
                    self.show_results()?;
                } else {
                    writeln!(self.out, "No exam in progress.")?;
                }
            }
            Input::Restart => self.restart()?,
            Input::Help => self.show_help()?,
            Input::Quit => return Ok(Flow::Quit),
            Input::Empty => {}
            Input::Invalid(line) => {
                writeln!(self.out, "Unknown command '{line}'. Type h for help.")?;
            }
        }
        Ok(Flow::Continue)
    }

    /// Apply one countdown tick. Returns `true` when this tick ended the exam.
    pub fn on_tick(&mut self) -> Result<bool> {
        if !self.session.tick() {
            match self.session.remaining_secs() {
                Some(300) if self.session.state() == SessionState::ExamInProgress => {
                    writeln!(self.out, "\n5 minutes left.")?;
                }
                Some(60) if self.session.state() == SessionState::ExamInProgress => {
                    writeln!(self.out, "\n1 minute left.")?;
                }
                _ => {}
            }
            return Ok(false);
        }

        writeln!(self.out)?;
        self.show_results()?;
        Ok(true)
    }

    fn practice_only(&mut self, command: &str) -> Result<bool> {
        if self.session.mode() == Mode::Practice {
            return Ok(true);
        }
        writeln!(self.out, "'{command}' is only available in practice mode.")?;
        Ok(false)
    }

    fn answer(&mut self, token: &str) -> Result<()> {
        match self.session.state() {
            SessionState::ExamNotStarted => {
                writeln!(self.out, "The exam has not started.")?;
                return Ok(());
            }
            SessionState::ExamFinished => {
                writeln!(self.out, "The exam is over; answers can no longer change.")?;
                return Ok(());
            }
            SessionState::Practice | SessionState::ExamInProgress => {}
        }

        let Some(question) = self.session.current_question() else {
            writeln!(self.out, "Select a question first (n, p or g <id>).")?;
            return Ok(());
        };
        let Some(option) = question.option(token) else {
            writeln!(self.out, "No option '{token}' for this question.")?;
            return Ok(());
        };

        let question_id = question.id;
        let option_id = option.id.clone();
        let correct_id = question.correct_option_id.clone();
        let reveal = self.session.reveals_correctness();

        let Some(answer) = self.session.answer_question(question_id, &option_id) else {
            return Ok(());
        };
        let is_correct = answer.is_correct;
        self.persist();

        if !reveal {
            writeln!(self.out, "Answer {option_id} recorded.")?;
        } else if is_correct {
            writeln!(self.out, "Correct!")?;
        } else {
            writeln!(self.out, "Incorrect. The correct answer is {correct_id}.")?;
        }
        Ok(())
    }

    fn step(&mut self, forward: bool) -> Result<()> {
        if self.session.current_question().is_none() {
            return self.open_first();
        }
        if forward {
            self.session.next_question();
        } else {
            self.session.previous_question();
        }
        self.show_current()
    }

    async fn load(&mut self, path: PathBuf) -> Result<()> {
        let questions = match load_question_source(&path).await {
            Ok(questions) => questions,
            Err(e) => {
                writeln!(self.out, "Could not load {}: {e}", path.display())?;
                return Ok(());
            }
        };

        let loaded = self.session.original_questions().len();
        if loaded > 0 {
            writeln!(
                self.out,
                "Replace the {loaded} loaded question(s) with {} from {}? [y/N]",
                questions.len(),
                path.display()
            )?;
            self.pending_load = Some((path, questions));
            return Ok(());
        }
        self.replace_questions(&path, questions)
    }

    fn replace_questions(&mut self, path: &Path, questions: Vec<Question>) -> Result<()> {
        let count = questions.len();
        self.session.load_questions(questions);
        self.persist();
        writeln!(self.out, "Loaded {count} question(s) from {}.", path.display())?;
        self.open_first()
    }

    fn restart(&mut self) -> Result<()> {
        if self.session.mode() != Mode::Exam {
            writeln!(self.out, "'restart' is only available in exam mode.")?;
            return Ok(());
        }
        match self.session.restart_exam() {
            Ok(()) => {
                self.persist();
                self.announce_exam()?;
                self.open_first()
            }
            Err(e) => {
                writeln!(self.out, "Could not restart the exam: {e}")?;
                Ok(())
            }
        }
    }

    /// Print the exam banner.
    pub fn announce_exam(&mut self) -> Result<()> {
        let config = self.session.config();
        writeln!(
            self.out,
            "Exam started: {} question(s), {} minute(s). Type 'finish' to submit.",
            self.session.questions().len(),
            config.time_limit
        )?;
        Ok(())
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.session) {
            tracing::warn!("could not save answers: {e:#}");
        }
    }

    fn show_current(&mut self) -> Result<()> {
        let Some(question) = self.session.current_question() else {
            writeln!(self.out, "No question selected.")?;
            return Ok(());
        };

        let position = self
            .session
            .questions()
            .iter()
            .position(|q| q.id == question.id)
            .map_or(0, |i| i + 1);

        writeln!(
            self.out,
            "\nQuestion {} ({position}/{})",
            question.id,
            self.session.questions().len()
        )?;
        writeln!(self.out, "{}", question.text)?;
        for option in &question.options {
            writeln!(self.out, "  {}) {}", option.id, option.text)?;
        }

        if let Some(answer) = self.session.answer(question.id) {
            if !self.session.reveals_correctness() {
                writeln!(self.out, "Your answer: {}", answer.selected_option_id)?;
            } else if answer.is_correct {
                writeln!(self.out, "Your answer: {} (correct)", answer.selected_option_id)?;
            } else {
                writeln!(
                    self.out,
                    "Your answer: {} (incorrect, correct answer: {})",
                    answer.selected_option_id, question.correct_option_id
                )?;
            }
        }
        Ok(())
    }

    fn show_tiles(&mut self) -> Result<()> {
        let tiles = self.session.tiles();
        for row in tiles.chunks(10) {
            let line: Vec<String> = row
                .iter()
                .map(|(id, status)| format!("{id:>3}[{}]", tile_marker(*status)))
                .collect();
            writeln!(self.out, "{}", line.join(" "))?;
        }
        if self.session.reveals_correctness() {
            writeln!(self.out, "[+] correct  [x] incorrect  [ ] unanswered")?;
        } else {
            writeln!(self.out, "[*] answered  [ ] unanswered")?;
        }
        Ok(())
    }

    fn show_stats(&mut self) -> Result<()> {
        let stats = self.session.stats();
        if self.session.reveals_correctness() {
            writeln!(
                self.out,
                "Answered {}/{}, correct {}, incorrect {}, score {}%",
                stats.answered, stats.total, stats.correct, stats.incorrect, stats.percentage
            )?;
        } else {
            writeln!(
                self.out,
                "Answered {}/{}, unanswered {}",
                stats.answered, stats.total, stats.unanswered
            )?;
        }
        Ok(())
    }

    fn show_results(&mut self) -> Result<()> {
        let report = ExamReport::from_session(&self.session, self.pass_threshold);
        writeln!(self.out, "{}", report.to_markdown())?;

        if let Some(path) = &self.report_path {
            match write_report(&report, path) {
                Ok(()) => writeln!(self.out, "Report written to {}", path.display())?,
                Err(e) => writeln!(self.out, "Could not write report: {e:#}")?,
            }
        }
        writeln!(
            self.out,
            "Type x to close the results, l to review, restart to try again, q to quit."
        )?;
        Ok(())
    }

    fn show_help(&mut self) -> Result<()> {
        writeln!(self.out, "Commands:")?;
        writeln!(self.out, "  <letter>      answer the current question")?;
        writeln!(self.out, "  n / p         next / previous question")?;
        writeln!(self.out, "  g <id>        open a question")?;
        writeln!(self.out, "  v / x         show / close the current question or results")?;
        writeln!(self.out, "  l             list questions")?;
        writeln!(self.out, "  s             statistics")?;
        match self.session.mode() {
            Mode::Practice => {
                writeln!(self.out, "  shuffle       shuffle the question order")?;
                writeln!(self.out, "  original      restore the original order")?;
                writeln!(self.out, "  reset         clear all answers")?;
                writeln!(self.out, "  load <path>   load another question file")?;
            }
            Mode::Exam => {
                writeln!(self.out, "  finish        submit the exam")?;
                writeln!(self.out, "  restart       draw a new exam once finished")?;
            }
        }
        writeln!(self.out, "  q             quit")?;
        Ok(())
    }
}

fn tile_marker(status: TileStatus) -> char {
    match status {
        TileStatus::Unanswered => ' ',
        TileStatus::Answered => '*',
        TileStatus::Correct => '+',
        TileStatus::Incorrect => 'x',
    }
}

/// Save a report as markdown for `.md` paths and JSON otherwise.
pub fn write_report(report: &ExamReport, path: &Path) -> Result<()> {
    let markdown = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("md"));

    if markdown {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, report.to_markdown())?;
        Ok(())
    } else {
        report.save_json(path)
    }
}
