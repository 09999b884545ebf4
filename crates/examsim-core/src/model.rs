//! Core data model types for examsim.
//!
//! These are the fundamental types that the entire examsim system uses
//! to represent questions, answers, exam configuration, and derived stats.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Identifier of a question within a question set.
pub type QuestionId = i64;

/// Allowed range for the number of questions drawn into an exam.
pub const QUESTION_COUNT_RANGE: std::ops::RangeInclusive<u32> = 10..=270;

/// Allowed range for the exam time limit, in minutes.
pub const TIME_LIMIT_RANGE: std::ops::RangeInclusive<u32> = 5..=300;

/// A single selectable option of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    /// Option identifier, usually a single letter (A, B, C...).
    pub id: String,
    /// Option text shown to the user.
    #[serde(default)]
    pub text: String,
}

impl QuestionOption {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// A multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Question identifier.
    pub id: QuestionId,
    /// The question prompt.
    pub text: String,
    /// Ordered options.
    #[serde(default)]
    pub options: Vec<QuestionOption>,
    /// Id of the correct option. May be empty or dangling; grading then
    /// treats every answer as incorrect.
    #[serde(default)]
    pub correct_option_id: String,
}

impl Question {
    /// Find an option by id, ignoring ASCII case.
    pub fn option(&self, id: &str) -> Option<&QuestionOption> {
        self.options
            .iter()
            .find(|o| o.id.eq_ignore_ascii_case(id))
    }

    /// Whether `option_id` is the correct answer for this question.
    pub fn is_correct(&self, option_id: &str) -> bool {
        option_id == self.correct_option_id
    }

    /// A question needs at least two options to be a real choice.
    pub fn is_usable(&self) -> bool {
        self.options.len() >= 2
    }
}

/// The user's answer to a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAnswer {
    pub question_id: QuestionId,
    pub selected_option_id: String,
    /// Computed when the answer was given, never re-derived.
    pub is_correct: bool,
}

/// Grading status of a single question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerStatus {
    Unanswered,
    Correct,
    Incorrect,
}

impl fmt::Display for AnswerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerStatus::Unanswered => write!(f, "unanswered"),
            AnswerStatus::Correct => write!(f, "correct"),
            AnswerStatus::Incorrect => write!(f, "incorrect"),
        }
    }
}

/// What a grid tile may reveal about a question.
///
/// While an exam is running only `Answered`/`Unanswered` are produced so
/// that correctness does not leak before submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileStatus {
    Unanswered,
    Answered,
    Correct,
    Incorrect,
}

/// Session mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Untimed, immediate feedback.
    Practice,
    /// Timed, feedback withheld until the exam is finished.
    Exam,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Practice => write!(f, "practice"),
            Mode::Exam => write!(f, "exam"),
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "practice" | "practica" => Ok(Mode::Practice),
            "exam" | "examen" => Ok(Mode::Exam),
            other => Err(format!("unknown mode: {other}")),
        }
    }
}

/// Lifecycle state of a session, derived from its mode and exam flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Practice,
    ExamNotStarted,
    ExamInProgress,
    ExamFinished,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Practice => write!(f, "practice"),
            SessionState::ExamNotStarted => write!(f, "exam not started"),
            SessionState::ExamInProgress => write!(f, "exam in progress"),
            SessionState::ExamFinished => write!(f, "exam finished"),
        }
    }
}

/// Timed exam parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamConfig {
    /// Number of questions drawn from the pool.
    #[serde(default = "default_question_count")]
    pub question_count: u32,
    /// Time limit in minutes.
    #[serde(default = "default_time_limit")]
    pub time_limit: u32,
}

fn default_question_count() -> u32 {
    50
}

fn default_time_limit() -> u32 {
    60
}

impl Default for ExamConfig {
    fn default() -> Self {
        Self {
            question_count: default_question_count(),
            time_limit: default_time_limit(),
        }
    }
}

impl ExamConfig {
    /// Check both fields against their allowed ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !QUESTION_COUNT_RANGE.contains(&self.question_count) {
            return Err(ConfigError::QuestionCountOutOfRange(self.question_count));
        }
        if !TIME_LIMIT_RANGE.contains(&self.time_limit) {
            return Err(ConfigError::TimeLimitOutOfRange(self.time_limit));
        }
        Ok(())
    }

    /// The time limit expressed in seconds.
    pub fn time_limit_secs(&self) -> i64 {
        i64::from(self.time_limit) * 60
    }

    /// Apply a partial update. No validation happens here.
    pub fn apply(&mut self, update: ExamConfigUpdate) {
        if let Some(count) = update.question_count {
            self.question_count = count;
        }
        if let Some(limit) = update.time_limit {
            self.time_limit = limit;
        }
    }
}

/// Partial update to an [`ExamConfig`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamConfigUpdate {
    #[serde(default)]
    pub question_count: Option<u32>,
    #[serde(default)]
    pub time_limit: Option<u32>,
}

/// Derived correctness statistics for the active question set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamStats {
    pub total: usize,
    pub answered: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub unanswered: usize,
    /// Correct over total (not over answered), rounded.
    pub percentage: u32,
}
