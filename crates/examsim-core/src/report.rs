//! Exam result reports with JSON persistence and markdown rendering.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{AnswerStatus, ExamStats, Mode, QuestionId};
use crate::session::Session;
use crate::statistics::{grade, Grade};

/// A summary of one graded session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// When the exam was started, if it was a timed exam.
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    pub mode: Mode,
    pub stats: ExamStats,
    pub grade: Grade,
    /// Passing percentage used for `grade`.
    pub pass_threshold: u32,
    /// Whether the countdown ran out before submission.
    pub time_expired: bool,
    /// Configured time limit in minutes (exam mode only).
    #[serde(default)]
    pub time_limit_minutes: Option<u32>,
    /// Per-question outcome, in presentation order.
    pub questions: Vec<QuestionOutcome>,
}

/// Outcome of one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub question_id: QuestionId,
    pub status: AnswerStatus,
    #[serde(default)]
    pub selected_option_id: Option<String>,
    pub correct_option_id: String,
}

impl ExamReport {
    /// Build a report from the current state of `session`.
    pub fn from_session(session: &Session, pass_threshold: u32) -> Self {
        let stats = session.stats();
        let exam = session.mode() == Mode::Exam;

        let questions = session
            .questions()
            .iter()
            .map(|q| QuestionOutcome {
                question_id: q.id,
                status: session.answer_status(q.id),
                selected_option_id: session.answer(q.id).map(|a| a.selected_option_id.clone()),
                correct_option_id: q.correct_option_id.clone(),
            })
            .collect();

        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            started_at: session.started_at(),
            mode: session.mode(),
            stats,
            grade: grade(&stats, pass_threshold),
            pass_threshold,
            time_expired: session.time_expired(),
            time_limit_minutes: exam.then(|| session.config().time_limit),
            questions,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Headline shown above the statistics.
    pub fn headline(&self) -> &'static str {
        if self.time_expired {
            "Time is up!"
        } else {
            "Exam finished!"
        }
    }

    /// Render the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        md.push_str(&format!("# {}\n\n", self.headline()));

        let verdict = match self.grade {
            Grade::Passed => "Passed",
            Grade::Failed => "Below the passing grade",
        };
        md.push_str(&format!(
            "**Score: {}%** ({verdict}, pass mark {}%)\n\n",
            self.stats.percentage, self.pass_threshold
        ));

        md.push_str("| Total | Answered | Correct | Incorrect | Unanswered |\n");
        md.push_str("|------:|---------:|--------:|----------:|-----------:|\n");
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            self.stats.total,
            self.stats.answered,
            self.stats.correct,
            self.stats.incorrect,
            self.stats.unanswered
        ));

        if self.time_expired {
            if let Some(limit) = self.time_limit_minutes {
                md.push_str(&format!("\nThe time limit of {limit} minutes ran out.\n"));
            }
        }

        let missed: Vec<&QuestionOutcome> = self
            .questions
            .iter()
            .filter(|q| q.status == AnswerStatus::Incorrect)
            .collect();
        if !missed.is_empty() {
            md.push_str("\n## Incorrect answers\n\n");
            for q in missed {
                md.push_str(&format!(
                    "- Question {}: answered {}, correct {}\n",
                    q.question_id,
                    q.selected_option_id.as_deref().unwrap_or("-"),
                    q.correct_option_id
                ));
            }
        }

        md
    }
}
