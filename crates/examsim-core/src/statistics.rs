//! Derived statistics and grading.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::model::{ExamStats, Question, QuestionId, UserAnswer};

/// Default passing percentage.
pub const DEFAULT_PASS_THRESHOLD: u32 = 50;

/// Compute statistics for `questions` given the recorded `answers`.
///
/// Each recorded answer counts once, and only when its question id is part
/// of `questions`. Questions sharing an id share one answer slot, so a single
/// answer never counts for several questions. The percentage is correct over
/// total, not correct over answered.
pub fn compute_stats(questions: &[Question], answers: &BTreeMap<QuestionId, UserAnswer>) -> ExamStats {
    let total = questions.len();
    let ids: HashSet<QuestionId> = questions.iter().map(|q| q.id).collect();
    let counted: Vec<&UserAnswer> = answers
        .iter()
        .filter(|(id, _)| ids.contains(id))
        .map(|(_, answer)| answer)
        .collect();

    let answered = counted.len();
    let correct = counted.iter().filter(|a| a.is_correct).count();
    let percentage = if total > 0 {
        (correct as f64 / total as f64 * 100.0).round() as u32
    } else {
        0
    };

    ExamStats {
        total,
        answered,
        correct,
        incorrect: answered - correct,
        unanswered: total - answered,
        percentage,
    }
}

/// Outcome of a graded exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Passed,
    Failed,
}

/// Grade `stats` against a passing percentage.
pub fn grade(stats: &ExamStats, pass_threshold: u32) -> Grade {
    if stats.percentage >= pass_threshold {
        Grade::Passed
    } else {
        Grade::Failed
    }
}

/// How close the countdown is to running out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUrgency {
    Normal,
    /// Less than five minutes left.
    Low,
    /// Less than one minute left.
    Critical,
}

pub fn time_urgency(remaining_secs: i64) -> TimeUrgency {
    if remaining_secs < 60 {
        TimeUrgency::Critical
    } else if remaining_secs < 300 {
        TimeUrgency::Low
    } else {
        TimeUrgency::Normal
    }
}

/// Format seconds as `MM:SS`. Minutes are not wrapped into hours.
pub fn format_remaining(remaining_secs: i64) -> String {
    let secs = remaining_secs.max(0);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
