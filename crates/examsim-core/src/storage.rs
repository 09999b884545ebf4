//! Best-effort persistence of answers.
//!
//! Only the answer map crosses this boundary. Question sets, mode, timer and
//! exam flags are rebuilt fresh on every start.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{QuestionId, UserAnswer};
use crate::session::Session;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Persisted answers keyed by question id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSnapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    #[serde(default)]
    pub answers: BTreeMap<QuestionId, UserAnswer>,
}

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

impl AnswerSnapshot {
    pub fn new(answers: BTreeMap<QuestionId, UserAnswer>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            answers,
        }
    }
}

/// JSON file holding the latest [`AnswerSnapshot`].
#[derive(Debug, Clone)]
pub struct AnswerStore {
    path: PathBuf,
}

impl AnswerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored snapshot. A missing file is not an error.
    pub fn load(&self) -> Result<Option<AnswerSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read answers from {}", self.path.display()))?;
        let snapshot: AnswerSnapshot = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse answers in {}", self.path.display()))?;
        Ok(Some(snapshot))
    }

    /// Persist the answers of `session`.
    pub fn save(&self, session: &Session) -> Result<()> {
        self.save_snapshot(&session.answer_snapshot())
    }

    pub fn save_snapshot(&self, snapshot: &AnswerSnapshot) -> Result<()> {
        let json = serde_json::to_string_pretty(snapshot).context("failed to serialize answers")?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, json)
            .with_context(|| format!("failed to write answers to {}", self.path.display()))?;
        tracing::debug!(
            "saved {} answer(s) to {}",
            snapshot.answers.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Remove the stored snapshot, if any.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .with_context(|| format!("failed to remove {}", self.path.display()))?;
        }
        Ok(())
    }

    /// Load into `session`, logging instead of failing on a corrupt file.
    pub fn restore_into(&self, session: &mut Session) {
        match self.load() {
            Ok(Some(snapshot)) => session.restore_answers(snapshot),
            Ok(None) => {}
            Err(e) => tracing::warn!("ignoring persisted answers: {e:#}"),
        }
    }
}
