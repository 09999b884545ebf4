//! Error types surfaced to the user.
//!
//! Every variant maps to a single user-facing message. None of them are
//! fatal: the caller reports the message and returns to an interactive state
//! with the session untouched.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::SessionState;

/// Failures while loading an uploaded question file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read question file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The content is not valid JSON.
    #[error("invalid JSON in {source_name}: {message}")]
    InvalidJson {
        source_name: String,
        message: String,
    },

    /// The top-level JSON value is not an array.
    #[error("the JSON must be an array of questions")]
    NotAnArray,

    /// Nothing survived normalization.
    #[error("no valid questions found: the JSON has no questions in the expected format")]
    NoValidQuestions,

    /// The document path failed.
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Failures while turning a document into questions.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The document could not be read or decoded as text.
    #[error("could not process the document {0}: make sure it is a valid file with selectable text")]
    Unreadable(String),

    /// The document was readable but contained no text.
    #[error("the document contains no extractable text")]
    NoText,

    /// Text was found but no question had at least two options.
    #[error("no questions with at least two options were found in the document")]
    NoQuestions,
}

/// Out-of-range exam configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("question count must be between 10 and 270 (got {0})")]
    QuestionCountOutOfRange(u32),

    #[error("time limit must be between 5 and 300 minutes (got {0})")]
    TimeLimitOutOfRange(u32),
}

/// Rejected session transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("invalid exam configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// The pool is empty so no exam can be drawn.
    #[error("no questions loaded")]
    NoQuestions,

    /// The transition is not allowed from the current state.
    #[error("cannot {action} while in state '{state}'")]
    WrongState {
        action: &'static str,
        state: SessionState,
    },
}
