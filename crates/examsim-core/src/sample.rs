//! Bundled sample question corpus.

use crate::model::Question;
use crate::parser::parse_question_str;

/// Raw JSON of the bundled corpus, in the upload format.
pub const SAMPLE_QUESTIONS_JSON: &str = include_str!("../data/sample_questions.json");

/// The bundled questions, normalized like any upload.
pub fn sample_questions() -> Vec<Question> {
    match parse_question_str(SAMPLE_QUESTIONS_JSON, "bundled sample") {
        Ok(questions) => questions,
        Err(e) => {
            tracing::error!("bundled sample corpus is invalid: {e}");
            Vec::new()
        }
    }
}
