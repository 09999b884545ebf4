//! Best-effort question extraction from unstructured text.
//!
//! The pipeline runs in four stages, each usable on its own:
//!
//! 1. [`detect_boundaries`] finds question headers (`12.`, `12)`, `12-`,
//!    `12:` and `Pregunta 12`) and pools the matches of both patterns.
//! 2. [`dedup_candidates`] orders candidates by offset and keeps the first
//!    occurrence of every id. A later header with the same id is discarded
//!    even when it looks like a better match.
//! 3. [`slice_spans`] cuts the text between consecutive surviving headers.
//! 4. [`match_options`] and [`detect_correct_answer`] scan each span.
//!
//! Questions with fewer than two options are dropped and the survivors are
//! renumbered from 1. When no answer marker is found the first option is
//! assumed correct, which is a guess and is reported as
//! [`AnswerSource::DefaultFirstOption`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::{Question, QuestionId, QuestionOption};

static NUMBERED_HEAD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\n)\s*([0-9]+)\s*[.)\-:]\s*").unwrap());
static NUMBERED_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*(?:[A-Ea-e]|[0-9]+\s*)[.)\-:]").unwrap());
static LABELED_HEAD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:^|\n)\s*pregunta\s*([0-9]+)\s*[.:\-]?\s*").unwrap());
static LABELED_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*[A-Ea-e][.)\-:]").unwrap());

static OPTION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:[*✓][ \t]*)?([A-Ea-e])[ \t]*\*?[ \t]*[.)\-:][ \t]*([^\n]+)").unwrap()
});

static EXPLICIT_ANSWER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:respuesta|correcta|answer|correct)\b\s*[:\-]?\s*([A-E])\b").unwrap()
});
static ASTERISK_BEFORE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\s*([A-Ea-e])\s*[.)\-:]").unwrap());
static ASTERISK_AFTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Ea-e])\s*\*\s*[.)\-:]").unwrap());
static BRACKETED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([A-Ea-e])\]").unwrap());
static CHECKMARK: Lazy<Regex> = Lazy::new(|| Regex::new(r"✓\s*([A-Ea-e])").unwrap());

/// Which header pattern produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPattern {
    /// `12.` / `12)` / `12-` / `12:`
    Numbered,
    /// `Pregunta 12`
    Labeled,
}

/// A question header found in the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Number parsed from the header.
    pub id: QuestionId,
    /// Trimmed body between the header and the first option line.
    pub text: String,
    /// Byte offset of the match in the joined text.
    pub start: usize,
    pub pattern: BoundaryPattern,
}

/// How the correct option of an extracted question was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    /// "Respuesta: B", "Correct answer: B", ...
    Explicit,
    /// `*B)`
    AsteriskBefore,
    /// `B*)`
    AsteriskAfter,
    /// `[B]`
    Bracketed,
    /// `✓ B`
    Checkmark,
    /// A lone letter on the last line of the block.
    TrailingLine,
    /// Nothing matched; the first option was assumed.
    DefaultFirstOption,
}

/// An extracted question together with the answer-detection policy that fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedQuestion {
    pub question: Question,
    pub answer_source: AnswerSource,
}

/// Join page texts into a single blob, one newline per page break.
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    pages
        .iter()
        .map(|p| p.as_ref())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Find every question header in `text` using both boundary patterns.
///
/// The result is in pattern order, not offset order; see [`dedup_candidates`].
pub fn detect_boundaries(text: &str) -> Vec<Candidate> {
    let mut candidates = scan(text, &NUMBERED_HEAD, &NUMBERED_END, BoundaryPattern::Numbered);
    candidates.extend(scan(text, &LABELED_HEAD, &LABELED_END, BoundaryPattern::Labeled));
    candidates
}

/// Walk `text` with a header pattern. The body of each header runs until
/// the first `end` match after at least one character, or the end of text.
fn scan(text: &str, head: &Regex, end: &Regex, pattern: BoundaryPattern) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    let mut pos = 0;

    while pos <= text.len() {
        let Some(caps) = head.captures_at(text, pos) else {
            break;
        };
        let (Some(whole), Some(number)) = (caps.get(0), caps.get(1)) else {
            break;
        };

        let body_start = whole.end();
        let body_end = match text[body_start..].chars().next() {
            Some(first) => end
                .find_at(text, body_start + first.len_utf8())
                .map_or(text.len(), |m| m.start()),
            None => body_start,
        };

        match number.as_str().parse::<QuestionId>() {
            Ok(id) => candidates.push(Candidate {
                id,
                text: text[body_start..body_end].trim().to_string(),
                start: whole.start(),
                pattern,
            }),
            Err(_) => tracing::debug!("skipping header with oversized number at {}", whole.start()),
        }

        pos = body_end;
    }

    candidates
}

/// Order candidates by offset and keep the first one seen for each id.
pub fn dedup_candidates(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by_key(|c| c.start);

    let mut seen = std::collections::HashSet::new();
    candidates.retain(|c| seen.insert(c.id));
    candidates
}

/// Pair each candidate with the slice of `text` it owns: from its own start
/// up to the next candidate's start, or the end of the text.
pub fn slice_spans<'a>(text: &'a str, candidates: &'a [Candidate]) -> Vec<(&'a Candidate, &'a str)> {
    candidates
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let end = candidates.get(i + 1).map_or(text.len(), |next| next.start);
            (c, &text[c.start..end.max(c.start)])
        })
        .collect()
}

/// Collect option lines (`A)`, `b.`, `C -`, `*D:` ...) in order.
pub fn match_options(span: &str) -> Vec<QuestionOption> {
    OPTION_LINE
        .captures_iter(span)
        .filter_map(|caps| {
            let letter = caps.get(1)?;
            let text = caps.get(2)?;
            Some(QuestionOption {
                id: letter.as_str().to_uppercase(),
                text: text.as_str().trim().to_string(),
            })
        })
        .collect()
}

/// Look for an answer marker in `span`, trying the markers in priority order.
///
/// Returns the uppercased letter and the marker kind. The letter is not
/// checked against the detected options.
pub fn detect_correct_answer(span: &str) -> Option<(String, AnswerSource)> {
    let markers: [(&Regex, AnswerSource); 5] = [
        (&*EXPLICIT_ANSWER, AnswerSource::Explicit),
        (&*ASTERISK_BEFORE, AnswerSource::AsteriskBefore),
        (&*ASTERISK_AFTER, AnswerSource::AsteriskAfter),
        (&*BRACKETED, AnswerSource::Bracketed),
        (&*CHECKMARK, AnswerSource::Checkmark),
    ];

    for (pattern, source) in markers {
        if let Some(letter) = pattern.captures(span).and_then(|caps| caps.get(1)) {
            return Some((letter.as_str().to_uppercase(), source));
        }
    }

    trailing_letter(span).map(|letter| (letter, AnswerSource::TrailingLine))
}

/// A lone option letter on the last non-blank line.
fn trailing_letter(span: &str) -> Option<String> {
    let last = span.lines().rev().map(str::trim).find(|l| !l.is_empty())?;
    let mut chars = last.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if matches!(c.to_ascii_uppercase(), 'A'..='E') => {
            Some(c.to_ascii_uppercase().to_string())
        }
        _ => None,
    }
}

/// Run the full pipeline and report which answer policy fired per question.
pub fn extract_questions_detailed<S: AsRef<str>>(pages: &[S]) -> Vec<ExtractedQuestion> {
    let text = join_pages(pages);
    let candidates = dedup_candidates(detect_boundaries(&text));

    let extracted: Vec<ExtractedQuestion> = slice_spans(&text, &candidates)
        .into_iter()
        .filter_map(|(candidate, span)| {
            let options = match_options(span);
            if options.len() < 2 {
                tracing::debug!(
                    "dropping question {} with {} option(s)",
                    candidate.id,
                    options.len()
                );
                return None;
            }

            let (correct_option_id, answer_source) = detect_correct_answer(span)
                .unwrap_or_else(|| (options[0].id.clone(), AnswerSource::DefaultFirstOption));

            Some(ExtractedQuestion {
                question: Question {
                    id: candidate.id,
                    text: candidate.text.clone(),
                    options,
                    correct_option_id,
                },
                answer_source,
            })
        })
        .enumerate()
        .map(|(i, mut e)| {
            e.question.id = i as QuestionId + 1;
            e
        })
        .collect();

    tracing::debug!(
        "extracted {} question(s) from {} candidate(s)",
        extracted.len(),
        candidates.len()
    );
    extracted
}

/// Run the full pipeline and keep only the questions.
pub fn extract_questions<S: AsRef<str>>(pages: &[S]) -> Vec<Question> {
    extract_questions_detailed(pages)
        .into_iter()
        .map(|e| e.question)
        .collect()
}
