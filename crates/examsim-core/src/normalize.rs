//! Lossy normalization of loosely-typed question records.
//!
//! Shared by the JSON upload path and the bundled sample corpus. It never
//! fails: malformed fields fall back to defaults and unusable records are
//! dropped by [`normalize_records`].

use serde_json::Value;

use crate::model::{Question, QuestionId, QuestionOption};

/// Normalize a single record into a [`Question`].
pub fn normalize_record(record: &Value) -> Question {
    let options = match record.get("options") {
        Some(Value::Array(items)) => items.iter().map(normalize_option).collect(),
        _ => Vec::new(),
    };

    Question {
        id: coerce_id(record.get("id")),
        text: string_or_empty(record.get("text")),
        options,
        correct_option_id: match record.get("correctOptionId") {
            None | Some(Value::Null) => String::new(),
            Some(value) => stringify(value),
        },
    }
}

/// Normalize every record and drop those without text or options.
///
/// Null and `false` entries are skipped before normalization.
pub fn normalize_records(records: &[Value]) -> Vec<Question> {
    let questions: Vec<Question> = records
        .iter()
        .filter(|r| is_truthy(r))
        .map(normalize_record)
        .filter(|q| !q.text.is_empty() && !q.options.is_empty())
        .collect();

    let dropped = records.len() - questions.len();
    if dropped > 0 {
        tracing::debug!("dropped {dropped} malformed question record(s)");
    }
    questions
}

fn normalize_option(option: &Value) -> QuestionOption {
    let id = match option.get("id") {
        Some(value) => stringify(value),
        None => "undefined".to_string(),
    };
    QuestionOption {
        id,
        text: string_or_empty(option.get("text")),
    }
}

fn coerce_id(value: Option<&Value>) -> QuestionId {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
        }
        Some(Value::Bool(true)) => Some(1),
        _ => None,
    };
    parsed.unwrap_or(0)
}

fn string_or_empty(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Bool(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_well_formed_record() {
        let q = normalize_record(&json!({
            "id": 3,
            "text": "Capital of France?",
            "options": [{"id": "A", "text": "Paris"}, {"id": "B", "text": "Rome"}],
            "correctOptionId": "A"
        }));
        assert_eq!(q.id, 3);
        assert_eq!(q.options.len(), 2);
        assert_eq!(q.correct_option_id, "A");
    }

    #[test]
    fn coerces_loose_fields() {
        let q = normalize_record(&json!({
            "id": "12",
            "text": "Q",
            "options": [{"id": 1}, {"text": "no id"}],
        }));
        assert_eq!(q.id, 12);
        assert_eq!(q.options[0].id, "1");
        assert_eq!(q.options[0].text, "");
        assert_eq!(q.options[1].id, "undefined");
        assert_eq!(q.correct_option_id, "");
    }

    #[test]
    fn bad_id_defaults_to_zero() {
        assert_eq!(normalize_record(&json!({"id": "abc"})).id, 0);
        assert_eq!(normalize_record(&json!({"id": null})).id, 0);
        assert_eq!(normalize_record(&json!({"id": 4.9})).id, 4);
        assert_eq!(normalize_record(&json!({})).id, 0);
    }

    #[test]
    fn non_array_options_become_empty() {
        let q = normalize_record(&json!({"id": 1, "text": "Q", "options": "A,B"}));
        assert!(q.options.is_empty());
    }

    #[test]
    fn option_ids_keep_their_case() {
        let q = normalize_record(&json!({
            "id": 1, "text": "Q", "options": [{"id": "a", "text": "x"}], "correctOptionId": "a"
        }));
        assert_eq!(q.options[0].id, "a");
        assert_eq!(q.correct_option_id, "a");
    }

    #[test]
    fn filters_empty_text_and_empty_options() {
        let records = vec![
            json!(null),
            json!(false),
            json!({"id": 1, "text": "", "options": [{"id": "A", "text": "x"}]}),
            json!({"id": 2, "text": "No options", "options": []}),
            json!({"id": 3, "text": "One option", "options": [{"id": "A", "text": "x"}]}),
        ];
        let questions = normalize_records(&records);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].id, 3);
    }
}
