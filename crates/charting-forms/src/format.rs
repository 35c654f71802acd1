//! Serialisation of answers into the canonical submission payload.
//!
//! The payload never contains an empty string, and every key in it names a
//! leaf of the widget tree.

use std::collections::BTreeMap;

use charting_core::answer::{Answer, RadioAnswer, RawAnswers};
use charting_core::payload::SubmissionPayload;
use charting_core::widget::WidgetTree;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::warn;

use crate::error::FormsError;
use crate::walk::find_widget;

/// What to do with a raw answer that has no widget or cannot be decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownKeyPolicy {
    /// Drop the value, log a warning, and keep formatting the rest.
    #[default]
    Drop,
    /// Fail the whole submission.
    Reject,
}

/// Format a raw answer map against `tree`.
pub fn format_submission(
    raw: &RawAnswers,
    tree: &WidgetTree,
    policy: UnknownKeyPolicy,
) -> Result<SubmissionPayload, FormsError> {
    let mut charting_data = Map::new();

    for (key, value) in raw {
        let Some(widget) = find_widget(tree, key) else {
            if policy == UnknownKeyPolicy::Reject {
                return Err(FormsError::UnknownKey(key.clone()));
            }
            warn!(key = %key, "no widget for answer, dropping it");
            continue;
        };

        let answer = match Answer::decode(widget, value) {
            Ok(answer) => answer,
            Err(e) if policy == UnknownKeyPolicy::Reject => return Err(e.into()),
            Err(e) => {
                warn!(key = %key, error = %e, "undecodable answer, dropping it");
                continue;
            }
        };

        if let Some(formatted) = format_answer(&answer) {
            charting_data.insert(key.clone(), formatted);
        }
    }

    Ok(SubmissionPayload { charting_data })
}

/// Format already decoded answers.
pub fn format_answers<'a>(
    answers: impl IntoIterator<Item = (&'a String, &'a Answer)>,
) -> SubmissionPayload {
    let charting_data = answers
        .into_iter()
        .filter_map(|(key, answer)| format_answer(answer).map(|v| (key.clone(), v)))
        .collect();
    SubmissionPayload { charting_data }
}

/// The payload shape of one answer, or `None` when it should be omitted.
pub fn format_answer(answer: &Answer) -> Option<Value> {
    let value = match answer {
        Answer::Empty => return None,
        Answer::Raw(Value::Null) => return None,
        Answer::Raw(Value::String(s)) if s.is_empty() => return None,
        Answer::Raw(value) => value.clone(),
        Answer::Date(d) => Value::String(d.to_string()),
        Answer::Tags(tags) => json!(tags),
        Answer::Radio(RadioAnswer::Basic(value)) => json!({
            "type": "basic",
            "value": value,
        }),
        // Blank free text is sent as a plain selection.
        Answer::Radio(RadioAnswer::WithText { value, free_text }) if free_text.is_empty() => {
            json!({
                "type": "basic",
                "value": value,
            })
        }
        Answer::Radio(RadioAnswer::WithText { value, free_text }) => json!({
            "type": "text-input",
            "value": value,
            "freeText": free_text,
        }),
        Answer::Tiered(chain) if chain.is_empty() => return None,
        Answer::Tiered(chain) => json!(chain),
        Answer::Table(entries) => Value::Array(
            entries
                .iter()
                .map(|entry| {
                    json!({
                        "key": entry.key,
                        "value": format_fields(&entry.fields),
                    })
                })
                .collect(),
        ),
        Answer::Entries(entries) => {
            let values: Vec<&str> = entries
                .iter()
                .map(|e| e.value.as_str())
                .filter(|v| !v.is_empty())
                .collect();
            if values.is_empty() {
                return None;
            }
            json!(values)
        }
    };
    Some(value)
}

fn format_fields(fields: &BTreeMap<String, Answer>) -> Map<String, Value> {
    fields
        .iter()
        .filter_map(|(key, answer)| format_answer(answer).map(|v| (key.clone(), v)))
        .collect()
}
