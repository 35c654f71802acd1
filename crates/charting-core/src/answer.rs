//! Answer values, decoded from the raw form state according to the kind of
//! leaf that owns them.
//!
//! The form frontend stores loosely shaped JSON per key. Decoding against the
//! owning widget turns each raw value into a closed [`Answer`] variant so the
//! rest of the interpreter can match on shapes instead of inspecting JSON.

use std::collections::BTreeMap;

use jiff::civil::{Date, DateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

use crate::error::CoreError;
use crate::widget::{LeafKind, TableWidget, TieredInputsWidget, Widget};

/// The raw, frontend-shaped answer map: leaf key to JSON value.
pub type RawAnswers = Map<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    /// Not answered: null, or an empty string.
    Empty,
    /// Text, number, time, phone, checkbox, select and combobox values,
    /// kept exactly as the frontend sent them.
    Raw(Value),
    Date(Date),
    Tags(Vec<TagSelection>),
    Radio(RadioAnswer),
    /// Chain input name to selected value. Unanswered inputs are absent.
    Tiered(BTreeMap<String, String>),
    Table(Vec<TableEntry>),
    Entries(Vec<EditorEntry>),
}

/// One selection in a tag input. Display metadata such as the label is
/// dropped on decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TagSelection {
    pub value: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RadioAnswer {
    Basic(String),
    /// An option that carries a free-text explanation.
    WithText { value: String, free_text: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableEntry {
    pub key: String,
    pub fields: BTreeMap<String, Answer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorEntry {
    pub key: String,
    pub value: String,
}

impl Answer {
    /// Decode a raw value for the leaf `widget`.
    ///
    /// `null` and `""` decode to [`Answer::Empty`] for every kind. Calling this
    /// with a structural widget is a configuration error.
    pub fn decode(widget: &Widget, raw: &Value) -> Result<Self, CoreError> {
        let (Some(key), Some(kind)) = (widget.key(), widget.leaf_kind()) else {
            return Err(CoreError::Configuration(
                "cannot decode an answer for a structural widget".to_string(),
            ));
        };
        if is_blank(raw) {
            return Ok(Answer::Empty);
        }

        let fail = |reason: &str| CoreError::Decode {
            key: key.to_string(),
            kind,
            reason: reason.to_string(),
        };

        let answer = match (kind, widget) {
            (
                LeafKind::Text
                | LeafKind::Textarea
                | LeafKind::Number
                | LeafKind::Time
                | LeafKind::Phone
                | LeafKind::Checkbox
                | LeafKind::Select
                | LeafKind::Combobox,
                _,
            ) => Answer::Raw(raw.clone()),
            (LeafKind::Date, _) => match raw {
                Value::String(s) => parse_date(s).map_or(Answer::Empty, Answer::Date),
                _ => Answer::Empty,
            },
            (LeafKind::Radio, _) => match raw {
                Value::String(s) => Answer::Radio(RadioAnswer::Basic(s.clone())),
                Value::Object(map) if map.len() == 1 => {
                    let Some((value, free_text)) = map.iter().next() else {
                        return Err(fail("expected a single selection"));
                    };
                    let free_text = match free_text {
                        Value::String(s) => s.clone(),
                        Value::Null => String::new(),
                        _ => return Err(fail("free text must be a string")),
                    };
                    Answer::Radio(RadioAnswer::WithText {
                        value: value.clone(),
                        free_text,
                    })
                }
                _ => return Err(fail("expected a selection or {selection: text}")),
            },
            (LeafKind::TagInput, _) => {
                let tags: Vec<TagSelection> = serde_json::from_value(raw.clone())
                    .map_err(|e| fail(&e.to_string()))?;
                Answer::Tags(tags)
            }
            (LeafKind::EntryEditor, _) => match raw {
                Value::Array(items) => Answer::Entries(
                    items
                        .iter()
                        .enumerate()
                        .map(|(i, item)| editor_entry(i, item))
                        .collect::<Option<Vec<_>>>()
                        .ok_or_else(|| fail("expected a list of entries"))?,
                ),
                _ => return Err(fail("expected a list of entries")),
            },
            (LeafKind::TieredInputs, Widget::TieredInputs(chain)) => match raw {
                Value::Object(map) => Answer::Tiered(decode_chain(chain, map)),
                _ => return Err(fail("expected an object keyed by chain input")),
            },
            (LeafKind::Table, Widget::Table(table)) => match raw {
                Value::Array(items) => Answer::Table(
                    items
                        .iter()
                        .map(|item| decode_entry(table, item))
                        .collect::<Result<Vec<_>, _>>()?,
                ),
                _ => return Err(fail("expected a list of table entries")),
            },
            (LeafKind::TieredInputs | LeafKind::Table, _) => {
                return Err(fail("widget does not match its kind"));
            }
        };
        Ok(answer)
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Answer::Empty => true,
            Answer::Raw(value) => match value {
                Value::Null => true,
                Value::String(s) => s.is_empty(),
                Value::Array(items) => items.is_empty(),
                Value::Object(map) => map.is_empty(),
                Value::Bool(_) | Value::Number(_) => false,
            },
            Answer::Tiered(chain) => chain.is_empty(),
            Answer::Tags(tags) => tags.is_empty(),
            Answer::Table(entries) => entries.is_empty(),
            Answer::Entries(entries) => entries.iter().all(|e| e.value.is_empty()),
            Answer::Date(_) | Answer::Radio(_) => false,
        }
    }

    /// The frontend shape of this answer.
    pub fn to_raw(&self) -> Value {
        match self {
            Answer::Empty => Value::Null,
            Answer::Raw(value) => value.clone(),
            Answer::Date(d) => Value::String(d.to_string()),
            Answer::Tags(tags) => Value::Array(
                tags.iter()
                    .map(|t| {
                        let mut obj = Map::new();
                        obj.insert("value".to_string(), Value::String(t.value.clone()));
                        obj.insert("type".to_string(), Value::String(t.kind.clone()));
                        Value::Object(obj)
                    })
                    .collect(),
            ),
            Answer::Radio(RadioAnswer::Basic(v)) => Value::String(v.clone()),
            Answer::Radio(RadioAnswer::WithText { value, free_text }) => {
                let mut obj = Map::new();
                obj.insert(value.clone(), Value::String(free_text.clone()));
                Value::Object(obj)
            }
            Answer::Tiered(chain) => Value::Object(
                chain
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect(),
            ),
            Answer::Table(entries) => Value::Array(
                entries
                    .iter()
                    .map(|e| {
                        let fields: Map<String, Value> =
                            e.fields.iter().map(|(k, v)| (k.clone(), v.to_raw())).collect();
                        let mut obj = Map::new();
                        obj.insert("key".to_string(), Value::String(e.key.clone()));
                        obj.insert("value".to_string(), Value::Object(fields));
                        Value::Object(obj)
                    })
                    .collect(),
            ),
            Answer::Entries(entries) => {
                serde_json::to_value(entries).unwrap_or(Value::Array(Vec::new()))
            }
        }
    }
}

fn is_blank(raw: &Value) -> bool {
    match raw {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Accepts an RFC 3339 timestamp (date taken in UTC), a civil datetime, or a
/// bare `yyyy-MM-dd`.
pub fn parse_date(s: &str) -> Option<Date> {
    if let Ok(ts) = s.parse::<jiff::Timestamp>() {
        return Some(ts.to_zoned(jiff::tz::TimeZone::UTC).date());
    }
    if let Ok(dt) = s.parse::<DateTime>() {
        return Some(dt.date());
    }
    s.parse::<Date>().ok()
}

/// A selection given either as the bare value or as an option object.
fn option_value(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(obj) => obj.get("value").and_then(option_value),
        _ => None,
    }
}

fn editor_entry(index: usize, raw: &Value) -> Option<EditorEntry> {
    match raw {
        Value::String(s) => Some(EditorEntry {
            key: index.to_string(),
            value: s.clone(),
        }),
        Value::Object(obj) => {
            let value = match obj.get("value") {
                None | Some(Value::Null) => String::new(),
                Some(v) => option_value(v)?,
            };
            let key = obj
                .get("key")
                .and_then(option_value)
                .unwrap_or_else(|| index.to_string());
            Some(EditorEntry { key, value })
        }
        _ => None,
    }
}

/// Only names declared by the chain are kept; blank inputs are dropped.
fn decode_chain(chain: &TieredInputsWidget, map: &Map<String, Value>) -> BTreeMap<String, String> {
    chain
        .inputs
        .iter()
        .filter_map(|input| {
            let value = map.get(&input.name).and_then(option_value)?;
            (!value.is_empty()).then(|| (input.name.clone(), value))
        })
        .collect()
}

/// Fields that do not name a column are ignored.
fn decode_entry(table: &TableWidget, raw: &Value) -> Result<TableEntry, CoreError> {
    let decode_err = |reason: &str| CoreError::Decode {
        key: table.key.clone(),
        kind: LeafKind::Table,
        reason: reason.to_string(),
    };
    let obj = raw
        .as_object()
        .ok_or_else(|| decode_err("table entry must be an object"))?;
    let key = obj
        .get("key")
        .and_then(option_value)
        .ok_or_else(|| decode_err("table entry is missing its key"))?;
    let none = Map::new();
    let values = match obj.get("value") {
        Some(Value::Object(values)) => values,
        None | Some(Value::Null) => &none,
        Some(_) => return Err(decode_err("table entry value must be an object")),
    };

    let mut fields = BTreeMap::new();
    for (field, value) in values {
        if let Some(column) = table.column(field) {
            fields.insert(field.clone(), Answer::decode(column, value)?);
        }
    }
    Ok(TableEntry { key, fields })
}
