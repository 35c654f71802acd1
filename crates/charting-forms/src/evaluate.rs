//! Condition evaluation.
//!
//! Conditions are boolean predicates, not validators: a value that cannot be
//! read as the type a condition expects simply does not satisfy it.

use std::collections::BTreeMap;

use charting_core::answer::{Answer, RadioAnswer, RawAnswers};
use charting_core::condition::Condition;
use serde_json::Value;

use crate::{Lookup, ValueLookup};

/// Whether `condition` holds for the current answers.
///
/// `and` over an empty list is true; `or` over an empty list is false.
pub fn is_satisfied<L: ValueLookup + ?Sized>(condition: &Condition, values: &L) -> bool {
    match condition {
        Condition::StringEquals { key, value } => {
            matches!(values.lookup(key), Lookup::Text(s) if s == *value)
        }
        Condition::StringIn { key, values: allowed } => match values.lookup(key) {
            Lookup::Text(s) => allowed.contains(&s),
            _ => false,
        },
        Condition::NumericEquals { key, value } => {
            coerce_number(&values.lookup(key)).is_some_and(|n| n == *value)
        }
        Condition::NumericIn { key, values: allowed } => {
            coerce_number(&values.lookup(key)).is_some_and(|n| allowed.contains(&n))
        }
        Condition::BooleanEquals { key, value } => {
            matches!(values.lookup(key), Lookup::Bool(b) if b == *value)
        }
        Condition::NotNull { key } => is_truthy(&values.lookup(key)),
        Condition::And { conditions } => conditions.iter().all(|c| is_satisfied(c, values)),
        Condition::Or { conditions } => conditions.iter().any(|c| is_satisfied(c, values)),
    }
}

/// Whether any of `conditions` holds. An empty list never does.
pub fn any_satisfied<L: ValueLookup + ?Sized>(conditions: &[Condition], values: &L) -> bool {
    conditions.iter().any(|c| is_satisfied(c, values))
}

/// Numbers pass through; strings are parsed. Blank strings, booleans, and
/// lists do not coerce.
fn coerce_number(value: &Lookup) -> Option<f64> {
    let n = match value {
        Lookup::Number(n) => *n,
        Lookup::Text(s) if !s.trim().is_empty() => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (!n.is_nan()).then_some(n)
}

/// Note that `false` and `0` are treated the same as a missing value.
fn is_truthy(value: &Lookup) -> bool {
    match value {
        Lookup::Null => false,
        Lookup::Text(s) => !s.is_empty(),
        Lookup::Number(n) => *n != 0.0 && !n.is_nan(),
        Lookup::Bool(b) => *b,
        Lookup::List(_) => true,
    }
}

/// Adapts a closure into a [`ValueLookup`].
pub struct LookupFn<F>(pub F);

impl<F> ValueLookup for LookupFn<F>
where
    F: Fn(&str) -> Lookup,
{
    fn lookup(&self, key: &str) -> Lookup {
        (self.0)(key)
    }
}

/// Reads from `first`, falling back to `fallback` for keys `first` lacks.
pub struct Layered<'a, A: ?Sized, B: ?Sized> {
    pub first: &'a A,
    pub fallback: &'a B,
}

impl<A: ValueLookup + ?Sized, B: ValueLookup + ?Sized> ValueLookup for Layered<'_, A, B> {
    fn lookup(&self, key: &str) -> Lookup {
        match self.first.lookup(key) {
            Lookup::Null => self.fallback.lookup(key),
            found => found,
        }
    }
}

impl ValueLookup for RawAnswers {
    fn lookup(&self, key: &str) -> Lookup {
        self.get(key).map_or(Lookup::Null, lookup_raw)
    }
}

impl ValueLookup for BTreeMap<String, Answer> {
    fn lookup(&self, key: &str) -> Lookup {
        self.get(key).map_or(Lookup::Null, lookup_answer)
    }
}

impl ValueLookup for BTreeMap<String, String> {
    fn lookup(&self, key: &str) -> Lookup {
        self.get(key)
            .map_or(Lookup::Null, |value| Lookup::Text(value.clone()))
    }
}

fn lookup_raw(value: &Value) -> Lookup {
    match value {
        Value::Null => Lookup::Null,
        Value::String(s) => Lookup::Text(s.clone()),
        Value::Number(n) => n.as_f64().map_or(Lookup::Null, Lookup::Number),
        Value::Bool(b) => Lookup::Bool(*b),
        Value::Array(items) => Lookup::List(items.iter().filter_map(selection_text).collect()),
        // An object of booleans is a checkbox group, one with a `value` is a
        // selected option, and a single entry is a radio selection with free
        // text.
        Value::Object(obj) if obj.values().all(Value::is_boolean) => Lookup::List(
            obj.iter()
                .filter(|(_, v)| v.as_bool() == Some(true))
                .map(|(k, _)| k.clone())
                .collect(),
        ),
        Value::Object(obj) if obj.contains_key("value") => {
            selection_text(value).map_or(Lookup::Null, Lookup::Text)
        }
        Value::Object(obj) if obj.len() == 1 => obj
            .keys()
            .next()
            .map_or(Lookup::Null, |k| Lookup::Text(k.clone())),
        Value::Object(_) => Lookup::Null,
    }
}

fn selection_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(obj) => obj.get("value").and_then(selection_text),
        _ => None,
    }
}

fn lookup_answer(answer: &Answer) -> Lookup {
    match answer {
        Answer::Empty => Lookup::Null,
        Answer::Raw(value) => lookup_raw(value),
        Answer::Date(d) => Lookup::Text(d.to_string()),
        Answer::Tags(tags) => Lookup::List(tags.iter().map(|t| t.value.clone()).collect()),
        Answer::Radio(RadioAnswer::Basic(value)) => Lookup::Text(value.clone()),
        Answer::Radio(RadioAnswer::WithText { value, .. }) => Lookup::Text(value.clone()),
        Answer::Tiered(chain) => Lookup::List(chain.values().cloned().collect()),
        Answer::Table(entries) => Lookup::List(entries.iter().map(|e| e.key.clone()).collect()),
        Answer::Entries(entries) => Lookup::List(
            entries
                .iter()
                .filter(|e| !e.value.is_empty())
                .map(|e| e.value.clone())
                .collect(),
        ),
    }
}
