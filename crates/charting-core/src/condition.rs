//! Visibility conditions over the current answer values.
//!
//! Conditions are declared in the widget configuration and evaluated by the
//! interpreter. The set of variants is closed: an unrecognised `type` tag is
//! a configuration bug and fails at parse time instead of evaluating to
//! false.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Condition {
    StringEquals { key: String, value: String },
    StringIn { key: String, values: Vec<String> },
    NumericEquals { key: String, value: f64 },
    NumericIn { key: String, values: Vec<f64> },
    BooleanEquals { key: String, value: bool },
    NotNull { key: String },
    And { conditions: Vec<Condition> },
    Or { conditions: Vec<Condition> },
}

impl Condition {
    /// Parse a condition from its JSON form.
    pub fn from_json(value: serde_json::Value) -> Result<Self, CoreError> {
        serde_json::from_value(value).map_err(|e| CoreError::Configuration(e.to_string()))
    }

    /// Every answer key this condition reads, in declaration order.
    pub fn keys(&self) -> Vec<&str> {
        match self {
            Condition::StringEquals { key, .. }
            | Condition::StringIn { key, .. }
            | Condition::NumericEquals { key, .. }
            | Condition::NumericIn { key, .. }
            | Condition::BooleanEquals { key, .. }
            | Condition::NotNull { key } => vec![key.as_str()],
            Condition::And { conditions } | Condition::Or { conditions } => {
                conditions.iter().flat_map(Condition::keys).collect()
            }
        }
    }
}
