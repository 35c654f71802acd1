use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::condition::Condition;

/// One selectable choice of a select, radio, combobox, or tag input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChoiceOption {
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}

/// Properties that apply when `condition` holds (or always, when absent).
///
/// Used both for tiered inputs, where the first matching entry wins, and as
/// the conditional wrapper inside an option list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    pub then: TierProps,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TierProps {
    #[serde(default)]
    pub options: Vec<ChoiceOption>,
    /// Helper text shown under free-text inputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sublabel: Option<String>,
}

/// An entry in an option list: a plain option, or a group of options gated
/// on another field's value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionEntry {
    Conditional(ConditionalProps),
    Plain(ChoiceOption),
}
