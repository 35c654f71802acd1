//! Dependent inputs: tiered chains and conditional option lists.
//!
//! A tiered chain is an ordered list of inputs stored under one key, where
//! each input's options depend on the inputs before it. Options are always
//! derived from the current answers, never stored. Changing an input clears
//! every input after it so a stale downstream selection is never submitted.

use std::collections::BTreeMap;

use charting_core::options::{ChoiceOption, ConditionalProps, OptionEntry, TierProps};
use charting_core::widget::TieredInputsWidget;
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::ValueLookup;
use crate::error::FormsError;
use crate::evaluate::{Layered, is_satisfied};

/// The rendered state of one chain input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ResolvedTier {
    pub name: String,
    pub options: Vec<ChoiceOption>,
    pub sublabel: Option<String>,
    /// False when an earlier input is unanswered or no props entry matched.
    pub enabled: bool,
    pub value: Option<String>,
}

/// The first entry whose condition is absent or satisfied.
pub fn get_conditional<'a, L: ValueLookup + ?Sized>(
    props: &'a [ConditionalProps],
    values: &L,
) -> Option<&'a TierProps> {
    props
        .iter()
        .find(|p| p.condition.as_ref().is_none_or(|c| is_satisfied(c, values)))
        .map(|p| &p.then)
}

/// Resolve every input of `chain` in order.
///
/// Conditions read the chain's own answers first, then `values`. Once an
/// input is unanswered, every later input is disabled with no options.
pub fn resolve_chain<L: ValueLookup + ?Sized>(
    chain: &TieredInputsWidget,
    answer: &BTreeMap<String, String>,
    values: &L,
) -> Vec<ResolvedTier> {
    let lookup = Layered {
        first: answer,
        fallback: values,
    };

    let mut blocked = false;
    let mut out = Vec::with_capacity(chain.inputs.len());
    for input in &chain.inputs {
        let value = answer.get(&input.name).cloned();
        let props = if blocked {
            None
        } else {
            get_conditional(&input.props, &lookup)
        };

        out.push(ResolvedTier {
            name: input.name.clone(),
            options: props.map(|p| p.options.clone()).unwrap_or_default(),
            sublabel: props.and_then(|p| p.sublabel.clone()),
            enabled: props.is_some(),
            value: if blocked { None } else { value.clone() },
        });

        if value.is_none() {
            blocked = true;
        }
    }
    out
}

/// Clear every input after the first one that differs between `old` and
/// `new`. Returns `new` unchanged when nothing differs.
pub fn reconcile(
    chain: &TieredInputsWidget,
    old: &BTreeMap<String, String>,
    mut new: BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let changed = chain
        .inputs
        .iter()
        .position(|input| old.get(&input.name) != new.get(&input.name));

    if let Some(position) = changed {
        for input in &chain.inputs[position + 1..] {
            if new.remove(&input.name).is_some() {
                debug!(
                    chain = %chain.key,
                    input = %input.name,
                    changed = %chain.inputs[position].name,
                    "cleared downstream tier"
                );
            }
        }
    }
    new
}

/// Set (or clear, with `None`) one input of the chain and cascade.
pub fn apply_change(
    chain: &TieredInputsWidget,
    current: &BTreeMap<String, String>,
    input: &str,
    value: Option<&str>,
) -> Result<BTreeMap<String, String>, FormsError> {
    if chain.position(input).is_none() {
        return Err(FormsError::UnknownTier {
            key: chain.key.clone(),
            input: input.to_string(),
        });
    }

    let mut updated = current.clone();
    match value.filter(|v| !v.is_empty()) {
        Some(v) => {
            updated.insert(input.to_string(), v.to_string());
        }
        None => {
            updated.remove(input);
        }
    }
    Ok(reconcile(chain, current, updated))
}

/// Flatten an option list, keeping plain options and the options of every
/// conditional group whose condition holds.
pub fn resolve_options<L: ValueLookup + ?Sized>(
    entries: &[OptionEntry],
    values: &L,
) -> Vec<ChoiceOption> {
    entries
        .iter()
        .flat_map(|entry| match entry {
            OptionEntry::Plain(option) => vec![option.clone()],
            OptionEntry::Conditional(props) => {
                let applies = props
                    .condition
                    .as_ref()
                    .is_none_or(|c| is_satisfied(c, values));
                if applies {
                    props.then.options.clone()
                } else {
                    Vec::new()
                }
            }
        })
        .collect()
}
