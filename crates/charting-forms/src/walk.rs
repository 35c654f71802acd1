//! Depth-first traversal of the widget tree.

use std::collections::{BTreeMap, HashSet};

use charting_core::answer::Answer;
use charting_core::widget::{Widget, WidgetTree};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ValueLookup;
use crate::error::FormsError;
use crate::evaluate::any_satisfied;

/// Effective state of one leaf for the current answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FieldState {
    pub key: String,
    pub visible: bool,
    /// Required and visible. Hidden fields are never required.
    pub required: bool,
}

/// The first leaf stored under `key`, searching depth-first through every
/// structural widget (both branches of a conditional included).
pub fn find_widget<'a>(tree: &'a WidgetTree, key: &str) -> Option<&'a Widget> {
    tree.widgets.iter().find_map(|widget| find_node(widget, key))
}

fn find_node<'a>(widget: &'a Widget, key: &str) -> Option<&'a Widget> {
    if widget.key() == Some(key) {
        return Some(widget);
    }
    widget
        .children()
        .into_iter()
        .find_map(|child| find_node(child, key))
}

/// Every leaf in document order.
pub fn leaves(tree: &WidgetTree) -> Vec<&Widget> {
    let mut out = Vec::new();
    for widget in &tree.widgets {
        collect_leaves(widget, &mut out);
    }
    out
}

fn collect_leaves<'a>(widget: &'a Widget, out: &mut Vec<&'a Widget>) {
    if widget.key().is_some() {
        out.push(widget);
        return;
    }
    for child in widget.children() {
        collect_leaves(child, out);
    }
}

/// Reject trees where two leaves share a key. The answer map is keyed by
/// leaf key alone, so a duplicate would let one field overwrite another.
pub fn validate_keys(tree: &WidgetTree) -> Result<(), FormsError> {
    let mut seen = HashSet::new();
    for leaf in leaves(tree) {
        if let Some(key) = leaf.key()
            && !seen.insert(key)
        {
            return Err(FormsError::DuplicateKey(key.to_string()));
        }
    }
    Ok(())
}

/// Visibility and required state of every leaf, in document order.
pub fn field_states<L: ValueLookup + ?Sized>(tree: &WidgetTree, values: &L) -> Vec<FieldState> {
    let mut out = Vec::new();
    for widget in &tree.widgets {
        collect_states(widget, true, values, &mut out);
    }
    out
}

fn collect_states<L: ValueLookup + ?Sized>(
    widget: &Widget,
    visible: bool,
    values: &L,
    out: &mut Vec<FieldState>,
) {
    if let Some(key) = widget.key() {
        out.push(FieldState {
            key: key.to_string(),
            visible,
            required: visible && widget.is_required(),
        });
        return;
    }

    if let Widget::Conditional(conditional) = widget {
        let shown = any_satisfied(&conditional.conditions, values);
        for child in &conditional.widgets {
            collect_states(child, visible && shown, values, out);
        }
        for child in &conditional.otherwise {
            collect_states(child, visible && !shown, values, out);
        }
        return;
    }

    for child in widget.children() {
        collect_states(child, visible, values, out);
    }
}

/// Keys of visible, required leaves that have no answer.
pub fn missing_required(tree: &WidgetTree, answers: &BTreeMap<String, Answer>) -> Vec<String> {
    field_states(tree, answers)
        .into_iter()
        .filter(|state| state.required)
        .filter(|state| answers.get(&state.key).is_none_or(Answer::is_empty))
        .map(|state| state.key)
        .collect()
}
