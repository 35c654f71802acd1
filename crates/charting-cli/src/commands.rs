//! Subcommand implementations. Each takes parsed inputs and returns the
//! JSON (or text) the binary prints, so they can be tested without files.

use std::collections::BTreeMap;
use std::path::Path;

use charting_core::answer::RawAnswers;
use charting_core::encounter::{EncounterAction, EncounterStatus};
use charting_core::widget::WidgetTree;
use charting_forms::format::format_submission;
use charting_forms::interpolate::{Interpolator, Placeholder};
use charting_forms::session::ChartingSession;
use charting_forms::walk;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::config::ChartingConfig;

pub fn read_json(path: &Path) -> eyre::Result<Value> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read {}: {e}", path.display()))?;
    serde_json::from_str(&contents)
        .map_err(|e| eyre::eyre!("{} is not valid JSON: {e}", path.display()))
}

pub fn read_tree(path: &Path) -> eyre::Result<WidgetTree> {
    Ok(WidgetTree::from_json(read_json(path)?)?)
}

pub fn read_answers(path: &Path) -> eyre::Result<RawAnswers> {
    match read_json(path)? {
        Value::Object(map) => Ok(map),
        _ => Err(eyre::eyre!("{} must hold a JSON object", path.display())),
    }
}

/// Parse the tree and check that leaf keys are unique.
pub fn validate(tree: &WidgetTree) -> eyre::Result<Value> {
    walk::validate_keys(tree)?;
    let leaves: Vec<&str> = walk::leaves(tree).into_iter().filter_map(|w| w.key()).collect();
    Ok(json!({
        "version": tree.version,
        "leaf_count": leaves.len(),
        "leaves": leaves,
    }))
}

pub fn format(config: &ChartingConfig, tree: &WidgetTree, answers: &RawAnswers) -> eyre::Result<Value> {
    let payload = format_submission(answers, tree, config.unknown_key_policy)?;
    Ok(serde_json::to_value(payload)?)
}

pub fn fields(tree: &WidgetTree, answers: &RawAnswers) -> eyre::Result<Value> {
    Ok(serde_json::to_value(walk::field_states(tree, answers))?)
}

pub fn tiers(
    config: &ChartingConfig,
    tree: WidgetTree,
    answers: &RawAnswers,
    key: &str,
) -> eyre::Result<Value> {
    let mut session = ChartingSession::new(Uuid::nil(), EncounterStatus::Open, tree)?;
    session.load(answers, config.unknown_key_policy)?;
    Ok(serde_json::to_value(session.resolve_tiers(key)?)?)
}

pub fn interpolate(
    config: &ChartingConfig,
    template: &str,
    answers: &RawAnswers,
    placeholders: Value,
) -> eyre::Result<String> {
    let placeholders: BTreeMap<String, Placeholder> = serde_json::from_value(placeholders)
        .map_err(|e| eyre::eyre!("invalid placeholder table: {e}"))?;
    let interpolator = Interpolator::for_zone(&config.timezone)?;
    Ok(interpolator.interpolate(template, answers, &placeholders))
}

pub struct RequestArgs<'a> {
    pub encounter_id: Uuid,
    pub status: EncounterStatus,
    pub action: EncounterAction,
    pub previous: Option<&'a RawAnswers>,
}

/// Build the API request for one encounter action.
pub fn request(
    config: &ChartingConfig,
    tree: WidgetTree,
    answers: &RawAnswers,
    args: RequestArgs<'_>,
) -> eyre::Result<Value> {
    let mut session = ChartingSession::new(args.encounter_id, args.status, tree)?;
    session.load(answers, config.unknown_key_policy)?;
    if let Some(previous) = args.previous {
        session.prefill(previous);
    }
    let request = session.request(args.action, config.require_oversight)?;
    Ok(serde_json::to_value(request)?)
}
