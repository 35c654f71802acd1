//! One provider's charting session for one encounter.
//!
//! The session owns the widget tree and the decoded answer map. Every change
//! goes through [`ChartingSession::set_answer`], which decodes the value for
//! its widget and, for tiered chains, clears downstream inputs invalidated
//! by the change.

use std::collections::BTreeMap;

use charting_core::answer::{Answer, RawAnswers};
use charting_core::encounter::{EncounterAction, EncounterStatus};
use charting_core::options::ChoiceOption;
use charting_core::payload::{SubmissionPayload, SubmissionRequest};
use charting_core::widget::{Widget, WidgetTree};
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::FormsError;
use crate::format::{UnknownKeyPolicy, format_answers};
use crate::tiered::{ResolvedTier, apply_change, reconcile, resolve_chain, resolve_options};
use crate::walk::{self, FieldState, find_widget};

#[derive(Debug, Clone)]
pub struct ChartingSession {
    encounter_id: Uuid,
    status: EncounterStatus,
    tree: WidgetTree,
    answers: BTreeMap<String, Answer>,
}

impl ChartingSession {
    /// Open a session with no answers. Fails if the tree repeats a leaf key.
    pub fn new(
        encounter_id: Uuid,
        status: EncounterStatus,
        tree: WidgetTree,
    ) -> Result<Self, FormsError> {
        walk::validate_keys(&tree)?;
        Ok(Self {
            encounter_id,
            status,
            tree,
            answers: BTreeMap::new(),
        })
    }

    /// Pre-fill answers from a previous encounter's snapshot.
    ///
    /// Only keys that are leaves of this tree and decode cleanly are taken;
    /// answers already present are kept.
    pub fn prefill(&mut self, previous: &RawAnswers) -> usize {
        let mut filled = 0;
        for (key, raw) in previous {
            if self.answers.contains_key(key) {
                continue;
            }
            let Some(widget) = find_widget(&self.tree, key) else {
                debug!(key = %key, "previous answer has no widget, skipping");
                continue;
            };
            match Answer::decode(widget, raw) {
                Ok(answer) if !answer.is_empty() => {
                    self.answers.insert(key.clone(), answer);
                    filled += 1;
                }
                Ok(_) => {}
                Err(e) => debug!(key = %key, error = %e, "previous answer undecodable, skipping"),
            }
        }
        info!(encounter_id = %self.encounter_id, filled, "pre-filled from previous encounter");
        filled
    }

    /// Replace the answers with a saved snapshot of this encounter.
    ///
    /// Under [`UnknownKeyPolicy::Drop`] a value with no widget, or one that
    /// cannot be decoded for its widget, is logged and skipped.
    pub fn load(&mut self, raw: &RawAnswers, policy: UnknownKeyPolicy) -> Result<(), FormsError> {
        let mut answers = BTreeMap::new();
        for (key, value) in raw {
            let Some(widget) = find_widget(&self.tree, key) else {
                if policy == UnknownKeyPolicy::Reject {
                    return Err(FormsError::UnknownKey(key.clone()));
                }
                warn!(key = %key, "saved answer has no widget, dropping it");
                continue;
            };
            let answer = match Answer::decode(widget, value) {
                Ok(answer) => answer,
                Err(e) if policy == UnknownKeyPolicy::Reject => return Err(e.into()),
                Err(e) => {
                    warn!(key = %key, error = %e, "saved answer undecodable, dropping it");
                    continue;
                }
            };
            if !answer.is_empty() {
                answers.insert(key.clone(), answer);
            }
        }
        self.answers = answers;
        Ok(())
    }

    /// Set one answer from its frontend value. A blank value clears it.
    pub fn set_answer(&mut self, key: &str, raw: &Value) -> Result<(), FormsError> {
        let widget = self.widget(key)?;
        let answer = match (widget, Answer::decode(widget, raw)?) {
            (Widget::TieredInputs(chain), Answer::Tiered(new)) => {
                let old = match self.answers.get(key) {
                    Some(Answer::Tiered(old)) => old.clone(),
                    _ => BTreeMap::new(),
                };
                Answer::Tiered(reconcile(chain, &old, new))
            }
            (_, answer) => answer,
        };

        if answer.is_empty() {
            self.answers.remove(key);
        } else {
            self.answers.insert(key.to_string(), answer);
        }
        Ok(())
    }

    /// Set one input of a tiered chain, clearing the inputs after it.
    pub fn set_tier(&mut self, key: &str, input: &str, value: Option<&str>) -> Result<(), FormsError> {
        let chain = match self.widget(key)? {
            Widget::TieredInputs(chain) => chain,
            _ => {
                return Err(FormsError::WrongKind {
                    key: key.to_string(),
                    expected: "tiered-inputs",
                });
            }
        };
        let current = match self.answers.get(key) {
            Some(Answer::Tiered(current)) => current.clone(),
            _ => BTreeMap::new(),
        };

        let updated = apply_change(chain, &current, input, value)?;
        if updated.is_empty() {
            self.answers.remove(key);
        } else {
            self.answers.insert(key.to_string(), Answer::Tiered(updated));
        }
        Ok(())
    }

    pub fn clear_answer(&mut self, key: &str) -> Option<Answer> {
        self.answers.remove(key)
    }

    pub fn answer(&self, key: &str) -> Option<&Answer> {
        self.answers.get(key)
    }

    pub fn answers(&self) -> &BTreeMap<String, Answer> {
        &self.answers
    }

    /// The answers in their frontend shape.
    pub fn raw_answers(&self) -> RawAnswers {
        self.answers
            .iter()
            .map(|(k, v)| (k.clone(), v.to_raw()))
            .collect()
    }

    pub fn tree(&self) -> &WidgetTree {
        &self.tree
    }

    pub fn encounter_id(&self) -> Uuid {
        self.encounter_id
    }

    pub fn status(&self) -> EncounterStatus {
        self.status
    }

    pub fn field_states(&self) -> Vec<FieldState> {
        walk::field_states(&self.tree, &self.answers)
    }

    pub fn missing_required(&self) -> Vec<String> {
        walk::missing_required(&self.tree, &self.answers)
    }

    pub fn resolve_tiers(&self, key: &str) -> Result<Vec<ResolvedTier>, FormsError> {
        let Widget::TieredInputs(chain) = self.widget(key)? else {
            return Err(FormsError::WrongKind {
                key: key.to_string(),
                expected: "tiered-inputs",
            });
        };
        let empty = BTreeMap::new();
        let answer = match self.answers.get(key) {
            Some(Answer::Tiered(answer)) => answer,
            _ => &empty,
        };
        Ok(resolve_chain(chain, answer, &self.answers))
    }

    /// Options currently offered by a select, combobox, radio, checkbox,
    /// tag, or entry-editor widget.
    pub fn options(&self, key: &str) -> Result<Vec<ChoiceOption>, FormsError> {
        match self.widget(key)? {
            Widget::Select(w)
            | Widget::Combobox(w)
            | Widget::Radio(w)
            | Widget::Checkbox(w)
            | Widget::TagInput(w)
            | Widget::EntryEditor(w) => Ok(resolve_options(&w.options, &self.answers)),
            _ => Err(FormsError::WrongKind {
                key: key.to_string(),
                expected: "choice",
            }),
        }
    }

    /// The submission payload. Answers to fields that are currently hidden
    /// are left out.
    pub fn payload(&self) -> SubmissionPayload {
        let states = self.field_states();
        let visible = self.answers.iter().filter(|(key, _)| {
            let shown = states.iter().any(|s| &s.key == *key && s.visible);
            if !shown {
                debug!(key = %key, "omitting answer to hidden field");
            }
            shown
        });
        format_answers(visible)
    }

    /// Describe the API call for `action` without changing the session.
    ///
    /// Fails when the action is not allowed from the current status, or when
    /// the action finalises the chart and required fields are missing.
    pub fn request(
        &self,
        action: EncounterAction,
        requires_oversight: bool,
    ) -> Result<SubmissionRequest, FormsError> {
        let next_status = self.status.apply(action, requires_oversight)?;

        if action.requires_complete_chart() {
            let missing = self.missing_required();
            if !missing.is_empty() {
                return Err(FormsError::MissingRequired(missing));
            }
        }

        Ok(SubmissionRequest::new(
            self.encounter_id,
            action,
            next_status,
            self.payload(),
        ))
    }

    /// Record that the external client persisted `request`.
    pub fn mark_persisted(&mut self, request: &SubmissionRequest) {
        info!(
            encounter_id = %self.encounter_id,
            action = %request.action,
            from = %self.status,
            to = %request.next_status,
            "encounter status changed"
        );
        self.status = request.next_status;
    }

    fn widget(&self, key: &str) -> Result<&Widget, FormsError> {
        find_widget(&self.tree, key).ok_or_else(|| FormsError::UnknownKey(key.to_string()))
    }
}
