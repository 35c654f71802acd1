//! Encounter API path conventions.
//!
//! Pure string functions. The HTTP call itself belongs to the external
//! client that receives a [`SubmissionRequest`](crate::payload::SubmissionRequest).

use uuid::Uuid;

use crate::encounter::EncounterAction;

pub const ENCOUNTERS_PREFIX: &str = "encounters/";

pub fn encounter(id: Uuid) -> String {
    format!("{ENCOUNTERS_PREFIX}{id}")
}

pub fn encounter_action(id: Uuid, action: EncounterAction) -> String {
    format!("{}/{}", encounter(id), action.as_str())
}
