use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::encounter::{EncounterAction, EncounterStatus, HttpMethod};
use crate::endpoints;

/// The canonical chart content sent to the encounter API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub charting_data: Map<String, Value>,
}

/// Everything the external HTTP client needs to persist one action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    pub encounter_id: Uuid,
    pub action: EncounterAction,
    pub method: HttpMethod,
    pub path: String,
    /// Status the encounter moves to once the call succeeds.
    pub next_status: EncounterStatus,
    pub payload: SubmissionPayload,
}

impl SubmissionRequest {
    pub fn new(
        encounter_id: Uuid,
        action: EncounterAction,
        next_status: EncounterStatus,
        payload: SubmissionPayload,
    ) -> Self {
        Self {
            encounter_id,
            action,
            method: action.method(),
            path: endpoints::encounter_action(encounter_id, action),
            next_status,
            payload,
        }
    }
}
