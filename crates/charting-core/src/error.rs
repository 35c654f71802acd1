use thiserror::Error;

use crate::encounter::{EncounterAction, EncounterStatus};
use crate::widget::LeafKind;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid widget configuration: {0}")]
    Configuration(String),

    #[error("cannot decode value for '{key}' as {kind}: {reason}")]
    Decode {
        key: String,
        kind: LeafKind,
        reason: String,
    },

    #[error("cannot {action} an encounter that is {status}")]
    InvalidTransition {
        status: EncounterStatus,
        action: EncounterAction,
    },
}
