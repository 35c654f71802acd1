use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Where an encounter sits in its charting lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum EncounterStatus {
    /// Never saved.
    Draft,
    /// Saved, still being charted.
    Open,
    /// Submitted and waiting on a supervising provider.
    Oversight,
    Closed,
    /// Closed, then changed after the fact.
    Amended,
}

/// A request the provider can make against an encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum EncounterAction {
    Save,
    Submit,
    Resubmit,
    Approve,
    Amend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "UPPERCASE")]
#[ts(export)]
pub enum HttpMethod {
    Put,
    Post,
}

impl EncounterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EncounterStatus::Draft => "draft",
            EncounterStatus::Open => "open",
            EncounterStatus::Oversight => "oversight",
            EncounterStatus::Closed => "closed",
            EncounterStatus::Amended => "amended",
        }
    }

    /// The status after `action`, or an error if the action is not allowed
    /// from this status. `requires_oversight` decides where a submit lands.
    pub fn apply(
        self,
        action: EncounterAction,
        requires_oversight: bool,
    ) -> Result<EncounterStatus, CoreError> {
        use EncounterAction as A;
        use EncounterStatus as S;

        let next = match (self, action) {
            (S::Draft | S::Open, A::Save) => S::Open,
            (S::Draft | S::Open, A::Submit) if requires_oversight => S::Oversight,
            (S::Draft | S::Open, A::Submit) => S::Closed,
            (S::Oversight, A::Resubmit) => S::Oversight,
            (S::Oversight, A::Approve) => S::Closed,
            (S::Closed | S::Amended, A::Amend) => S::Amended,
            (status, action) => return Err(CoreError::InvalidTransition { status, action }),
        };
        Ok(next)
    }
}

impl EncounterAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            EncounterAction::Save => "save",
            EncounterAction::Submit => "submit",
            EncounterAction::Resubmit => "resubmit",
            EncounterAction::Approve => "approve",
            EncounterAction::Amend => "amend",
        }
    }

    pub fn method(&self) -> HttpMethod {
        match self {
            EncounterAction::Save => HttpMethod::Put,
            _ => HttpMethod::Post,
        }
    }

    /// Actions that finalise chart content and so require every visible
    /// required field to be answered.
    pub fn requires_complete_chart(&self) -> bool {
        !matches!(self, EncounterAction::Save | EncounterAction::Approve)
    }
}

impl fmt::Display for EncounterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for EncounterAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
