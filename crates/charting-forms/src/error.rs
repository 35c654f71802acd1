use charting_core::error::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormsError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("duplicate leaf key '{0}' in widget tree")]
    DuplicateKey(String),

    #[error("no widget with key '{0}'")]
    UnknownKey(String),

    #[error("widget '{key}' is not a {expected} widget")]
    WrongKind { key: String, expected: &'static str },

    #[error("'{input}' is not an input of tiered chain '{key}'")]
    UnknownTier { key: String, input: String },

    #[error("required fields are missing: {}", .0.join(", "))]
    MissingRequired(Vec<String>),

    #[error("unknown time zone '{0}'")]
    TimeZone(String),
}
