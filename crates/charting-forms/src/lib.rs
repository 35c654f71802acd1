//! charting-forms
//!
//! The charting form interpreter. Pure and synchronous, with no network or
//! storage dependency. Given a widget tree and the current answers it decides
//! which fields are visible and required, which options each tiered input
//! offers, how raw answers serialise into the submission payload, and how
//! display templates read.

pub mod error;
pub mod evaluate;
pub mod format;
pub mod interpolate;
pub mod session;
pub mod tiered;
pub mod walk;

/// A current answer as seen by a condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Null,
    Text(String),
    Number(f64),
    Bool(bool),
    List(Vec<String>),
}

/// Read access to the current answers, keyed by leaf key.
///
/// Implemented for the raw frontend map, the decoded answer map, and
/// closures wrapped in [`evaluate::LookupFn`].
pub trait ValueLookup {
    /// The value stored under `key`, or [`Lookup::Null`] when unanswered.
    fn lookup(&self, key: &str) -> Lookup;

    /// The value as a string, when it is one.
    fn text(&self, key: &str) -> Option<String> {
        match self.lookup(key) {
            Lookup::Text(s) if !s.is_empty() => Some(s),
            Lookup::Number(n) if n.is_finite() => Some(n.to_string()),
            _ => None,
        }
    }
}
