//! charting-core
//!
//! Pure domain types for the telenutrition charting forms: the widget
//! configuration tree, visibility conditions, option sets, decoded answers,
//! the encounter lifecycle, and the submission payload. No interpreter logic
//! and no I/O. This is the shared vocabulary of the charting system.

pub mod answer;
pub mod condition;
pub mod encounter;
pub mod endpoints;
pub mod error;
pub mod options;
pub mod payload;
pub mod widget;
