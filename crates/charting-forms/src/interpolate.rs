//! `{{placeholder}}` substitution for display strings.
//!
//! Each placeholder name maps to a [`Placeholder`] describing how to render
//! it from the current answers. A value that is missing or unreadable, or a
//! pattern that cannot format it, renders as `-`. A name with no entry in the
//! placeholder table is left in the output untouched, braces included.

use std::collections::BTreeMap;

use charting_core::answer::parse_date;
use jiff::civil::{Date, Time};
use jiff::fmt::strtime;
use jiff::tz::TimeZone;
use serde::{Deserialize, Serialize};

use crate::ValueLookup;
use crate::error::FormsError;

const MISSING: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Placeholder {
    /// The answer as-is.
    Text { key: String },
    /// A date answer formatted with a strftime pattern.
    Date {
        key: String,
        #[serde(default = "default_date_pattern")]
        pattern: String,
    },
    /// An `HH:mm` answer, read in the interpolator's time zone.
    Time {
        key: String,
        #[serde(default = "default_time_pattern")]
        pattern: String,
    },
    /// Whole minutes from `start` to `end`, both `HH:mm` answers.
    DateDiff { start: String, end: String },
}

fn default_date_pattern() -> String {
    "%m/%d/%Y".to_string()
}

fn default_time_pattern() -> String {
    "%-I:%M %p %Z".to_string()
}

/// Renders templates for one time zone.
#[derive(Debug, Clone)]
pub struct Interpolator {
    pub timezone: TimeZone,
    /// Day used to place `HH:mm` answers in time, which decides the offset
    /// and abbreviation in zones with daylight saving.
    pub reference_date: Date,
}

impl Interpolator {
    pub fn new(timezone: TimeZone, reference_date: Date) -> Self {
        Self {
            timezone,
            reference_date,
        }
    }

    /// An interpolator for the named IANA zone, anchored on today's date in
    /// that zone.
    pub fn for_zone(name: &str) -> Result<Self, FormsError> {
        let timezone = TimeZone::get(name).map_err(|_| FormsError::TimeZone(name.to_string()))?;
        let reference_date = jiff::Timestamp::now().to_zoned(timezone.clone()).date();
        Ok(Self::new(timezone, reference_date))
    }

    pub fn interpolate<L: ValueLookup + ?Sized>(
        &self,
        template: &str,
        values: &L,
        placeholders: &BTreeMap<String, Placeholder>,
    ) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after_open = &rest[start + 2..];
            let Some(end) = after_open.find("}}") else {
                // Unterminated: emit the remainder verbatim.
                out.push_str(&rest[start..]);
                return out;
            };

            let name = after_open[..end].trim();
            match placeholders.get(name) {
                Some(placeholder) => out.push_str(&self.render(placeholder, values)),
                None => out.push_str(&rest[start..start + 2 + end + 2]),
            }
            rest = &after_open[end + 2..];
        }
        out.push_str(rest);
        out
    }

    fn render<L: ValueLookup + ?Sized>(&self, placeholder: &Placeholder, values: &L) -> String {
        let rendered = match placeholder {
            Placeholder::Text { key } => values.text(key),
            Placeholder::Date { key, pattern } => values
                .text(key)
                .and_then(|s| parse_date(&s))
                .and_then(|d| strtime::format(pattern, d).ok()),
            Placeholder::Time { key, pattern } => values
                .text(key)
                .and_then(|s| parse_hhmm(&s))
                .and_then(|t| {
                    self.reference_date
                        .to_datetime(t)
                        .to_zoned(self.timezone.clone())
                        .ok()
                })
                .and_then(|zdt| strtime::format(pattern, &zdt).ok()),
            Placeholder::DateDiff { start, end } => {
                match (
                    values.text(start).and_then(|s| minutes_of_day(&s)),
                    values.text(end).and_then(|s| minutes_of_day(&s)),
                ) {
                    (Some(start), Some(end)) => Some((end - start).to_string()),
                    _ => None,
                }
            }
        };
        rendered.unwrap_or_else(|| MISSING.to_string())
    }
}

/// Parse `HH:mm` (seconds allowed and ignored).
fn parse_hhmm(s: &str) -> Option<Time> {
    let mut parts = s.trim().split(':');
    let hour: i8 = parts.next()?.parse().ok()?;
    let minute: i8 = parts.next()?.parse().ok()?;
    Time::new(hour, minute, 0, 0).ok()
}

fn minutes_of_day(s: &str) -> Option<i64> {
    let time = parse_hhmm(s)?;
    Some(i64::from(time.hour()) * 60 + i64::from(time.minute()))
}
