//! Event types for calendar export.
//!
//! This module provides the canonical record every exporter consumes:
//! - [`NormalizedEvent`]: A provider-agnostic event as authored by the user
//! - [`Reminder`]: A pre-event reminder offset in minutes
//!
//! Start and end are kept as the literal strings the producer supplied.
//! Each exporter decides how to interpret them (see [`crate::time`]).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A reminder offset before the event start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    /// Minutes before the start of the event.
    pub minutes: i64,
}

impl Reminder {
    /// Creates a reminder `minutes` before start.
    pub fn new(minutes: i64) -> Self {
        Self { minutes }
    }
}

/// A normalized, provider-agnostic event.
///
/// Producers (event forms, the extraction pipeline, schedule conversions)
/// build one of these per export request. Exporters only read it.
///
/// `start` and `end` are wall-clock strings: the digits the user typed,
/// optionally followed by an offset. When `all_day` is set only the date
/// portion is meaningful.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEvent {
    /// The event title.
    pub title: String,
    /// Start as a wall-clock date-time string.
    pub start: String,
    /// End as a wall-clock date-time string.
    pub end: String,
    /// Whether only the date portion of start/end is meaningful.
    #[serde(default)]
    pub all_day: bool,
    /// IANA timezone identifier; may be empty.
    #[serde(default)]
    pub timezone: String,
    /// Venue name(s), comma or newline separated.
    #[serde(default)]
    pub venue: String,
    /// Free-text location(s), comma or newline separated.
    #[serde(default)]
    pub location: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// A recurrence rule (RRULE value), passed through as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<String>,
    /// Reminders before start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminders: Option<Vec<Reminder>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registries: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signup_form: Option<Value>,
}

impl NormalizedEvent {
    /// Creates a new timed event with the required fields.
    pub fn new(title: impl Into<String>, start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            start: start.into(),
            end: end.into(),
            ..Default::default()
        }
    }

    /// Builder method to mark the event as all-day.
    pub fn with_all_day(mut self, all_day: bool) -> Self {
        self.all_day = all_day;
        self
    }

    /// Builder method to set the IANA timezone.
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    /// Builder method to set the venue.
    pub fn with_venue(mut self, venue: impl Into<String>) -> Self {
        self.venue = venue.into();
        self
    }

    /// Builder method to set the free-text location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder method to set the recurrence rule.
    pub fn with_recurrence(mut self, rrule: impl Into<String>) -> Self {
        self.recurrence = Some(rrule.into());
        self
    }

    /// Builder method to set reminders from minute offsets.
    pub fn with_reminders(mut self, minutes: impl IntoIterator<Item = i64>) -> Self {
        self.reminders = Some(minutes.into_iter().map(Reminder::new).collect());
        self
    }

    /// Returns the reminders, or an empty slice when absent.
    pub fn reminders(&self) -> &[Reminder] {
        self.reminders.as_deref().unwrap_or_default()
    }

    /// Returns the recurrence rule as stored, if one is set and non-blank.
    pub fn recurrence_rule(&self) -> Option<&str> {
        self.recurrence
            .as_deref()
            .filter(|r| !r.trim().is_empty())
    }

    /// Returns the timezone if it is non-blank.
    pub fn timezone_id(&self) -> Option<&str> {
        Some(self.timezone.trim()).filter(|tz| !tz.is_empty())
    }

    /// Returns the merged display location for this event.
    ///
    /// See [`crate::location::merge_location`].
    pub fn display_location(&self) -> String {
        crate::location::merge_location(&self.venue, &self.location)
    }
}
