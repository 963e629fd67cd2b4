//! NormalizedEvent to Google Calendar `events.insert` body.

use calport_core::NormalizedEvent;
use calport_core::time::char_prefix;
use serde::{Deserialize, Serialize};

/// Reminder method used for every override.
const REMINDER_METHOD: &str = "popup";

/// Body of `POST /calendars/{id}/events`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleEvent {
    pub summary: String,
    pub description: String,
    pub location: String,
    pub start: GoogleEventTime,
    pub end: GoogleEventTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminders: Option<GoogleReminders>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Vec<String>>,
}

/// Either a timed boundary or an all-day date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GoogleEventTime {
    /// `{dateTime, timeZone?}`. The string is passed through; Google
    /// interprets it against `timeZone` when the offset is missing.
    #[serde(rename_all = "camelCase")]
    Timed {
        date_time: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        time_zone: Option<String>,
    },
    /// `{date}` as `YYYY-MM-DD`.
    AllDay { date: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleReminders {
    pub use_default: bool,
    pub overrides: Vec<GoogleReminderOverride>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleReminderOverride {
    pub method: String,
    pub minutes: i64,
}

fn event_time(value: &str, event: &NormalizedEvent) -> GoogleEventTime {
    if event.all_day {
        GoogleEventTime::AllDay {
            date: char_prefix(value, 10).to_string(),
        }
    } else {
        GoogleEventTime::Timed {
            date_time: value.to_string(),
            time_zone: event.timezone_id().map(str::to_string),
        }
    }
}

/// Maps an event to the Google insert body.
pub fn to_google_event(event: &NormalizedEvent) -> GoogleEvent {
    let reminders = match event.reminders() {
        [] => None,
        list => Some(GoogleReminders {
            use_default: false,
            overrides: list
                .iter()
                .map(|r| GoogleReminderOverride {
                    method: REMINDER_METHOD.to_string(),
                    minutes: r.minutes,
                })
                .collect(),
        }),
    };

    GoogleEvent {
        summary: event.title.clone(),
        description: event.description.clone(),
        location: event.display_location(),
        start: event_time(&event.start, event),
        end: event_time(&event.end, event),
        reminders,
        recurrence: event.recurrence_rule().map(|rule| vec![rule.to_string()]),
    }
}
