//! NormalizedEvent to Microsoft Graph `POST /me/events` body.
//!
//! Graph takes `dateTime` as wall-clock text plus a separate `timeZone`, so
//! start and end are truncated to 19 characters and sent unconverted.
//! Recurrence is not emitted: Graph wants a structured pattern, not RRULE.

use calport_core::NormalizedEvent;
use calport_core::time::char_prefix;
use serde::{Deserialize, Serialize};

/// Zone sent when the event has none.
const FALLBACK_TIME_ZONE: &str = "UTC";

/// Body of `POST /me/events`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MicrosoftEvent {
    pub subject: String,
    pub body: ItemBody,
    pub location: MicrosoftLocation,
    pub start: DateTimeTimeZone,
    pub end: DateTimeTimeZone,
    pub is_all_day: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_minutes_before_start: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_reminder_on: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemBody {
    pub content_type: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MicrosoftLocation {
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateTimeTimeZone {
    pub date_time: String,
    pub time_zone: String,
}

impl DateTimeTimeZone {
    fn from_event(value: &str, event: &NormalizedEvent) -> Self {
        Self {
            date_time: char_prefix(value, 19).to_string(),
            time_zone: event
                .timezone_id()
                .unwrap_or(FALLBACK_TIME_ZONE)
                .to_string(),
        }
    }
}

/// Maps an event to the Graph create body.
///
/// Graph holds a single reminder, so the earliest-firing one (the smallest
/// offset) wins.
pub fn to_microsoft_event(event: &NormalizedEvent) -> MicrosoftEvent {
    let reminder = event.reminders().iter().map(|r| r.minutes).min();

    MicrosoftEvent {
        subject: event.title.clone(),
        body: ItemBody {
            content_type: "HTML".to_string(),
            content: event.description.clone(),
        },
        location: MicrosoftLocation {
            display_name: event.display_location(),
        },
        start: DateTimeTimeZone::from_event(&event.start, event),
        end: DateTimeTimeZone::from_event(&event.end, event),
        is_all_day: event.all_day,
        reminder_minutes_before_start: reminder,
        is_reminder_on: reminder.map(|_| true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn minimum_reminder_wins() {
        let event = NormalizedEvent::new("Sync", "2025-04-01T14:00:00", "2025-04-01T15:00:00")
            .with_reminders([60, 15]);
        let payload = to_microsoft_event(&event);

        assert_eq!(payload.reminder_minutes_before_start, Some(15));
        assert_eq!(payload.is_reminder_on, Some(true));
    }

    #[test]
    fn no_reminders_omits_both_fields() {
        let event = NormalizedEvent::new("Sync", "2025-04-01T14:00:00", "2025-04-01T15:00:00")
            .with_reminders([]);
        let json = serde_json::to_value(to_microsoft_event(&event)).unwrap();

        assert!(json.get("reminderMinutesBeforeStart").is_none());
        assert!(json.get("isReminderOn").is_none());
    }

    #[test]
    fn date_time_is_truncated_not_converted() {
        let event = NormalizedEvent::new(
            "Sync",
            "2025-04-01T14:00:00.000+02:00",
            "2025-04-01T15:00:00Z",
        )
        .with_timezone("Europe/Amsterdam");
        let json = serde_json::to_value(to_microsoft_event(&event)).unwrap();

        assert_eq!(
            json["start"],
            json!({ "dateTime": "2025-04-01T14:00:00", "timeZone": "Europe/Amsterdam" })
        );
        assert_eq!(json["end"]["dateTime"], "2025-04-01T15:00:00");
    }

    #[test]
    fn missing_timezone_defaults_to_utc() {
        let event = NormalizedEvent::new("Sync", "2025-04-01T14:00:00", "2025-04-01T15:00:00");
        assert_eq!(to_microsoft_event(&event).start.time_zone, "UTC");
    }

    #[test]
    fn recurrence_is_never_sent() {
        let event = NormalizedEvent::new("Weekly", "2025-04-01T14:00:00", "2025-04-01T15:00:00")
            .with_recurrence("FREQ=WEEKLY");
        let json = serde_json::to_value(to_microsoft_event(&event)).unwrap();

        assert!(json.get("recurrence").is_none());
    }

    #[test]
    fn full_payload() {
        let event = NormalizedEvent::new("Offsite", "2025-04-01", "2025-04-02")
            .with_all_day(true)
            .with_timezone("Europe/Amsterdam")
            .with_venue("Pier 5")
            .with_location("Amsterdam，pier 5")
            .with_description("<b>Bring</b> a jacket")
            .with_reminders([1440, 120]);

        insta::assert_snapshot!(serde_json::to_string_pretty(&to_microsoft_event(&event)).unwrap(), @r#"
        {
          "subject": "Offsite",
          "body": {
            "contentType": "HTML",
            "content": "<b>Bring</b> a jacket"
          },
          "location": {
            "displayName": "Pier 5, Amsterdam"
          },
          "start": {
            "dateTime": "2025-04-01",
            "timeZone": "Europe/Amsterdam"
          },
          "end": {
            "dateTime": "2025-04-02",
            "timeZone": "Europe/Amsterdam"
          },
          "isAllDay": true,
          "reminderMinutesBeforeStart": 120,
          "isReminderOn": true
        }
        "#);
    }
}
