//! ICS (RFC 5545) encoding.
//!
//! [`IcsEncoder`] turns one or more [`NormalizedEvent`]s into a complete
//! `VCALENDAR` document. It is used for single-event downloads, bulk exports
//! and inline calendar previews.
//!
//! Unlike the provider mappers, timed events are converted to UTC here
//! (`DTSTART:20250601T150000Z`); see [`crate::time`] for how naive strings
//! are placed. All-day events keep their date digits untouched.
//!
//! # Example
//!
//! ```
//! use calport_core::ics::IcsEncoder;
//! use calport_core::NormalizedEvent;
//!
//! let event = NormalizedEvent::new("Launch", "2025-06-01T15:00:00Z", "2025-06-01T16:00:00Z");
//! let bytes = IcsEncoder::new().encode(&[event]).unwrap();
//! let text = String::from_utf8(bytes).unwrap();
//! assert!(text.contains("DTSTART:20250601T150000Z\r\n"));
//! ```

mod text;


use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::event::NormalizedEvent;
use crate::time::{date_digits, format_utc_stamp, utc_stamp};

pub use text::{MAX_LINE_OCTETS, escape_text, fold_line};

/// Default `PRODID` value.
pub const DEFAULT_PROD_ID: &str = "-//calport//calport 1.0//EN";

/// Default domain appended to generated UIDs.
pub const DEFAULT_UID_DOMAIN: &str = "calport.app";

/// MIME type for served calendars.
pub const ICS_CONTENT_TYPE: &str = "text/calendar; charset=utf-8";

/// Serializes normalized events into RFC 5545 text.
#[derive(Debug, Clone)]
pub struct IcsEncoder {
    prod_id: String,
    uid_domain: String,
}

impl Default for IcsEncoder {
    fn default() -> Self {
        Self {
            prod_id: DEFAULT_PROD_ID.to_string(),
            uid_domain: DEFAULT_UID_DOMAIN.to_string(),
        }
    }
}

impl IcsEncoder {
    /// Creates an encoder with the default product id and UID domain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the `PRODID` value.
    pub fn with_prod_id(mut self, prod_id: impl Into<String>) -> Self {
        self.prod_id = prod_id.into();
        self
    }

    /// Builder method to set the UID domain suffix.
    pub fn with_uid_domain(mut self, domain: impl Into<String>) -> Self {
        self.uid_domain = domain.into();
        self
    }

    /// Encodes the events as a CRLF-terminated `VCALENDAR` document.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyEventList`] when `events` is empty. Malformed
    /// dates are not errors; they are written in a best-effort textual form.
    pub fn encode(&self, events: &[NormalizedEvent]) -> CoreResult<Vec<u8>> {
        let domain = self.uid_domain.as_str();
        self.encode_with(events, Utc::now(), || {
            format!("{}@{}", Uuid::new_v4(), domain)
        })
    }

    /// Encodes the events and wraps them with serving metadata.
    pub fn export(&self, events: &[NormalizedEvent]) -> CoreResult<IcsExport> {
        let bytes = self.encode(events)?;
        Ok(IcsExport::new(bytes, export_filename(events)))
    }

    /// Encodes with an explicit `DTSTAMP` instant and UID source.
    pub(crate) fn encode_with(
        &self,
        events: &[NormalizedEvent],
        stamp: DateTime<Utc>,
        mut next_uid: impl FnMut() -> String,
    ) -> CoreResult<Vec<u8>> {
        if events.is_empty() {
            return Err(CoreError::EmptyEventList);
        }

        let dtstamp = format_utc_stamp(stamp);
        let mut lines = vec![
            "BEGIN:VCALENDAR".to_string(),
            format!("PRODID:{}", self.prod_id),
            "VERSION:2.0".to_string(),
            "CALSCALE:GREGORIAN".to_string(),
            "METHOD:PUBLISH".to_string(),
        ];
        for event in events {
            push_event(&mut lines, event, &next_uid(), &dtstamp);
        }
        lines.push("END:VCALENDAR".to_string());

        let mut out = String::new();
        for line in &lines {
            out.push_str(&fold_line(line));
            out.push_str("\r\n");
        }

        debug!(events = events.len(), bytes = out.len(), "encoded calendar");
        Ok(out.into_bytes())
    }
}

/// Encodes events with the default encoder settings.
///
/// See [`IcsEncoder::encode`].
pub fn encode(events: &[NormalizedEvent]) -> CoreResult<Vec<u8>> {
    IcsEncoder::new().encode(events)
}

/// Appends the `VEVENT` block for one event.
fn push_event(lines: &mut Vec<String>, event: &NormalizedEvent, uid: &str, dtstamp: &str) {
    lines.push("BEGIN:VEVENT".to_string());
    lines.push(format!("UID:{}", uid));
    lines.push(format!("DTSTAMP:{}", dtstamp));

    if event.all_day {
        lines.push(format!("DTSTART;VALUE=DATE:{}", date_digits(&event.start)));
        lines.push(format!("DTEND;VALUE=DATE:{}", date_digits(&event.end)));
    } else {
        let tz = event.timezone_id();
        lines.push(format!("DTSTART:{}", utc_stamp(&event.start, tz)));
        lines.push(format!("DTEND:{}", utc_stamp(&event.end, tz)));
    }

    if let Some(rrule) = event.recurrence_rule() {
        // A raw line break would start a new content line.
        let rrule: String = rrule
            .chars()
            .filter(|c| !matches!(c, '\r' | '\n'))
            .collect();
        lines.push(format!("RRULE:{}", rrule));
    }

    lines.push(format!("SUMMARY:{}", escape_text(&event.title)));
    if !event.description.is_empty() {
        lines.push(format!("DESCRIPTION:{}", escape_text(&event.description)));
    }
    let location = event.display_location();
    if !location.is_empty() {
        lines.push(format!("LOCATION:{}", escape_text(&location)));
    }

    for reminder in event.reminders().iter().filter(|r| r.minutes >= 0) {
        lines.push("BEGIN:VALARM".to_string());
        lines.push(format!("TRIGGER:-PT{}M", reminder.minutes));
        lines.push("ACTION:DISPLAY".to_string());
        lines.push("DESCRIPTION:Reminder".to_string());
        lines.push("END:VALARM".to_string());
    }

    lines.push("END:VEVENT".to_string());
}

/// How a served calendar should be presented by the browser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Disposition {
    /// Download as a file.
    #[default]
    Attachment,
    /// Render in place (calendar apps subscribing or previewing).
    Inline,
}

impl Disposition {
    /// Returns the `Content-Disposition` type token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attachment => "attachment",
            Self::Inline => "inline",
        }
    }
}

/// An encoded calendar together with what is needed to serve it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcsExport {
    bytes: Vec<u8>,
    filename: String,
}

impl IcsExport {
    /// Wraps already encoded bytes.
    pub fn new(bytes: Vec<u8>, filename: impl Into<String>) -> Self {
        Self {
            bytes,
            filename: filename.into(),
        }
    }

    /// The encoded calendar.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the export, returning the encoded calendar.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Suggested file name, always ending in `.ics`.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The `Content-Type` header value.
    pub fn content_type(&self) -> &'static str {
        ICS_CONTENT_TYPE
    }

    /// The `Content-Disposition` header value.
    pub fn content_disposition(&self, disposition: Disposition) -> String {
        format!("{}; filename=\"{}\"", disposition.as_str(), self.filename)
    }
}

/// Derives a file name from the exported events.
///
/// A single event is named after its title; batches are `events.ics`.
fn export_filename(events: &[NormalizedEvent]) -> String {
    let stem = match events {
        [event] => slugify(&event.title),
        _ => "events".to_string(),
    };
    let stem = if stem.is_empty() {
        "event".to_string()
    } else {
        stem
    };
    format!("{}.ics", stem)
}

/// Lowercase ASCII slug, at most 60 characters.
fn slugify(title: &str) -> String {
    let mut slug = String::new();
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
        if slug.len() >= 60 {
            break;
        }
    }
    slug.trim_end_matches('-').to_string()
}
