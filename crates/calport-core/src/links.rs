//! "Add to calendar" links.
//!
//! This module builds plain URLs that let a user add an event without the
//! server holding any provider credentials:
//! - a Google Calendar render (template) URL
//! - an Outlook compose URL
//! - download and inline URLs for the ICS endpoint
//!
//! Nothing here touches the network. The Google link carries UTC instants
//! (the same conversion the ICS encoder applies); the Outlook link carries
//! the wall-clock digits as typed.
//!
//! # Example
//!
//! ```
//! use calport_core::links::CalendarLinkBuilder;
//! use calport_core::NormalizedEvent;
//!
//! let builder = CalendarLinkBuilder::new("https://invites.example.com/e/42/calendar.ics").unwrap();
//! let event = NormalizedEvent::new("Launch", "2025-06-01T15:00:00Z", "2025-06-01T16:00:00Z");
//! let links = builder.build(&event);
//! assert!(links.google.contains("dates=20250601T150000Z%2F20250601T160000Z"));
//! ```

use serde::Serialize;
use url::Url;

use crate::error::{CoreError, CoreResult};
use crate::event::NormalizedEvent;
use crate::ics::Disposition;
use crate::time::{date_digits, naive_local_string, utc_stamp};

/// Google Calendar template endpoint.
const GOOGLE_RENDER_URL: &str = "https://calendar.google.com/calendar/render";

/// Outlook on the web compose endpoint.
const OUTLOOK_COMPOSE_URL: &str = "https://outlook.live.com/calendar/0/action/compose";

/// Query parameter carrying the ICS disposition.
const DISPOSITION_PARAM: &str = "disposition";

/// The four links offered for one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarLinks {
    /// Google Calendar render URL.
    pub google: String,
    /// Outlook compose URL.
    pub outlook: String,
    /// ICS endpoint, served as an attachment.
    pub ics_download: String,
    /// ICS endpoint, served inline.
    pub ics_inline: String,
}

/// Builds [`CalendarLinks`] for events served by one ICS endpoint.
#[derive(Debug, Clone)]
pub struct CalendarLinkBuilder {
    ics_endpoint: Url,
}

impl CalendarLinkBuilder {
    /// Creates a builder pointing at the ICS endpoint for the event.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidEndpoint`] if the endpoint is not an
    /// absolute URL.
    pub fn new(ics_endpoint: &str) -> CoreResult<Self> {
        let ics_endpoint = Url::parse(ics_endpoint).map_err(|e| CoreError::InvalidEndpoint {
            endpoint: ics_endpoint.to_string(),
            reason: e.to_string(),
        })?;
        if ics_endpoint.cannot_be_a_base() {
            return Err(CoreError::InvalidEndpoint {
                endpoint: ics_endpoint.to_string(),
                reason: "not a hierarchical URL".to_string(),
            });
        }
        Ok(Self { ics_endpoint })
    }

    /// Builds all links for `event`.
    pub fn build(&self, event: &NormalizedEvent) -> CalendarLinks {
        CalendarLinks {
            google: google_link(event),
            outlook: outlook_link(event),
            ics_download: self.ics_link(Disposition::Attachment),
            ics_inline: self.ics_link(Disposition::Inline),
        }
    }

    /// Returns the ICS endpoint with the disposition parameter set.
    pub fn ics_link(&self, disposition: Disposition) -> String {
        let mut url = self.ics_endpoint.clone();
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| k != DISPOSITION_PARAM)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .append_pair(DISPOSITION_PARAM, disposition.as_str());
        url.to_string()
    }
}

/// The `dates` value of a Google render URL.
///
/// All-day: `YYYYMMDD/YYYYMMDD`. Timed: `YYYYMMDDTHHMMSSZ/YYYYMMDDTHHMMSSZ`.
pub fn google_dates(event: &NormalizedEvent) -> String {
    if event.all_day {
        format!("{}/{}", date_digits(&event.start), date_digits(&event.end))
    } else {
        let tz = event.timezone_id();
        format!(
            "{}/{}",
            utc_stamp(&event.start, tz),
            utc_stamp(&event.end, tz)
        )
    }
}

/// Builds the Google Calendar render URL.
pub fn google_link(event: &NormalizedEvent) -> String {
    let mut url = Url::parse(GOOGLE_RENDER_URL).expect("valid Google render URL");
    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("action", "TEMPLATE")
            .append_pair("text", &event.title)
            .append_pair("dates", &google_dates(event))
            .append_pair("details", &event.description)
            .append_pair("location", &event.display_location());
        if let Some(tz) = event.timezone_id() {
            query.append_pair("ctz", tz);
        }
    }
    url.to_string()
}

/// Builds the Outlook compose URL.
///
/// `startdt`/`enddt` are naive `YYYY-MM-DDTHH:mm:ss` strings; Outlook reads
/// them in the viewer's own zone.
pub fn outlook_link(event: &NormalizedEvent) -> String {
    let mut url = Url::parse(OUTLOOK_COMPOSE_URL).expect("valid Outlook compose URL");
    url.query_pairs_mut()
        .append_pair("path", "/calendar/action/compose")
        .append_pair("rru", "addevent")
        .append_pair("subject", &event.title)
        .append_pair("body", &event.description)
        .append_pair("location", &event.display_location())
        .append_pair("startdt", &naive_local_string(&event.start))
        .append_pair("enddt", &naive_local_string(&event.end))
        .append_pair("allday", if event.all_day { "true" } else { "false" });
    url.to_string()
}
