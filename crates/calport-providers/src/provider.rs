//! CalendarProvider trait definition.
//!
//! A provider knows two things: how to turn a [`NormalizedEvent`] into its
//! own event-creation body, and how to send one such body to its API. The
//! bulk dispatcher drives both for every item of a batch.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;

use calport_core::NormalizedEvent;
use serde::{Deserialize, Serialize};

use crate::credentials::AccessToken;
use crate::error::{ProviderError, ProviderResult};

/// A boxed future for async trait methods.
///
/// Boxing keeps the credential trait object-safe, so the CLI can hold a
/// `dyn CredentialSource`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The API-based providers events can be pushed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Calendar API v3.
    Google,
    /// Microsoft Graph (Outlook calendar).
    Microsoft,
}

impl ProviderKind {
    /// Returns the lowercase name used in config sections and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Microsoft => "microsoft",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "microsoft" | "outlook" => Ok(Self::Microsoft),
            other => Err(ProviderError::configuration(format!(
                "unknown provider '{}', expected google or microsoft",
                other
            ))),
        }
    }
}

/// What a provider returns after creating one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedEvent {
    /// Provider-assigned event id.
    pub id: String,
    /// Link to the event in the provider's web UI, when returned.
    pub web_link: Option<String>,
}

impl CreatedEvent {
    /// Creates a new created-event record.
    pub fn new(id: impl Into<String>, web_link: Option<String>) -> Self {
        Self {
            id: id.into(),
            web_link,
        }
    }
}

/// A single-insert calendar backend.
///
/// # Example Implementation
///
/// ```ignore
/// impl CalendarProvider for GoogleCalendar {
///     type Payload = GoogleEvent;
///
///     fn kind(&self) -> ProviderKind { ProviderKind::Google }
///
///     fn map_event(&self, event: &NormalizedEvent) -> GoogleEvent {
///         to_google_event(event)
///     }
///
///     fn create_event<'a>(
///         &'a self,
///         token: &'a AccessToken,
///         payload: &'a GoogleEvent,
///     ) -> BoxFuture<'a, ProviderResult<CreatedEvent>> {
///         Box::pin(async move { /* POST the payload */ })
///     }
/// }
/// ```
pub trait CalendarProvider: Send + Sync {
    /// The provider's event-creation body.
    type Payload: Serialize + Send + Sync;

    /// Which provider this is; selects the credential to resolve.
    fn kind(&self) -> ProviderKind;

    /// Maps a normalized event to this provider's body. Pure.
    fn map_event(&self, event: &NormalizedEvent) -> Self::Payload;

    /// Creates one event.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` on transport failures and non-success
    /// responses; the code reflects the HTTP status.
    fn create_event<'a>(
        &'a self,
        token: &'a AccessToken,
        payload: &'a Self::Payload,
    ) -> BoxFuture<'a, ProviderResult<CreatedEvent>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!(
            "Google".parse::<ProviderKind>().unwrap(),
            ProviderKind::Google
        );
        assert_eq!(
            " microsoft ".parse::<ProviderKind>().unwrap(),
            ProviderKind::Microsoft
        );
        assert_eq!(
            "outlook".parse::<ProviderKind>().unwrap(),
            ProviderKind::Microsoft
        );
        assert!("caldav".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn kind_display_matches_serde() {
        for kind in [ProviderKind::Google, ProviderKind::Microsoft] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
        }
    }
}
