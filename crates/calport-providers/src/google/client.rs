//! Google Calendar API client.
//!
//! Only `events.insert` on the primary calendar is used.

use std::time::Duration;

use calport_core::NormalizedEvent;
use serde::Deserialize;
use tracing::debug;

use super::mapper::{GoogleEvent, to_google_event};
use crate::credentials::AccessToken;
use crate::error::ProviderResult;
use crate::http;
use crate::provider::{BoxFuture, CalendarProvider, CreatedEvent, ProviderKind};

/// Base URL for Google Calendar API v3.
pub const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Calendar events are inserted into.
const PRIMARY_CALENDAR: &str = "primary";

/// Google Calendar insert client.
#[derive(Debug, Clone)]
pub struct GoogleCalendar {
    http_client: reqwest::Client,
    api_base: String,
}

/// The subset of the insert response we keep.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InsertResponse {
    id: String,
    #[serde(default)]
    html_link: Option<String>,
}

impl GoogleCalendar {
    /// Creates a client against the public API.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> ProviderResult<Self> {
        Ok(Self {
            http_client: http::build_client(timeout)?,
            api_base: CALENDAR_API_BASE.to_string(),
        })
    }

    /// Overrides the API base URL.
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    /// URL events are POSTed to.
    pub fn insert_url(&self) -> String {
        format!(
            "{}/calendars/{}/events",
            self.api_base,
            urlencoding::encode(PRIMARY_CALENDAR)
        )
    }

    async fn insert(
        &self,
        token: &AccessToken,
        payload: &GoogleEvent,
    ) -> ProviderResult<CreatedEvent> {
        let url = self.insert_url();
        let response: InsertResponse = http::post_json(&self.http_client, &url, token, payload)
            .await
            .map_err(|e| e.with_provider(ProviderKind::Google.as_str()))?;

        debug!(id = %response.id, "created google event");
        Ok(CreatedEvent::new(response.id, response.html_link))
    }
}

impl CalendarProvider for GoogleCalendar {
    type Payload = GoogleEvent;

    fn kind(&self) -> ProviderKind {
        ProviderKind::Google
    }

    fn map_event(&self, event: &NormalizedEvent) -> GoogleEvent {
        to_google_event(event)
    }

    fn create_event<'a>(
        &'a self,
        token: &'a AccessToken,
        payload: &'a GoogleEvent,
    ) -> BoxFuture<'a, ProviderResult<CreatedEvent>> {
        Box::pin(self.insert(token, payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> GoogleCalendar {
        GoogleCalendar::new(Duration::from_secs(5))
            .unwrap()
            .with_api_base(format!("{}/calendar/v3/", server.uri()))
    }

    fn event() -> NormalizedEvent {
        NormalizedEvent::new("Standup", "2025-03-03T09:00:00", "2025-03-03T09:15:00")
            .with_timezone("Europe/Paris")
    }

    #[test]
    fn insert_url_targets_primary() {
        let client = GoogleCalendar::new(Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.insert_url(),
            "https://www.googleapis.com/calendar/v3/calendars/primary/events"
        );
    }

    #[tokio::test]
    async fn creates_event_with_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/calendar/v3/calendars/primary/events"))
            .and(header("authorization", "Bearer g-token"))
            .and(body_partial_json(serde_json::json!({
                "summary": "Standup",
                "start": { "dateTime": "2025-03-03T09:00:00", "timeZone": "Europe/Paris" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "evt123",
                "htmlLink": "https://www.google.com/calendar/event?eid=abc",
                "status": "confirmed"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let payload = client.map_event(&event());
        let created = client
            .create_event(&AccessToken::new("g-token"), &payload)
            .await
            .unwrap();

        assert_eq!(created.id, "evt123");
        assert_eq!(
            created.web_link.as_deref(),
            Some("https://www.google.com/calendar/event?eid=abc")
        );
    }

    #[tokio::test]
    async fn unauthorized_is_authentication_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid credentials"))
            .mount(&server)
            .await;

        let client = client(&server);
        let err = client
            .create_event(&AccessToken::new("bad"), &client.map_event(&event()))
            .await
            .unwrap_err();

        assert_eq!(err.code(), ProviderErrorCode::AuthenticationFailed);
        assert_eq!(err.provider(), Some("google"));
        assert!(err.message().contains("invalid credentials"));
    }

    #[tokio::test]
    async fn malformed_response_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = client(&server);
        let err = client
            .create_event(&AccessToken::new("t"), &client.map_event(&event()))
            .await
            .unwrap_err();

        assert_eq!(err.code(), ProviderErrorCode::InvalidResponse);
    }
}
