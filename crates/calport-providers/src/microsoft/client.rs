//! Microsoft Graph calendar client.

use std::time::Duration;

use calport_core::NormalizedEvent;
use serde::Deserialize;
use tracing::debug;

use super::mapper::{MicrosoftEvent, to_microsoft_event};
use crate::credentials::AccessToken;
use crate::error::ProviderResult;
use crate::http;
use crate::provider::{BoxFuture, CalendarProvider, CreatedEvent, ProviderKind};

/// Base URL for Microsoft Graph v1.0.
pub const GRAPH_API_BASE: &str = "https://graph.microsoft.com/v1.0";

/// Graph event creation client for the signed-in user's default calendar.
#[derive(Debug, Clone)]
pub struct MicrosoftCalendar {
    http_client: reqwest::Client,
    api_base: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateResponse {
    id: String,
    #[serde(default)]
    web_link: Option<String>,
}

impl MicrosoftCalendar {
    /// Creates a client against Graph v1.0.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> ProviderResult<Self> {
        Ok(Self {
            http_client: http::build_client(timeout)?,
            api_base: GRAPH_API_BASE.to_string(),
        })
    }

    /// Overrides the Graph base URL.
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    /// URL events are POSTed to.
    pub fn events_url(&self) -> String {
        format!("{}/me/events", self.api_base)
    }

    async fn create(
        &self,
        token: &AccessToken,
        payload: &MicrosoftEvent,
    ) -> ProviderResult<CreatedEvent> {
        let url = self.events_url();
        let response: CreateResponse = http::post_json(&self.http_client, &url, token, payload)
            .await
            .map_err(|e| e.with_provider(ProviderKind::Microsoft.as_str()))?;

        debug!(id = %response.id, "created graph event");
        Ok(CreatedEvent::new(response.id, response.web_link))
    }
}

impl CalendarProvider for MicrosoftCalendar {
    type Payload = MicrosoftEvent;

    fn kind(&self) -> ProviderKind {
        ProviderKind::Microsoft
    }

    fn map_event(&self, event: &NormalizedEvent) -> MicrosoftEvent {
        to_microsoft_event(event)
    }

    fn create_event<'a>(
        &'a self,
        token: &'a AccessToken,
        payload: &'a MicrosoftEvent,
    ) -> BoxFuture<'a, ProviderResult<CreatedEvent>> {
        Box::pin(self.create(token, payload))
    }
}
