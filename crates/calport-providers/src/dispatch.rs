//! Sequential batch creation against one provider.
//!
//! [`BulkDispatcher::dispatch`] resolves the credential once, then maps and
//! creates each item in input order. A failing item is recorded in its
//! result slot and the loop moves on; only a missing credential or an empty
//! batch fails the whole call.

use calport_core::NormalizedEvent;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::credentials::{AccessToken, CredentialSource};
use crate::error::{ProviderError, ProviderErrorCode, ProviderResult};
use crate::provider::{CalendarProvider, CreatedEvent};

/// One event to create, with an optional caller-side id echoed back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItem {
    pub event: NormalizedEvent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

impl BatchItem {
    /// Creates an item without a correlation id.
    pub fn new(event: NormalizedEvent) -> Self {
        Self {
            event,
            correlation_id: None,
        }
    }

    /// Builder method to set the correlation id.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }
}

impl From<NormalizedEvent> for BatchItem {
    fn from(event: NormalizedEvent) -> Self {
        Self::new(event)
    }
}

/// Outcome of one item. Either `id` (and maybe `webLink`) or `error` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResult {
    /// Position in the submitted batch.
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ProviderErrorCode>,
}

impl ItemResult {
    fn created(index: usize, correlation_id: Option<String>, created: CreatedEvent) -> Self {
        Self {
            index,
            correlation_id,
            id: Some(created.id),
            web_link: created.web_link,
            error: None,
            code: None,
        }
    }

    fn failed(index: usize, correlation_id: Option<String>, err: &ProviderError) -> Self {
        Self {
            index,
            correlation_id,
            id: None,
            web_link: None,
            error: Some(err.message().to_string()),
            code: Some(err.code()),
        }
    }

    /// Returns true if the item was created.
    pub fn is_success(&self) -> bool {
        self.id.is_some()
    }
}

/// Response of a whole batch.
///
/// `ok` is true as soon as item processing started; callers inspect
/// `results` for per-item outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResponse {
    pub ok: bool,
    pub results: Vec<ItemResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ProviderErrorCode>,
}

impl DispatchResponse {
    fn rejected(err: &ProviderError) -> Self {
        Self {
            ok: false,
            results: Vec::new(),
            error: Some(err.to_string()),
            code: Some(err.code()),
        }
    }

    /// Number of items that were created.
    pub fn created_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }
}

/// Drives one provider with credentials from one source.
#[derive(Debug)]
pub struct BulkDispatcher<P, C> {
    provider: P,
    credentials: C,
}

impl<P, C> BulkDispatcher<P, C>
where
    P: CalendarProvider,
    C: CredentialSource,
{
    /// Creates a dispatcher.
    pub fn new(provider: P, credentials: C) -> Self {
        Self {
            provider,
            credentials,
        }
    }

    /// Returns the provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    async fn token(&self) -> ProviderResult<AccessToken> {
        let kind = self.provider.kind();
        self.credentials.access_token(kind).await.map_err(|e| {
            if e.provider().is_some() {
                e
            } else {
                e.with_provider(kind.as_str())
            }
        })
    }

    /// Creates every item in order and reports each outcome.
    ///
    /// Never returns an error: an empty batch or an unresolvable credential
    /// yields `ok: false` with no attempts made.
    pub async fn dispatch(&self, items: &[BatchItem]) -> DispatchResponse {
        let kind = self.provider.kind();

        if items.is_empty() {
            let err = ProviderError::invalid_input("at least one event is required");
            warn!(provider = %kind, "rejected empty batch");
            return DispatchResponse::rejected(&err);
        }

        let token = match self.token().await {
            Ok(token) => token,
            Err(err) => {
                warn!(provider = %kind, error = %err, "credential resolution failed");
                return DispatchResponse::rejected(&err);
            }
        };

        let mut results = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let payload = self.provider.map_event(&item.event);
            debug!(provider = %kind, index, title = %item.event.title, "creating event");

            match self.provider.create_event(&token, &payload).await {
                Ok(created) => {
                    debug!(provider = %kind, index, id = %created.id, "event created");
                    results.push(ItemResult::created(index, item.correlation_id.clone(), created));
                }
                Err(err) => {
                    warn!(provider = %kind, index, error = %err, "event creation failed");
                    results.push(ItemResult::failed(index, item.correlation_id.clone(), &err));
                }
            }
        }

        let response = DispatchResponse {
            ok: true,
            results,
            error: None,
            code: None,
        };
        info!(
            provider = %kind,
            total = items.len(),
            created = response.created_count(),
            "batch finished"
        );
        response
    }

    /// Creates a single event, propagating the provider error as-is.
    ///
    /// # Errors
    ///
    /// Credential and provider failures are returned unchanged.
    pub async fn create_one(&self, event: &NormalizedEvent) -> ProviderResult<CreatedEvent> {
        let token = self.token().await?;
        let payload = self.provider.map_event(event);
        self.provider.create_event(&token, &payload).await
    }
}
