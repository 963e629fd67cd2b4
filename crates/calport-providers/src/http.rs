//! Shared HTTP plumbing for the provider clients.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::credentials::AccessToken;
use crate::error::{ProviderError, ProviderResult};

/// Per-request timeout when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds the reqwest client used for every provider call.
///
/// # Errors
///
/// Returns a configuration error if the TLS backend cannot be initialized.
pub fn build_client(timeout: Duration) -> ProviderResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("calport/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| {
            ProviderError::configuration(format!("failed to create HTTP client: {}", e))
                .with_source(e)
        })
}

/// POSTs `body` as JSON with a bearer token and decodes the JSON reply.
///
/// Non-success statuses become a [`ProviderError`] classified by status.
pub async fn post_json<B, R>(
    client: &reqwest::Client,
    url: &str,
    token: &AccessToken,
    body: &B,
) -> ProviderResult<R>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let response = client
        .post(url)
        .bearer_auth(token.secret())
        .json(body)
        .send()
        .await
        .map_err(ProviderError::from_transport)?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)))?;
    debug!(%url, status = status.as_u16(), "provider responded");

    if !status.is_success() {
        return Err(ProviderError::from_status(status.as_u16(), &text));
    }

    serde_json::from_str(&text)
        .map_err(|e| ProviderError::invalid_response(format!("failed to parse response: {}", e)))
}
