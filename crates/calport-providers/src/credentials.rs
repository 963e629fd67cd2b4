//! Access credentials for the API providers.
//!
//! The dispatcher asks a [`CredentialSource`] for one [`AccessToken`] per
//! batch. [`StoredCredentials`] is the config-backed source: it hands out a
//! configured access token while it is still valid and otherwise trades the
//! refresh token for a new one through [`OAuthRefresher`].

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{ProviderError, ProviderResult};
use crate::http;
use crate::provider::{BoxFuture, ProviderKind};

/// Google's OAuth token endpoint.
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Microsoft identity platform authority; the tenant and token path follow.
pub const MICROSOFT_AUTHORITY: &str = "https://login.microsoftonline.com";

/// Scope requested when refreshing a Microsoft token.
pub const MICROSOFT_SCOPE: &str = "offline_access Calendars.ReadWrite";

/// Tenant used when none is configured.
pub const DEFAULT_TENANT: &str = "common";

/// Seconds shaved off a token's lifetime so it is not used right at expiry.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// A bearer token. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a raw token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token for the `Authorization` header.
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Anything that can produce an access token for a provider.
pub trait CredentialSource: Send + Sync {
    /// Resolves a usable token for `kind`.
    ///
    /// # Errors
    ///
    /// Returns an `AuthenticationFailed` error when no token can be
    /// obtained.
    fn access_token(&self, kind: ProviderKind) -> BoxFuture<'_, ProviderResult<AccessToken>>;
}

/// Token material for one provider, as configured.
#[derive(Clone, Default, Deserialize)]
pub struct StoredCredential {
    /// Access token, if one was issued already.
    #[serde(default)]
    pub access_token: Option<String>,
    /// When `access_token` stops being valid. Unknown means valid.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Refresh token used to mint a new access token.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// OAuth client id, required to refresh.
    #[serde(default)]
    pub client_id: Option<String>,
    /// OAuth client secret. Public Microsoft clients have none.
    #[serde(default)]
    pub client_secret: Option<String>,
    /// Microsoft tenant; ignored for Google.
    #[serde(default)]
    pub tenant: Option<String>,
}

impl fmt::Debug for StoredCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredCredential")
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .field("expires_at", &self.expires_at)
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("tenant", &self.tenant)
            .finish()
    }
}

impl StoredCredential {
    /// Returns the access token if it is present and not expired.
    pub fn valid_access_token(&self) -> Option<AccessToken> {
        let token = self
            .access_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())?;
        if self.is_expired() {
            return None;
        }
        Some(AccessToken::new(token))
    }

    /// Returns true if the access token is expired or about to expire.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() >= expires_at,
            None => false,
        }
    }

    /// Returns true if a refresh can be attempted.
    pub fn can_refresh(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.refresh_token) && present(&self.client_id)
    }

    /// Stores a freshly issued access token.
    pub fn update_access_token(&mut self, grant: &TokenGrant) {
        self.access_token = Some(grant.access_token.clone());
        self.expires_at = grant.expires_in.map(|secs| {
            Utc::now() + chrono::Duration::seconds(secs - EXPIRY_MARGIN_SECS)
        });
    }
}

/// A token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    /// The new access token.
    pub access_token: String,
    /// Lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Exchanges refresh tokens at the Google and Microsoft token endpoints.
#[derive(Debug, Clone)]
pub struct OAuthRefresher {
    http_client: reqwest::Client,
    google_token_url: String,
    microsoft_authority: String,
}

impl OAuthRefresher {
    /// Creates a refresher against the public endpoints.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> ProviderResult<Self> {
        Ok(Self {
            http_client: http::build_client(timeout)?,
            google_token_url: GOOGLE_TOKEN_URL.to_string(),
            microsoft_authority: MICROSOFT_AUTHORITY.to_string(),
        })
    }

    /// Overrides the Google token URL.
    pub fn with_google_token_url(mut self, url: impl Into<String>) -> Self {
        self.google_token_url = url.into();
        self
    }

    /// Overrides the Microsoft authority (scheme and host).
    pub fn with_microsoft_authority(mut self, authority: impl Into<String>) -> Self {
        self.microsoft_authority = authority.into().trim_end_matches('/').to_string();
        self
    }

    /// Returns the token URL for `kind`.
    pub fn token_url(&self, kind: ProviderKind, credential: &StoredCredential) -> String {
        match kind {
            ProviderKind::Google => self.google_token_url.clone(),
            ProviderKind::Microsoft => {
                let tenant = credential
                    .tenant
                    .as_deref()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .unwrap_or(DEFAULT_TENANT);
                format!(
                    "{}/{}/oauth2/v2.0/token",
                    self.microsoft_authority,
                    urlencoding::encode(tenant)
                )
            }
        }
    }

    /// Refreshes the access token of `credential`.
    ///
    /// # Errors
    ///
    /// `AuthenticationFailed` when the credential cannot be refreshed or the
    /// endpoint rejects it; `NetworkError`/`InvalidResponse` for transport
    /// and parse failures.
    pub async fn refresh(
        &self,
        kind: ProviderKind,
        credential: &StoredCredential,
    ) -> ProviderResult<TokenGrant> {
        let refresh_token = credential.refresh_token.as_deref();
        let client_id = credential.client_id.as_deref();
        let (Some(refresh_token), Some(client_id)) = (refresh_token, client_id) else {
            return Err(ProviderError::authentication(
                "no refresh token and client id configured",
            )
            .with_provider(kind.as_str()));
        };

        let mut params = vec![
            ("client_id", client_id),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];
        if let Some(secret) = credential.client_secret.as_deref() {
            params.push(("client_secret", secret));
        } else if kind == ProviderKind::Google {
            return Err(ProviderError::authentication(
                "google refresh requires a client secret",
            )
            .with_provider(kind.as_str()));
        }
        if kind == ProviderKind::Microsoft {
            params.push(("scope", MICROSOFT_SCOPE));
        }

        let url = self.token_url(kind, credential);
        debug!(provider = %kind, %url, "refreshing access token");

        let response = self
            .http_client
            .post(&url)
            .form(&params)
            .send()
            .await
            .map_err(|e| ProviderError::from_transport(e).with_provider(kind.as_str()))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ProviderError::network(format!("failed to read response: {}", e))
                .with_provider(kind.as_str())
        })?;

        if !status.is_success() {
            return Err(ProviderError::authentication(format!(
                "token refresh failed ({}): {}",
                status, body
            ))
            .with_provider(kind.as_str()));
        }

        let grant: TokenGrant = serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("invalid token response: {}", e))
                .with_provider(kind.as_str())
        })?;

        info!(provider = %kind, "refreshed access token");
        Ok(grant)
    }
}

/// Config-backed credentials for both providers.
#[derive(Debug)]
pub struct StoredCredentials {
    google: RwLock<Option<StoredCredential>>,
    microsoft: RwLock<Option<StoredCredential>>,
    refresher: OAuthRefresher,
}

impl StoredCredentials {
    /// Creates a source with no credentials configured.
    pub fn new(refresher: OAuthRefresher) -> Self {
        Self {
            google: RwLock::new(None),
            microsoft: RwLock::new(None),
            refresher,
        }
    }

    /// Sets the Google credential.
    pub fn with_google(mut self, credential: StoredCredential) -> Self {
        *self.google.get_mut() = Some(credential);
        self
    }

    /// Sets the Microsoft credential.
    pub fn with_microsoft(mut self, credential: StoredCredential) -> Self {
        *self.microsoft.get_mut() = Some(credential);
        self
    }

    fn slot(&self, kind: ProviderKind) -> &RwLock<Option<StoredCredential>> {
        match kind {
            ProviderKind::Google => &self.google,
            ProviderKind::Microsoft => &self.microsoft,
        }
    }

    async fn resolve(&self, kind: ProviderKind) -> ProviderResult<AccessToken> {
        let Some(mut credential) = self.slot(kind).read().await.clone() else {
            return Err(ProviderError::authentication("no credential configured")
                .with_provider(kind.as_str()));
        };

        if let Some(token) = credential.valid_access_token() {
            debug!(provider = %kind, "using configured access token");
            return Ok(token);
        }

        if !credential.can_refresh() {
            return Err(ProviderError::authentication(
                "access token missing or expired and no refresh token configured",
            )
            .with_provider(kind.as_str()));
        }

        let grant = self.refresher.refresh(kind, &credential).await?;
        credential.update_access_token(&grant);
        *self.slot(kind).write().await = Some(credential);
        Ok(AccessToken::new(grant.access_token))
    }
}

impl CredentialSource for StoredCredentials {
    fn access_token(&self, kind: ProviderKind) -> BoxFuture<'_, ProviderResult<AccessToken>> {
        Box::pin(self.resolve(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn refresher(server: &MockServer) -> OAuthRefresher {
        OAuthRefresher::new(Duration::from_secs(5))
            .unwrap()
            .with_google_token_url(format!("{}/token", server.uri()))
            .with_microsoft_authority(server.uri())
    }

    fn refreshable() -> StoredCredential {
        StoredCredential {
            refresh_token: Some("refresh-1".to_string()),
            client_id: Some("client-1".to_string()),
            client_secret: Some("s3cret".to_string()),
            ..Default::default()
        }
    }

    mod stored {
        use super::*;

        #[test]
        fn access_token_debug_is_redacted() {
            let token = AccessToken::new("ya29.very-secret");
            assert_eq!(format!("{:?}", token), "AccessToken(<redacted>)");
            assert_eq!(token.secret(), "ya29.very-secret");

            let cred = StoredCredential {
                access_token: Some("ya29.very-secret".to_string()),
                ..refreshable()
            };
            let debug = format!("{:?}", cred);
            assert!(!debug.contains("very-secret"));
            assert!(!debug.contains("s3cret"));
            assert!(debug.contains("client-1"));
        }

        #[test]
        fn expiry() {
            let mut cred = StoredCredential {
                access_token: Some("tok".to_string()),
                ..Default::default()
            };
            assert!(cred.valid_access_token().is_some());

            cred.expires_at = Some(Utc::now() - chrono::Duration::minutes(1));
            assert!(cred.is_expired());
            assert!(cred.valid_access_token().is_none());

            cred.expires_at = Some(Utc::now() + chrono::Duration::hours(1));
            assert!(cred.valid_access_token().is_some());
        }

        #[test]
        fn blank_token_is_not_valid() {
            let cred = StoredCredential {
                access_token: Some("  ".to_string()),
                ..Default::default()
            };
            assert!(cred.valid_access_token().is_none());
            assert!(!cred.can_refresh());
        }

        #[test]
        fn microsoft_token_url_uses_tenant() {
            let refresher = OAuthRefresher::new(Duration::from_secs(5)).unwrap();
            let mut cred = refreshable();
            assert_eq!(
                refresher.token_url(ProviderKind::Microsoft, &cred),
                "https://login.microsoftonline.com/common/oauth2/v2.0/token"
            );
            cred.tenant = Some("contoso.onmicrosoft.com".to_string());
            assert_eq!(
                refresher.token_url(ProviderKind::Microsoft, &cred),
                "https://login.microsoftonline.com/contoso.onmicrosoft.com/oauth2/v2.0/token"
            );
            assert_eq!(
                refresher.token_url(ProviderKind::Google, &cred),
                GOOGLE_TOKEN_URL
            );
        }
    }

    mod resolve {
        use super::*;

        #[tokio::test]
        async fn missing_credential_fails_without_network() {
            let server = MockServer::start().await;
            let source = StoredCredentials::new(refresher(&server));

            let err = source.access_token(ProviderKind::Google).await.unwrap_err();
            assert_eq!(err.code(), ProviderErrorCode::AuthenticationFailed);
            assert_eq!(err.provider(), Some("google"));
            assert!(server.received_requests().await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn valid_access_token_is_used_directly() {
            let server = MockServer::start().await;
            let credential = StoredCredential {
                access_token: Some("graph-token".to_string()),
                ..Default::default()
            };
            let source = StoredCredentials::new(refresher(&server)).with_microsoft(credential);

            let token = source.access_token(ProviderKind::Microsoft).await.unwrap();
            assert_eq!(token.secret(), "graph-token");
            assert!(server.received_requests().await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn google_refresh_exchange() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/token"))
                .and(body_string_contains("grant_type=refresh_token"))
                .and(body_string_contains("refresh_token=refresh-1"))
                .and(body_string_contains("client_secret=s3cret"))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "access_token": "fresh-google",
                    "expires_in": 3599,
                    "token_type": "Bearer"
                })))
                .expect(1)
                .mount(&server)
                .await;

            let source = StoredCredentials::new(refresher(&server)).with_google(refreshable());

            let token = source.access_token(ProviderKind::Google).await.unwrap();
            assert_eq!(token.secret(), "fresh-google");

            // Cached until expiry: no second exchange.
            let again = source.access_token(ProviderKind::Google).await.unwrap();
            assert_eq!(again.secret(), "fresh-google");
        }

        #[tokio::test]
        async fn refreshed_credential_replaces_stored_one() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/token"))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "access_token": "fresh-google",
                    "expires_in": 3600
                })))
                .mount(&server)
                .await;

            let source = StoredCredentials::new(refresher(&server)).with_google(refreshable());
            source.access_token(ProviderKind::Google).await.unwrap();

            let stored = source.google.read().await.clone().unwrap();
            assert_eq!(stored.access_token.as_deref(), Some("fresh-google"));
            assert!(!stored.is_expired());
            assert!(stored.can_refresh());
            assert!(source.microsoft.read().await.is_none());
        }

        #[tokio::test]
        async fn microsoft_refresh_sends_scope_and_tenant() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/contoso/oauth2/v2.0/token"))
                .and(body_string_contains("scope=offline_access+Calendars.ReadWrite"))
                .and(body_string_contains("client_id=client-1"))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "access_token": "fresh-graph",
                    "expires_in": 3600
                })))
                .expect(1)
                .mount(&server)
                .await;

            let credential = StoredCredential {
                client_secret: None,
                tenant: Some("contoso".to_string()),
                ..refreshable()
            };
            let source = StoredCredentials::new(refresher(&server)).with_microsoft(credential);

            let token = source.access_token(ProviderKind::Microsoft).await.unwrap();
            assert_eq!(token.secret(), "fresh-graph");
        }

        #[tokio::test]
        async fn rejected_refresh_is_authentication_failure() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/token"))
                .respond_with(
                    ResponseTemplate::new(400).set_body_string(r#"{"error":"invalid_grant"}"#),
                )
                .mount(&server)
                .await;

            let expired = StoredCredential {
                access_token: Some("stale".to_string()),
                expires_at: Some(Utc::now() - chrono::Duration::hours(1)),
                ..refreshable()
            };
            let source = StoredCredentials::new(refresher(&server)).with_google(expired);

            let err = source.access_token(ProviderKind::Google).await.unwrap_err();
            assert_eq!(err.code(), ProviderErrorCode::AuthenticationFailed);
            assert!(err.message().contains("invalid_grant"));
        }

        #[tokio::test]
        async fn expired_without_refresh_token_fails() {
            let server = MockServer::start().await;
            let source = StoredCredentials::new(refresher(&server)).with_google(StoredCredential {
                access_token: Some("stale".to_string()),
                expires_at: Some(Utc::now() - chrono::Duration::hours(1)),
                ..Default::default()
            });

            let err = source.access_token(ProviderKind::Google).await.unwrap_err();
            assert_eq!(err.code(), ProviderErrorCode::AuthenticationFailed);
        }
    }
}
