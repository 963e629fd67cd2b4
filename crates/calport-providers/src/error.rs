//! Error types for provider calls.
//!
//! A [`ProviderError`] carries a [`ProviderErrorCode`] that callers match on
//! (the bulk dispatcher copies it into its response), a message, and
//! optionally the provider that produced it.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// The category of a provider error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderErrorCode {
    /// The request was rejected before reaching a provider (empty batch, bad JSON).
    InvalidInput,
    /// No usable credential, or the provider rejected it (401).
    AuthenticationFailed,
    /// The credential lacks permission (403).
    AuthorizationFailed,
    /// Connection failed, timed out, or the body could not be read.
    NetworkError,
    /// Too many requests (429).
    RateLimited,
    /// Provider returned 5xx.
    ServerError,
    /// Response body did not match the expected shape.
    InvalidResponse,
    /// Resource not found (404).
    NotFound,
    /// Provider rejected the payload (400 and other 4xx).
    BadRequest,
    /// Missing or invalid configuration.
    ConfigurationError,
}

impl ProviderErrorCode {
    /// Returns true if this error is transient and the call may be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError | Self::RateLimited | Self::ServerError
        )
    }

    /// Returns the wire name of this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::AuthenticationFailed => "authentication_failed",
            Self::AuthorizationFailed => "authorization_failed",
            Self::NetworkError => "network_error",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::InvalidResponse => "invalid_response",
            Self::NotFound => "not_found",
            Self::BadRequest => "bad_request",
            Self::ConfigurationError => "configuration_error",
        }
    }

    /// Classifies a non-success HTTP status.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => Self::AuthenticationFailed,
            403 => Self::AuthorizationFailed,
            404 => Self::NotFound,
            429 => Self::RateLimited,
            500..=599 => Self::ServerError,
            _ => Self::BadRequest,
        }
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error from a provider call or credential resolution.
#[derive(Debug, Error)]
pub struct ProviderError {
    code: ProviderErrorCode,
    message: String,
    /// e.g. "google", "microsoft"
    provider: Option<String>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ProviderError {
    /// Creates a new provider error with the given code and message.
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider: None,
            source: None,
        }
    }

    /// Creates an input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InvalidInput, message)
    }

    /// Creates an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::AuthenticationFailed, message)
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::NetworkError, message)
    }

    /// Creates an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InvalidResponse, message)
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ConfigurationError, message)
    }

    /// Builds an error from a failed HTTP response.
    ///
    /// The provider's body is kept in the message since Google and Graph
    /// both explain rejected payloads there.
    pub fn from_status(status: u16, body: &str) -> Self {
        let code = ProviderErrorCode::from_status(status);
        let body = body.trim();
        let message = if body.is_empty() {
            format!("HTTP {}", status)
        } else {
            format!("HTTP {}: {}", status, body)
        };
        Self::new(code, message)
    }

    /// Maps a transport failure from reqwest.
    pub fn from_transport(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timeout".to_string()
        } else if err.is_connect() {
            format!("connection failed: {}", err)
        } else {
            format!("request failed: {}", err)
        };
        Self::network(message).with_source(err)
    }

    /// Sets the provider name for this error.
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Sets the source error for this error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> ProviderErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the provider name, if set.
    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }

    /// Returns true if this error is transient and may be retried.
    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref provider) = self.provider {
            write!(f, "[{}] ", provider)?;
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A specialized Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;
