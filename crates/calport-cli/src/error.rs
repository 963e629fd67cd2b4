//! CLI error types.

use thiserror::Error;

use crate::secret::SecretError;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors that end a `calport` invocation.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file missing a setting, unreadable, or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Input events could not be read or parsed.
    #[error("invalid input: {0}")]
    Input(String),

    /// A secret reference in the config did not resolve.
    #[error("secret error: {0}")]
    Secret(#[from] SecretError),

    /// ICS or link generation failed.
    #[error(transparent)]
    Core(#[from] calport_core::CoreError),

    /// Provider call or credential resolution failed.
    #[error("provider error: {0}")]
    Provider(#[from] calport_providers::ProviderError),

    /// A batch was rejected before any event was created.
    #[error("push rejected: {0}")]
    Rejected(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Input(format!("failed to parse events: {}", err))
    }
}
