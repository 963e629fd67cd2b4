//! Error types for the export core.

use thiserror::Error;

/// Errors raised by the pure export functions.
///
/// Malformed dates are not errors: encoders fall back to a textual form
/// and keep going. Only caller mistakes end up here.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// An export was requested for zero events.
    #[error("at least one event is required")]
    EmptyEventList,

    /// The configured ICS endpoint is not a usable base URL.
    #[error("invalid ICS endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(
            CoreError::EmptyEventList.to_string(),
            "at least one event is required"
        );

        let err = CoreError::InvalidEndpoint {
            endpoint: "nope".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid ICS endpoint 'nope': relative URL without a base"
        );
    }
}
