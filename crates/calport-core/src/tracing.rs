//! Tracing setup shared by the calport binaries.
//!
//! ```ignore
//! use calport_core::tracing::{TracingConfig, init_tracing};
//!
//! // Quiet CLI output: warnings only unless RUST_LOG says otherwise.
//! init_tracing(TracingConfig::cli())?;
//!
//! // `--debug`: every dispatched item, with file/line.
//! init_tracing(TracingConfig::verbose())?;
//! ```

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Crate prefix the default filter applies to.
const FILTER_TARGET: &str = "calport";

/// Errors that can occur during tracing initialization.
#[derive(Debug, Error)]
pub enum TracingError {
    /// A global subscriber was already installed.
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    /// The filter directive did not parse.
    #[error("failed to parse env filter: {0}")]
    EnvFilter(#[from] tracing_subscriber::filter::ParseError),
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingOutputFormat {
    /// Single-line, human readable.
    #[default]
    Compact,
    /// Multi-line, human readable.
    Pretty,
    /// One JSON object per line, for log shippers.
    Json,
}

/// Configuration for tracing initialization.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Level applied to `calport*` targets when `RUST_LOG` is unset.
    pub default_level: Level,
    /// Output format.
    pub output_format: TracingOutputFormat,
    /// Include file and line of the call site.
    pub include_location: bool,
    /// Include the module path.
    pub include_target: bool,
    /// Explicit filter directive; overrides both `RUST_LOG` and `default_level`.
    pub env_filter: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: Level::INFO,
            output_format: TracingOutputFormat::Compact,
            include_location: false,
            include_target: true,
            env_filter: None,
        }
    }
}

impl TracingConfig {
    /// Warnings only, no targets: stdout stays clean for piped JSON/ICS.
    #[must_use]
    pub fn cli() -> Self {
        Self {
            default_level: Level::WARN,
            include_target: false,
            ..Self::default()
        }
    }

    /// Debug level with call sites.
    #[must_use]
    pub fn verbose() -> Self {
        Self {
            default_level: Level::DEBUG,
            include_location: true,
            ..Self::default()
        }
    }

    /// Set the default log level.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    /// Set the output format.
    #[must_use]
    pub fn with_format(mut self, format: TracingOutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Set a custom env filter directive.
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Resolves the filter: explicit directive, then `RUST_LOG`, then the default level.
    fn build_filter(&self) -> Result<EnvFilter, TracingError> {
        match self.env_filter {
            Some(ref directive) => Ok(EnvFilter::try_new(directive)?),
            None => Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new(format!("{}={}", FILTER_TARGET, self.default_level))
            })),
        }
    }
}

/// Installs the global subscriber. Logs go to stderr.
///
/// # Errors
///
/// Returns an error if a global subscriber is already set or the filter
/// directive is invalid.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let filter = config.build_filter()?;
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_target(config.include_target);

    let layer = match config.output_format {
        TracingOutputFormat::Compact => layer.compact().boxed(),
        TracingOutputFormat::Pretty => layer.pretty().boxed(),
        TracingOutputFormat::Json => layer.json().boxed(),
    };

    let subscriber = tracing_subscriber::registry().with(filter).with(layer);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets() {
        let cli = TracingConfig::cli();
        assert_eq!(cli.default_level, Level::WARN);
        assert!(!cli.include_target);
        assert_eq!(cli.output_format, TracingOutputFormat::Compact);

        let verbose = TracingConfig::verbose();
        assert_eq!(verbose.default_level, Level::DEBUG);
        assert!(verbose.include_location);
    }

    #[test]
    fn builder_methods() {
        let config = TracingConfig::default()
            .with_level(Level::ERROR)
            .with_format(TracingOutputFormat::Json)
            .with_env_filter("calport_providers=trace");

        assert_eq!(config.default_level, Level::ERROR);
        assert_eq!(config.output_format, TracingOutputFormat::Json);
        assert_eq!(
            config.env_filter.as_deref(),
            Some("calport_providers=trace")
        );
    }

    #[test]
    fn explicit_filter_is_validated() {
        let config = TracingConfig::default().with_env_filter("calport=notalevel");
        assert!(matches!(config.build_filter(), Err(TracingError::EnvFilter(_))));

        let config = TracingConfig::default().with_env_filter("calport=debug");
        assert!(config.build_filter().is_ok());
    }
}
