//! Command-line interface definition.

use std::path::PathBuf;

use calport_providers::ProviderKind;
use clap::{Parser, Subcommand, ValueEnum};

/// calport - export events as ICS, add-to-calendar links, or push them to a provider
#[derive(Debug, Parser)]
#[command(name = "calport")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "CALPORT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Log line format on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
///
/// `FILE` holds one NormalizedEvent JSON object or an array of them; `-`
/// reads stdin.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Encode events as an iCalendar document
    Ics {
        /// Events JSON
        file: PathBuf,

        /// Write to this path instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Report the inline disposition instead of attachment
        #[arg(long)]
        inline: bool,
    },

    /// Print add-to-calendar links for each event
    Links {
        /// Events JSON
        file: PathBuf,

        /// ICS endpoint URL (overrides [links] ics_endpoint)
        #[arg(long)]
        ics_endpoint: Option<String>,
    },

    /// Print the provider request bodies without sending them
    Payload {
        /// Events JSON
        file: PathBuf,

        /// Target provider
        #[arg(long, short, value_enum)]
        provider: ProviderArg,
    },

    /// Create the events in a provider calendar
    Push {
        /// Events JSON
        file: PathBuf,

        /// Target provider
        #[arg(long, short, value_enum)]
        provider: ProviderArg,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Provider selection on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderArg {
    Google,
    #[value(alias = "outlook")]
    Microsoft,
}

impl From<ProviderArg> for ProviderKind {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Google => ProviderKind::Google,
            ProviderArg::Microsoft => ProviderKind::Microsoft,
        }
    }
}

/// `--log-format` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl From<LogFormat> for calport_core::TracingOutputFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Compact => Self::Compact,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Json => Self::Json,
        }
    }
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration, resolving secret references
    Validate,

    /// Show configuration file path
    Path,
}
