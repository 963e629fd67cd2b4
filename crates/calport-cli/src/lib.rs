//! CLI, configuration and subcommands
//!
//! This crate provides the `calport` command-line interface.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod secret;

pub use cli::Cli;
pub use config::CalportConfig;
pub use error::{CliError, CliResult};
