//! Subcommand implementations.

pub mod config;
pub mod ics;
pub mod links;
pub mod payload;
pub mod push;
