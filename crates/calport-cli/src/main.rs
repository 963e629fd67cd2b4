//! calport CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use calport_cli::cli::{Cli, Command, ConfigAction};
use calport_cli::commands;
use calport_cli::config::CalportConfig;
use calport_cli::error::CliResult;
use calport_core::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = if cli.debug {
        TracingConfig::verbose()
    } else {
        TracingConfig::cli()
    };
    if let Err(e) = init_tracing(tracing_config.with_format(cli.log_format.into())) {
        eprintln!("warning: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    if let Command::Config {
        action: ConfigAction::Path,
    } = cli.command
    {
        return commands::config::path();
    }

    let config = CalportConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Ics {
            file,
            output,
            inline,
        } => commands::ics::run(&config, &file, output.as_deref(), inline).await,
        Command::Links { file, ics_endpoint } => {
            commands::links::run(&config, &file, ics_endpoint.as_deref()).await
        }
        Command::Payload { file, provider } => commands::payload::run(&file, provider.into()).await,
        Command::Push { file, provider } => {
            commands::push::run(&config, &file, provider.into()).await
        }
        Command::Config { action } => match action {
            ConfigAction::Dump => commands::config::dump(&config),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => commands::config::path(),
        },
    }
}
