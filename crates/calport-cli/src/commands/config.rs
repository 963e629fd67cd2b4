//! Configuration commands.

use calport_core::CalendarLinkBuilder;
use calport_providers::ProviderKind;

use crate::config::CalportConfig;
use crate::error::{CliError, CliResult};

/// Dump the configuration to stdout. Secret references are printed as written.
pub fn dump(config: &CalportConfig) -> CliResult<()> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| CliError::Config(format!("failed to serialize config: {}", e)))?;
    println!(
        "# config.toml ({})",
        CalportConfig::default_path().display()
    );
    println!("{}", toml_str);
    Ok(())
}

/// Checks the configuration and returns one line per verified section.
pub fn check(config: &CalportConfig) -> CliResult<Vec<String>> {
    let mut report = Vec::new();

    if config.http.timeout_secs == 0 {
        return Err(CliError::Config("[http] timeout_secs must be positive".to_string()));
    }

    if let Some(ref endpoint) = config.links.ics_endpoint {
        CalendarLinkBuilder::new(endpoint)?;
        report.push(format!("ICS endpoint {} is valid.", endpoint));
    }

    for kind in [ProviderKind::Google, ProviderKind::Microsoft] {
        let Some(settings) = config.provider(kind) else {
            continue;
        };
        let credential = settings.resolve()?;
        if credential.valid_access_token().is_none() && !credential.can_refresh() {
            return Err(CliError::Config(format!(
                "[{}] needs access_token, or refresh_token with client_id",
                kind
            )));
        }
        report.push(format!("{} credentials resolve.", kind));
    }

    Ok(report)
}

/// Validate the configuration.
pub fn validate(config: &CalportConfig) -> CliResult<()> {
    for line in check(config)? {
        println!("{}", line);
    }
    println!("Configuration is valid.");
    Ok(())
}

/// Show the configuration file path.
pub fn path() -> CliResult<()> {
    println!("config: {}", CalportConfig::default_path().display());
    Ok(())
}
