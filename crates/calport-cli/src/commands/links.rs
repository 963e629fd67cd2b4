//! `calport links`: add-to-calendar URLs per event.

use std::path::Path;

use calport_core::{CalendarLinkBuilder, CalendarLinks, NormalizedEvent};

use crate::config::CalportConfig;
use crate::error::{CliError, CliResult};
use crate::input::read_events;

/// Builds links for every event; the flag wins over `[links] ics_endpoint`.
pub fn build_links(
    config: &CalportConfig,
    ics_endpoint: Option<&str>,
    events: &[NormalizedEvent],
) -> CliResult<Vec<CalendarLinks>> {
    let endpoint = ics_endpoint
        .or(config.links.ics_endpoint.as_deref())
        .ok_or_else(|| {
            CliError::Config(
                "no ICS endpoint: pass --ics-endpoint or set [links] ics_endpoint".to_string(),
            )
        })?;
    let builder = CalendarLinkBuilder::new(endpoint)?;
    Ok(events.iter().map(|event| builder.build(event)).collect())
}

/// Prints a JSON array with one links object per event.
pub async fn run(config: &CalportConfig, file: &Path, ics_endpoint: Option<&str>) -> CliResult<()> {
    let events = read_events(file).await?;
    let links = build_links(config, ics_endpoint, &events)?;
    let json = serde_json::to_string_pretty(&links)
        .map_err(|e| CliError::Input(format!("failed to serialize links: {}", e)))?;
    println!("{}", json);
    Ok(())
}
