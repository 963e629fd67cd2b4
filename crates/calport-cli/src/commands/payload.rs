//! `calport payload`: show provider request bodies without sending them.

use std::path::Path;

use calport_core::NormalizedEvent;
use calport_providers::{ProviderKind, to_google_event, to_microsoft_event};
use serde_json::Value;

use crate::error::{CliError, CliResult};
use crate::input::read_events;

/// Maps each event to the body `kind` would receive.
pub fn map_events(kind: ProviderKind, events: &[NormalizedEvent]) -> CliResult<Vec<Value>> {
    events
        .iter()
        .map(|event| match kind {
            ProviderKind::Google => serde_json::to_value(to_google_event(event)),
            ProviderKind::Microsoft => serde_json::to_value(to_microsoft_event(event)),
        })
        .collect::<Result<_, _>>()
        .map_err(|e| CliError::Input(format!("failed to serialize payload: {}", e)))
}

/// Prints the mapped bodies as a JSON array.
pub async fn run(file: &Path, kind: ProviderKind) -> CliResult<()> {
    let events = read_events(file).await?;
    let payloads = map_events(kind, &events)?;
    let json = serde_json::to_string_pretty(&payloads)
        .map_err(|e| CliError::Input(format!("failed to serialize payload: {}", e)))?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_per_provider() {
        let event = NormalizedEvent::new("Day off", "2025-07-01", "2025-07-02").with_all_day(true);
        let events = [event];

        let google = map_events(ProviderKind::Google, &events).unwrap();
        assert_eq!(google[0]["start"]["date"], "2025-07-01");

        let microsoft = map_events(ProviderKind::Microsoft, &events).unwrap();
        assert_eq!(microsoft[0]["isAllDay"], true);
        assert_eq!(microsoft[0]["start"]["timeZone"], "UTC");
    }
}
