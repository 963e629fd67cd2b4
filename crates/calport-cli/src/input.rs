//! Reading NormalizedEvent JSON from a file or stdin.

use std::path::Path;

use calport_core::NormalizedEvent;
use serde::Deserialize;
use tokio::io::AsyncReadExt;
use tracing::debug;

use crate::error::{CliError, CliResult};

/// Path that means "read stdin".
pub const STDIN_PATH: &str = "-";

#[derive(Deserialize)]
#[serde(untagged)]
enum EventsDocument {
    Many(Vec<NormalizedEvent>),
    One(Box<NormalizedEvent>),
}

/// Parses a single event object or an array of events.
pub fn parse_events(json: &str) -> CliResult<Vec<NormalizedEvent>> {
    let document: EventsDocument = serde_json::from_str(json).map_err(|e| {
        CliError::Input(format!(
            "expected an event object or an array of events: {}",
            e
        ))
    })?;
    Ok(match document {
        EventsDocument::Many(events) => events,
        EventsDocument::One(event) => vec![*event],
    })
}

/// Reads events from `path`, or stdin when it is `-`.
pub async fn read_events(path: &Path) -> CliResult<Vec<NormalizedEvent>> {
    let json = if path.as_os_str() == STDIN_PATH {
        let mut buf = String::new();
        tokio::io::stdin().read_to_string(&mut buf).await?;
        buf
    } else {
        tokio::fs::read_to_string(path).await.map_err(|e| {
            CliError::Input(format!("failed to read {}: {}", path.display(), e))
        })?
    };

    let events = parse_events(&json)?;
    debug!(count = events.len(), source = %path.display(), "read events");
    Ok(events)
}
