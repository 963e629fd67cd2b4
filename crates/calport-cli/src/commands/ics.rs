//! `calport ics`: encode events as one iCalendar document.

use std::path::Path;

use calport_core::{Disposition, IcsExport, NormalizedEvent};
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::config::CalportConfig;
use crate::error::CliResult;
use crate::input::read_events;

/// Encodes `events` with the configured encoder.
pub fn export(config: &CalportConfig, events: &[NormalizedEvent]) -> CliResult<IcsExport> {
    Ok(config.ics.encoder().export(events)?)
}

/// Reads events, encodes them and writes the document to `output` or stdout.
///
/// The headers an HTTP handler would send are reported on stderr.
pub async fn run(
    config: &CalportConfig,
    file: &Path,
    output: Option<&Path>,
    inline: bool,
) -> CliResult<()> {
    let events = read_events(file).await?;
    let export = export(config, &events)?;

    let disposition = if inline {
        Disposition::Inline
    } else {
        Disposition::Attachment
    };

    match output {
        Some(path) => {
            tokio::fs::write(path, export.bytes()).await?;
            info!(path = %path.display(), events = events.len(), "wrote calendar");
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(export.bytes()).await?;
            stdout.flush().await?;
        }
    }

    eprintln!("Content-Type: {}", export.content_type());
    eprintln!(
        "Content-Disposition: {}",
        export.content_disposition(disposition)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("events.json");
        let output = dir.path().join("out.ics");
        std::fs::write(
            &input,
            r#"[{"title":"One","start":"2025-01-01","end":"2025-01-02","allDay":true},
                {"title":"Two","start":"2025-01-03T10:00:00Z","end":"2025-01-03T11:00:00Z"}]"#,
        )
        .unwrap();

        run(&CalportConfig::default(), &input, Some(&output), false)
            .await
            .unwrap();

        let text = std::fs::read_to_string(&output).unwrap();
        assert!(text.starts_with("BEGIN:VCALENDAR\r\n"));
        assert_eq!(text.matches("BEGIN:VEVENT").count(), 2);
        assert!(text.contains("DTSTART;VALUE=DATE:20250101\r\n"));
        assert!(text.contains("DTSTART:20250103T100000Z\r\n"));
    }

    #[tokio::test]
    async fn empty_array_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("events.json");
        std::fs::write(&input, "[]").unwrap();

        let err = run(&CalportConfig::default(), &input, None, false)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::CliError::Core(calport_core::CoreError::EmptyEventList)
        ));
    }

    #[test]
    fn export_filename_from_title() {
        let event = NormalizedEvent::new(
            "Spring Gala",
            "2025-04-01T18:00:00Z",
            "2025-04-01T22:00:00Z",
        );
        let export = export(&CalportConfig::default(), &[event]).unwrap();
        assert_eq!(
            export.content_disposition(Disposition::Inline),
            "inline; filename=\"spring-gala.ics\""
        );
    }
}
