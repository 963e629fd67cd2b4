//! `calport push`: create events through the provider API.

use std::path::Path;

use calport_providers::{
    BatchItem, BulkDispatcher, CalendarProvider, DispatchResponse, GoogleCalendar,
    MicrosoftCalendar, OAuthRefresher, ProviderKind, StoredCredentials,
};
use tracing::debug;

use crate::config::CalportConfig;
use crate::error::{CliError, CliResult};
use crate::input::read_events;

/// Builds the credential source from the `[google]`/`[microsoft]` sections.
///
/// Only the section for `kind` is resolved, so a broken secret reference
/// for the other provider does not block a push.
pub fn credentials(config: &CalportConfig, kind: ProviderKind) -> CliResult<StoredCredentials> {
    let refresher = OAuthRefresher::new(config.http.timeout())?;
    let source = StoredCredentials::new(refresher);
    let Some(settings) = config.provider(kind) else {
        debug!(provider = %kind, "no credential section configured");
        return Ok(source);
    };

    let credential = settings.resolve()?;
    Ok(match kind {
        ProviderKind::Google => source.with_google(credential),
        ProviderKind::Microsoft => source.with_microsoft(credential),
    })
}

async fn dispatch_with<P: CalendarProvider>(
    provider: P,
    credentials: StoredCredentials,
    items: &[BatchItem],
) -> DispatchResponse {
    BulkDispatcher::new(provider, credentials)
        .dispatch(items)
        .await
}

/// Runs one batch against `kind`.
pub async fn dispatch(
    config: &CalportConfig,
    kind: ProviderKind,
    items: &[BatchItem],
) -> CliResult<DispatchResponse> {
    let credentials = credentials(config, kind)?;
    let timeout = config.http.timeout();

    let response = match kind {
        ProviderKind::Google => {
            let mut provider = GoogleCalendar::new(timeout)?;
            if let Some(ref base) = config.http.google_api_base {
                provider = provider.with_api_base(base);
            }
            dispatch_with(provider, credentials, items).await
        }
        ProviderKind::Microsoft => {
            let mut provider = MicrosoftCalendar::new(timeout)?;
            if let Some(ref base) = config.http.graph_api_base {
                provider = provider.with_api_base(base);
            }
            dispatch_with(provider, credentials, items).await
        }
    };
    Ok(response)
}

/// Pushes the events and prints the dispatch response as JSON.
///
/// A rejected batch still prints its response, then fails the command.
pub async fn run(config: &CalportConfig, file: &Path, kind: ProviderKind) -> CliResult<()> {
    let items: Vec<BatchItem> = read_events(file)
        .await?
        .into_iter()
        .map(BatchItem::from)
        .collect();

    let response = dispatch(config, kind, &items).await?;
    let json = serde_json::to_string_pretty(&response)
        .map_err(|e| CliError::Input(format!("failed to serialize response: {}", e)))?;
    println!("{}", json);

    if response.ok {
        Ok(())
    } else {
        Err(CliError::Rejected(response.error.unwrap_or_default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderSettings;
    use calport_core::NormalizedEvent;
    use calport_providers::ProviderErrorCode;

    fn items() -> Vec<BatchItem> {
        vec![BatchItem::from(NormalizedEvent::new(
            "x",
            "2025-01-01T10:00:00Z",
            "2025-01-01T11:00:00Z",
        ))]
    }

    #[tokio::test]
    async fn no_credentials_rejects_batch() {
        let response = dispatch(&CalportConfig::default(), ProviderKind::Microsoft, &items())
            .await
            .unwrap();

        assert!(!response.ok);
        assert!(response.results.is_empty());
        assert_eq!(response.code, Some(ProviderErrorCode::AuthenticationFailed));
    }

    #[tokio::test]
    async fn empty_batch_rejected_as_input() {
        let response = dispatch(&CalportConfig::default(), ProviderKind::Google, &[])
            .await
            .unwrap();

        assert!(!response.ok);
        assert_eq!(response.code, Some(ProviderErrorCode::InvalidInput));
    }

    #[test]
    fn only_selected_section_is_resolved() {
        let config = CalportConfig {
            google: Some(ProviderSettings {
                access_token: Some("env::_CALPORT_PUSH_UNSET_4242".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };

        assert!(credentials(&config, ProviderKind::Microsoft).is_ok());
        assert!(matches!(
            credentials(&config, ProviderKind::Google),
            Err(CliError::Secret(_))
        ));
    }
}
