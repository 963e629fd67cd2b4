//! CLI configuration.
//!
//! All settings live in one `config.toml`, by default at
//! `~/.config/calport/config.toml`:
//!
//! ```toml
//! [ics]
//! prod_id = "-//example//events//EN"
//! uid_domain = "events.example.com"
//!
//! [links]
//! ics_endpoint = "https://events.example.com/api/ics"
//!
//! [http]
//! timeout_secs = 30
//!
//! [google]
//! refresh_token = "pass::calport/google-refresh"
//! client_id = "xxx.apps.googleusercontent.com"
//! client_secret = "env::GOOGLE_CLIENT_SECRET"
//!
//! [microsoft]
//! access_token = "env::GRAPH_TOKEN"
//! tenant = "contoso.onmicrosoft.com"
//! ```
//!
//! Credential fields accept secret references (see [`crate::secret`]).

use std::path::{Path, PathBuf};
use std::time::Duration;

use calport_core::IcsEncoder;
use calport_providers::{ProviderKind, StoredCredential};
use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliResult};
use crate::secret;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Top-level `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CalportConfig {
    pub ics: IcsSettings,
    pub links: LinkSettings,
    pub http: HttpSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google: Option<ProviderSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub microsoft: Option<ProviderSettings>,
}

/// `[ics]`: calendar identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IcsSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prod_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid_domain: Option<String>,
}

impl IcsSettings {
    /// Builds an encoder with the configured overrides.
    pub fn encoder(&self) -> IcsEncoder {
        let mut encoder = IcsEncoder::new();
        if let Some(ref prod_id) = self.prod_id {
            encoder = encoder.with_prod_id(prod_id);
        }
        if let Some(ref domain) = self.uid_domain {
            encoder = encoder.with_uid_domain(domain);
        }
        encoder
    }
}

/// `[links]`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkSettings {
    /// Where the ICS document for an event is served.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ics_endpoint: Option<String>,
}

/// `[http]`: provider client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_api_base: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph_api_base: Option<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            google_api_base: None,
            graph_api_base: None,
        }
    }
}

impl HttpSettings {
    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// `[google]` / `[microsoft]`: token material, secret references allowed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    /// Microsoft only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
}

impl ProviderSettings {
    /// Resolves secret references into a provider credential.
    pub fn resolve(&self) -> CliResult<StoredCredential> {
        let field = |value: &Option<String>| -> CliResult<Option<String>> {
            value
                .as_deref()
                .map(secret::resolve)
                .transpose()
                .map_err(CliError::from)
        };

        Ok(StoredCredential {
            access_token: field(&self.access_token)?,
            expires_at: None,
            refresh_token: field(&self.refresh_token)?,
            client_id: field(&self.client_id)?,
            client_secret: field(&self.client_secret)?,
            tenant: self.tenant.clone(),
        })
    }
}

impl CalportConfig {
    /// Loads the config at `path`, or the default path when `None`.
    ///
    /// A missing file at the default path yields the default config; a
    /// missing explicit path is an error.
    pub fn load(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let path = Self::default_path();
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| CliError::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("calport")
            .join("config.toml")
    }

    /// Returns the settings section for `kind`, if present.
    pub fn provider(&self, kind: ProviderKind) -> Option<&ProviderSettings> {
        match kind {
            ProviderKind::Google => self.google.as_ref(),
            ProviderKind::Microsoft => self.microsoft.as_ref(),
        }
    }
}
