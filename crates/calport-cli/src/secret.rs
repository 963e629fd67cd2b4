//! Secret references in `config.toml`.
//!
//! Token and client fields may point elsewhere instead of holding the value:
//!
//! - `env::VAR_NAME` reads `$VAR_NAME`
//! - `pass::path/in/store` runs `pass show path/in/store` and keeps the first line
//! - anything else is the literal value

use std::process::Command;

use thiserror::Error;

const ENV_PREFIX: &str = "env::";
const PASS_PREFIX: &str = "pass::";

/// A secret reference that could not be resolved.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SecretError {
    #[error("environment variable `{0}` is not set")]
    MissingEnv(String),

    #[error("failed to run `pass show {path}`: {reason}")]
    PassFailed { path: String, reason: String },

    #[error("`pass show {0}` produced no output")]
    PassEmpty(String),
}

/// A parsed config value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretRef<'a> {
    Env(&'a str),
    Pass(&'a str),
    Plain(&'a str),
}

impl<'a> SecretRef<'a> {
    /// Classifies `value` by prefix.
    pub fn parse(value: &'a str) -> Self {
        if let Some(var) = value.strip_prefix(ENV_PREFIX) {
            Self::Env(var.trim())
        } else if let Some(path) = value.strip_prefix(PASS_PREFIX) {
            Self::Pass(path.trim())
        } else {
            Self::Plain(value)
        }
    }

    /// Returns true if the value is stored outside the config file.
    pub fn is_reference(&self) -> bool {
        !matches!(self, Self::Plain(_))
    }

    /// Produces the secret value.
    pub fn resolve(&self) -> Result<String, SecretError> {
        match *self {
            Self::Plain(value) => Ok(value.to_string()),
            Self::Env(var) => {
                std::env::var(var).map_err(|_| SecretError::MissingEnv(var.to_string()))
            }
            Self::Pass(path) => pass_show(path),
        }
    }
}

/// Resolves a config value that may be a secret reference.
pub fn resolve(value: &str) -> Result<String, SecretError> {
    SecretRef::parse(value).resolve()
}

fn pass_show(path: &str) -> Result<String, SecretError> {
    let failed = |reason: String| SecretError::PassFailed {
        path: path.to_string(),
        reason,
    };

    let output = Command::new("pass")
        .arg("show")
        .arg(path)
        .output()
        .map_err(|e| failed(e.to_string()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(failed(format!("{}: {}", output.status, stderr.trim())));
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(str::to_string)
        .filter(|line| !line.is_empty())
        .ok_or_else(|| SecretError::PassEmpty(path.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_prefixes() {
        assert_eq!(
            SecretRef::parse("env::GRAPH_TOKEN"),
            SecretRef::Env("GRAPH_TOKEN")
        );
        assert_eq!(
            SecretRef::parse("pass::calport/google"),
            SecretRef::Pass("calport/google")
        );
        assert_eq!(SecretRef::parse("ya29.abc"), SecretRef::Plain("ya29.abc"));
        assert!(!SecretRef::parse("").is_reference());
        assert!(SecretRef::parse("env::X").is_reference());
    }

    #[test]
    fn plain_text_passthrough() {
        assert_eq!(
            resolve("client-id.apps.googleusercontent.com").unwrap(),
            "client-id.apps.googleusercontent.com"
        );
    }

    #[test]
    fn env_reference() {
        unsafe {
            std::env::set_var("_CALPORT_SECRET_TEST", "from-env");
        }
        assert_eq!(resolve("env::_CALPORT_SECRET_TEST").unwrap(), "from-env");
        unsafe {
            std::env::remove_var("_CALPORT_SECRET_TEST");
        }
    }

    #[test]
    fn missing_env_reference() {
        assert_eq!(
            resolve("env::_CALPORT_SURELY_UNSET_98765"),
            Err(SecretError::MissingEnv("_CALPORT_SURELY_UNSET_98765".to_string()))
        );
    }

    #[test]
    fn pass_failure_is_reported() {
        // Fails whether or not `pass` is installed.
        assert!(resolve("pass::calport/does/not/exist/98765").is_err());
    }
}
