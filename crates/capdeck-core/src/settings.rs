//! Settings domain types and validation.
//!
//! Client settings are pure data: where the backend and the registry live,
//! how long to wait for them and which launcher package to embed in launch
//! configs. Environment lookups go through an injectable function so the
//! parsing is testable without touching the process environment.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::DEFAULT_CLI_PACKAGE;

/// Default base URL of the backend that owns the active set.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Default base URL of the server registry.
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.smithery.ai";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_BACKEND_URL: &str = "CAPDECK_BACKEND_URL";
pub const ENV_REGISTRY_URL: &str = "CAPDECK_REGISTRY_URL";
pub const ENV_TOKEN: &str = "CAPDECK_TOKEN";
pub const ENV_TIMEOUT_SECS: &str = "CAPDECK_TIMEOUT_SECS";
pub const ENV_CLI_PACKAGE: &str = "CAPDECK_CLI_PACKAGE";
pub const ENV_CATALOG: &str = "CAPDECK_CATALOG";

/// Client settings.
///
/// All fields are optional so layers (defaults, environment, flags) can be
/// stacked with [`Settings::overlay`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the backend (`GET /tools`, `POST /tools/servers/update`).
    pub backend_url: Option<String>,

    /// Base URL of the registry (`GET /servers/{name}`).
    pub registry_url: Option<String>,

    /// Bearer token sent with `list_active`.
    pub token: Option<String>,

    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,

    /// Launcher package embedded in launch configs.
    pub cli_package: Option<String>,

    /// Catalog JSON file; the embedded catalog is used when unset.
    pub catalog_path: Option<String>,
}

impl Settings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            backend_url: Some(DEFAULT_BACKEND_URL.to_string()),
            registry_url: Some(DEFAULT_REGISTRY_URL.to_string()),
            token: None,
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
            cli_package: Some(DEFAULT_CLI_PACKAGE.to_string()),
            catalog_path: None,
        }
    }

    /// Read settings through `lookup`. Unset and blank variables stay `None`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let timeout_secs = read(ENV_TIMEOUT_SECS)
            .map(|raw| {
                raw.parse::<u64>()
                    .map_err(|_| SettingsError::InvalidTimeout(raw))
            })
            .transpose()?;

        Ok(Self {
            backend_url: read(ENV_BACKEND_URL),
            registry_url: read(ENV_REGISTRY_URL),
            token: read(ENV_TOKEN),
            timeout_secs,
            cli_package: read(ENV_CLI_PACKAGE),
            catalog_path: read(ENV_CATALOG),
        })
    }

    /// Replace every field that `other` sets.
    pub fn overlay(&mut self, other: Self) {
        let Self {
            backend_url,
            registry_url,
            token,
            timeout_secs,
            cli_package,
            catalog_path,
        } = other;

        if backend_url.is_some() {
            self.backend_url = backend_url;
        }
        if registry_url.is_some() {
            self.registry_url = registry_url;
        }
        if token.is_some() {
            self.token = token;
        }
        if timeout_secs.is_some() {
            self.timeout_secs = timeout_secs;
        }
        if cli_package.is_some() {
            self.cli_package = cli_package;
        }
        if catalog_path.is_some() {
            self.catalog_path = catalog_path;
        }
    }

    pub fn effective_backend_url(&self) -> &str {
        self.backend_url.as_deref().unwrap_or(DEFAULT_BACKEND_URL)
    }

    pub fn effective_registry_url(&self) -> &str {
        self.registry_url.as_deref().unwrap_or(DEFAULT_REGISTRY_URL)
    }

    pub fn effective_cli_package(&self) -> &str {
        self.cli_package.as_deref().unwrap_or(DEFAULT_CLI_PACKAGE)
    }

    /// Get the effective request timeout (with default fallback).
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("{field} must be an http(s) URL, got '{value}'")]
    InvalidUrl { field: &'static str, value: String },

    #[error("Timeout must be a whole number of seconds, got '{0}'")]
    InvalidTimeout(String),

    #[error("Timeout must be at least one second")]
    ZeroTimeout,

    #[error("Launcher package cannot be empty")]
    EmptyCliPackage,

    #[error("Catalog path cannot be empty")]
    EmptyCatalogPath,
}

fn check_url(field: &'static str, value: Option<&str>) -> Result<(), SettingsError> {
    let Some(value) = value else {
        return Ok(());
    };
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    match rest {
        Some(host) if !host.trim_matches('/').is_empty() => Ok(()),
        _ => Err(SettingsError::InvalidUrl {
            field,
            value: value.to_string(),
        }),
    }
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    check_url("backend_url", settings.backend_url.as_deref())?;
    check_url("registry_url", settings.registry_url.as_deref())?;

    if settings.timeout_secs == Some(0) {
        return Err(SettingsError::ZeroTimeout);
    }

    if settings
        .cli_package
        .as_ref()
        .is_some_and(|p| p.trim().is_empty())
    {
        return Err(SettingsError::EmptyCliPackage);
    }

    if settings
        .catalog_path
        .as_ref()
        .is_some_and(|p| p.trim().is_empty())
    {
        return Err(SettingsError::EmptyCatalogPath);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::with_defaults();
        assert_eq!(settings.effective_backend_url(), DEFAULT_BACKEND_URL);
        assert_eq!(settings.effective_cli_package(), "@smithery/cli@latest");
        assert_eq!(settings.timeout(), Duration::from_secs(30));
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_from_lookup_skips_blank_values() {
        let settings = Settings::from_lookup(lookup(&[
            (ENV_BACKEND_URL, "http://10.0.0.2:8000"),
            (ENV_TOKEN, "   "),
            (ENV_TIMEOUT_SECS, "5"),
        ]))
        .unwrap();

        assert_eq!(settings.backend_url.as_deref(), Some("http://10.0.0.2:8000"));
        assert_eq!(settings.token, None);
        assert_eq!(settings.timeout_secs, Some(5));
    }

    #[test]
    fn test_from_lookup_rejects_bad_timeout() {
        let err = Settings::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "soon")])).unwrap_err();
        assert_eq!(err, SettingsError::InvalidTimeout("soon".to_string()));
    }

    #[test]
    fn test_overlay_only_replaces_set_fields() {
        let mut settings = Settings::with_defaults();
        settings.overlay(Settings {
            token: Some("abc".to_string()),
            ..Default::default()
        });

        assert_eq!(settings.token.as_deref(), Some("abc"));
        assert_eq!(settings.effective_registry_url(), DEFAULT_REGISTRY_URL);
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let settings = Settings {
            registry_url: Some("ftp://registry".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::InvalidUrl { field: "registry_url", .. })
        ));

        let settings = Settings {
            backend_url: Some("http://".to_string()),
            ..Default::default()
        };
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let settings = Settings {
            timeout_secs: Some(0),
            ..Default::default()
        };
        assert_eq!(validate_settings(&settings), Err(SettingsError::ZeroTimeout));
    }

    #[test]
    fn test_validate_empty_package() {
        let settings = Settings {
            cli_package: Some(" ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            validate_settings(&settings),
            Err(SettingsError::EmptyCliPackage)
        );
    }
}
