//! Public configuration for the registry client.
//!
//! This module provides a stable public API for configuring the client.
//! The internal config is derived from this.

use std::time::Duration;

use capdeck_core::Settings;
use capdeck_core::settings::{DEFAULT_BACKEND_URL, DEFAULT_REGISTRY_URL};

/// Configuration for the registry client.
///
/// # Example
///
/// ```
/// use capdeck_registry::RegistryClientConfig;
/// use std::time::Duration;
///
/// let config = RegistryClientConfig::new()
///     .with_registry_url("https://registry.example.com")
///     .with_timeout(Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct RegistryClientConfig {
    /// Base URL of the backend that owns the active set
    pub(crate) backend_url: String,
    /// Base URL of the server registry
    pub(crate) registry_url: String,
    /// User agent string for HTTP requests
    pub(crate) user_agent: String,
    /// Request timeout
    pub(crate) timeout: Duration,
    /// Bearer token for `list_active`, unless the caller passes one
    pub(crate) token: Option<String>,
}

impl Default for RegistryClientConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            user_agent: concat!("capdeck-registry/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
            token: None,
        }
    }
}

impl RegistryClientConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive a configuration from application settings.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new()
            .with_backend_url(settings.effective_backend_url())
            .with_registry_url(settings.effective_registry_url())
            .with_timeout(settings.timeout())
            .with_optional_token(settings.token.clone())
    }

    /// Set the backend base URL.
    ///
    /// Defaults to `http://localhost:8000`.
    #[must_use]
    pub fn with_backend_url(mut self, url: impl Into<String>) -> Self {
        self.backend_url = url.into();
        self
    }

    /// Set the registry base URL.
    ///
    /// Defaults to `https://registry.smithery.ai`.
    #[must_use]
    pub fn with_registry_url(mut self, url: impl Into<String>) -> Self {
        self.registry_url = url.into();
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout.
    ///
    /// Defaults to 30 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set an optional authentication token.
    #[must_use]
    pub fn with_optional_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }
}
