//! Registry client for the backend's active-set API and the server registry.

mod active;
mod detail;

use crate::config::RegistryClientConfig;
use crate::error::RegistryResult;
use crate::http::{HttpBackend, ReqwestBackend};
use crate::models::RegistryConfig;
use url::Url;

// ============================================================================
// Type Aliases
// ============================================================================

/// Default registry client using the reqwest HTTP backend.
pub type DefaultRegistryClient = RegistryClient<ReqwestBackend>;

// ============================================================================
// Client
// ============================================================================

/// Client generic over its HTTP backend.
///
/// Use `DefaultRegistryClient` for production code; the generic parameter is
/// an implementation detail that lets tests inject a fake backend.
pub struct RegistryClient<B: HttpBackend> {
    pub(crate) backend: B,
    pub(crate) config: RegistryConfig,
}

impl DefaultRegistryClient {
    /// Create a new client with the given configuration.
    ///
    /// Fails if a base URL does not parse or the HTTP client cannot be built.
    pub fn new(config: &RegistryClientConfig) -> RegistryResult<Self> {
        let internal_config = Self::to_internal_config(config)?;
        let backend = ReqwestBackend::new(&internal_config)?;
        Ok(Self {
            backend,
            config: internal_config,
        })
    }

    fn to_internal_config(config: &RegistryClientConfig) -> RegistryResult<RegistryConfig> {
        Ok(RegistryConfig {
            backend_url: Url::parse(&config.backend_url)?,
            registry_url: Url::parse(&config.registry_url)?,
            user_agent: config.user_agent.clone(),
            timeout: config.timeout,
            token: config.token.clone(),
        })
    }
}

impl<B: HttpBackend> RegistryClient<B> {
    /// Create a new client with a custom backend.
    #[cfg(test)]
    pub(crate) const fn with_backend(config: RegistryConfig, backend: B) -> Self {
        Self { backend, config }
    }
}
