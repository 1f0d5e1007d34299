//! HTTP backend abstraction.
//!
//! The client logic talks to a small trait so it can be tested against
//! canned responses. Backends return the status and body of every response
//! they receive; deciding what a status means is up to the client.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::{RegistryError, RegistryResult};
use crate::models::RegistryConfig;

/// Status and body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Trait for HTTP backends.
///
/// This is an implementation detail - external code should use the
/// `RegistryPort` trait.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// `GET url`, with an optional bearer token.
    async fn get(&self, url: &Url, bearer: Option<&str>) -> RegistryResult<HttpResponse>;

    /// `POST url` with a JSON body.
    async fn post_json(&self, url: &Url, body: &Value) -> RegistryResult<HttpResponse>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest. No retries.
pub struct ReqwestBackend {
    client: reqwest::Client,
}

impl ReqwestBackend {
    /// Create a new reqwest backend with the given configuration.
    pub fn new(config: &RegistryConfig) -> RegistryResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| RegistryError::ClientSetup {
                message: e.to_string(),
            })?;

        Ok(Self { client })
    }

    async fn send(&self, url: &Url, request: reqwest::RequestBuilder) -> RegistryResult<HttpResponse> {
        let transport = |e: reqwest::Error| RegistryError::Transport {
            url: url.to_string(),
            message: e.to_string(),
            timed_out: e.is_timeout(),
        };

        let response = request.send().await.map_err(transport)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport)?;
        debug!(%url, status, bytes = body.len(), "HTTP response");

        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get(&self, url: &Url, bearer: Option<&str>) -> RegistryResult<HttpResponse> {
        let mut request = self.client.get(url.as_str());
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        self.send(url, request).await
    }

    async fn post_json(&self, url: &Url, body: &Value) -> RegistryResult<HttpResponse> {
        let request = self.client.post(url.as_str()).json(body);
        self.send(url, request).await
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================
