//! Internal configuration and wire types.
//!
//! Wire types mirror the JSON the backend and the registry exchange. They
//! are converted to core domain types in `parsing` and never leave the crate.

use std::collections::BTreeMap;
use std::time::Duration;

use capdeck_core::{LaunchConfig, MutationRequest};
use serde::{Deserialize, Serialize};
use url::Url;

// ============================================================================
// Internal Configuration
// ============================================================================

/// Validated configuration the client works with.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    pub backend_url: Url,
    pub registry_url: Url,
    pub user_agent: String,
    pub timeout: Duration,
    pub token: Option<String>,
}

#[cfg(test)]
impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            backend_url: Url::parse("http://localhost:8000").unwrap(),
            registry_url: Url::parse("https://registry.smithery.ai").unwrap(),
            user_agent: "capdeck-registry/test".to_string(),
            timeout: Duration::from_secs(30),
            token: None,
        }
    }
}

// ============================================================================
// Backend Wire Types
// ============================================================================

/// Body of `POST /tools/servers/update`.
///
/// `serversToAdd` lists ids only; their launch configs travel in
/// `serverConfigs`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServersBody<'a> {
    pub servers_to_add: Vec<&'a str>,
    pub server_configs: BTreeMap<&'a str, &'a LaunchConfig>,
    pub servers_to_remove: Vec<&'a str>,
}

impl<'a> From<&'a MutationRequest> for UpdateServersBody<'a> {
    fn from(request: &'a MutationRequest) -> Self {
        Self {
            servers_to_add: request.servers_to_add.keys().map(String::as_str).collect(),
            server_configs: request
                .servers_to_add
                .iter()
                .map(|(id, launch)| (id.as_str(), launch))
                .collect(),
            servers_to_remove: request.servers_to_remove.iter().map(String::as_str).collect(),
        }
    }
}

/// Response of `POST /tools/servers/update`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateServersResponse {
    #[serde(default)]
    pub reload_success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub changes: Option<UpdateChanges>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateChanges {
    #[serde(default)]
    pub added: Vec<String>,
    #[serde(default)]
    pub updated: Vec<String>,
    #[serde(default)]
    pub removed: Vec<String>,
    #[serde(default)]
    pub installation_failed: Vec<String>,
}

// ============================================================================
// Registry Wire Types
// ============================================================================

/// Response of `GET /servers?q=`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub servers: Vec<SearchEntry>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// A search hit. Optional fields may arrive as explicit `null`s.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEntry {
    pub qualified_name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub use_count: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_count: u64,
}
