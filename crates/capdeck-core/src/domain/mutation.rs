//! Active-set mutation requests and results.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::launch::LaunchConfig;

/// The server-authoritative set of enabled server ids.
pub type ActiveSet = BTreeSet<String>;

/// A batch of additions and removals submitted as a single call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationRequest {
    /// Servers to add or update, with their launch configs (insertion order).
    pub servers_to_add: IndexMap<String, LaunchConfig>,
    /// Servers to remove.
    pub servers_to_remove: BTreeSet<String>,
}

impl MutationRequest {
    /// Create an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that adds (or updates) a single server.
    pub fn add_one(id: impl Into<String>, launch: LaunchConfig) -> Self {
        Self::new().with_add(id, launch)
    }

    /// Request that removes a single server.
    pub fn remove_one(id: impl Into<String>) -> Self {
        Self::new().with_remove(id)
    }

    /// Add or update a server in this batch.
    #[must_use]
    pub fn with_add(mut self, id: impl Into<String>, launch: LaunchConfig) -> Self {
        self.servers_to_add.insert(id.into(), launch);
        self
    }

    /// Remove a server in this batch.
    #[must_use]
    pub fn with_remove(mut self, id: impl Into<String>) -> Self {
        self.servers_to_remove.insert(id.into());
        self
    }

    /// True when the request would change nothing.
    pub fn is_empty(&self) -> bool {
        self.servers_to_add.is_empty() && self.servers_to_remove.is_empty()
    }
}

/// What the backend reports it changed.
///
/// `installation_failed` is a partial failure, not an error: the call was
/// accepted and every id in `added`/`updated`/`removed` took effect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationResult {
    #[serde(default)]
    pub added: Vec<String>,
    #[serde(default)]
    pub updated: Vec<String>,
    #[serde(default)]
    pub removed: Vec<String>,
    #[serde(default)]
    pub installation_failed: Vec<String>,
    /// Whether the backend managed to reload its clients afterwards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reload_success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl MutationResult {
    /// True if any server failed to install.
    pub fn has_installation_failures(&self) -> bool {
        !self.installation_failed.is_empty()
    }

    /// Whether `id` was reported under `installation_failed`.
    pub fn installation_failed_for(&self, id: &str) -> bool {
        self.installation_failed.iter().any(|f| f == id)
    }

    /// Whether `id` was added or updated.
    pub fn applied(&self, id: &str) -> bool {
        self.added.iter().chain(&self.updated).any(|a| a == id)
    }
}
