//! The static, locally-known list of capability servers.

use serde::Deserialize;
use thiserror::Error;

use super::server::ServerDescriptor;

const DEFAULT_CATALOG_JSON: &str = include_str!("../../data/default_catalog.json");

/// Errors loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog document is not valid JSON or has the wrong shape.
    #[error("Invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two entries share a qualified name.
    #[error("Duplicate catalog entry: {qualified_name}")]
    DuplicateEntry {
        /// The repeated id.
        qualified_name: String,
    },
}

/// Either a bare array or `{"servers": [...]}` (the registry's search shape).
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    List(Vec<ServerDescriptor>),
    Wrapped { servers: Vec<ServerDescriptor> },
}

/// Ordered catalog of known servers, unique by qualified name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    servers: Vec<ServerDescriptor>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids.
    pub fn new(servers: Vec<ServerDescriptor>) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();
        for server in servers {
            if catalog.get(&server.qualified_name).is_some() {
                return Err(CatalogError::DuplicateEntry {
                    qualified_name: server.qualified_name,
                });
            }
            catalog.servers.push(server);
        }
        Ok(catalog)
    }

    /// Parse a catalog document.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let servers = match serde_json::from_str::<CatalogDocument>(json)? {
            CatalogDocument::List(servers) | CatalogDocument::Wrapped { servers } => servers,
        };
        Self::new(servers)
    }

    /// The catalog bundled with the crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(DEFAULT_CATALOG_JSON)
    }

    /// Look up a server by qualified name.
    pub fn get(&self, qualified_name: &str) -> Option<&ServerDescriptor> {
        self.servers
            .iter()
            .find(|s| s.qualified_name == qualified_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ServerDescriptor> {
        self.servers.iter()
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    /// Append discovered servers that are not already known.
    ///
    /// Returns how many entries were added.
    pub fn extend_discovered(&mut self, discovered: impl IntoIterator<Item = ServerDescriptor>) -> usize {
        let mut added = 0;
        for server in discovered {
            if self.get(&server.qualified_name).is_none() {
                self.servers.push(server);
                added += 1;
            }
        }
        added
    }
}
