//! Capability events.
//!
//! Emitted by the synchronizer (refresh and partial-failure events) and by
//! the selection controller (user-visible add/edit/remove outcomes).
//!
//! # Wire Format
//!
//! Events are serialized with a `type` tag:
//!
//! ```json
//! { "type": "server_added", "serverId": "@acme/search", "servers": ["@acme/search"] }
//! ```

use serde::{Deserialize, Serialize};

/// Canonical capability event union.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CapabilityEvent {
    /// The active-set mirror was replaced by a fresh server snapshot.
    ActiveSetRefreshed {
        /// Active ids after the refresh.
        servers: Vec<String>,
        /// Refresh cycle that produced this set.
        revision: u64,
    },

    /// A refresh failed; the mirror still holds the previous set.
    RefreshFailed {
        /// User-safe error message.
        message: String,
    },

    /// A server was added through the Add modal.
    ServerAdded {
        #[serde(rename = "serverId")]
        server_id: String,
        /// Active ids after the induced refresh.
        servers: Vec<String>,
    },

    /// A server's configuration was changed through the Edit modal.
    ServerUpdated {
        #[serde(rename = "serverId")]
        server_id: String,
        servers: Vec<String>,
    },

    /// A server was removed.
    ServerRemoved {
        #[serde(rename = "serverId")]
        server_id: String,
        servers: Vec<String>,
    },

    /// The backend accepted a mutation but could not install these servers.
    InstallationFailed {
        #[serde(rename = "serverIds")]
        server_ids: Vec<String>,
    },
}

impl CapabilityEvent {
    pub fn active_set_refreshed(servers: impl IntoIterator<Item = String>, revision: u64) -> Self {
        Self::ActiveSetRefreshed {
            servers: servers.into_iter().collect(),
            revision,
        }
    }

    pub fn refresh_failed(message: impl Into<String>) -> Self {
        Self::RefreshFailed {
            message: message.into(),
        }
    }

    pub fn server_added(server_id: impl Into<String>, servers: impl IntoIterator<Item = String>) -> Self {
        Self::ServerAdded {
            server_id: server_id.into(),
            servers: servers.into_iter().collect(),
        }
    }

    pub fn server_updated(server_id: impl Into<String>, servers: impl IntoIterator<Item = String>) -> Self {
        Self::ServerUpdated {
            server_id: server_id.into(),
            servers: servers.into_iter().collect(),
        }
    }

    pub fn server_removed(server_id: impl Into<String>, servers: impl IntoIterator<Item = String>) -> Self {
        Self::ServerRemoved {
            server_id: server_id.into(),
            servers: servers.into_iter().collect(),
        }
    }

    pub const fn installation_failed(server_ids: Vec<String>) -> Self {
        Self::InstallationFailed { server_ids }
    }

    /// Get the event name for wire protocols.
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::ActiveSetRefreshed { .. } => "active_set:refreshed",
            Self::RefreshFailed { .. } => "active_set:refresh_failed",
            Self::ServerAdded { .. } => "server:added",
            Self::ServerUpdated { .. } => "server:updated",
            Self::ServerRemoved { .. } => "server:removed",
            Self::InstallationFailed { .. } => "server:installation_failed",
        }
    }

    /// Active ids carried by the event, if it carries any.
    pub fn servers(&self) -> Option<&[String]> {
        match self {
            Self::ActiveSetRefreshed { servers, .. }
            | Self::ServerAdded { servers, .. }
            | Self::ServerUpdated { servers, .. }
            | Self::ServerRemoved { servers, .. } => Some(servers),
            Self::RefreshFailed { .. } | Self::InstallationFailed { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = CapabilityEvent::server_added("@acme/search", vec!["@acme/search".to_string()]);
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"server_added\""));
        assert!(json.contains("\"serverId\":\"@acme/search\""));
    }

    /// Names are consumed by UI listeners; keep them stable.
    #[test]
    fn event_names_are_stable() {
        let cases = vec![
            (CapabilityEvent::active_set_refreshed(Vec::new(), 1), "active_set:refreshed"),
            (CapabilityEvent::refresh_failed("x"), "active_set:refresh_failed"),
            (CapabilityEvent::server_added("a", Vec::new()), "server:added"),
            (CapabilityEvent::server_updated("a", Vec::new()), "server:updated"),
            (CapabilityEvent::server_removed("a", Vec::new()), "server:removed"),
            (CapabilityEvent::installation_failed(Vec::new()), "server:installation_failed"),
        ];

        for (event, expected_name) in cases {
            assert_eq!(event.event_name(), expected_name);
        }
    }

    #[test]
    fn test_servers_accessor() {
        let event = CapabilityEvent::server_removed("a", vec!["b".to_string()]);
        assert_eq!(event.servers(), Some(&["b".to_string()][..]));
        assert_eq!(CapabilityEvent::refresh_failed("x").servers(), None);
    }
}
