//! Error types for registry port operations.

use thiserror::Error;

/// Errors from registry port operations.
///
/// These are domain-level errors that consumers can handle. Transport and
/// parsing errors from the HTTP adapter are mapped to these. None of them are
/// retried by the port; callers decide.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryPortError {
    /// Transport failure: offline, DNS, timeout, connection reset.
    #[error("Network error: {message}")]
    Network {
        /// Description of the transport failure
        message: String,
    },

    /// Non-2xx response or a body that does not match the contract.
    #[error("Protocol error: {message}")]
    Protocol {
        /// HTTP status, absent when the status was fine but the body was not
        status: Option<u16>,
        /// Server-supplied `detail`, else (truncated) raw body or parse error
        message: String,
    },

    /// Detail lookup for an id the registry does not know.
    #[error("Server not found: {qualified_name}")]
    NotFound {
        /// The id that was looked up
        qualified_name: String,
    },

    /// The client itself is misconfigured (bad base URL, TLS setup).
    #[error("Configuration error: {message}")]
    Configuration {
        /// What's wrong with the configuration
        message: String,
    },
}

impl RegistryPortError {
    /// Protocol error for a non-2xx status.
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Protocol {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Protocol error for a malformed 2xx body.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Protocol {
            status: None,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }
}

/// Result type alias for registry port operations.
pub type RegistryPortResult<T> = Result<T, RegistryPortError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RegistryPortError::status(500, "Error updating MCP server configuration");
        assert_eq!(
            err.to_string(),
            "Protocol error: Error updating MCP server configuration"
        );

        let err = RegistryPortError::NotFound {
            qualified_name: "@acme/missing".to_string(),
        };
        assert!(err.to_string().contains("@acme/missing"));

        assert!(RegistryPortError::network("connection refused")
            .to_string()
            .starts_with("Network error"));
    }

    #[test]
    fn test_malformed_has_no_status() {
        assert_eq!(
            RegistryPortError::malformed("expected object"),
            RegistryPortError::Protocol {
                status: None,
                message: "expected object".to_string()
            }
        );
    }
}
