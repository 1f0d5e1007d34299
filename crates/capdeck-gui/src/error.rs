//! Semantic error types for selection operations.
//!
//! Front ends map `GuiError` to whatever they render: inline modal text,
//! an error row in the list, a non-zero exit code.

use capdeck_core::{FormError, RegistryPortError, SyncError};
use thiserror::Error;

/// Errors returned at the controller's action boundary.
///
/// None of these leave the controller in a broken state: a failed submit
/// keeps the modal open with the message attached, and a failed remove
/// leaves the mirror as it was.
#[derive(Debug, Clone, Error)]
pub enum GuiError {
    /// Entity not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Type of entity (e.g., "server", "field").
        entity: &'static str,
        id: String,
    },

    /// An action that needs the configuration modal ran without one.
    #[error("no configuration modal is open")]
    NoModalOpen,

    /// Operation conflicts with current state (loading, already submitting).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The form rejected the input or the submission.
    #[error("validation failed: {0}")]
    Validation(#[from] FormError),

    /// The backend accepted the submission but could not install the server.
    #[error("{server_id} failed to install")]
    InstallationFailed { server_id: String },

    /// A synchronized mutation failed.
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// A direct registry call (refresh, detail, search) failed.
    #[error(transparent)]
    Registry(#[from] RegistryPortError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message() {
        let err = GuiError::from(FormError::MissingRequired {
            field: "apiKey".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "validation failed: Required field 'apiKey' is missing or empty"
        );
    }

    #[test]
    fn test_registry_errors_are_transparent() {
        let err = GuiError::from(RegistryPortError::network("offline"));
        assert_eq!(err.to_string(), "Network error: offline");
    }
}
