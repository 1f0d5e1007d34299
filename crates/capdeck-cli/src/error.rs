//! CLI-specific error types and mappings.
//!
//! This module provides error types for the CLI adapter and mappings
//! from `GuiError` to exit codes and user-facing messages.

use capdeck_core::{RegistryPortError, SettingsError};
use capdeck_gui::GuiError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument parsing error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The backend or registry could not be reached.
    #[error("{0}")]
    Unavailable(String),

    /// The form rejected the input.
    #[error("{0}")]
    Validation(String),

    /// Any other failed action.
    #[error("{0}")]
    Action(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow sysexits.h where one fits:
    /// - 1: General error
    /// - 2: Invalid arguments
    /// - 65: Invalid input data (`EX_DATAERR`)
    /// - 69: Service unavailable (`EX_UNAVAILABLE`)
    /// - 78: Configuration error (`EX_CONFIG`)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Action(_) => 1,
            Self::Arguments(_) => 2,
            Self::Validation(_) => 65,
            Self::Unavailable(_) => 69,
            Self::Config(_) => 78,
        }
    }
}

impl From<GuiError> for CliError {
    fn from(err: GuiError) -> Self {
        let message = err.to_string();
        match err {
            GuiError::Validation(_) => Self::Validation(message),
            GuiError::Registry(RegistryPortError::Network { .. }) => Self::Unavailable(message),
            GuiError::Sync(ref sync) if matches!(sync.port_error(), RegistryPortError::Network { .. }) => {
                Self::Unavailable(message)
            }
            GuiError::Registry(RegistryPortError::Configuration { .. }) => Self::Config(message),
            _ => Self::Action(message),
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}
