//! Form validation errors.

use thiserror::Error;

/// Errors raised while editing or submitting a configuration form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// A required field is missing or empty after filtering.
    #[error("Required field '{field}' is missing or empty")]
    MissingRequired {
        /// Name of the offending field.
        field: String,
    },

    /// The form has no field with this name.
    #[error("Unknown configuration field '{field}'")]
    UnknownField {
        /// The name that was looked up.
        field: String,
    },

    /// The value does not fit the field's type.
    #[error("Invalid value for '{field}': expected {expected}, got {value}")]
    InvalidValue {
        /// Name of the field.
        field: String,
        /// Human-readable expected type.
        expected: &'static str,
        /// The rejected input.
        value: String,
    },
}
