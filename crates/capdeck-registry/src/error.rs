//! Internal error types for registry operations.
//!
//! These errors are internal to `capdeck-registry` and are mapped to core
//! port errors at the boundary.

use thiserror::Error;

/// Result type alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors related to backend and registry requests.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The request never produced a response.
    #[error("Request to {url} failed: {message}")]
    Transport {
        url: String,
        message: String,
        timed_out: bool,
    },

    /// Non-2xx status. `message` is the body's `detail`, else the raw body.
    #[error("{url} returned status {status}: {message}")]
    Status {
        status: u16,
        url: String,
        message: String,
    },

    /// 2xx response whose body does not match the contract.
    #[error("Unexpected response from {url}: {message}")]
    Malformed { url: String, message: String },

    /// Detail lookup answered with a non-2xx status.
    #[error("Server '{qualified_name}' not found (status {status})")]
    DetailNotFound { qualified_name: String, status: u16 },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be built.
    #[error("HTTP client setup failed: {message}")]
    ClientSetup { message: String },
}
