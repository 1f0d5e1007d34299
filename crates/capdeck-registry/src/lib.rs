//! HTTP adapter for capdeck.
//!
//! Implements `capdeck_core::RegistryPort` against two services:
//!
//! - the backend that owns the active set (`GET {backend}/tools`,
//!   `POST {backend}/tools/servers/update`)
//! - the server registry (`GET {registry}/servers/{name}` and
//!   `GET {registry}/servers?q=` for discovery)
//!
//! Requests go through an internal `HttpBackend` so the client logic is
//! tested against canned responses. Nothing is retried or cached here; every
//! failure is mapped to a `RegistryPortError` and returned.
//!
//! # Example
//!
//! ```no_run
//! use capdeck_registry::{DefaultRegistryClient, RegistryClientConfig};
//!
//! let config = RegistryClientConfig::new().with_backend_url("http://localhost:8000");
//! let client = DefaultRegistryClient::new(&config).expect("valid config");
//! ```

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]
// DefaultRegistryClient is meant to be used through the RegistryPort trait,
// not its internal generic structure
#![allow(private_interfaces)]

mod client;
mod config;
mod error;
mod http;
mod models;
mod parsing;
mod port;
mod url;

// ============================================================================
// Public API
// ============================================================================

// Client
pub use client::DefaultRegistryClient;

// Configuration
pub use config::RegistryClientConfig;

// Silence unused dev-dependency warnings
#[cfg(test)]
use tokio_test as _;
