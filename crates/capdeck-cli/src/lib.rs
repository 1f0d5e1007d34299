//! Command-line front end for capdeck.
//!
//! The binary is the composition root: it resolves settings, wires the HTTP
//! registry client, the active-set synchronizer and the selection controller
//! together (`bootstrap`) and dispatches subcommands to `handlers`.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Silence unused dev-dependency warnings
#[cfg(test)]
use tokio_test as _;

// Used by the binary target only
use dotenvy as _;
use tokio as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod parser;
pub mod presentation;

// Re-export primary types for convenient access
pub use bootstrap::{CliContext, LogEmitter, bootstrap, load_catalog, resolve_settings};
pub use commands::Commands;
pub use error::CliError;
pub use logging::init_logging;
pub use parser::Cli;
