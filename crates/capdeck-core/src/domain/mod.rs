//! Domain types for capability servers.
//!
//! These types are shared between the registry adapter, the GUI facade and
//! the CLI. Wire names follow the registry's camelCase JSON.

mod catalog;
pub mod launch;
mod mutation;
mod server;

pub use catalog::{Catalog, CatalogError};
pub use launch::{DEFAULT_CLI_PACKAGE, LAUNCH_COMMAND, LaunchConfig};
pub use mutation::{ActiveSet, MutationRequest, MutationResult};
pub use server::{
    ConfigSchema, Connection, SchemaProperty, ServerDescriptor, ServerDetail, ServerSearchPage,
    UseCountTier,
};
