//! Core domain types and port definitions for capdeck.
//!
//! `capdeck-core` owns everything that does not touch the network or a
//! terminal:
//!
//! - `domain` - catalog entries, server details, config schemas, mutation
//!   requests and results
//! - `forms` - the schema-driven configuration form engine
//! - `ports` - the `RegistryPort` trait the HTTP adapter implements, plus the
//!   event emitter abstraction
//! - `services` - the `ActiveSetSynchronizer`, sole writer of the local
//!   active-set mirror
//! - `settings` - client settings and their validation
//!
//! # Architecture
//!
//! ```text
//! Adapters:   capdeck-registry (HTTP)      capdeck-cli
//!                    ↓                          ↓
//! Facade:            └────── capdeck-gui ───────┘
//!                      SelectionController
//!                               ↓
//! Core:                    capdeck-core
//! ```

#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod events;
pub mod forms;
pub mod ports;
pub mod services;
pub mod settings;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export commonly used types for convenience
pub use domain::{
    ActiveSet, Catalog, CatalogError, ConfigSchema, Connection, MutationRequest, MutationResult,
    SchemaProperty, ServerDescriptor, ServerDetail, ServerSearchPage, UseCountTier,
};
pub use events::CapabilityEvent;
pub use forms::{
    ConfigFormState, DEFAULT_CLI_PACKAGE, FieldKind, FieldSpec, FormError, LaunchConfig,
    build_submission, derive_fields, filter_submission, is_secret_field,
};
pub use ports::{
    CapabilityEventEmitter, ChannelEmitter, NoopEmitter, RegistryPort, RegistryPortError,
    RegistryPortResult,
};
pub use services::{
    ActiveSetSnapshot, ActiveSetSynchronizer, MUTATION_INTERRUPTED, MutationOutcome, REFRESH_CANCELLED,
    SyncError, SyncPhase,
};
pub use settings::{Settings, SettingsError, validate_settings};

// Silence unused dev-dependency warnings
#[cfg(test)]
use mockall as _;
#[cfg(test)]
use tokio_test as _;
