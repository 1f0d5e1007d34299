//! UI-facing facade for capdeck.
//!
//! This crate provides `SelectionController`, the state machine behind the
//! server picker: a searchable dropdown listing active and available
//! servers, and an Add/Edit modal driven by the server's config schema.
//! Front ends (the CLI, a desktop shell) render `ControllerView` and feed
//! user actions back in.
//!
//! # Architecture
//!
//! - Adapter-neutral: depends only on `capdeck-core` ports
//! - Derivations (`catalog_view`) are pure functions of catalog, active set
//!   and search text
//! - All writes to the active set go through `ActiveSetSynchronizer`

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

pub mod catalog_view;
pub mod controller;
pub mod deps;
pub mod dropdown;
pub mod error;
pub mod modal;

pub use catalog_view::{CatalogView, ServerItem, build_catalog_view, matches_search, summary_label};
pub use controller::{
    ControllerView, DISCOVERY_PAGE_SIZE, Discovery, KeyOutcome, SUBMIT_INTERRUPTED, SelectionController,
};
pub use deps::GuiDeps;
pub use dropdown::{DropdownPhase, DropdownState, Key};
pub use error::GuiError;
pub use modal::{FieldView, ModalMode, ModalView};

#[cfg(test)]
use tokio_test as _;
