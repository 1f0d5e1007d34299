//! Shared CLI presentation utilities.
//!
//! # Guidelines
//!
//! - Keep this module format-only: no domain transforms
//! - View models come from `capdeck-gui`; this module only prints them

pub mod server_display;
pub mod tables;

pub use server_display::{print_catalog, print_modal, print_outcome, print_search_page};
pub use tables::{print_json, print_separator, truncate_string};
