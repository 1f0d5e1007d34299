//! Schema-driven configuration forms.
//!
//! Turns a server's `ConfigSchema` (or, lacking one, the shape of an existing
//! configuration) into a typed field list, accepts user input against it, and
//! produces the filtered payload that ends up inside a [`LaunchConfig`].
//!
//! Everything here is pure and synchronous.
//!
//! [`LaunchConfig`]: crate::domain::LaunchConfig

mod error;
mod field;
mod state;
mod submission;

pub use crate::domain::launch::{DEFAULT_CLI_PACKAGE, LaunchConfig};
pub use error::FormError;
pub use field::{EXCLUDED_FIELDS, FieldKind, FieldSpec, SECRET_MARKERS, is_secret_field};
pub use state::{ConfigFormState, derive_fields};
pub use submission::{SUBMISSION_EXCLUDED_KEYS, build_submission, filter_submission};
