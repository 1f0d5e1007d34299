//! Command handlers that drive the selection controller.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<()>`
//! - Thin wrappers that:
//!   1. Parse/validate CLI-specific input
//!   2. Call `SelectionController` methods
//!   3. Format output for the terminal
//!
//! Handlers should NOT:
//! - Call the registry or the synchronizer directly
//! - Contain business logic

pub mod active;
pub mod catalog;
pub mod configure;
pub mod remove;
pub mod search;
pub mod show;

use tracing::warn;

use crate::bootstrap::CliContext;

/// Load the active set. A failure is reported but not fatal; the list is
/// then rendered with every server under "Available".
pub(crate) async fn load_active_or_warn(ctx: &CliContext) {
    if let Err(e) = ctx.controller().refresh().await {
        warn!(error = %e, "Could not load active servers");
        eprintln!("Could not load active servers: {e}");
        eprintln!("Run the command again to retry.");
    }
}
