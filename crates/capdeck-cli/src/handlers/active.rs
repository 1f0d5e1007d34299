//! Active command handler.

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::print_json;

/// Print the ids of the active servers.
///
/// Unlike `catalog`, a failed load is an error here: there is nothing else
/// to show.
pub async fn execute(ctx: &CliContext) -> Result<()> {
    let active = ctx.controller().refresh().await.map_err(CliError::from)?;

    if ctx.json {
        return print_json(&active);
    }

    if active.is_empty() {
        println!("No servers active.");
        return Ok(());
    }
    for id in &active {
        println!("{id}");
    }
    Ok(())
}
