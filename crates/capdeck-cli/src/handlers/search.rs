//! Search command handler.

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::{print_json, print_search_page};

/// Query the registry and list the matching servers.
pub async fn execute(ctx: &CliContext, query: &str, page: u32) -> Result<()> {
    let discovery = ctx
        .controller()
        .discover(query, page)
        .await
        .map_err(CliError::from)?;

    if ctx.json {
        return print_json(&discovery.page);
    }
    if discovery.page.servers.is_empty() {
        println!("No servers match '{query}'.");
        return Ok(());
    }
    print_search_page(&discovery.page, discovery.added);
    Ok(())
}
