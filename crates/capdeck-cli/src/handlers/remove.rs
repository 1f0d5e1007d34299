//! Remove command handler.

use anyhow::Result;
use serde_json::json;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::handlers::load_active_or_warn;
use crate::presentation::{print_json, print_outcome};

/// Remove each id in turn. Ids that are not active are reported and
/// skipped by the backend; that is not an error.
///
/// Stops at the first failed removal.
pub async fn execute(ctx: &CliContext, ids: &[String]) -> Result<()> {
    load_active_or_warn(ctx).await;

    let mut results = Vec::with_capacity(ids.len());
    for id in ids {
        let outcome = ctx.controller().remove(id).await.map_err(CliError::from)?;

        if ctx.json {
            results.push(json!({"serverId": id, "result": &outcome.result}));
        } else if outcome.result.removed.iter().any(|r| r == id) {
            print_outcome(&outcome);
        } else {
            println!("{id} was not active; nothing to remove.");
        }
    }

    if ctx.json {
        return print_json(&results);
    }
    Ok(())
}
