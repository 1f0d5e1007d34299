//! Catalog command handler.

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::handlers::load_active_or_warn;
use crate::presentation::{print_catalog, print_json};

/// Print the catalog partitioned by membership in the active set.
pub async fn execute(ctx: &CliContext, search: Option<&str>) -> Result<()> {
    load_active_or_warn(ctx).await;

    let controller = ctx.controller();
    controller.open_dropdown();
    if let Some(query) = search {
        controller.set_search(query);
    }

    let view = controller.view();
    controller.close_dropdown();

    if ctx.json {
        return print_json(&view);
    }
    print_catalog(&view.summary, &view.items);
    Ok(())
}
