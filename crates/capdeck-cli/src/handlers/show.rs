//! Show command handler.

use anyhow::{Result, bail};

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::handlers::load_active_or_warn;
use crate::presentation::{print_json, print_modal};

/// Print the configuration form for `id` without submitting anything.
///
/// Active servers are shown in edit mode, others in add mode.
pub async fn execute(ctx: &CliContext, id: &str) -> Result<()> {
    load_active_or_warn(ctx).await;

    let controller = ctx.controller();
    let is_active = controller.view().sync.contains(id);
    let opened = if is_active {
        controller.open_edit(id).await
    } else {
        controller.open_add(id).await
    };
    controller.close_modal();

    let Some(view) = opened.map_err(CliError::from)? else {
        bail!("Form for {id} was superseded before it loaded");
    };

    if ctx.json {
        return print_json(&view);
    }
    print_modal(&view);
    Ok(())
}
