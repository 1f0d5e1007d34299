//! Add and edit command handlers.
//!
//! Both open the configuration modal, apply `--set key=value` assignments
//! through the form engine and submit. Values are coerced to each field's
//! type (`--set enabled=yes` becomes `true`).

use anyhow::{Result, bail};
use capdeck_gui::{GuiError, ModalMode};
use serde_json::json;
use tracing::debug;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::handlers::load_active_or_warn;
use crate::presentation::{print_json, print_modal, print_outcome};

/// Split a `key=value` assignment. The value may be empty or contain `=`.
pub fn parse_assignment(raw: &str) -> Result<(String, String), CliError> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(CliError::Arguments(format!(
            "expected KEY=VALUE, got '{raw}'"
        ))),
    }
}

/// Execute `add` or `edit` for `id`.
pub async fn execute(ctx: &CliContext, mode: ModalMode, id: &str, assignments: &[String]) -> Result<()> {
    let assignments = assignments
        .iter()
        .map(|raw| parse_assignment(raw))
        .collect::<Result<Vec<_>, _>>()?;

    load_active_or_warn(ctx).await;

    let controller = ctx.controller();
    let opened = match mode {
        ModalMode::Add => controller.open_add(id).await,
        ModalMode::Edit => controller.open_edit(id).await,
    };
    let Some(view) = opened.map_err(CliError::from)? else {
        bail!("Form for {id} was superseded before it loaded");
    };
    if let Some(error) = &view.schema_error {
        eprintln!("Configuration schema unavailable ({error}); submitting without it.");
    }

    for (key, value) in &assignments {
        debug!(server_id = %id, field = %key, "Applying assignment");
        if let Err(e) = controller.set_field_raw(key, value) {
            controller.close_modal();
            return Err(CliError::from(e).into());
        }
    }

    match controller.submit().await {
        Ok(outcome) => {
            if ctx.json {
                return print_json(&json!({
                    "serverId": id,
                    "result": &outcome.result,
                    "active": &outcome.active,
                }));
            }
            print_outcome(&outcome);
            Ok(())
        }
        Err(e) => {
            if !ctx.json {
                if let (GuiError::Validation(_), Some(view)) = (&e, controller.modal()) {
                    print_modal(&view);
                }
            }
            controller.close_modal();
            Err(CliError::from(e).into())
        }
    }
}
