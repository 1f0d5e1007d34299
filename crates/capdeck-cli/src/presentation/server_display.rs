//! Terminal rendering of controller views.

use capdeck_core::{FieldKind, MutationOutcome, ServerSearchPage};
use capdeck_gui::{CatalogView, ModalMode, ModalView, ServerItem};

use super::tables::{print_separator, truncate_string};

const TABLE_WIDTH: usize = 88;
const ID_WIDTH: usize = 40;
const LABEL_WIDTH: usize = 28;

fn print_item(item: &ServerItem) {
    println!(
        "{:<id$} {:<label$} {}",
        truncate_string(item.id(), ID_WIDTH),
        truncate_string(item.descriptor.label(), LABEL_WIDTH),
        item.tier.label(),
        id = ID_WIDTH,
        label = LABEL_WIDTH,
    );
}

/// Print the "Active" and "Available" sections.
pub fn print_catalog(summary: &str, view: &CatalogView) {
    println!("{summary}");
    for (title, items) in [("Active", &view.active), ("Available", &view.available)] {
        println!();
        println!("{title} ({})", items.len());
        print_separator(TABLE_WIDTH);
        if items.is_empty() {
            println!("  (none)");
        }
        items.iter().for_each(print_item);
    }
}

fn kind_label(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Boolean => "boolean",
        FieldKind::Number => "number",
        FieldKind::String => "string",
        FieldKind::SecretString => "secret",
    }
}

/// Print a configuration form.
pub fn print_modal(view: &ModalView) {
    let title = match view.mode {
        ModalMode::Add => "Add",
        ModalMode::Edit => "Edit",
    };
    println!("{title} {} ({})", view.display_name, view.server_id);
    print_separator(TABLE_WIDTH);

    if let Some(error) = &view.schema_error {
        println!("  Configuration schema unavailable: {error}");
    }
    if view.fields.is_empty() {
        println!("  No configuration fields.");
    }
    for field in &view.fields {
        let marker = if field.required { "*" } else { " " };
        println!(
            "{marker} {:<30} {:<8} {}",
            field.name,
            kind_label(field.kind),
            field.display
        );
        if let Some(description) = &field.description {
            println!("    {}", truncate_string(description, TABLE_WIDTH - 4));
        }
    }
    if let Some(error) = &view.submit_error {
        println!();
        println!("  Error: {error}");
    }
}

/// Print one page of registry search results.
pub fn print_search_page(page: &ServerSearchPage, added: usize) {
    println!(
        "Page {} of {} ({} matches, {added} new to the catalog)",
        page.page, page.total_pages, page.total_count
    );
    print_separator(TABLE_WIDTH);
    for server in &page.servers {
        println!(
            "{:<id$} {:<label$} {}",
            truncate_string(&server.qualified_name, ID_WIDTH),
            truncate_string(server.label(), LABEL_WIDTH),
            server.use_count_tier().label(),
            id = ID_WIDTH,
            label = LABEL_WIDTH,
        );
    }
}

/// Print what a mutation did, including servers that failed to install.
pub fn print_outcome(outcome: &MutationOutcome) {
    let result = &outcome.result;
    for (label, ids) in [
        ("Added", &result.added),
        ("Updated", &result.updated),
        ("Removed", &result.removed),
        ("Failed to install", &result.installation_failed),
    ] {
        if !ids.is_empty() {
            println!("{label}: {}", ids.join(", "));
        }
    }
    if result.reload_success == Some(false) {
        println!("Warning: the backend did not reload its servers");
    }
    println!("{} active", outcome.active.len());
}
