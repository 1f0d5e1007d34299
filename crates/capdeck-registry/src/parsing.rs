//! JSON parsing functions for backend and registry responses.
//!
//! Sync functions that turn raw response bodies into core domain types.
//! Failures are returned as plain messages; the client attaches the URL.

use capdeck_core::{ActiveSet, MutationResult, ServerDescriptor, ServerDetail, ServerSearchPage};
use serde_json::Value;

use crate::models::{SearchEntry, SearchResponse, UpdateServersResponse};

/// Longest raw body excerpt carried in an error message.
const MAX_ERROR_BODY_CHARS: usize = 200;

// ============================================================================
// Error Bodies
// ============================================================================

/// Message for a non-2xx response.
///
/// Uses the body's `detail` when present (stringified if it is not a
/// string), else the raw body truncated to a readable length.
pub fn error_message(status: u16, body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        match map.get("detail") {
            Some(Value::String(detail)) => return detail.clone(),
            Some(Value::Null) | None => {}
            Some(other) => return other.to_string(),
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return format!("HTTP {status}");
    }
    truncate(trimmed, MAX_ERROR_BODY_CHARS)
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

// ============================================================================
// Backend Responses
// ============================================================================

/// The active set from `GET /tools`: the top-level keys of a JSON object.
pub fn parse_active_set(body: &str) -> Result<ActiveSet, String> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map.keys().cloned().collect()),
        Ok(other) => Err(format!("expected a JSON object, got {}", json_kind(&other))),
        Err(e) => Err(format!("invalid JSON: {e}")),
    }
}

/// The change report from `POST /tools/servers/update`.
pub fn parse_mutation_result(body: &str) -> Result<MutationResult, String> {
    let value = match serde_json::from_str::<Value>(body) {
        Ok(value @ Value::Object(_)) => value,
        Ok(other) => return Err(format!("expected a JSON object, got {}", json_kind(&other))),
        Err(e) => return Err(format!("invalid JSON: {e}")),
    };

    let response: UpdateServersResponse =
        serde_json::from_value(value).map_err(|e| format!("unexpected update response: {e}"))?;
    let changes = response.changes.unwrap_or_default();

    Ok(MutationResult {
        added: changes.added,
        updated: changes.updated,
        removed: changes.removed,
        installation_failed: changes.installation_failed,
        reload_success: response.reload_success,
        message: response.message,
    })
}

// ============================================================================
// Registry Responses
// ============================================================================

/// A server detail record. A missing `qualifiedName` is filled with the id
/// that was requested.
pub fn parse_detail(body: &str, requested: &str) -> Result<ServerDetail, String> {
    let mut map = match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => map,
        Ok(other) => return Err(format!("expected a JSON object, got {}", json_kind(&other))),
        Err(e) => return Err(format!("invalid JSON: {e}")),
    };

    if !map.get("qualifiedName").is_some_and(Value::is_string) {
        map.insert(
            "qualifiedName".to_string(),
            Value::String(requested.to_string()),
        );
    }

    serde_json::from_value(Value::Object(map)).map_err(|e| format!("unexpected server detail: {e}"))
}

fn to_descriptor(entry: SearchEntry) -> ServerDescriptor {
    ServerDescriptor {
        qualified_name: entry.qualified_name,
        display_name: entry.display_name.unwrap_or_default(),
        description: entry.description.unwrap_or_default(),
        homepage: entry.homepage,
        use_count: entry.use_count.unwrap_or(0),
    }
}

/// A page of search results. Without a `pagination` block the response is
/// treated as a single page.
pub fn parse_search_page(body: &str, requested_page: u32) -> Result<ServerSearchPage, String> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| format!("unexpected search response: {e}"))?;

    let servers: Vec<ServerDescriptor> = response.servers.into_iter().map(to_descriptor).collect();

    Ok(match response.pagination {
        Some(p) => ServerSearchPage {
            servers,
            page: p.current_page.max(1),
            total_pages: p.total_pages,
            total_count: p.total_count,
        },
        None => ServerSearchPage {
            page: requested_page.max(1),
            total_pages: u32::from(!servers.is_empty()),
            total_count: servers.len() as u64,
            servers,
        },
    })
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
