//! Capability server descriptors, details and configuration schemas.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Popularity bucket derived from a server's registry use count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UseCountTier {
    /// Fewer than 100 uses.
    Low,
    /// 100 to 999 uses.
    Medium,
    /// 1,000 to 9,999 uses.
    High,
    /// 10,000 uses or more.
    VeryHigh,
}

impl UseCountTier {
    /// Bucket a raw use count.
    pub const fn from_count(count: u64) -> Self {
        match count {
            0..=99 => Self::Low,
            100..=999 => Self::Medium,
            1_000..=9_999 => Self::High,
            _ => Self::VeryHigh,
        }
    }

    /// Short label for list rendering.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "<100",
            Self::Medium => "100+",
            Self::High => "1k+",
            Self::VeryHigh => "10k+",
        }
    }
}

/// Catalog entry for a capability server.
///
/// Immutable once loaded; `qualified_name` is the unique id used everywhere
/// else (active set membership, detail lookups, launch configs).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerDescriptor {
    /// Unique registry id, e.g. `@smithery-ai/brave-search`.
    pub qualified_name: String,
    /// Human-facing name. Empty when the registry did not supply one.
    #[serde(default)]
    pub display_name: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Project homepage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    /// Number of registry uses, source of [`UseCountTier`].
    #[serde(default)]
    pub use_count: u64,
}

impl ServerDescriptor {
    /// Create a descriptor with only an id and display name.
    pub fn new(qualified_name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            display_name: display_name.into(),
            description: String::new(),
            homepage: None,
            use_count: 0,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Display label, falling back to the qualified name.
    pub fn label(&self) -> &str {
        if self.display_name.trim().is_empty() {
            &self.qualified_name
        } else {
            &self.display_name
        }
    }

    /// Popularity bucket for this server.
    pub const fn use_count_tier(&self) -> UseCountTier {
        UseCountTier::from_count(self.use_count)
    }
}

/// A single page of registry search results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerSearchPage {
    pub servers: Vec<ServerDescriptor>,
    pub page: u32,
    pub total_pages: u32,
    pub total_count: u64,
}

/// Lazily fetched per-server detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerDetail {
    pub qualified_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_url: Option<String>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl ServerDetail {
    /// First connection schema that declares at least one property.
    pub fn config_schema(&self) -> Option<&ConfigSchema> {
        self.connections
            .iter()
            .filter_map(|c| c.config_schema.as_ref())
            .find(|schema| !schema.properties.is_empty())
    }
}

/// A transport the server can be reached over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    /// Transport type (`stdio`, `http`, ...).
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_schema: Option<ConfigSchema>,
}

/// The JSON-Schema subset servers use to describe their configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigSchema {
    /// Properties in declaration order.
    #[serde(default)]
    pub properties: IndexMap<String, SchemaProperty>,
    /// Names of required properties.
    #[serde(default)]
    pub required: Vec<String>,
}

impl ConfigSchema {
    /// Whether `name` is required, either through the schema's `required`
    /// list or a `required: true` marker on the property itself.
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
            || self
                .properties
                .get(name)
                .is_some_and(SchemaProperty::has_required_marker)
    }
}

/// A single schema property.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaProperty {
    /// `"string"`, `"boolean"`, ... or an array such as `["string", "null"]`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Per-property required marker. Kept as a raw value because nested
    /// object schemas use an array here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Value>,
}

impl SchemaProperty {
    /// The declared type, skipping `"null"` in union types.
    pub fn primary_type(&self) -> Option<&str> {
        match self.kind.as_ref()? {
            Value::String(s) => Some(s.as_str()),
            Value::Array(items) => items
                .iter()
                .filter_map(Value::as_str)
                .find(|t| *t != "null"),
            _ => None,
        }
    }

    fn has_required_marker(&self) -> bool {
        matches!(self.required, Some(Value::Bool(true)))
    }
}
