//! Field definitions and type classification.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Properties that are transport-launch internals, never user configuration.
pub const EXCLUDED_FIELDS: &[&str] = &["command", "args"];

/// Case-insensitive name fragments that mark a string field as secret.
pub const SECRET_MARKERS: &[&str] = &["password", "token", "secret", "api_key", "apikey"];

/// Rendered type of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Boolean,
    Number,
    String,
    /// A string rendered masked, with a visibility toggle.
    SecretString,
}

impl FieldKind {
    /// Classify a string-valued field by its name.
    pub fn for_string(name: &str) -> Self {
        if is_secret_field(name) {
            Self::SecretString
        } else {
            Self::String
        }
    }

    /// Map a schema `type` to a field kind. Unknown or missing types render
    /// as (possibly secret) strings. Name-based secret classification only
    /// applies to string kinds.
    pub fn from_schema_type(schema_type: Option<&str>, name: &str) -> Self {
        match schema_type {
            Some("boolean") => Self::Boolean,
            Some("number" | "integer") => Self::Number,
            _ => Self::for_string(name),
        }
    }

    /// Value a freshly derived field starts with.
    pub fn zero_value(self) -> Value {
        match self {
            Self::Boolean => Value::Bool(false),
            Self::Number => Value::from(0),
            Self::String | Self::SecretString => Value::String(String::new()),
        }
    }

    /// Whether `value` is acceptable for this kind. `null` clears any field.
    pub const fn accepts(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (_, Value::Null)
                | (Self::Boolean, Value::Bool(_))
                | (Self::Number, Value::Number(_))
                | (Self::String | Self::SecretString, Value::String(_))
        )
    }

    pub const fn is_secret(self) -> bool {
        matches!(self, Self::SecretString)
    }

    pub const fn expected(self) -> &'static str {
        match self {
            Self::Boolean => "a boolean",
            Self::Number => "a number",
            Self::String | Self::SecretString => "a string",
        }
    }
}

/// Whether a field name carries one of the [`SECRET_MARKERS`].
pub fn is_secret_field(name: &str) -> bool {
    let lower = name.to_lowercase();
    SECRET_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// One derived form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    pub default: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_markers_case_insensitive() {
        for name in [
            "password",
            "DB_PASSWORD",
            "githubToken",
            "ACCESS_TOKEN",
            "clientSecret",
            "api_key",
            "OPENAI_API_KEY",
            "apiKey",
            "braveApiKey",
            "APIKEY",
        ] {
            assert!(is_secret_field(name), "{name} should be secret");
            assert_eq!(FieldKind::for_string(name), FieldKind::SecretString);
        }

        for name in ["username", "endpoint", "api", "key", "region"] {
            assert!(!is_secret_field(name), "{name} should not be secret");
        }
    }

    #[test]
    fn test_schema_type_mapping() {
        assert_eq!(FieldKind::from_schema_type(Some("boolean"), "x"), FieldKind::Boolean);
        assert_eq!(FieldKind::from_schema_type(Some("integer"), "x"), FieldKind::Number);
        assert_eq!(FieldKind::from_schema_type(Some("number"), "x"), FieldKind::Number);
        assert_eq!(FieldKind::from_schema_type(Some("string"), "x"), FieldKind::String);
        assert_eq!(FieldKind::from_schema_type(None, "token"), FieldKind::SecretString);
        assert_eq!(FieldKind::from_schema_type(Some("array"), "tags"), FieldKind::String);
    }

    #[test]
    fn test_secret_markers_only_apply_to_strings() {
        assert_eq!(FieldKind::from_schema_type(Some("number"), "tokenLimit"), FieldKind::Number);
        assert_eq!(FieldKind::from_schema_type(Some("integer"), "maxTokens"), FieldKind::Number);
        assert_eq!(FieldKind::from_schema_type(Some("boolean"), "useApiKey"), FieldKind::Boolean);
        assert_eq!(FieldKind::from_schema_type(Some("string"), "tokenLimit"), FieldKind::SecretString);
        assert_eq!(FieldKind::for_string("maxTokens"), FieldKind::SecretString);
    }

    #[test]
    fn test_zero_values() {
        assert_eq!(FieldKind::Boolean.zero_value(), Value::Bool(false));
        assert_eq!(FieldKind::Number.zero_value(), Value::from(0));
        assert_eq!(FieldKind::SecretString.zero_value(), Value::String(String::new()));
    }

    #[test]
    fn test_accepts() {
        assert!(FieldKind::Boolean.accepts(&Value::Bool(true)));
        assert!(!FieldKind::Boolean.accepts(&Value::from("true")));
        assert!(FieldKind::Number.accepts(&Value::from(1.5)));
        assert!(FieldKind::SecretString.accepts(&Value::from("x")));
        assert!(FieldKind::Number.accepts(&Value::Null));
    }
}
