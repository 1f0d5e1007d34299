//! Per-edit-session form state.

use std::collections::BTreeMap;

use serde_json::{Map, Number, Value};

use super::error::FormError;
use super::field::{EXCLUDED_FIELDS, FieldKind, FieldSpec};
use super::submission::SUBMISSION_EXCLUDED_KEYS;
use crate::domain::ConfigSchema;

/// Derived state for one add/edit session.
///
/// Created when a modal opens and discarded when it closes; nothing here is
/// persisted beyond the submitted payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFormState {
    fields: Vec<FieldSpec>,
    values: Map<String, Value>,
    secret_visibility: BTreeMap<String, bool>,
}

/// Derive a form from a config schema, or from the shape of `existing` when
/// no schema (or one with neither properties nor required names) is
/// available. Required names without a property get a string field.
///
/// Values in `existing` take precedence over schema defaults, which take
/// precedence over the per-type zero value.
pub fn derive_fields(schema: Option<&ConfigSchema>, existing: &Map<String, Value>) -> ConfigFormState {
    let schema = schema.filter(|s| !s.properties.is_empty() || !s.required.is_empty());
    let fields: Vec<FieldSpec> = match schema {
        Some(schema) => {
            let mut fields: Vec<FieldSpec> = schema
                .properties
                .iter()
                .filter(|(name, _)| !is_excluded(name))
                .map(|(name, prop)| {
                    let kind = FieldKind::from_schema_type(prop.primary_type(), name);
                    let default = existing_value(existing, name, kind)
                        .or_else(|| prop.default.clone().filter(|d| kind.accepts(d) && !d.is_null()))
                        .unwrap_or_else(|| kind.zero_value());
                    FieldSpec {
                        name: name.clone(),
                        kind,
                        required: schema.is_required(name),
                        default,
                        description: prop.description.clone(),
                    }
                })
                .collect();

            // A required name without a property still needs a value.
            for name in &schema.required {
                if is_excluded(name)
                    || SUBMISSION_EXCLUDED_KEYS.contains(&name.as_str())
                    || fields.iter().any(|f| &f.name == name)
                {
                    continue;
                }
                let kind = FieldKind::for_string(name);
                fields.push(FieldSpec {
                    name: name.clone(),
                    kind,
                    required: true,
                    default: existing_value(existing, name, kind).unwrap_or_else(|| kind.zero_value()),
                    description: None,
                });
            }
            fields
        }
        None => existing
            .iter()
            .filter(|(name, _)| !is_excluded(name))
            .filter_map(|(name, value)| {
                let kind = match value {
                    Value::Bool(_) => FieldKind::Boolean,
                    Value::Number(_) => FieldKind::Number,
                    Value::String(_) => FieldKind::for_string(name),
                    _ => return None,
                };
                Some(FieldSpec {
                    name: name.clone(),
                    kind,
                    required: false,
                    default: value.clone(),
                    description: None,
                })
            })
            .collect(),
    };

    ConfigFormState::from_fields(fields)
}

fn is_excluded(name: &str) -> bool {
    EXCLUDED_FIELDS.contains(&name)
}

fn existing_value(existing: &Map<String, Value>, name: &str, kind: FieldKind) -> Option<Value> {
    existing
        .get(name)
        .filter(|v| !v.is_null() && kind.accepts(v))
        .cloned()
}

impl ConfigFormState {
    /// Build state whose values start at each field's default.
    pub fn from_fields(fields: Vec<FieldSpec>) -> Self {
        let values = fields
            .iter()
            .map(|f| (f.name.clone(), f.default.clone()))
            .collect();
        let secret_visibility = fields
            .iter()
            .filter(|f| f.kind.is_secret())
            .map(|f| (f.name.clone(), false))
            .collect();
        Self {
            fields,
            values,
            secret_visibility,
        }
    }

    /// Fields in render order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Current values keyed by field name.
    pub const fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Set a typed value. `null` clears the field.
    pub fn set_value(&mut self, name: &str, value: Value) -> Result<(), FormError> {
        let kind = self.kind_of(name)?;
        if !kind.accepts(&value) {
            return Err(FormError::InvalidValue {
                field: name.to_string(),
                expected: kind.expected(),
                value: value.to_string(),
            });
        }
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    /// Set a value from raw text input, coercing it to the field's type.
    ///
    /// Empty input clears number fields; booleans accept
    /// `true/false/yes/no/on/off/1/0`.
    pub fn set_raw_value(&mut self, name: &str, raw: &str) -> Result<(), FormError> {
        let kind = self.kind_of(name)?;
        let value = coerce_raw(kind, raw).ok_or_else(|| FormError::InvalidValue {
            field: name.to_string(),
            expected: kind.expected(),
            value: raw.to_string(),
        })?;
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    /// Flip a secret field between masked and visible. Returns the new
    /// visibility, or `None` if `name` is not a secret field.
    pub fn toggle_secret_visibility(&mut self, name: &str) -> Option<bool> {
        let visible = self.secret_visibility.get_mut(name)?;
        *visible = !*visible;
        Some(*visible)
    }

    pub fn is_secret_visible(&self, name: &str) -> bool {
        self.secret_visibility.get(name).copied().unwrap_or(false)
    }

    /// Text to render for a field, masking hidden secrets.
    pub fn display_value(&self, name: &str) -> Option<String> {
        let value = self.values.get(name)?;
        let text = match value {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let is_hidden_secret = self
            .field(name)
            .is_some_and(|f| f.kind.is_secret() && !self.is_secret_visible(name));
        if is_hidden_secret {
            Some("*".repeat(text.chars().count()))
        } else {
            Some(text)
        }
    }

    fn kind_of(&self, name: &str) -> Result<FieldKind, FormError> {
        self.field(name)
            .map(|f| f.kind)
            .ok_or_else(|| FormError::UnknownField {
                field: name.to_string(),
            })
    }
}

fn coerce_raw(kind: FieldKind, raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    match kind {
        FieldKind::Boolean => match trimmed.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(Value::Bool(true)),
            "false" | "no" | "off" | "0" => Some(Value::Bool(false)),
            _ => None,
        },
        FieldKind::Number => {
            if trimmed.is_empty() {
                Some(Value::Null)
            } else if let Ok(int) = trimmed.parse::<i64>() {
                Some(Value::from(int))
            } else {
                trimmed
                    .parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
            }
        }
        FieldKind::String | FieldKind::SecretString => Some(Value::String(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema(value: Value) -> ConfigSchema {
        serde_json::from_value(value).unwrap()
    }

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_derive_from_schema() {
        let schema = schema(json!({
            "properties": {
                "apiKey": {"type": "string", "description": "Your key"},
                "enabled": {"type": "boolean"},
                "limit": {"type": "integer", "default": 10},
                "command": {"type": "string"},
                "args": {"type": "array"}
            },
            "required": ["apiKey"]
        }));

        let form = derive_fields(Some(&schema), &Map::new());
        let names: Vec<_> = form.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["apiKey", "enabled", "limit"]);

        let api_key = form.field("apiKey").unwrap();
        assert_eq!(api_key.kind, FieldKind::SecretString);
        assert!(api_key.required);
        assert_eq!(api_key.description.as_deref(), Some("Your key"));

        assert_eq!(form.value("apiKey"), Some(&json!("")));
        assert_eq!(form.value("enabled"), Some(&json!(false)));
        assert_eq!(form.value("limit"), Some(&json!(10)));
        assert!(!form.is_secret_visible("apiKey"));
    }

    #[test]
    fn test_existing_config_takes_precedence() {
        let schema = schema(json!({
            "properties": {
                "region": {"type": "string", "default": "us"},
                "retries": {"type": "number", "default": 3}
            }
        }));
        let existing = map(json!({"region": "eu", "retries": "not-a-number"}));

        let form = derive_fields(Some(&schema), &existing);
        assert_eq!(form.value("region"), Some(&json!("eu")));
        // Type-mismatched existing values fall back to the schema default.
        assert_eq!(form.value("retries"), Some(&json!(3)));
    }

    #[test]
    fn test_derive_from_existing_shape_without_schema() {
        let existing = map(json!({
            "command": "npx",
            "args": ["-y"],
            "debug": true,
            "port": 8080,
            "GITHUB_TOKEN": "ghp_x",
            "owner": "acme",
            "nested": {"a": 1}
        }));

        let form = derive_fields(None, &existing);
        let kinds: Vec<_> = form
            .fields()
            .iter()
            .map(|f| (f.name.as_str(), f.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("debug", FieldKind::Boolean),
                ("port", FieldKind::Number),
                ("GITHUB_TOKEN", FieldKind::SecretString),
                ("owner", FieldKind::String),
            ]
        );
        assert!(form.fields().iter().all(|f| !f.required));
        assert_eq!(form.value("port"), Some(&json!(8080)));
    }

    #[test]
    fn test_required_name_without_property_gets_a_field() {
        let schema = schema(json!({
            "properties": {"region": {"type": "string"}},
            "required": ["region", "accessToken", "qualifiedName", "command"]
        }));

        let form = derive_fields(Some(&schema), &map(json!({"accessToken": "t-1"})));
        let names: Vec<_> = form.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["region", "accessToken"]);

        let token = form.field("accessToken").unwrap();
        assert!(token.required);
        assert_eq!(token.kind, FieldKind::SecretString);
        assert_eq!(form.value("accessToken"), Some(&json!("t-1")));
    }

    #[test]
    fn test_required_only_schema_is_enforced() {
        let schema = schema(json!({"required": ["apiKey"]}));
        let mut form = derive_fields(Some(&schema), &Map::new());

        assert_eq!(
            form.submission().unwrap_err(),
            FormError::MissingRequired {
                field: "apiKey".to_string()
            }
        );
        form.set_value("apiKey", json!("xyz")).unwrap();
        assert_eq!(Value::Object(form.submission().unwrap()), json!({"apiKey": "xyz"}));
    }

    #[test]
    fn test_empty_schema_falls_back_to_existing() {
        let empty = ConfigSchema::default();
        let form = derive_fields(Some(&empty), &map(json!({"owner": "acme"})));
        assert_eq!(form.fields().len(), 1);
    }

    #[test]
    fn test_set_value_validates_type() {
        let schema = schema(json!({"properties": {"enabled": {"type": "boolean"}}}));
        let mut form = derive_fields(Some(&schema), &Map::new());

        form.set_value("enabled", json!(true)).unwrap();
        assert_eq!(form.value("enabled"), Some(&json!(true)));

        let err = form.set_value("enabled", json!("yes")).unwrap_err();
        assert!(matches!(err, FormError::InvalidValue { .. }));

        let err = form.set_value("missing", json!(1)).unwrap_err();
        assert_eq!(
            err,
            FormError::UnknownField {
                field: "missing".to_string()
            }
        );
    }

    #[test]
    fn test_set_raw_value_coerces() {
        let schema = schema(json!({
            "properties": {
                "enabled": {"type": "boolean"},
                "ratio": {"type": "number"},
                "count": {"type": "integer"},
                "name": {"type": "string"}
            }
        }));
        let mut form = derive_fields(Some(&schema), &Map::new());

        form.set_raw_value("enabled", "Yes").unwrap();
        form.set_raw_value("ratio", "0.5").unwrap();
        form.set_raw_value("count", " 42 ").unwrap();
        form.set_raw_value("name", "  padded ").unwrap();

        assert_eq!(form.value("enabled"), Some(&json!(true)));
        assert_eq!(form.value("ratio"), Some(&json!(0.5)));
        assert_eq!(form.value("count"), Some(&json!(42)));
        assert_eq!(form.value("name"), Some(&json!("  padded ")));

        assert!(form.set_raw_value("count", "many").is_err());
        assert!(form.set_raw_value("enabled", "maybe").is_err());

        form.set_raw_value("count", "").unwrap();
        assert_eq!(form.value("count"), Some(&Value::Null));
    }

    #[test]
    fn test_secret_visibility_toggle_and_masking() {
        let schema = schema(json!({
            "properties": {"password": {"type": "string"}, "user": {"type": "string"}}
        }));
        let mut form = derive_fields(Some(&schema), &Map::new());
        form.set_raw_value("password", "hunter2").unwrap();
        form.set_raw_value("user", "bob").unwrap();

        assert_eq!(form.display_value("password").as_deref(), Some("*******"));
        assert_eq!(form.toggle_secret_visibility("password"), Some(true));
        assert_eq!(form.display_value("password").as_deref(), Some("hunter2"));
        assert_eq!(form.toggle_secret_visibility("password"), Some(false));

        assert_eq!(form.toggle_secret_visibility("user"), None);
        assert_eq!(form.display_value("user").as_deref(), Some("bob"));
    }
}
