//! Turning form values into a submittable launch config.

use serde_json::{Map, Value};

use super::error::FormError;
use super::state::ConfigFormState;
use crate::domain::LaunchConfig;

/// Keys stripped from every submission.
pub const SUBMISSION_EXCLUDED_KEYS: &[&str] = &["command", "args", "id", "name", "qualifiedName"];

/// Drop excluded keys and empty values (`null`, blank strings, empty arrays
/// and objects). `false` and `0` are kept.
pub fn filter_submission(values: &Map<String, Value>) -> Map<String, Value> {
    values
        .iter()
        .filter(|(key, _)| !SUBMISSION_EXCLUDED_KEYS.contains(&key.as_str()))
        .filter(|(_, value)| !is_empty_value(value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

impl ConfigFormState {
    /// The filtered configuration map, checked against required fields.
    pub fn submission(&self) -> Result<Map<String, Value>, FormError> {
        let filtered = filter_submission(self.values());
        let missing = self
            .fields()
            .iter()
            .filter(|f| f.required)
            .filter(|f| !SUBMISSION_EXCLUDED_KEYS.contains(&f.name.as_str()))
            .find(|f| !filtered.contains_key(&f.name));
        match missing {
            Some(field) => Err(FormError::MissingRequired {
                field: field.name.clone(),
            }),
            None => Ok(filtered),
        }
    }
}

/// Validate the form and wrap its payload in the launch command for
/// `qualified_name`.
pub fn build_submission(
    form: &ConfigFormState,
    qualified_name: &str,
    cli_package: &str,
) -> Result<LaunchConfig, FormError> {
    let config = form.submission()?;
    Ok(LaunchConfig::for_server(cli_package, qualified_name, &config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConfigSchema, DEFAULT_CLI_PACKAGE};
    use crate::forms::derive_fields;
    use serde_json::json;

    fn api_key_schema() -> ConfigSchema {
        serde_json::from_value(json!({
            "properties": {
                "apiKey": {"type": "string"},
                "enabled": {"type": "boolean"}
            },
            "required": ["apiKey"]
        }))
        .unwrap()
    }

    #[test]
    fn test_filter_strips_internal_keys_and_empties() {
        let values = json!({
            "command": "npx",
            "args": ["-y"],
            "id": 1,
            "name": "srv",
            "qualifiedName": "@a/b",
            "blank": "   ",
            "none": null,
            "list": [],
            "obj": {},
            "flag": false,
            "zero": 0,
            "kept": "value"
        });
        let filtered = filter_submission(values.as_object().unwrap());
        assert_eq!(
            Value::Object(filtered),
            json!({"flag": false, "zero": 0, "kept": "value"})
        );
    }

    #[test]
    fn test_required_field_empty_is_rejected() {
        let mut form = derive_fields(Some(&api_key_schema()), &Map::new());
        form.set_value("apiKey", json!("")).unwrap();

        let err = build_submission(&form, "@acme/search", DEFAULT_CLI_PACKAGE).unwrap_err();
        assert_eq!(
            err,
            FormError::MissingRequired {
                field: "apiKey".to_string()
            }
        );
    }

    #[test]
    fn test_filled_submission_keeps_boolean_and_string() {
        let mut form = derive_fields(Some(&api_key_schema()), &Map::new());
        form.set_value("apiKey", json!("xyz")).unwrap();
        form.set_value("enabled", json!(true)).unwrap();

        assert_eq!(
            Value::Object(form.submission().unwrap()),
            json!({"apiKey": "xyz", "enabled": true})
        );
    }

    #[test]
    fn test_round_trip_through_launch_config() {
        let schema: ConfigSchema = serde_json::from_value(json!({
            "properties": {
                "token": {"type": "string"},
                "quote": {"type": "string"},
                "depth": {"type": "number"},
                "verbose": {"type": "boolean"}
            },
            "required": ["token"]
        }))
        .unwrap();

        let mut form = derive_fields(Some(&schema), &Map::new());
        form.set_value("token", json!("t-123")).unwrap();
        form.set_value("quote", json!("he said \"hi\"")).unwrap();
        form.set_value("depth", json!(2.5)).unwrap();
        form.set_value("verbose", json!(true)).unwrap();

        let launch = build_submission(&form, "@acme/deep", "@pkg/cli@1").unwrap();
        assert_eq!(launch.decode_config(), Some(filter_submission(form.values())));
        assert_eq!(launch.args[1], "@pkg/cli@1");
        assert_eq!(launch.qualified_name(), Some("@acme/deep"));
    }

    #[test]
    fn test_required_internal_name_does_not_block_submission() {
        let schema: ConfigSchema = serde_json::from_value(json!({
            "properties": {"name": {"type": "string"}},
            "required": ["name"]
        }))
        .unwrap();
        let mut form = derive_fields(Some(&schema), &Map::new());
        form.set_value("name", json!("ignored")).unwrap();

        assert!(form.submission().unwrap().is_empty());
    }
}
