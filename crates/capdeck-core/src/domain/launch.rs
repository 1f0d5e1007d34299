//! Launch configuration wire format.
//!
//! The backend starts a capability server from a `{command, args}` pair. The
//! user's configuration travels inside `args` as one double-encoded string:
//! the field map is JSON-stringified, every `"` is escaped as `\"`, and the
//! result is wrapped in an outer pair of quotes.
//!
//! ```text
//! ["-y", "@smithery/cli@latest", "run", "@acme/search", "--config", "\"{\\\"apiKey\\\":\\\"xyz\\\"}\""]
//! ```
//!
//! This must stay byte-compatible with what the backend's launcher expects.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Executable used to launch registry servers.
pub const LAUNCH_COMMAND: &str = "npx";

/// Default launcher package passed to `npx`.
pub const DEFAULT_CLI_PACKAGE: &str = "@smithery/cli@latest";

const CONFIG_FLAG: &str = "--config";
const RUN_SUBCOMMAND: &str = "run";

/// Command/argument tuple the backend uses to start a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl LaunchConfig {
    /// Build the launch config for `qualified_name` with an already-filtered
    /// configuration map.
    pub fn for_server(cli_package: &str, qualified_name: &str, config: &Map<String, Value>) -> Self {
        Self {
            command: LAUNCH_COMMAND.to_string(),
            args: vec![
                "-y".to_string(),
                cli_package.to_string(),
                RUN_SUBCOMMAND.to_string(),
                qualified_name.to_string(),
                CONFIG_FLAG.to_string(),
                encode_config_arg(config),
            ],
        }
    }

    /// The server id following `run`, if present.
    pub fn qualified_name(&self) -> Option<&str> {
        self.arg_after(RUN_SUBCOMMAND)
    }

    /// The raw (still encoded) `--config` argument.
    pub fn config_arg(&self) -> Option<&str> {
        self.arg_after(CONFIG_FLAG)
    }

    /// Decode the embedded configuration map.
    ///
    /// Returns `None` when there is no `--config` argument or it does not
    /// decode to a JSON object.
    pub fn decode_config(&self) -> Option<Map<String, Value>> {
        self.config_arg().and_then(decode_config_arg)
    }

    fn arg_after(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }
}

/// Double-encode a configuration map into the `--config` argument.
pub fn encode_config_arg(config: &Map<String, Value>) -> String {
    let json = Value::Object(config.clone()).to_string();
    format!("\"{}\"", json.replace('"', "\\\""))
}

/// Undo [`encode_config_arg`].
pub fn decode_config_arg(arg: &str) -> Option<Map<String, Value>> {
    let inner = arg.strip_prefix('"')?.strip_suffix('"')?;
    let json = inner.replace("\\\"", "\"");
    match serde_json::from_str::<Value>(&json).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_encoding_matches_backend_example() {
        let config = map(json!({"apiKey": "your-api-key"}));
        assert_eq!(
            encode_config_arg(&config),
            r#""{\"apiKey\":\"your-api-key\"}""#
        );
    }

    #[test]
    fn test_launch_args_layout() {
        let config = map(json!({"apiKey": "xyz", "enabled": true}));
        let launch = LaunchConfig::for_server(DEFAULT_CLI_PACKAGE, "@acme/search", &config);

        assert_eq!(launch.command, "npx");
        assert_eq!(&launch.args[..5], &[
            "-y",
            "@smithery/cli@latest",
            "run",
            "@acme/search",
            "--config"
        ]);
        assert_eq!(launch.qualified_name(), Some("@acme/search"));
        assert_eq!(launch.decode_config(), Some(config));
    }

    #[test]
    fn test_decode_survives_embedded_quotes_and_backslashes() {
        let config = map(json!({"query": "say \"hi\"", "path": "C:\\tmp"}));
        let arg = encode_config_arg(&config);
        assert_eq!(decode_config_arg(&arg), Some(config));
    }

    #[test]
    fn test_decode_rejects_non_objects() {
        assert_eq!(decode_config_arg("\"[1,2]\""), None);
        assert_eq!(decode_config_arg("{\"a\":1}"), None);
        assert_eq!(decode_config_arg(""), None);
    }

    #[test]
    fn test_serializes_as_command_and_args() {
        let launch = LaunchConfig::for_server("@pkg/cli", "srv", &Map::new());
        let value = serde_json::to_value(&launch).unwrap();
        assert_eq!(value["command"], "npx");
        assert_eq!(value["args"][5], "\"{}\"");
    }
}
