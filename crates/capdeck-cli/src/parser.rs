//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use clap::Parser;

use capdeck_core::Settings;

use crate::commands::Commands;

/// Command-line interface for managing a backend's active capability servers.
///
/// Global options override the `CAPDECK_*` environment variables.
#[derive(Parser)]
#[command(name = "capdeck")]
#[command(about = "Pick, configure and remove capability servers on a running backend")]
#[command(version)]
pub struct Cli {
    /// Base URL of the backend that owns the active set
    #[arg(long = "backend-url", global = true)]
    pub backend_url: Option<String>,

    /// Base URL of the server registry
    #[arg(long = "registry-url", global = true)]
    pub registry_url: Option<String>,

    /// Bearer token for the active-set endpoint
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[arg(long = "timeout", global = true)]
    pub timeout_secs: Option<u64>,

    /// Catalog JSON file to use instead of the bundled one
    #[arg(long, global = true)]
    pub catalog: Option<String>,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Settings layer made of the flags that were passed.
    pub fn settings_overrides(&self) -> Settings {
        Settings {
            backend_url: self.backend_url.clone(),
            registry_url: self.registry_url.clone(),
            token: self.token.clone(),
            timeout_secs: self.timeout_secs,
            cli_package: None,
            catalog_path: self.catalog.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_args() {
        let cli = Cli::parse_from([
            "capdeck",
            "active",
            "--verbose",
            "--backend-url",
            "http://127.0.0.1:9000",
            "--timeout",
            "5",
        ]);
        assert!(cli.verbose);

        let overrides = cli.settings_overrides();
        assert_eq!(overrides.backend_url.as_deref(), Some("http://127.0.0.1:9000"));
        assert_eq!(overrides.timeout_secs, Some(5));
        assert!(overrides.registry_url.is_none());
    }
}
