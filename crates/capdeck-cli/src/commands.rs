//! Subcommands.

use clap::Subcommand;

/// Available commands.
///
/// Every command goes through the same selection controller a graphical
/// front end would use.
#[derive(Subcommand)]
pub enum Commands {
    /// List the catalog split into active and available servers
    Catalog {
        /// Filter by label, id or description (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,
    },

    /// List the ids of the active servers
    Active,

    /// Show a server's configuration form
    Show {
        /// Qualified server name (e.g., "@smithery-ai/brave-search")
        id: String,
    },

    /// Search the registry for servers not in the catalog
    Search {
        /// Search query
        query: String,
        /// Result page (1-based)
        #[arg(short, long, default_value = "1")]
        page: u32,
    },

    /// Add a server with the given configuration
    Add {
        /// Qualified server name
        id: String,
        /// Configuration value as key=value (repeatable)
        #[arg(short, long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
    },

    /// Change an active server's configuration
    Edit {
        /// Qualified server name
        id: String,
        /// Configuration value as key=value (repeatable)
        #[arg(short, long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
    },

    /// Remove one or more active servers
    Remove {
        /// Qualified server names
        #[arg(required = true)]
        ids: Vec<String>,
    },
}
