//! CLI entry point - the composition root.
//!
//! This is the ONLY place where infrastructure is wired together via bootstrap.
//! Command dispatch routes to handlers which drive the selection controller.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};

use capdeck_cli::{Cli, CliError, Commands, bootstrap, handlers, init_logging, resolve_settings};
use capdeck_gui::ModalMode;

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command.as_ref() else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let settings = resolve_settings(|key| std::env::var(key).ok(), cli.settings_overrides())?;
    let ctx = bootstrap(settings, cli.json)?;

    match command {
        Commands::Catalog { search } => handlers::catalog::execute(&ctx, search.as_deref()).await,
        Commands::Active => handlers::active::execute(&ctx).await,
        Commands::Show { id } => handlers::show::execute(&ctx, id).await,
        Commands::Search { query, page } => handlers::search::execute(&ctx, query, *page).await,
        Commands::Add { id, set } => {
            handlers::configure::execute(&ctx, ModalMode::Add, id, set).await
        }
        Commands::Edit { id, set } => {
            handlers::configure::execute(&ctx, ModalMode::Edit, id, set).await
        }
        Commands::Remove { ids } => handlers::remove::execute(&ctx, ids).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            let code = err.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}
