//! Quotes CLI - Command-line interface for a synced quote collection
//!
//! Browse, add, import and export quotes, sync them against a remote posts
//! endpoint and review the category conflicts that sync records.

mod cli;
mod commands;
mod error;
mod notifier;

use clap::{CommandFactory, Parser};
use quotes_core::config::SyncSettings;

use crate::cli::{Cli, Commands, ConflictsAction, SyncAction};
use crate::commands::add::{run_add, run_add_local};
use crate::commands::categories::run_categories;
use crate::commands::common::resolve_db_path;
use crate::commands::completions::run_completions;
use crate::commands::conflicts::{run_conflicts_list, run_conflicts_purge, run_conflicts_resolve};
use crate::commands::export::run_export;
use crate::commands::import::run_import;
use crate::commands::list::run_list;
use crate::commands::random::run_random;
use crate::commands::sync::{run_sync, run_sync_watch};
use crate::error::CliError;

const DEFAULT_LOG_FILTER: &str = "quotes=info";

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let db_path = resolve_db_path(cli.db_path);

    match cli.command {
        Some(Commands::Add {
            text,
            category,
            no_publish,
        }) => {
            if no_publish {
                run_add_local(&text, &category, &db_path).await?;
            } else {
                let settings = SyncSettings::from_env()?;
                run_add(&text, &category, &settings, &db_path).await?;
            }
        }
        Some(Commands::List { category, json }) => {
            run_list(category.as_deref(), json, &db_path).await?;
        }
        Some(Commands::Random { category }) => run_random(category.as_deref(), &db_path).await?,
        Some(Commands::Categories) => run_categories(&db_path).await?,
        Some(Commands::Export { output }) => run_export(output.as_deref(), &db_path).await?,
        Some(Commands::Import { path }) => run_import(&path, &db_path).await?,
        Some(Commands::Sync { action }) => {
            let settings = SyncSettings::from_env()?;
            match action {
                Some(SyncAction::Watch) => run_sync_watch(&settings, &db_path).await?,
                None => run_sync(&settings, &db_path).await?,
            }
        }
        Some(Commands::Conflicts { action }) => match action {
            ConflictsAction::List { all, json } => run_conflicts_list(all, json, &db_path).await?,
            ConflictsAction::KeepLocal { index } => {
                run_conflicts_resolve(index, quotes_core::Resolution::Local, &db_path).await?;
            }
            ConflictsAction::AcceptServer { index } => {
                run_conflicts_resolve(index, quotes_core::Resolution::Server, &db_path).await?;
            }
            ConflictsAction::Purge => run_conflicts_purge(&db_path).await?,
        },
        Some(Commands::Completions { shell, output }) => {
            run_completions(shell, output.as_deref())?;
        }
        None => {
            Cli::command().print_help().map_err(CliError::Io)?;
            println!();
        }
    }

    Ok(())
}
