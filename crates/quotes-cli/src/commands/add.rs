use std::path::Path;

use quotes_core::config::SyncSettings;

use crate::commands::common::{open_library, open_orchestrator};
use crate::error::CliError;

pub async fn run_add(
    text: &str,
    category: &str,
    settings: &SyncSettings,
    db_path: &Path,
) -> Result<(), CliError> {
    let orchestrator = open_orchestrator(settings, db_path)?;
    let published = orchestrator.add_and_publish(text, category).await?;

    println!("{}", published.quote);
    Ok(())
}

pub async fn run_add_local(text: &str, category: &str, db_path: &Path) -> Result<(), CliError> {
    let library = open_library(db_path)?;
    let quote = library.add_quote(text, category).await?;

    println!("{quote}");
    Ok(())
}
