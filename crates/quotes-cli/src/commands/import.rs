use std::path::Path;

use crate::commands::common::open_library;
use crate::error::CliError;

pub async fn run_import(path: &Path, db_path: &Path) -> Result<(), CliError> {
    let payload = std::fs::read_to_string(path)?;
    let library = open_library(db_path)?;
    let summary = library.import_json(&payload).await?;

    tracing::debug!(
        accepted = summary.accepted,
        added = summary.added,
        "Import finished"
    );
    Ok(())
}
