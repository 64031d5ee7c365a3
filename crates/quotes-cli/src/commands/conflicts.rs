use std::path::Path;

use quotes_core::Resolution;

use crate::commands::common::{conflict_to_item, format_conflict_lines, open_library};
use crate::error::CliError;

pub async fn run_conflicts_list(
    include_resolved: bool,
    as_json: bool,
    db_path: &Path,
) -> Result<(), CliError> {
    let library = open_library(db_path)?;
    let conflicts = if include_resolved {
        library
            .conflicts()
            .await
            .into_iter()
            .enumerate()
            .collect::<Vec<_>>()
    } else {
        library.unresolved_conflicts().await
    };

    if as_json {
        let json_items = conflicts
            .iter()
            .map(|(index, conflict)| conflict_to_item(*index, conflict))
            .collect::<Vec<_>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
        return Ok(());
    }

    if conflicts.is_empty() {
        println!("No conflicts to review.");
        return Ok(());
    }

    for line in format_conflict_lines(&conflicts) {
        println!("{line}");
    }
    Ok(())
}

pub async fn run_conflicts_resolve(
    index: usize,
    resolution: Resolution,
    db_path: &Path,
) -> Result<(), CliError> {
    let library = open_library(db_path)?;
    library
        .resolve_conflict(index, resolution)
        .await
        .ok_or(CliError::ConflictNotFound(index))?;
    Ok(())
}

pub async fn run_conflicts_purge(db_path: &Path) -> Result<(), CliError> {
    let library = open_library(db_path)?;
    let removed = library.purge_resolved_conflicts().await;
    tracing::debug!(removed, "Purged resolved conflicts");
    Ok(())
}
