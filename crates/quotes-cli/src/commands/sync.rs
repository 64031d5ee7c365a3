use std::path::Path;

use quotes_core::config::SyncSettings;

use crate::commands::common::open_orchestrator;
use crate::error::CliError;

pub async fn run_sync(settings: &SyncSettings, db_path: &Path) -> Result<(), CliError> {
    let orchestrator = open_orchestrator(settings, db_path)?;

    // The failure itself was already reported through the notifier.
    let report = orchestrator
        .run_cycle()
        .await
        .map_err(|_| CliError::SyncFailed)?;

    if report.push_failures > 0 {
        println!(
            "Pushed {} of {} quotes",
            report.pushed,
            report.pushed + report.push_failures
        );
    }
    if !report.has_changes() {
        println!("Already up to date");
    }
    Ok(())
}

pub async fn run_sync_watch(settings: &SyncSettings, db_path: &Path) -> Result<(), CliError> {
    let orchestrator = open_orchestrator(settings, db_path)?;

    println!(
        "Syncing with {} every {}s (Ctrl-C to stop)",
        settings.server_url,
        settings.sync_interval.as_secs()
    );
    orchestrator
        .run_scheduled(async {
            if let Err(error) = tokio::signal::ctrl_c().await {
                tracing::warn!("Failed to listen for Ctrl-C: {error}");
            }
        })
        .await;
    Ok(())
}
