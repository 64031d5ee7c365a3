use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use quotes_core::config::SyncSettings;
use quotes_core::remote::HttpRemoteSource;
use quotes_core::services::QuoteLibrary;
use quotes_core::sync::SyncOrchestrator;
use quotes_core::util::truncate_with_ellipsis;
use quotes_core::{Conflict, ConflictStatus, Quote};
use serde::Serialize;

use crate::error::CliError;
use crate::notifier::ConsoleNotifier;

const CONFLICT_TEXT_PREVIEW_CHARS: usize = 60;

#[derive(Debug, Serialize)]
pub struct ConflictListItem {
    pub index: usize,
    pub id: String,
    pub text: String,
    pub local_category: String,
    pub server_category: String,
    pub status: &'static str,
}

pub fn conflict_to_item(index: usize, conflict: &Conflict) -> ConflictListItem {
    ConflictListItem {
        index,
        id: conflict.id.clone(),
        text: conflict.text.clone(),
        local_category: conflict.local_category.clone(),
        server_category: conflict.server_category.clone(),
        status: conflict_status_label(conflict.status),
    }
}

pub const fn conflict_status_label(status: ConflictStatus) -> &'static str {
    match status {
        ConflictStatus::Pending => "pending",
        ConflictStatus::ConfirmedServer => "server",
        ConflictStatus::ConfirmedLocal => "local",
    }
}

pub fn format_quote_lines(quotes: &[Quote]) -> Vec<String> {
    let width = quotes
        .iter()
        .map(|quote| quote.category.chars().count())
        .max()
        .unwrap_or(0);

    quotes
        .iter()
        .map(|quote| format!("{:<width$}  {}", quote.category, quote.text))
        .collect()
}

pub fn format_conflict_lines(conflicts: &[(usize, Conflict)]) -> Vec<String> {
    conflicts
        .iter()
        .map(|(index, conflict)| {
            format!(
                "[{index}] {:<7}  \"{}\"  local={} server={}",
                conflict_status_label(conflict.status),
                truncate_with_ellipsis(&conflict.text, CONFLICT_TEXT_PREVIEW_CHARS),
                conflict.local_category,
                conflict.server_category
            )
        })
        .collect()
}

pub fn resolve_db_path(cli_db_path: Option<PathBuf>) -> PathBuf {
    cli_db_path
        .or_else(|| env::var_os("QUOTES_DB_PATH").map(PathBuf::from))
        .unwrap_or_else(default_db_path)
}

pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quotes")
        .join("quotes.db")
}

pub fn open_library(path: &Path) -> Result<QuoteLibrary, CliError> {
    Ok(QuoteLibrary::open_path(path, Arc::new(ConsoleNotifier))?)
}

pub fn open_orchestrator(
    settings: &SyncSettings,
    path: &Path,
) -> Result<SyncOrchestrator<HttpRemoteSource>, CliError> {
    let library = open_library(path)?;
    Ok(SyncOrchestrator::from_settings(library, settings.clone())?)
}
