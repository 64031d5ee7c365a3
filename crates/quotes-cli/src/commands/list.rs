use std::path::Path;

use quotes_core::repository::ALL_CATEGORIES;

use crate::commands::common::{format_quote_lines, open_library};
use crate::error::CliError;

pub async fn run_list(category: Option<&str>, as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let library = open_library(db_path)?;
    let quotes = library.quotes_in(category.unwrap_or(ALL_CATEGORIES)).await;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&quotes)?);
    } else {
        for line in format_quote_lines(&quotes) {
            println!("{line}");
        }
    }

    Ok(())
}
