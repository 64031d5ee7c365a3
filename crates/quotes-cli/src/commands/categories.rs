use std::path::Path;

use crate::commands::common::open_library;
use crate::error::CliError;

pub async fn run_categories(db_path: &Path) -> Result<(), CliError> {
    let library = open_library(db_path)?;
    for category in library.categories().await {
        println!("{category}");
    }
    Ok(())
}
