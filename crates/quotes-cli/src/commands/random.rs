use std::path::Path;

use crate::commands::common::open_library;
use crate::error::CliError;

pub async fn run_random(category: Option<&str>, db_path: &Path) -> Result<(), CliError> {
    let library = open_library(db_path)?;
    let category = match category {
        Some(category) => {
            library.set_last_category(category).await?;
            category.to_string()
        }
        None => library.last_category().await,
    };

    let quote = library
        .random_quote(&category)
        .await
        .ok_or(CliError::NoQuotes(category))?;

    println!("{quote}");
    Ok(())
}
