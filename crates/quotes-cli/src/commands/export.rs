use std::path::{Path, PathBuf};

use quotes_core::export::EXPORT_FILE_NAME;

use crate::commands::common::open_library;
use crate::error::CliError;

pub async fn run_export(output_path: Option<&Path>, db_path: &Path) -> Result<(), CliError> {
    let library = open_library(db_path)?;
    let rendered = library.export_json().await?;

    if let Some(path) = output_path {
        let path = export_target(path);
        std::fs::write(&path, rendered)?;
        println!("{}", path.display());
    } else {
        println!("{rendered}");
    }

    Ok(())
}

/// A directory target receives the default export file name
pub fn export_target(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(EXPORT_FILE_NAME)
    } else {
        path.to_path_buf()
    }
}
