use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Generator, Shell};

use crate::cli::Cli;
use crate::error::CliError;

/// Write the completion script for `shell` to `output_path`, or stdout.
///
/// A directory target receives the file name the shell expects, e.g.
/// `_quotes` for zsh.
pub fn run_completions(shell: Shell, output_path: Option<&Path>) -> Result<(), CliError> {
    let mut command = Cli::command();
    let bin_name = command.get_name().to_string();
    let mut script = Vec::new();
    generate(shell, &mut command, &bin_name, &mut script);

    match output_path {
        Some(path) => {
            let target = completion_target(shell, &bin_name, path);
            std::fs::write(&target, &script)?;
            println!("{}", target.display());
        }
        None => io::stdout().write_all(&script)?,
    }
    Ok(())
}

pub fn completion_target(shell: Shell, bin_name: &str, path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(shell.file_name(bin_name))
    } else {
        path.to_path_buf()
    }
}
