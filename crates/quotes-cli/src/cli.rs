use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "quotes")]
#[command(about = "Keep a quote collection in sync with a remote source")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a quote and send it to the server
    #[command(alias = "new")]
    Add {
        /// Quote text
        text: String,
        /// Quote category
        #[arg(short, long)]
        category: String,
        /// Only store the quote locally
        #[arg(long)]
        no_publish: bool,
    },
    /// List quotes
    List {
        /// Only show quotes in this category
        #[arg(short, long)]
        category: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a random quote
    Random {
        /// Category filter (defaults to the last one used)
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List known categories
    Categories,
    /// Export quotes as JSON
    Export {
        /// Optional output file or directory (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Import quotes from a JSON file
    Import {
        /// JSON file holding an array of quotes
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
    /// Sync with the remote source
    Sync {
        #[command(subcommand)]
        action: Option<SyncAction>,
    },
    /// Review conflicts recorded during sync
    Conflicts {
        #[command(subcommand)]
        action: ConflictsAction,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
        /// Optional output file or directory (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum SyncAction {
    /// Sync periodically until interrupted
    Watch,
}

#[derive(Subcommand)]
pub enum ConflictsAction {
    /// List conflicts awaiting review
    List {
        /// Include resolved conflicts
        #[arg(long)]
        all: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Restore the local category for a conflict
    KeepLocal {
        /// Conflict index as shown by `conflicts list`
        index: usize,
    },
    /// Confirm the server category for a conflict
    AcceptServer {
        /// Conflict index as shown by `conflicts list`
        index: usize,
    },
    /// Remove resolved conflicts
    Purge,
}
