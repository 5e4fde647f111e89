use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "lawpilot")]
#[command(version)]
#[command(about = "AI legal guidance on Indian law, from the terminal", long_about = None)]
pub struct Cli {
    /// SQLite file for the chat log (overrides LAWPILOT_DB_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Keep the chat log in memory only
    #[arg(long, global = true, conflicts_with = "db")]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start an interactive conversation (default)
    Chat,
    /// Print recent entries from the chat log
    History {
        /// Number of entries to show
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
}
