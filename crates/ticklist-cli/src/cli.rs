use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ticklist_core::todos::{Category, Priority};
use ticklist_manager::{CategoryFilter, StatusFilter};

/// CLI surface definition.
#[derive(Parser, Debug)]
#[command(
    name = "ticklist",
    about = "Small local todo list with filters, search, and JSON export",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Answer "yes" to every confirmation prompt.
    #[arg(short = 'y', long = "yes", global = true)]
    pub assume_yes: bool,

    /// Optional subcommand; defaults to launching the TUI when absent.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Launch the interactive TUI (press q or Esc to exit).
    Tui,
    /// Add a todo to the top of the list.
    Add {
        /// Todo text (words are joined with spaces).
        #[arg(required = true)]
        text: Vec<String>,
        #[arg(short, long)]
        category: Option<Category>,
        #[arg(short, long)]
        priority: Option<Priority>,
    },
    /// List todos, newest first.
    #[command(alias = "ls")]
    List {
        /// all, active, or completed.
        #[arg(long, default_value = "all")]
        status: StatusFilter,
        /// all or a category name.
        #[arg(short, long, default_value = "all")]
        category: CategoryFilter,
        /// Case-insensitive text search.
        #[arg(short, long)]
        search: Option<String>,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Flip a todo between active and completed.
    #[command(alias = "done")]
    Toggle {
        /// Todo id or a unique prefix of it.
        id: String,
    },
    /// Replace a todo's text (and optionally its category).
    Edit {
        id: String,
        #[arg(required = true)]
        text: Vec<String>,
        #[arg(short, long)]
        category: Option<Category>,
    },
    /// Change a todo's priority.
    Priority { id: String, priority: Priority },
    /// Delete a todo.
    #[command(alias = "delete")]
    Rm { id: String },
    /// Delete every completed todo.
    ClearCompleted,
    /// Delete every todo.
    ClearAll,
    /// Show counts by state, category, and priority.
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Write all todos to a dated JSON file.
    Export {
        /// Target file or directory (defaults to `todos-<date>.json` in the current directory).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace all todos with the contents of a JSON export.
    Import { path: PathBuf },
    /// Print version and exit.
    Version,
    /// Run a health check against core subsystems (storage, config).
    Health,
    /// Manage CLI configuration.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Create a default config file if one does not exist.
    Init,
}
