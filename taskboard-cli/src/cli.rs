//! CLI definition for the taskboard command-line interface.
//!
//! Only depends on `clap` and `std`; the mapping onto engine types lives in
//! `commands`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Taskboard - a kanban board stored as JSON files in `.kanban/`.
///
/// Every move renumbers the affected columns so ranks stay contiguous, and
/// moves between columns are recorded in the activity log.
#[derive(Parser, Debug)]
#[command(name = "taskboard")]
#[command(version)]
#[command(about = "A kanban board in your repository")]
#[command(
    long_about = "Taskboard keeps a kanban board as JSON files under .kanban/ in your project.\n\n\
    Settings are read from .kanban/config.toml (or .yaml/.yml/.json) and can be \
    overridden with TASKBOARD_* environment variables, e.g. TASKBOARD_ACTOR=alice."
)]
pub struct Cli {
    /// Enable debug output to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Project directory (the board lives in <DIR>/.kanban)
    #[arg(long, global = true, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a board with To Do, Doing and Done columns
    Init {
        /// Board name
        name: String,
        /// Board description
        #[arg(long)]
        description: Option<String>,
        /// Where ranks start counting (defaults to the configured value)
        #[arg(long, value_enum)]
        rank_base: Option<RankBaseArg>,
    },

    /// Show the board, columns left to right
    Show,

    /// Manage columns
    Column {
        #[command(subcommand)]
        action: ColumnAction,
    },

    /// Manage tasks
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },

    /// List task moves between columns, newest first
    Activity {
        /// Maximum number of events
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ColumnAction {
    /// Add a column at the right end of the board
    Add {
        /// Column slug (lowercase letters, digits, '-' and '_')
        id: String,
        /// Display name
        name: String,
    },
    /// Move a column to a zero-based position
    Move {
        id: String,
        index: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum TaskAction {
    /// Add a task at the bottom of a column
    Add {
        title: String,
        /// Target column (defaults to the leftmost)
        #[arg(long)]
        column: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Label, repeatable
        #[arg(long = "label")]
        labels: Vec<String>,
    },
    /// Move a task within its column or to another one
    Move {
        id: String,
        /// Destination column
        column: String,
        /// Zero-based drop position (defaults to the bottom)
        #[arg(long)]
        index: Option<usize>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RankBaseArg {
    Zero,
    One,
}
