//! Taskboard CLI - a kanban board kept as JSON files in `.kanban/`.
//!
//! Commands:
//! - `taskboard init <name>`: Create a board with To Do, Doing and Done
//! - `taskboard show`: Show the board
//! - `taskboard column add <id> <name>`: Add a column on the right
//! - `taskboard column move <id> <index>`: Move a column
//! - `taskboard task add <title>`: Add a task at the bottom of a column
//! - `taskboard task move <id> <column>`: Move a task
//! - `taskboard activity`: List task moves between columns
//!
//! Environment variables:
//! - TASKBOARD_RANK_BASE, TASKBOARD_WRITE_MODE, TASKBOARD_ROLLBACK,
//!   TASKBOARD_NOTICE_TTL_MS, TASKBOARD_ACTOR: override `.kanban/config.*`
//! - RUST_LOG: log filter when `--debug` is not given
//!
//! Exit codes:
//! - 0: Success
//! - 1: Error

use clap::Parser;
use tracing_subscriber::EnvFilter;

use taskboard::{commands, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing with appropriate level
    let filter = if cli.debug {
        EnvFilter::new("taskboard=debug,taskboard_kanban=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match commands::run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };

    std::process::exit(exit_code);
}
