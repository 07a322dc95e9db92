//! Taskboard command-line interface

pub mod cli;
pub mod commands;
pub mod table;

pub use cli::{Cli, ColumnAction, Commands, RankBaseArg, TaskAction};
