//! Subcommand handlers.
//!
//! Each handler builds a kanban command, runs it through the journaling
//! processor and prints the result as a table or as JSON.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use taskboard_kanban::{
    activity::ListActivity,
    board::{GetBoard, InitBoard},
    column::{AddColumn, MoveColumn},
    task::{AddTask, MoveTask},
    ActivityEvent, BoardState, Execute, KanbanContext, KanbanError, KanbanOperationProcessor,
    OperationProcessor, RankBase,
};
use tracing::debug;

use crate::cli::{Cli, ColumnAction, Commands, RankBaseArg, TaskAction};
use crate::table;

impl From<RankBaseArg> for RankBase {
    fn from(arg: RankBaseArg) -> Self {
        match arg {
            RankBaseArg::Zero => RankBase::Zero,
            RankBaseArg::One => RankBase::One,
        }
    }
}

/// Run a parsed command line
pub async fn run(cli: Cli) -> Result<()> {
    let dir = match cli.dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("cannot determine current directory")?,
    };
    let json = cli.json;

    match cli.command {
        Commands::Init {
            name,
            description,
            rank_base,
        } => {
            let ctx = KanbanContext::open(kanban_dir(&dir))?;
            let mut cmd = InitBoard::new(name);
            if let Some(description) = description {
                cmd = cmd.with_description(description);
            }
            if let Some(rank_base) = rank_base {
                cmd = cmd.with_rank_base(rank_base.into());
            }
            let value = process(&cmd, &ctx).await?;
            if json {
                return print_json(&value);
            }
            println!("Initialized board in {}", ctx.root().display());
            print_board(&value)
        }

        Commands::Show => {
            let ctx = open(&dir)?;
            let value = process(&GetBoard, &ctx).await?;
            if json {
                return print_json(&value);
            }
            print_board(&value)
        }

        Commands::Column { action } => {
            let ctx = open(&dir)?;
            match action {
                ColumnAction::Add { id, name } => {
                    let value = process(&AddColumn::new(id, name), &ctx).await?;
                    if json {
                        return print_json(&value);
                    }
                    println!(
                        "Added column {} ({}) at rank {}",
                        value["id"].as_str().unwrap_or_default(),
                        value["name"].as_str().unwrap_or_default(),
                        value["order"]
                    );
                    Ok(())
                }
                ColumnAction::Move { id, index } => {
                    let value = process(&MoveColumn::new(id.as_str(), index), &ctx).await?;
                    if json {
                        return print_json(&value);
                    }
                    if value["moved"] == true {
                        println!("Moved column {} to position {}", id, index);
                    } else {
                        println!("Column {} is already at position {}", id, index);
                    }
                    Ok(())
                }
            }
        }

        Commands::Task { action } => {
            let ctx = open(&dir)?;
            match action {
                TaskAction::Add {
                    title,
                    column,
                    description,
                    labels,
                } => {
                    let mut cmd = AddTask::new(title).with_labels(labels);
                    if let Some(column) = column {
                        cmd = cmd.in_column(column);
                    }
                    if let Some(description) = description {
                        cmd = cmd.with_description(description);
                    }
                    let value = process(&cmd, &ctx).await?;
                    if json {
                        return print_json(&value);
                    }
                    println!(
                        "Added task {} to {}",
                        value["id"].as_str().unwrap_or_default(),
                        value["column"].as_str().unwrap_or_default()
                    );
                    Ok(())
                }
                TaskAction::Move { id, column, index } => {
                    let mut cmd = MoveTask::to_column(id.as_str(), column.as_str());
                    if let Some(index) = index {
                        cmd = cmd.at(index);
                    }
                    let value = process(&cmd, &ctx).await?;
                    if json {
                        return print_json(&value);
                    }
                    if value["moved"] == true {
                        println!(
                            "Moved task {} to {} at rank {}",
                            id, column, value["task"]["order"]
                        );
                    } else {
                        println!("Task {} did not move", id);
                    }
                    Ok(())
                }
            }
        }

        Commands::Activity { limit } => {
            let ctx = open(&dir)?;
            let mut cmd = ListActivity::new();
            if let Some(limit) = limit {
                cmd = cmd.with_limit(limit);
            }
            let value = process(&cmd, &ctx).await?;
            if json {
                return print_json(&value);
            }
            print_activity(&value)
        }
    }
}

/// Find the board at or above `dir`
fn open(dir: &Path) -> Result<KanbanContext> {
    let ctx = KanbanContext::find(dir).with_context(|| {
        format!(
            "no board found in {} or its parents; run `taskboard init <name>` first",
            dir.display()
        )
    })?;
    debug!(root = %ctx.root().display(), "using board");
    Ok(ctx)
}

async fn process<O>(operation: &O, ctx: &KanbanContext) -> Result<Value>
where
    O: Execute<KanbanContext, KanbanError> + 'static,
{
    let value = KanbanOperationProcessor::new()
        .process(operation, ctx)
        .await?;
    Ok(value)
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Columns as table columns, tasks top to bottom
fn print_board(value: &Value) -> Result<()> {
    let state: BoardState = serde_json::from_value(value.clone())?;

    println!("{}", state.board.name);
    if let Some(description) = &state.board.description {
        println!("{}", description);
    }

    let mut tbl = table::new_table();
    tbl.set_header(
        state
            .columns
            .iter()
            .map(|lane| format!("{} ({})", lane.column.name, lane.tasks.len()))
            .collect::<Vec<_>>(),
    );

    let depth = state.columns.iter().map(|l| l.tasks.len()).max().unwrap_or(0);
    for row in 0..depth {
        tbl.add_row(
            state
                .columns
                .iter()
                .map(|lane| match lane.tasks.get(row) {
                    Some(task) => format!(
                        "{}\n{}",
                        table::truncate_str(&task.title, 40),
                        task.id
                    ),
                    None => String::new(),
                })
                .collect::<Vec<_>>(),
        );
    }

    println!("{tbl}");
    Ok(())
}

fn print_activity(value: &Value) -> Result<()> {
    let events: Vec<ActivityEvent> = serde_json::from_value(value["events"].clone())?;
    if events.is_empty() {
        println!("No activity yet.");
        return Ok(());
    }

    let mut tbl = table::new_table();
    tbl.set_header(vec!["When", "Task", "From", "To", "Actor"]);
    for event in &events {
        tbl.add_row(vec![
            event.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            event.item.to_string(),
            event.from.to_string(),
            event.to.to_string(),
            event.actor.clone().unwrap_or_else(|| "-".to_string()),
        ]);
    }

    println!("{tbl}");
    Ok(())
}

/// The `.kanban` directory `taskboard init` would create under `dir`
pub fn kanban_dir(dir: &Path) -> PathBuf {
    dir.join(".kanban")
}
