//! InitBoard command

use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::store::BoardStore;
use crate::types::{Board, RankBase};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult, Operation};

/// Initialize a new kanban board
#[operation(
    verb = "init",
    noun = "board",
    description = "Initialize a new kanban board"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct InitBoard {
    /// The board name
    pub name: String,
    /// Optional board description
    pub description: Option<String>,
    /// Rank convention; the configured one when unset
    pub rank_base: Option<RankBase>,
}

impl InitBoard {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            rank_base: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_rank_base(mut self, rank_base: RankBase) -> Self {
        self.rank_base = Some(rank_base);
        self
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for InitBoard {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result = async {
            ctx.create_directories().await?;
            let _lock = ctx.lock().await?;

            if ctx.is_initialized() {
                return Err(KanbanError::AlreadyExists {
                    path: ctx.root().to_path_buf(),
                });
            }

            let mut board = Board::new(&self.name)
                .with_rank_base(self.rank_base.unwrap_or(ctx.config().rank_base));
            if let Some(desc) = &self.description {
                board = board.with_description(desc);
            }
            board.validate()?;

            ctx.write_board(&board).await?;
            for column in board.default_columns() {
                ctx.write_column(&column).await?;
            }

            Ok(serde_json::to_value(ctx.load_board().await?)?)
        }
        .await;

        let duration_ms = start.elapsed().as_millis() as u64;
        ExecutionResult::journaled(self.op_string(), input, result, duration_ms)
    }
}
