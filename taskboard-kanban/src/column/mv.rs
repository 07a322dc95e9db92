//! MoveColumn command

use crate::commit::commit_gesture;
use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::store::BoardStore;
use crate::types::{ColumnId, Gesture};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult, Operation};

/// Move a column to a new position, renumbering the board's columns
#[operation(
    verb = "move",
    noun = "column",
    description = "Move a column to a new position on the board"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct MoveColumn {
    pub id: ColumnId,
    /// Zero-based position among the other columns
    pub index: usize,
}

impl MoveColumn {
    pub fn new(id: impl Into<ColumnId>, index: usize) -> Self {
        Self {
            id: id.into(),
            index,
        }
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for MoveColumn {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result = async {
            let _lock = ctx.lock().await?;
            let state = ctx.load_board().await?;

            let from = state
                .lane_index(&self.id)
                .ok_or_else(|| KanbanError::ColumnNotFound {
                    id: self.id.to_string(),
                })?;
            let gesture =
                Gesture::move_column(state.board.id.clone(), self.id.clone(), from, self.index);

            let committed = commit_gesture(
                ctx,
                &gesture,
                ctx.config().write_mode,
                ctx.config().actor.as_deref(),
            )
            .await?;

            Ok(serde_json::json!({
                "moved": committed.moved,
                "columns": committed
                    .state
                    .columns
                    .iter()
                    .map(|l| &l.column)
                    .collect::<Vec<_>>(),
            }))
        }
        .await;

        let duration_ms = start.elapsed().as_millis() as u64;
        ExecutionResult::journaled(self.op_string(), input, result, duration_ms)
    }
}
