//! MoveTask command

use crate::commit::commit_gesture;
use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::store::BoardStore;
use crate::types::{ColumnId, Gesture, TaskId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult, Operation};

/// Move a task within its column or into another one
#[operation(
    verb = "move",
    noun = "task",
    description = "Move a task to a position in the same or a different column"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct MoveTask {
    /// The task ID to move
    pub id: TaskId,
    /// Destination column
    pub column: ColumnId,
    /// Zero-based drop position; the bottom of the column when unset
    pub index: Option<usize>,
}

impl MoveTask {
    /// Move to the bottom of `column`
    pub fn to_column(id: impl Into<TaskId>, column: impl Into<ColumnId>) -> Self {
        Self {
            id: id.into(),
            column: column.into(),
            index: None,
        }
    }

    pub fn at(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for MoveTask {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result = async {
            let _lock = ctx.lock().await?;
            let state = ctx.load_board().await?;

            let (lane, from) = state
                .locate_task(&self.id)
                .ok_or_else(|| KanbanError::TaskNotFound {
                    id: self.id.to_string(),
                })?;
            let source = state.columns[lane].column.id.clone();
            let destination = state
                .lane(&self.column)
                .ok_or_else(|| KanbanError::ColumnNotFound {
                    id: self.column.to_string(),
                })?;

            // The bottom, counted without the task itself
            let bottom = if destination.column.id == source {
                destination.tasks.len() - 1
            } else {
                destination.tasks.len()
            };
            let index = self.index.unwrap_or(bottom);

            let gesture = Gesture::move_task(
                self.id.clone(),
                source,
                from,
                self.column.clone(),
                index,
            );
            let committed = commit_gesture(
                ctx,
                &gesture,
                ctx.config().write_mode,
                ctx.config().actor.as_deref(),
            )
            .await?;

            let task = committed.state.task(&self.id).cloned();
            Ok(serde_json::json!({
                "moved": committed.moved,
                "audited": committed.audited,
                "task": task,
            }))
        }
        .await;

        let duration_ms = start.elapsed().as_millis() as u64;
        ExecutionResult::journaled(self.op_string(), input, result, duration_ms)
    }
}
