//! AddColumn command

use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::types::{Column, ColumnId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult, Operation};

/// Add a new column to the right end of the board
#[operation(
    verb = "add",
    noun = "column",
    description = "Add a new column to the board"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct AddColumn {
    /// The column ID (slug)
    pub id: ColumnId,
    /// The column display name
    pub name: String,
}

impl AddColumn {
    pub fn new(id: impl Into<ColumnId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for AddColumn {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result = async {
            let mut column = Column::new(self.id.clone(), self.name.clone(), 0);
            column.validate()?;

            let board = ctx.read_board().await?;
            let _lock = ctx.lock().await?;

            if ctx.column_exists(&self.id).await {
                return Err(KanbanError::duplicate_id("column", self.id.to_string()));
            }

            let columns = ctx.read_all_columns().await?;
            column.order = board
                .rank_base
                .next_after(columns.iter().map(|c| c.order));
            ctx.write_column(&column).await?;

            Ok(serde_json::to_value(&column)?)
        }
        .await;

        let duration_ms = start.elapsed().as_millis() as u64;
        ExecutionResult::journaled(self.op_string(), input, result, duration_ms)
    }
}
