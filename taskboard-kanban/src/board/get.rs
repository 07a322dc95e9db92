//! GetBoard command

use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::store::BoardStore;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// Get the board with its columns and their tasks, in rank order
#[operation(
    verb = "get",
    noun = "board",
    description = "Retrieve the board with its columns and tasks in order"
)]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GetBoard;

#[async_trait]
impl Execute<KanbanContext, KanbanError> for GetBoard {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let result = async {
            let state = ctx.load_board().await?;
            let mut value = serde_json::to_value(&state)?;
            value["task_count"] = state.task_count().into();
            Ok(value)
        }
        .await;

        ExecutionResult::read_only(result)
    }
}
