//! AddTask command

use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::store::BoardStore;
use crate::types::{ColumnId, Task};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult, Operation};

/// Add a new task at the bottom of a column
#[operation(
    verb = "add",
    noun = "task",
    description = "Create a new task at the bottom of a column"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct AddTask {
    /// The task title (required)
    pub title: String,
    /// Target column; the leftmost column when unset
    pub column: Option<ColumnId>,
    pub description: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub assignees: Vec<String>,
}

impl AddTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            column: None,
            description: None,
            labels: Vec::new(),
            assignees: Vec::new(),
        }
    }

    pub fn in_column(mut self, column: impl Into<ColumnId>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_assignees(mut self, assignees: Vec<String>) -> Self {
        self.assignees = assignees;
        self
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for AddTask {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result = async {
            let _lock = ctx.lock().await?;
            let state = ctx.load_board().await?;

            let lane = match &self.column {
                Some(id) => state
                    .lane(id)
                    .ok_or_else(|| KanbanError::ColumnNotFound { id: id.to_string() })?,
                None => state.columns.first().ok_or_else(|| {
                    KanbanError::invalid_value("column", "board has no columns")
                })?,
            };

            let order = state
                .board
                .rank_base
                .next_after(lane.tasks.iter().map(|t| t.order));

            let mut task = Task::new(self.title.clone(), lane.column.id.clone(), order)
                .with_labels(self.labels.clone())
                .with_assignees(self.assignees.clone());
            if let Some(desc) = &self.description {
                task = task.with_description(desc);
            }
            task.validate()?;

            ctx.write_task(&task).await?;
            Ok(serde_json::to_value(&task)?)
        }
        .await;

        let duration_ms = start.elapsed().as_millis() as u64;
        ExecutionResult::journaled(self.op_string(), input, result, duration_ms)
    }
}
