//! ListActivity command

use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::store::BoardStore;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// List audit events, newest first
#[operation(
    verb = "list",
    noun = "activity",
    description = "List task moves between columns, newest first"
)]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ListActivity {
    /// Maximum number of events
    pub limit: Option<usize>,
}

impl ListActivity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for ListActivity {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let result = async {
            let events = ctx.read_activity(self.limit).await?;
            Ok(serde_json::json!({
                "count": events.len(),
                "events": events,
            }))
        }
        .await;

        ExecutionResult::read_only(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ActivityEvent;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_list_activity_empty() {
        let temp = TempDir::new().unwrap();
        let ctx = KanbanContext::new(temp.path().join(".kanban"));

        let result = ListActivity::new().execute(&ctx).await.into_result().unwrap();
        assert_eq!(result["count"], 0);
    }

    #[tokio::test]
    async fn test_list_activity_limit() {
        let temp = TempDir::new().unwrap();
        let ctx = KanbanContext::new(temp.path().join(".kanban"));
        ctx.create_directories().await.unwrap();

        for to in ["y", "z", "w"] {
            let event = ActivityEvent::task_moved("T1".into(), "x".into(), to.into());
            ctx.append_activity(&event).await.unwrap();
        }

        let result = ListActivity::new()
            .with_limit(2)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(result["count"], 2);
        assert_eq!(result["events"][0]["to"], "w");
        assert_eq!(result["events"][1]["to"], "z");
    }
}
