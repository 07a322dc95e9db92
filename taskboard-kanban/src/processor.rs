//! Operation processor that journals kanban commands

use crate::context::KanbanContext;
use crate::error::KanbanError;
use serde_json::Value;
use taskboard_operations::{async_trait, Execute, OperationProcessor};
use tracing::{debug, warn};

/// Runs commands against a [`KanbanContext`] and appends their journal
/// entries to `activity/operations.jsonl`.
///
/// Journal failures never fail the command.
#[derive(Debug, Default, Clone)]
pub struct KanbanOperationProcessor {
    actor: Option<String>,
}

impl KanbanOperationProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp journal entries with `actor`
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

#[async_trait]
impl OperationProcessor<KanbanContext, KanbanError> for KanbanOperationProcessor {
    async fn process<O>(&self, operation: &O, ctx: &KanbanContext) -> Result<Value, KanbanError>
    where
        O: Execute<KanbanContext, KanbanError> + 'static,
    {
        debug!(op = %operation.op_string(), "processing operation");
        let (result, log_entry) = operation.execute(ctx).await.split();

        if let Some(mut entry) = log_entry {
            let actor = self.actor.clone().or_else(|| ctx.config().actor.clone());
            if let Some(actor) = actor {
                entry = entry.with_actor(actor);
            }
            if let Err(error) = ctx.append_journal(&entry).await {
                warn!(%error, op = %entry.op, "failed to append operation journal");
            }
        }

        result
    }
}
