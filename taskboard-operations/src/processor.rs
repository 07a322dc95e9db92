//! Processing seam between callers and operations

use crate::Execute;
use async_trait::async_trait;
use serde_json::Value;

/// Executes operations and takes care of what happens to their journal entries.
///
/// Implementations decide where logged entries go; callers only see the
/// operation's value or error.
#[async_trait]
pub trait OperationProcessor<C, E>: Send + Sync
where
    C: Send + Sync,
    E: Send,
{
    async fn process<O>(&self, operation: &O, ctx: &C) -> Result<Value, E>
    where
        O: Execute<C, E> + 'static;
}
