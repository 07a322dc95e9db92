//! Persistence gateway
//!
//! [`BoardStore`] is everything the reorder engine and the session need from
//! the data layer: the read path, the two rank-write requests, and the audit
//! sink. Stores that can commit several rows at once override
//! [`BoardStore::write_ranks`].

mod memory;

pub use memory::MemoryStore;

use crate::error::Result;
use crate::types::{ActivityEvent, BoardState, ColumnId, TaskId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// A row whose rank can be written
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum RankTarget {
    Column(ColumnId),
    Task(TaskId),
}

impl fmt::Display for RankTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column(id) => write!(f, "column {}", id),
            Self::Task(id) => write!(f, "task {}", id),
        }
    }
}

/// One row update produced by a move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankWrite {
    /// New rank, same parent
    Order { target: RankTarget, order: usize },
    /// New rank in a new column
    OrderAndParent {
        task: TaskId,
        order: usize,
        column: ColumnId,
    },
}

impl RankWrite {
    pub fn column(id: ColumnId, order: usize) -> Self {
        Self::Order {
            target: RankTarget::Column(id),
            order,
        }
    }

    pub fn task(id: TaskId, order: usize) -> Self {
        Self::Order {
            target: RankTarget::Task(id),
            order,
        }
    }

    pub fn order(&self) -> usize {
        match self {
            Self::Order { order, .. } | Self::OrderAndParent { order, .. } => *order,
        }
    }
}

impl fmt::Display for RankWrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Order { target, order } => write!(f, "{} -> {}", target, order),
            Self::OrderAndParent {
                task,
                order,
                column,
            } => write!(f, "task {} -> {}@{}", task, column, order),
        }
    }
}

/// How a list of rank writes is sent to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// One independent request per row
    PerRow,
    /// One `write_ranks` call for the whole move
    #[default]
    Batch,
}

#[async_trait]
pub trait BoardStore: Send + Sync {
    /// Board, then its columns by rank, then their tasks by rank
    async fn load_board(&self) -> Result<BoardState>;

    async fn update_order(&self, target: &RankTarget, order: usize) -> Result<()>;

    /// Move a task to `column` at `order`
    async fn update_order_and_parent(
        &self,
        task: &TaskId,
        order: usize,
        column: &ColumnId,
    ) -> Result<()>;

    async fn append_activity(&self, event: &ActivityEvent) -> Result<()>;

    /// Audit events, newest first
    async fn read_activity(&self, limit: Option<usize>) -> Result<Vec<ActivityEvent>>;

    async fn apply_write(&self, write: &RankWrite) -> Result<()> {
        match write {
            RankWrite::Order { target, order } => self.update_order(target, *order).await,
            RankWrite::OrderAndParent {
                task,
                order,
                column,
            } => self.update_order_and_parent(task, *order, column).await,
        }
    }

    /// Commit several writes. The default sends them one by one and stops at
    /// the first failure, leaving earlier rows written.
    async fn write_ranks(&self, writes: &[RankWrite]) -> Result<()> {
        for write in writes {
            self.apply_write(write).await?;
        }
        Ok(())
    }
}

/// Send `writes` to `store` in the given mode
pub async fn write_back<S>(store: &S, writes: &[RankWrite], mode: WriteMode) -> Result<()>
where
    S: BoardStore + ?Sized,
{
    debug!(rows = writes.len(), ?mode, "writing ranks");
    match mode {
        WriteMode::PerRow => {
            for write in writes {
                store.apply_write(write).await?;
            }
            Ok(())
        }
        WriteMode::Batch => store.write_ranks(writes).await,
    }
}
