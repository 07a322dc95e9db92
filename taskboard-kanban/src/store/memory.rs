//! In-memory board store
//!
//! Rows live in hash maps behind a tokio `RwLock`, the way a database would
//! hold them; `load_board` runs the same join as any other read path. Batch
//! writes are atomic: every target is checked before any row changes.

use super::{BoardStore, RankTarget, RankWrite};
use crate::error::{KanbanError, Result};
use crate::types::{ActivityEvent, Board, BoardState, Column, ColumnId, Task, TaskId};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

struct MemoryInner {
    board: Board,
    columns: HashMap<ColumnId, Column>,
    tasks: HashMap<TaskId, Task>,
    /// Oldest first
    activity: Vec<ActivityEvent>,
}

impl MemoryInner {
    fn check(&self, write: &RankWrite) -> Result<()> {
        match write {
            RankWrite::Order {
                target: RankTarget::Column(id),
                ..
            } => self.column_exists(id),
            RankWrite::Order {
                target: RankTarget::Task(id),
                ..
            } => self.task_exists(id),
            RankWrite::OrderAndParent { task, column, .. } => {
                self.task_exists(task)?;
                self.column_exists(column)
            }
        }
    }

    fn apply(&mut self, write: &RankWrite) -> Result<()> {
        self.check(write)?;
        match write {
            RankWrite::Order {
                target: RankTarget::Column(id),
                order,
            } => {
                if let Some(column) = self.columns.get_mut(id) {
                    column.order = *order;
                }
            }
            RankWrite::Order {
                target: RankTarget::Task(id),
                order,
            } => {
                if let Some(task) = self.tasks.get_mut(id) {
                    task.order = *order;
                }
            }
            RankWrite::OrderAndParent {
                task,
                order,
                column,
            } => {
                if let Some(task) = self.tasks.get_mut(task) {
                    task.order = *order;
                    task.column = column.clone();
                }
            }
        }
        Ok(())
    }

    fn column_exists(&self, id: &ColumnId) -> Result<()> {
        if self.columns.contains_key(id) {
            Ok(())
        } else {
            Err(KanbanError::ColumnNotFound { id: id.to_string() })
        }
    }

    fn task_exists(&self, id: &TaskId) -> Result<()> {
        if self.tasks.contains_key(id) {
            Ok(())
        } else {
            Err(KanbanError::TaskNotFound { id: id.to_string() })
        }
    }
}

/// A board kept entirely in memory
pub struct MemoryStore {
    inner: RwLock<MemoryInner>,
}

impl MemoryStore {
    /// An empty store holding just the board record
    pub fn new(board: Board) -> Self {
        Self {
            inner: RwLock::new(MemoryInner {
                board,
                columns: HashMap::new(),
                tasks: HashMap::new(),
                activity: Vec::new(),
            }),
        }
    }

    /// A store seeded with every row of `state`
    pub fn from_state(state: &BoardState) -> Self {
        let columns = state
            .columns
            .iter()
            .map(|l| (l.column.id.clone(), l.column.clone()))
            .collect();
        let tasks = state
            .columns
            .iter()
            .flat_map(|l| l.tasks.iter())
            .map(|t| (t.id.clone(), t.clone()))
            .collect();

        Self {
            inner: RwLock::new(MemoryInner {
                board: state.board.clone(),
                columns,
                tasks,
                activity: Vec::new(),
            }),
        }
    }

    pub async fn insert_column(&self, column: Column) -> Result<()> {
        column.validate()?;
        let mut inner = self.inner.write().await;
        if inner.columns.contains_key(&column.id) {
            return Err(KanbanError::duplicate_id("column", column.id.to_string()));
        }
        inner.columns.insert(column.id.clone(), column);
        Ok(())
    }

    pub async fn insert_task(&self, task: Task) -> Result<()> {
        task.validate()?;
        let mut inner = self.inner.write().await;
        inner.column_exists(&task.column)?;
        if inner.tasks.contains_key(&task.id) {
            return Err(KanbanError::duplicate_id("task", task.id.to_string()));
        }
        inner.tasks.insert(task.id.clone(), task);
        Ok(())
    }

    /// A single task row as stored
    pub async fn task(&self, id: &TaskId) -> Option<Task> {
        self.inner.read().await.tasks.get(id).cloned()
    }
}

#[async_trait]
impl BoardStore for MemoryStore {
    async fn load_board(&self) -> Result<BoardState> {
        let inner = self.inner.read().await;
        Ok(BoardState::from_rows(
            inner.board.clone(),
            inner.columns.values().cloned().collect(),
            inner.tasks.values().cloned().collect(),
        ))
    }

    async fn update_order(&self, target: &RankTarget, order: usize) -> Result<()> {
        let write = RankWrite::Order {
            target: target.clone(),
            order,
        };
        self.inner.write().await.apply(&write)
    }

    async fn update_order_and_parent(
        &self,
        task: &TaskId,
        order: usize,
        column: &ColumnId,
    ) -> Result<()> {
        let write = RankWrite::OrderAndParent {
            task: task.clone(),
            order,
            column: column.clone(),
        };
        self.inner.write().await.apply(&write)
    }

    async fn append_activity(&self, event: &ActivityEvent) -> Result<()> {
        self.inner.write().await.activity.push(event.clone());
        Ok(())
    }

    async fn read_activity(&self, limit: Option<usize>) -> Result<Vec<ActivityEvent>> {
        let inner = self.inner.read().await;
        let newest_first = inner.activity.iter().rev().cloned();
        Ok(match limit {
            Some(limit) => newest_first.take(limit).collect(),
            None => newest_first.collect(),
        })
    }

    async fn write_ranks(&self, writes: &[RankWrite]) -> Result<()> {
        let mut inner = self.inner.write().await;
        for write in writes {
            inner.check(write)?;
        }
        for write in writes {
            inner.apply(write)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{write_back, WriteMode};

    async fn store() -> MemoryStore {
        let store = MemoryStore::new(Board::new("Test"));
        store.insert_column(Column::new("x", "X", 1)).await.unwrap();
        store.insert_column(Column::new("y", "Y", 2)).await.unwrap();
        store
            .insert_task(Task::new("one", "x", 1).with_id("T1"))
            .await
            .unwrap();
        store
            .insert_task(Task::new("two", "x", 2).with_id("T2"))
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_load_board_joins_rows() {
        let store = store().await;
        let state = store.load_board().await.unwrap();
        assert_eq!(state.columns.len(), 2);
        assert_eq!(state.columns[0].tasks.len(), 2);
        assert!(state.columns[1].tasks.is_empty());
    }

    #[tokio::test]
    async fn test_insert_task_requires_column() {
        let store = store().await;
        let result = store.insert_task(Task::new("lost", "nope", 1)).await;
        assert!(matches!(result, Err(KanbanError::ColumnNotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_order_and_parent() {
        let store = store().await;
        store
            .update_order_and_parent(&"T1".into(), 1, &"y".into())
            .await
            .unwrap();
        let task = store.task(&"T1".into()).await.unwrap();
        assert_eq!(task.column.as_str(), "y");
        assert_eq!(task.order, 1);
    }

    #[tokio::test]
    async fn test_batch_is_all_or_nothing() {
        let store = store().await;
        let writes = vec![
            RankWrite::task("T2".into(), 1),
            RankWrite::task("missing".into(), 2),
        ];
        let result = store.write_ranks(&writes).await;
        assert!(matches!(result, Err(KanbanError::TaskNotFound { .. })));

        let untouched = store.task(&"T2".into()).await.unwrap();
        assert_eq!(untouched.order, 2);
    }

    #[tokio::test]
    async fn test_per_row_default_leaves_partial_writes() {
        let store = store().await;
        let writes = vec![
            RankWrite::task("T2".into(), 1),
            RankWrite::task("missing".into(), 2),
        ];
        let result = write_back(&store, &writes, WriteMode::PerRow).await;
        assert!(result.is_err());

        let written = store.task(&"T2".into()).await.unwrap();
        assert_eq!(written.order, 1);
    }

    #[tokio::test]
    async fn test_activity_newest_first() {
        let store = store().await;
        let first = ActivityEvent::task_moved("T1".into(), "x".into(), "y".into());
        let second = ActivityEvent::task_moved("T1".into(), "y".into(), "x".into());
        store.append_activity(&first).await.unwrap();
        store.append_activity(&second).await.unwrap();

        let events = store.read_activity(None).await.unwrap();
        assert_eq!(events, vec![second.clone(), first]);
        assert_eq!(store.read_activity(Some(1)).await.unwrap(), vec![second]);
    }
}
