//! Helpers for tests that exercise the write-back and rollback paths
//!
//! Compiled for this crate's own tests and for anything enabling the
//! `test-support` feature.

use crate::error::{KanbanError, Result};
use crate::notice::{Notice, Notifier};
use crate::store::{BoardStore, RankTarget, RankWrite};
use crate::types::{ActivityEvent, Board, BoardState, Column, ColumnId, RankBase, Task, TaskId};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Build a board from `(column, [task ids])` pairs, ranked from `base`.
///
/// Column names are the upper-cased ids; task titles are the task ids.
pub fn board_state(base: RankBase, lanes: &[(&str, &[&str])]) -> BoardState {
    let mut board = Board::new("Test").with_rank_base(base);
    board.id = "b1".into();

    let mut columns = Vec::new();
    let mut tasks = Vec::new();
    for (index, (column, ids)) in lanes.iter().enumerate() {
        columns.push(Column::new(*column, column.to_uppercase(), base.rank(index)));
        for (position, id) in ids.iter().enumerate() {
            tasks.push(Task::new(*id, *column, base.rank(position)).with_id(*id));
        }
    }

    BoardState::from_rows(board, columns, tasks)
}

/// X = [T1, T2], Y = [T3], ranked from 1
pub fn two_column_board() -> BoardState {
    board_state(RankBase::One, &[("x", &["T1", "T2"]), ("y", &["T3"])])
}

/// A store wrapper that fails on demand.
///
/// Rows are counted across calls starting from 1. In batch mode a batch
/// containing the failing row is rejected as a whole before it reaches the
/// inner store.
pub struct FlakyStore<S> {
    inner: S,
    fail_on_row: Option<usize>,
    rows: AtomicUsize,
    fail_activity: AtomicBool,
    fail_load: AtomicBool,
}

impl<S: BoardStore> FlakyStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            fail_on_row: None,
            rows: AtomicUsize::new(0),
            fail_activity: AtomicBool::new(false),
            fail_load: AtomicBool::new(false),
        }
    }

    /// Reject the `row`th rank write
    pub fn fail_on_row(mut self, row: usize) -> Self {
        self.fail_on_row = Some(row);
        self
    }

    /// Reject every audit append
    pub fn fail_activity(self) -> Self {
        self.fail_activity.store(true, Ordering::SeqCst);
        self
    }

    /// Make `load_board` fail from now on (or stop failing)
    pub fn set_fail_load(&self, fail: bool) {
        self.fail_load.store(fail, Ordering::SeqCst);
    }

    /// Rank writes received so far, including rejected ones
    pub fn rows_attempted(&self) -> usize {
        self.rows.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Count `count` rows and fail if the configured row is among them
    fn admit(&self, count: usize) -> Result<()> {
        let first = self.rows.fetch_add(count, Ordering::SeqCst) + 1;
        match self.fail_on_row {
            Some(row) if (first..first + count).contains(&row) => Err(KanbanError::store(
                format!("injected failure on row {}", row),
            )),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<S: BoardStore> BoardStore for FlakyStore<S> {
    async fn load_board(&self) -> Result<BoardState> {
        if self.fail_load.load(Ordering::SeqCst) {
            return Err(KanbanError::store("injected load failure"));
        }
        self.inner.load_board().await
    }

    async fn update_order(&self, target: &RankTarget, order: usize) -> Result<()> {
        self.admit(1)?;
        self.inner.update_order(target, order).await
    }

    async fn update_order_and_parent(
        &self,
        task: &TaskId,
        order: usize,
        column: &ColumnId,
    ) -> Result<()> {
        self.admit(1)?;
        self.inner.update_order_and_parent(task, order, column).await
    }

    async fn append_activity(&self, event: &ActivityEvent) -> Result<()> {
        if self.fail_activity.load(Ordering::SeqCst) {
            return Err(KanbanError::store("injected activity failure"));
        }
        self.inner.append_activity(event).await
    }

    async fn read_activity(&self, limit: Option<usize>) -> Result<Vec<ActivityEvent>> {
        self.inner.read_activity(limit).await
    }

    async fn write_ranks(&self, writes: &[RankWrite]) -> Result<()> {
        self.admit(writes.len())?;
        self.inner.write_ranks(writes).await
    }
}

/// Collects notices instead of showing them
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}
