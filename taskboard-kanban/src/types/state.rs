//! The joined, ordered view of one board

use super::board::{Board, Column};
use super::ids::{ColumnId, TaskId};
use super::task::Task;
use crate::error::{KanbanError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

/// A column together with the tasks it owns, in rank order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLane {
    pub column: Column,
    pub tasks: Vec<Task>,
}

impl ColumnLane {
    pub fn new(column: Column) -> Self {
        Self {
            column,
            tasks: Vec::new(),
        }
    }

    pub fn task_ids(&self) -> Vec<TaskId> {
        self.tasks.iter().map(|t| t.id.clone()).collect()
    }
}

/// A board with its columns left to right and each column's tasks top to bottom.
///
/// This is the value the reorder engine transforms and the session shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    pub board: Board,
    pub columns: Vec<ColumnLane>,
}

impl BoardState {
    /// Join flat rows the way the read path does: columns by rank, then the
    /// tasks of those columns by rank. Ties break on id so the result is stable.
    ///
    /// Tasks pointing at a column that is not on the board are left out.
    pub fn from_rows(board: Board, mut columns: Vec<Column>, mut tasks: Vec<Task>) -> Self {
        columns.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
        tasks.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));

        let mut lanes: Vec<ColumnLane> = columns.into_iter().map(ColumnLane::new).collect();
        for task in tasks {
            match lanes.iter_mut().find(|l| l.column.id == task.column) {
                Some(lane) => lane.tasks.push(task),
                None => warn!(task = %task.id, column = %task.column, "task references unknown column; skipped"),
            }
        }

        Self {
            board,
            columns: lanes,
        }
    }

    /// Position of a column, left to right
    pub fn lane_index(&self, column: &ColumnId) -> Option<usize> {
        self.columns.iter().position(|l| &l.column.id == column)
    }

    pub fn lane(&self, column: &ColumnId) -> Option<&ColumnLane> {
        self.columns.iter().find(|l| &l.column.id == column)
    }

    /// `(lane index, position within lane)` of a task
    pub fn locate_task(&self, task: &TaskId) -> Option<(usize, usize)> {
        self.columns.iter().enumerate().find_map(|(lane_index, lane)| {
            lane.tasks
                .iter()
                .position(|t| &t.id == task)
                .map(|pos| (lane_index, pos))
        })
    }

    pub fn task(&self, task: &TaskId) -> Option<&Task> {
        self.columns
            .iter()
            .flat_map(|l| l.tasks.iter())
            .find(|t| &t.id == task)
    }

    pub fn column_ids(&self) -> Vec<ColumnId> {
        self.columns.iter().map(|l| l.column.id.clone()).collect()
    }

    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|l| l.tasks.len()).sum()
    }

    /// Check the board's ordering invariants:
    ///
    /// - column ranks are contiguous from the board's rank base
    /// - within every column, task ranks are contiguous from the rank base
    /// - every task names the column that holds it
    /// - no task appears in more than one column
    pub fn validate(&self) -> Result<()> {
        let base = self.board.rank_base;

        if !base.is_contiguous(self.columns.iter().map(|l| l.column.order)) {
            return Err(KanbanError::invariant(format!(
                "column ranks are not contiguous from {}",
                base.start()
            )));
        }

        let mut seen = HashSet::new();
        for lane in &self.columns {
            if !base.is_contiguous(lane.tasks.iter().map(|t| t.order)) {
                return Err(KanbanError::invariant(format!(
                    "task ranks in column '{}' are not contiguous from {}",
                    lane.column.id,
                    base.start()
                )));
            }
            for task in &lane.tasks {
                if task.column != lane.column.id {
                    return Err(KanbanError::invariant(format!(
                        "task '{}' is listed under '{}' but belongs to '{}'",
                        task.id, lane.column.id, task.column
                    )));
                }
                if !seen.insert(&task.id) {
                    return Err(KanbanError::invariant(format!(
                        "task '{}' appears in more than one column",
                        task.id
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RankBase;

    fn rows() -> (Board, Vec<Column>, Vec<Task>) {
        let board = Board::new("Test");
        let columns = vec![Column::new("y", "Y", 2), Column::new("x", "X", 1)];
        let tasks = vec![
            Task::new("two", "x", 2).with_id("T2"),
            Task::new("three", "y", 1).with_id("T3"),
            Task::new("one", "x", 1).with_id("T1"),
        ];
        (board, columns, tasks)
    }

    #[test]
    fn test_from_rows_orders_columns_and_tasks() {
        let (board, columns, tasks) = rows();
        let state = BoardState::from_rows(board, columns, tasks);

        assert_eq!(state.column_ids(), vec![ColumnId::from("x"), ColumnId::from("y")]);
        assert_eq!(
            state.columns[0].task_ids(),
            vec![TaskId::from("T1"), TaskId::from("T2")]
        );
        assert_eq!(state.task_count(), 3);
        assert_eq!(state.locate_task(&"T3".into()), Some((1, 0)));
        assert!(state.validate().is_ok());
    }

    #[test]
    fn test_from_rows_skips_orphans() {
        let (board, columns, mut tasks) = rows();
        tasks.push(Task::new("lost", "gone", 1).with_id("T9"));
        let state = BoardState::from_rows(board, columns, tasks);
        assert_eq!(state.task_count(), 3);
        assert!(state.task(&"T9".into()).is_none());
    }

    #[test]
    fn test_validate_detects_gaps() {
        let (board, columns, mut tasks) = rows();
        tasks[0].order = 3;
        let state = BoardState::from_rows(board, columns, tasks);
        let err = state.validate().unwrap_err();
        assert!(matches!(err, KanbanError::InvariantViolation { .. }));
    }

    #[test]
    fn test_validate_detects_duplicate_membership() {
        let (board, columns, tasks) = rows();
        let mut state = BoardState::from_rows(board, columns, tasks);
        let mut copy = state.columns[0].tasks[0].clone();
        copy.column = "y".into();
        copy.order = 2;
        state.columns[1].tasks.push(copy);
        assert!(state.validate().is_err());
    }

    #[test]
    fn test_validate_respects_rank_base() {
        let (board, _, _) = rows();
        let board = board.with_rank_base(RankBase::Zero);
        let state = BoardState::from_rows(
            board,
            vec![Column::new("x", "X", 0)],
            vec![Task::new("a", "x", 0), Task::new("b", "x", 1)],
        );
        assert!(state.validate().is_ok());
    }
}
