//! Ordered-collection reorder engine
//!
//! [`apply_move`] is a pure function from a board and a gesture to the next
//! board. It never touches a store; it returns the rows that changed so the
//! caller can write exactly those back.
//!
//! Ranks are always recomputed for the whole collection rather than squeezed
//! in between neighbours, so every touched collection ends up numbered
//! `base, base + 1, ...` with no gaps and no duplicates.

use crate::error::{KanbanError, Result};
use crate::store::RankWrite;
use crate::types::{
    ActivityEvent, BoardId, BoardState, ColumnId, DragGesture, Gesture, RankBase, Task, TaskId,
};
use tracing::debug;

/// What a gesture does to a board
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Nothing to change and nothing to write
    Unchanged,
    Moved(MovePlan),
}

impl MoveOutcome {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    pub fn into_plan(self) -> Option<MovePlan> {
        match self {
            Self::Unchanged => None,
            Self::Moved(plan) => Some(plan),
        }
    }
}

/// The board after a move and the rows that have to be persisted for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePlan {
    pub state: BoardState,
    /// Source collection first, then destination, each in new rank order
    pub writes: Vec<RankWrite>,
    /// Present exactly when a task changed columns
    pub audit: Option<ActivityEvent>,
}

/// Apply a drag gesture to `state`.
///
/// A gesture without a destination is [`MoveOutcome::Unchanged`], as is one
/// that puts every row back where it was.
pub fn apply_move(state: &BoardState, gesture: &Gesture) -> Result<MoveOutcome> {
    let outcome = match gesture {
        Gesture::Column(g) => move_column(state, g)?,
        Gesture::Task(g) => move_task(state, g)?,
    };

    match &outcome {
        MoveOutcome::Unchanged => debug!(item = gesture.item_str(), "gesture changes nothing"),
        MoveOutcome::Moved(plan) => debug!(
            item = gesture.item_str(),
            rows = plan.writes.len(),
            crosses = plan.audit.is_some(),
            "planned move"
        ),
    }

    Ok(outcome)
}

fn move_column(state: &BoardState, gesture: &DragGesture<BoardId, ColumnId>) -> Result<MoveOutcome> {
    let Some(destination) = &gesture.destination else {
        return Ok(MoveOutcome::Unchanged);
    };

    for collection in [&gesture.source.collection, &destination.collection] {
        if collection != &state.board.id {
            return Err(KanbanError::invalid_value(
                "collection",
                format!(
                    "columns can only move within board '{}', not '{}'",
                    state.board.id, collection
                ),
            ));
        }
    }

    let mut lanes = state.columns.clone();
    if lanes.get(gesture.source.index).map(|l| &l.column.id) != Some(&gesture.item) {
        return Err(KanbanError::StaleGesture {
            item: gesture.item.to_string(),
            collection: state.board.id.to_string(),
            index: gesture.source.index,
        });
    }

    let lane = lanes.remove(gesture.source.index);
    if destination.index > lanes.len() {
        return Err(KanbanError::IndexOutOfRange {
            collection: state.board.id.to_string(),
            index: destination.index,
            len: lanes.len(),
        });
    }
    lanes.insert(destination.index, lane);

    let base = state.board.rank_base;
    let mut writes = Vec::new();
    for (index, lane) in lanes.iter_mut().enumerate() {
        let order = base.rank(index);
        if lane.column.order != order {
            lane.column.order = order;
            writes.push(RankWrite::column(lane.column.id.clone(), order));
        }
    }

    if writes.is_empty() {
        return Ok(MoveOutcome::Unchanged);
    }

    Ok(MoveOutcome::Moved(MovePlan {
        state: BoardState {
            board: state.board.clone(),
            columns: lanes,
        },
        writes,
        audit: None,
    }))
}

fn move_task(state: &BoardState, gesture: &DragGesture<ColumnId, TaskId>) -> Result<MoveOutcome> {
    let Some(destination) = &gesture.destination else {
        return Ok(MoveOutcome::Unchanged);
    };

    let source_lane = lane_index(state, &gesture.source.collection)?;
    let destination_lane = lane_index(state, &destination.collection)?;
    let crosses = source_lane != destination_lane;

    let mut lanes = state.columns.clone();
    let picked = lanes[source_lane].tasks.get(gesture.source.index);
    if picked.map(|t| &t.id) != Some(&gesture.item) {
        return Err(KanbanError::StaleGesture {
            item: gesture.item.to_string(),
            collection: gesture.source.collection.to_string(),
            index: gesture.source.index,
        });
    }

    let mut task = lanes[source_lane].tasks.remove(gesture.source.index);
    // Measured after removal, as drag-and-drop lists report it.
    let room = lanes[destination_lane].tasks.len();
    if destination.index > room {
        return Err(KanbanError::IndexOutOfRange {
            collection: destination.collection.to_string(),
            index: destination.index,
            len: room,
        });
    }

    let from = task.column.clone();
    if crosses {
        task.column = destination.collection.clone();
    }
    lanes[destination_lane].tasks.insert(destination.index, task);

    let base = state.board.rank_base;
    let mut writes = Vec::new();
    renumber(&mut lanes[source_lane].tasks, base, None, &mut writes);
    if crosses {
        renumber(
            &mut lanes[destination_lane].tasks,
            base,
            Some(&gesture.item),
            &mut writes,
        );
    }

    if writes.is_empty() {
        return Ok(MoveOutcome::Unchanged);
    }

    let audit = crosses.then(|| {
        ActivityEvent::task_moved(gesture.item.clone(), from, destination.collection.clone())
    });

    Ok(MoveOutcome::Moved(MovePlan {
        state: BoardState {
            board: state.board.clone(),
            columns: lanes,
        },
        writes,
        audit,
    }))
}

fn lane_index(state: &BoardState, column: &ColumnId) -> Result<usize> {
    state
        .lane_index(column)
        .ok_or_else(|| KanbanError::ColumnNotFound {
            id: column.to_string(),
        })
}

/// Renumber `tasks` from `base`, recording every row whose rank changed.
/// The task that just changed parent is always written, with its new column.
fn renumber(
    tasks: &mut [Task],
    base: RankBase,
    moved: Option<&TaskId>,
    writes: &mut Vec<RankWrite>,
) {
    for (index, task) in tasks.iter_mut().enumerate() {
        let order = base.rank(index);
        let changed = task.order != order;
        task.order = order;

        if moved == Some(&task.id) {
            writes.push(RankWrite::OrderAndParent {
                task: task.id.clone(),
                order,
                column: task.column.clone(),
            });
        } else if changed {
            writes.push(RankWrite::task(task.id.clone(), order));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Board, Column};

    fn board(rank_base: RankBase) -> Board {
        let mut board = Board::new("Test").with_rank_base(rank_base);
        board.id = "b1".into();
        board
    }

    fn task(id: &str, column: &str, order: usize) -> Task {
        Task::new(id, column, order).with_id(id)
    }

    /// X = [T1, T2, T3]
    fn single_column() -> BoardState {
        BoardState::from_rows(
            board(RankBase::One),
            vec![Column::new("x", "X", 1)],
            vec![task("T1", "x", 1), task("T2", "x", 2), task("T3", "x", 3)],
        )
    }

    /// X = [T1, T2], Y = [T3]
    fn two_columns() -> BoardState {
        BoardState::from_rows(
            board(RankBase::One),
            vec![Column::new("x", "X", 1), Column::new("y", "Y", 2)],
            vec![task("T1", "x", 1), task("T2", "x", 2), task("T3", "y", 1)],
        )
    }

    fn ranks(state: &BoardState, column: &str) -> Vec<(String, usize)> {
        state
            .lane(&column.into())
            .unwrap()
            .tasks
            .iter()
            .map(|t| (t.id.to_string(), t.order))
            .collect()
    }

    fn pairs(items: &[(&str, usize)]) -> Vec<(String, usize)> {
        items.iter().map(|(id, o)| (id.to_string(), *o)).collect()
    }

    #[test]
    fn test_reorder_within_column() {
        let state = single_column();
        let plan = apply_move(&state, &Gesture::move_task("T3", "x", 2, "x", 0))
            .unwrap()
            .into_plan()
            .unwrap();

        assert_eq!(
            ranks(&plan.state, "x"),
            pairs(&[("T3", 1), ("T1", 2), ("T2", 3)])
        );
        assert_eq!(
            plan.writes,
            vec![
                RankWrite::task("T3".into(), 1),
                RankWrite::task("T1".into(), 2),
                RankWrite::task("T2".into(), 3),
            ]
        );
        assert!(plan.audit.is_none());
        plan.state.validate().unwrap();
    }

    #[test]
    fn test_reorder_writes_only_changed_rows() {
        let state = single_column();
        let plan = apply_move(&state, &Gesture::move_task("T2", "x", 1, "x", 2))
            .unwrap()
            .into_plan()
            .unwrap();

        assert_eq!(
            ranks(&plan.state, "x"),
            pairs(&[("T1", 1), ("T3", 2), ("T2", 3)])
        );
        assert_eq!(
            plan.writes,
            vec![
                RankWrite::task("T3".into(), 2),
                RankWrite::task("T2".into(), 3),
            ]
        );
    }

    #[test]
    fn test_move_across_columns() {
        let state = two_columns();
        let plan = apply_move(&state, &Gesture::move_task("T1", "x", 0, "y", 1))
            .unwrap()
            .into_plan()
            .unwrap();

        assert_eq!(ranks(&plan.state, "x"), pairs(&[("T2", 1)]));
        assert_eq!(ranks(&plan.state, "y"), pairs(&[("T3", 1), ("T1", 2)]));
        assert_eq!(plan.state.task(&"T1".into()).unwrap().column.as_str(), "y");
        assert_eq!(
            plan.writes,
            vec![
                RankWrite::task("T2".into(), 1),
                RankWrite::OrderAndParent {
                    task: "T1".into(),
                    order: 2,
                    column: "y".into(),
                },
            ]
        );

        let audit = plan.audit.unwrap();
        assert_eq!(audit.item.as_str(), "T1");
        assert_eq!(audit.from.as_str(), "x");
        assert_eq!(audit.to.as_str(), "y");
        plan.state.validate().unwrap();
    }

    #[test]
    fn test_move_into_empty_column() {
        let state = BoardState::from_rows(
            board(RankBase::Zero),
            vec![Column::new("x", "X", 0), Column::new("y", "Y", 1)],
            vec![task("T1", "x", 0)],
        );
        let plan = apply_move(&state, &Gesture::move_task("T1", "x", 0, "y", 0))
            .unwrap()
            .into_plan()
            .unwrap();

        assert!(plan.state.lane(&"x".into()).unwrap().tasks.is_empty());
        assert_eq!(ranks(&plan.state, "y"), pairs(&[("T1", 0)]));
        // Rank did not change, but the parent did.
        assert_eq!(
            plan.writes,
            vec![RankWrite::OrderAndParent {
                task: "T1".into(),
                order: 0,
                column: "y".into(),
            }]
        );
    }

    #[test]
    fn test_cancelled_gesture_is_noop() {
        let state = two_columns();
        let outcome = apply_move(&state, &Gesture::cancelled_task("T1", "x", 0)).unwrap();
        assert!(outcome.is_unchanged());
    }

    #[test]
    fn test_cancelled_column_gesture_is_noop() {
        let state = two_columns();
        let outcome = apply_move(&state, &Gesture::cancelled_column("b1", "y", 1)).unwrap();
        assert_eq!(outcome, MoveOutcome::Unchanged);
    }

    #[test]
    fn test_drop_in_place_is_noop() {
        let state = two_columns();
        let outcome = apply_move(&state, &Gesture::move_task("T2", "x", 1, "x", 1)).unwrap();
        assert_eq!(outcome, MoveOutcome::Unchanged);
    }

    #[test]
    fn test_drop_in_place_renumbers_gapped_column() {
        let state = BoardState::from_rows(
            board(RankBase::One),
            vec![Column::new("x", "X", 1)],
            vec![task("T1", "x", 1), task("T2", "x", 5)],
        );
        let plan = apply_move(&state, &Gesture::move_task("T1", "x", 0, "x", 0))
            .unwrap()
            .into_plan()
            .unwrap();
        assert_eq!(plan.writes, vec![RankWrite::task("T2".into(), 2)]);
    }

    #[test]
    fn test_stale_source_is_rejected() {
        let state = two_columns();
        let err = apply_move(&state, &Gesture::move_task("T2", "x", 0, "y", 0)).unwrap_err();
        assert!(matches!(err, KanbanError::StaleGesture { index: 0, .. }));
    }

    #[test]
    fn test_unknown_column_is_rejected() {
        let state = two_columns();
        let err = apply_move(&state, &Gesture::move_task("T1", "x", 0, "z", 0)).unwrap_err();
        assert!(matches!(err, KanbanError::ColumnNotFound { .. }));
    }

    #[test]
    fn test_destination_index_is_bounded() {
        let state = two_columns();
        // Y has one task, so index 1 is the end and 2 is past it.
        let err = apply_move(&state, &Gesture::move_task("T1", "x", 0, "y", 2)).unwrap_err();
        assert!(matches!(err, KanbanError::IndexOutOfRange { len: 1, .. }));

        // Within X, after removing T1 only one slot past T2 exists.
        let err = apply_move(&state, &Gesture::move_task("T1", "x", 0, "x", 2)).unwrap_err();
        assert!(matches!(err, KanbanError::IndexOutOfRange { len: 1, .. }));
    }

    #[test]
    fn test_move_column() {
        let state = BoardState::from_rows(
            board(RankBase::Zero),
            vec![
                Column::new("todo", "To Do", 0),
                Column::new("doing", "Doing", 1),
                Column::new("done", "Done", 2),
            ],
            vec![task("T1", "doing", 0)],
        );
        let plan = apply_move(&state, &Gesture::move_column("b1", "done", 2, 0))
            .unwrap()
            .into_plan()
            .unwrap();

        assert_eq!(
            plan.state.column_ids(),
            vec![ColumnId::from("done"), "todo".into(), "doing".into()]
        );
        assert_eq!(plan.writes.len(), 3);
        assert!(plan.audit.is_none());
        // Tasks travel with their column.
        assert_eq!(plan.state.columns[2].tasks.len(), 1);
        plan.state.validate().unwrap();
    }

    #[test]
    fn test_move_column_on_other_board_is_rejected() {
        let state = two_columns();
        let err = apply_move(&state, &Gesture::move_column("other", "x", 0, 1)).unwrap_err();
        assert!(matches!(err, KanbanError::InvalidValue { .. }));
    }

    #[test]
    fn test_input_state_is_untouched() {
        let state = two_columns();
        let before = state.clone();
        apply_move(&state, &Gesture::move_task("T1", "x", 0, "y", 0)).unwrap();
        assert_eq!(state, before);
    }
}
