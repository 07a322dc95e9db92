//! Property tests: random gesture sequences keep every board invariant

use proptest::prelude::*;
use taskboard_kanban::test_support::board_state;
use taskboard_kanban::{apply_move, BoardState, Gesture, MoveOutcome, RankBase, RankWrite};

const COLUMNS: [&str; 3] = ["a", "b", "c"];

fn start(base: RankBase) -> BoardState {
    board_state(
        base,
        &[("a", &["T1", "T2", "T3"]), ("b", &["T4", "T5"]), ("c", &[])],
    )
}

/// Turn raw picks into a gesture that is valid against `state`, or a
/// cancelled drop when the chosen source column is empty.
fn gesture(state: &BoardState, from: usize, pick: usize, to: usize, drop: usize) -> Gesture {
    let source = &state.columns[from];
    if source.tasks.is_empty() {
        return Gesture::cancelled_task("T1", source.column.id.clone(), 0);
    }
    let index = pick % source.tasks.len();
    let item = source.tasks[index].id.clone();

    let room = if from == to {
        source.tasks.len() - 1
    } else {
        state.columns[to].tasks.len()
    };
    Gesture::move_task(
        item,
        source.column.id.clone(),
        index,
        state.columns[to].column.id.clone(),
        drop % (room + 1),
    )
}

fn column_gesture(state: &BoardState, pick: usize, drop: usize) -> Gesture {
    let len = state.columns.len();
    let from = pick % len;
    Gesture::move_column(
        state.board.id.clone(),
        state.columns[from].column.id.clone(),
        from,
        drop % len,
    )
}

fn base() -> impl Strategy<Value = RankBase> {
    prop_oneof![Just(RankBase::Zero), Just(RankBase::One)]
}

proptest! {
    #[test]
    fn random_moves_keep_invariants(
        base in base(),
        steps in prop::collection::vec((0..3usize, 0..8usize, 0..3usize, 0..8usize, any::<bool>()), 1..40),
    ) {
        let mut state = start(base);
        let total = state.task_count();

        for (from, pick, to, drop, column_move) in steps {
            let g = if column_move {
                column_gesture(&state, pick, drop)
            } else {
                gesture(&state, from, pick, to, drop)
            };

            match apply_move(&state, &g).unwrap() {
                MoveOutcome::Unchanged => {}
                MoveOutcome::Moved(plan) => {
                    prop_assert!(!plan.writes.is_empty());
                    prop_assert_eq!(plan.audit.is_some(), g.crosses_collections());

                    // Each write matches the row it describes in the new state
                    for write in &plan.writes {
                        if let RankWrite::OrderAndParent { task, order, column } = write {
                            let row = plan.state.task(task).unwrap();
                            prop_assert_eq!(row.order, *order);
                            prop_assert_eq!(&row.column, column);
                        }
                    }
                    state = plan.state;
                }
            }

            prop_assert!(state.validate().is_ok());
            prop_assert_eq!(state.task_count(), total);
            prop_assert_eq!(state.columns.len(), COLUMNS.len());
        }
    }

    #[test]
    fn unchanged_means_identical(
        base in base(),
        from in 0..3usize,
        pick in 0..8usize,
        to in 0..3usize,
        drop in 0..8usize,
    ) {
        let state = start(base);
        let g = gesture(&state, from, pick, to, drop);
        if apply_move(&state, &g).unwrap().is_unchanged() {
            prop_assert!(!g.crosses_collections());
        }
    }
}
