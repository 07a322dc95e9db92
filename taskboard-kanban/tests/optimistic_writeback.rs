//! Drag-and-drop through a BoardSession: optimistic view, write-back, rollback

use std::sync::Arc;
use taskboard_kanban::test_support::{board_state, two_column_board, FlakyStore, RecordingNotifier};
use taskboard_kanban::{
    BoardSession, BoardState, BoardStore, Gesture, KanbanConfig, MemoryStore, NoticeLevel,
    RankBase, RollbackStrategy, SessionOptions, TaskId, WriteBackOutcome, WriteMode,
};

fn ranks(state: &BoardState, column: &str) -> Vec<(String, usize)> {
    state
        .lane(&column.into())
        .unwrap()
        .tasks
        .iter()
        .map(|t| (t.id.to_string(), t.order))
        .collect()
}

fn expect(items: &[(&str, usize)]) -> Vec<(String, usize)> {
    items.iter().map(|(id, o)| (id.to_string(), *o)).collect()
}

async fn open<S: BoardStore + 'static>(
    store: S,
    options: SessionOptions,
) -> (BoardSession<S>, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let session = BoardSession::open(Arc::new(store), notifier.clone(), options)
        .await
        .unwrap();
    (session, notifier)
}

fn options(write_mode: WriteMode, rollback: RollbackStrategy) -> SessionOptions {
    SessionOptions {
        write_mode,
        rollback,
        ..SessionOptions::default()
    }
}

#[test_log::test(tokio::test)]
async fn test_reorder_within_column() {
    let state = board_state(RankBase::One, &[("x", &["T1", "T2", "T3"])]);
    let (session, notifier) = open(MemoryStore::from_state(&state), SessionOptions::default()).await;

    let outcome = session
        .drag_end(Gesture::move_task("T3", "x", 2, "x", 0))
        .await
        .unwrap()
        .unwrap()
        .wait()
        .await
        .unwrap();

    assert_eq!(
        outcome,
        WriteBackOutcome::Committed {
            rows: 3,
            audited: false
        }
    );
    let expected = expect(&[("T3", 1), ("T1", 2), ("T2", 3)]);
    assert_eq!(ranks(&session.view().await, "x"), expected);
    assert_eq!(ranks(&session.store().load_board().await.unwrap(), "x"), expected);
    assert!(session.store().read_activity(None).await.unwrap().is_empty());
    assert!(notifier.notices().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_move_between_columns() {
    let (session, _) = open(
        MemoryStore::from_state(&two_column_board()),
        SessionOptions::default(),
    )
    .await;

    session
        .drag_end(Gesture::move_task("T1", "x", 0, "y", 1))
        .await
        .unwrap()
        .unwrap()
        .wait()
        .await
        .unwrap();

    let stored = session.store().load_board().await.unwrap();
    assert_eq!(ranks(&stored, "x"), expect(&[("T2", 1)]));
    assert_eq!(ranks(&stored, "y"), expect(&[("T3", 1), ("T1", 2)]));
    assert_eq!(
        stored.task(&TaskId::from("T1")).unwrap().column.as_str(),
        "y"
    );
    assert!(stored.validate().is_ok());

    let events = session.store().read_activity(None).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].item.as_str(), "T1");
    assert_eq!(events[0].from.as_str(), "x");
    assert_eq!(events[0].to.as_str(), "y");
}

#[tokio::test]
async fn test_drop_outside_any_column() {
    let state = two_column_board();
    let store = FlakyStore::new(MemoryStore::from_state(&state));
    let (session, notifier) = open(store, SessionOptions::default()).await;

    let pending = session
        .drag_end(Gesture::cancelled_task("T1", "x", 0))
        .await
        .unwrap();

    assert!(pending.is_none());
    assert_eq!(session.view().await, state);
    assert_eq!(session.store().rows_attempted(), 0);
    assert!(session.store().read_activity(None).await.unwrap().is_empty());
    assert!(notifier.notices().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_failed_batch_reverts_to_snapshot() {
    let state = two_column_board();
    let store = FlakyStore::new(MemoryStore::from_state(&state)).fail_on_row(2);
    let (session, notifier) = open(store, SessionOptions::default()).await;

    let outcome = session
        .drag_end(Gesture::move_task("T1", "x", 0, "y", 1))
        .await
        .unwrap()
        .unwrap()
        .wait()
        .await
        .unwrap();

    assert!(matches!(outcome, WriteBackOutcome::RolledBack { .. }));
    assert_eq!(session.view().await, state);
    assert_eq!(session.store().load_board().await.unwrap(), state);
    assert!(session.store().read_activity(None).await.unwrap().is_empty());

    let notices = notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert!(notices[0].message.starts_with("Couldn't save the move"));
    assert_eq!(notices[0].ttl, KanbanConfig::default().notice_ttl());
}

#[test_log::test(tokio::test)]
async fn test_failed_per_row_write_restores_snapshot() {
    let state = two_column_board();
    let store = FlakyStore::new(MemoryStore::from_state(&state)).fail_on_row(2);
    let (session, notifier) = open(
        store,
        options(WriteMode::PerRow, RollbackStrategy::Snapshot),
    )
    .await;

    let outcome = session
        .drag_end(Gesture::move_task("T1", "x", 0, "y", 1))
        .await
        .unwrap()
        .unwrap()
        .wait()
        .await
        .unwrap();

    assert!(!outcome.is_committed());
    assert_eq!(session.view().await, state);
    assert_eq!(notifier.notices().len(), 1);
    assert!(session.store().read_activity(None).await.unwrap().is_empty());

    // Without a transaction the first row stuck
    let stored = session.store().load_board().await.unwrap();
    assert_eq!(stored.task(&TaskId::from("T2")).unwrap().order, 1);
    assert_eq!(stored.task(&TaskId::from("T1")).unwrap().column.as_str(), "x");
}

#[test_log::test(tokio::test)]
async fn test_failed_per_row_write_refetches() {
    let state = two_column_board();
    let store = FlakyStore::new(MemoryStore::from_state(&state)).fail_on_row(2);
    let (session, _) = open(
        store,
        options(WriteMode::PerRow, RollbackStrategy::Refetch),
    )
    .await;

    session
        .drag_end(Gesture::move_task("T1", "x", 0, "y", 1))
        .await
        .unwrap()
        .unwrap()
        .wait()
        .await
        .unwrap();

    // The view shows what the store actually holds
    assert_eq!(session.view().await, session.store().load_board().await.unwrap());
    assert_eq!(ranks(&session.view().await, "y"), expect(&[("T3", 1)]));
}

#[test_log::test(tokio::test)]
async fn test_audit_failure_does_not_roll_back() {
    let state = two_column_board();
    let store = FlakyStore::new(MemoryStore::from_state(&state)).fail_activity();
    let (session, notifier) = open(store, SessionOptions::default()).await;

    let outcome = session
        .drag_end(Gesture::move_task("T1", "x", 0, "y", 0))
        .await
        .unwrap()
        .unwrap()
        .wait()
        .await
        .unwrap();

    assert_eq!(
        outcome,
        WriteBackOutcome::Committed {
            rows: 3,
            audited: false
        }
    );
    assert_eq!(session.view().await, session.store().load_board().await.unwrap());
    assert!(notifier.notices().is_empty());
}

#[tokio::test]
async fn test_rapid_gestures_build_on_the_view() {
    let state = board_state(RankBase::Zero, &[("a", &["T1", "T2"]), ("b", &[])]);
    let (session, _) = open(MemoryStore::from_state(&state), SessionOptions::default()).await;

    let first = session
        .drag_end(Gesture::move_task("T1", "a", 0, "b", 0))
        .await
        .unwrap()
        .unwrap();
    // Picked up from where the first drop left it, before its write-back lands
    let second = session
        .drag_end(Gesture::move_task("T2", "a", 0, "b", 0))
        .await
        .unwrap()
        .unwrap();

    assert!(first.wait().await.unwrap().is_committed());
    assert!(second.wait().await.unwrap().is_committed());

    let stored = session.store().load_board().await.unwrap();
    assert_eq!(ranks(&stored, "b"), expect(&[("T2", 0), ("T1", 1)]));
    assert!(stored.validate().is_ok());
    assert_eq!(session.store().read_activity(None).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_refresh_picks_up_external_changes() {
    let state = two_column_board();
    let (session, _) = open(MemoryStore::from_state(&state), SessionOptions::default()).await;

    session
        .store()
        .update_order_and_parent(&"T3".into(), 3, &"x".into())
        .await
        .unwrap();
    assert_eq!(session.view().await, state);

    session.refresh().await.unwrap();
    assert_eq!(ranks(&session.view().await, "x").len(), 3);
}
