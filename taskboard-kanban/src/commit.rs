//! Pessimistic gesture commit
//!
//! The non-optimistic path used by commands: load the authoritative board,
//! plan the move, write it back, then record the audit event. Callers that
//! share a store with other processes hold its lock around the call.

use crate::activity::record_best_effort;
use crate::error::Result;
use crate::reorder::{apply_move, MoveOutcome};
use crate::store::{write_back, BoardStore, WriteMode};
use crate::types::{BoardState, Gesture};
use tracing::info;

/// A gesture that has been written back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committed {
    /// The board as stored after the move
    pub state: BoardState,
    /// `false` when the gesture changed nothing
    pub moved: bool,
    pub audited: bool,
}

/// Apply `gesture` to the stored board and persist the result
pub async fn commit_gesture<S>(
    store: &S,
    gesture: &Gesture,
    mode: WriteMode,
    actor: Option<&str>,
) -> Result<Committed>
where
    S: BoardStore + ?Sized,
{
    let state = store.load_board().await?;

    let plan = match apply_move(&state, gesture)? {
        MoveOutcome::Unchanged => {
            return Ok(Committed {
                state,
                moved: false,
                audited: false,
            })
        }
        MoveOutcome::Moved(plan) => plan,
    };

    write_back(store, &plan.writes, mode).await?;
    info!(item = gesture.item_str(), rows = plan.writes.len(), "move committed");

    let audited = match plan.audit {
        Some(event) => {
            let event = match actor {
                Some(actor) => event.with_actor(actor),
                None => event,
            };
            record_best_effort(store, &event).await
        }
        None => false,
    };

    Ok(Committed {
        state: plan.state,
        moved: true,
        audited,
    })
}
