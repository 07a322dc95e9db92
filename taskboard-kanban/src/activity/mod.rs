//! Activity log: audit events for moves between columns

mod list;

pub use list::ListActivity;

use crate::store::BoardStore;
use crate::types::ActivityEvent;
use tracing::{debug, warn};

/// Append `event` without letting a failure reach the caller.
///
/// Returns whether the event was recorded; a failure is logged and otherwise
/// ignored.
pub async fn record_best_effort<S>(store: &S, event: &ActivityEvent) -> bool
where
    S: BoardStore + ?Sized,
{
    match store.append_activity(event).await {
        Ok(()) => {
            debug!(event = %event.id, task = %event.item, "recorded activity");
            true
        }
        Err(error) => {
            warn!(%error, event = %event.id, task = %event.item, "failed to record activity");
            false
        }
    }
}
