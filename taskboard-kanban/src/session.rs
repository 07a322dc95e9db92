//! Optimistic board session
//!
//! A [`BoardSession`] holds the board a user is looking at. When a drag ends
//! the session runs the reorder engine, swaps the result into view at once,
//! and writes the changed rows back on a background task. If any write
//! fails, the view goes back to the authoritative board and a notice is
//! raised.
//!
//! Overlapping gestures are not queued: each one starts from whatever the
//! view shows at that moment, and their write-backs race in the store. When a
//! rollback lands while other gestures are in flight, the view is reloaded
//! from the store instead of restored from a snapshot those gestures never
//! saw, and any write-back planned before that rollback reloads the view once
//! it commits.

use crate::activity::record_best_effort;
use crate::config::{KanbanConfig, RollbackStrategy};
use crate::error::{KanbanError, Result};
use crate::notice::{Notice, Notifier};
use crate::reorder::{apply_move, MoveOutcome, MovePlan};
use crate::store::{write_back, BoardStore, RankWrite, WriteMode};
use crate::types::{ActivityEvent, BoardState, Gesture};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Session behaviour, usually taken from [`KanbanConfig`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub write_mode: WriteMode,
    pub rollback: RollbackStrategy,
    pub notice_ttl: Duration,
    /// Recorded on audit events
    pub actor: Option<String>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from(&KanbanConfig::default())
    }
}

impl From<&KanbanConfig> for SessionOptions {
    fn from(config: &KanbanConfig) -> Self {
        Self {
            write_mode: config.write_mode,
            rollback: config.rollback,
            notice_ttl: config.notice_ttl(),
            actor: config.actor.clone(),
        }
    }
}

/// How a background write-back ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteBackOutcome {
    /// Every row was written. `audited` says whether the audit event (if the
    /// move had one) made it into the activity log.
    Committed { rows: usize, audited: bool },
    /// A write failed and the view was restored
    RolledBack { error: String },
}

impl WriteBackOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}

/// Handle to a write-back in flight
#[derive(Debug)]
pub struct WriteBack {
    handle: JoinHandle<WriteBackOutcome>,
}

impl WriteBack {
    /// Wait for the write-back (and any rollback) to finish
    pub async fn wait(self) -> Result<WriteBackOutcome> {
        self.handle
            .await
            .map_err(|e| KanbanError::WriteBackAborted {
                message: e.to_string(),
            })
    }
}

/// Counters shared by a session and its write-backs
#[derive(Debug, Default)]
struct Generations {
    /// Gestures applied to the view
    planned: AtomicU64,
    /// Rollbacks started
    rolled_back: AtomicU64,
}

/// The live, optimistically updated view of one board
pub struct BoardSession<S> {
    store: Arc<S>,
    view: Arc<RwLock<BoardState>>,
    notifier: Arc<dyn Notifier>,
    options: SessionOptions,
    generations: Arc<Generations>,
}

impl<S> BoardSession<S>
where
    S: BoardStore + 'static,
{
    /// Load the board from `store` and start a session on it
    pub async fn open(
        store: Arc<S>,
        notifier: Arc<dyn Notifier>,
        options: SessionOptions,
    ) -> Result<Self> {
        let state = store.load_board().await?;
        debug!(
            board = %state.board.id,
            columns = state.columns.len(),
            tasks = state.task_count(),
            "opened board session"
        );

        Ok(Self {
            store,
            view: Arc::new(RwLock::new(state)),
            notifier,
            options,
            generations: Arc::new(Generations::default()),
        })
    }

    /// A copy of what the user currently sees
    pub async fn view(&self) -> BoardState {
        self.view.read().await.clone()
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Replace the view with the store's current board
    pub async fn refresh(&self) -> Result<()> {
        let state = self.store.load_board().await?;
        *self.view.write().await = state;
        Ok(())
    }

    /// Handle the end of a drag.
    ///
    /// The new arrangement is in view before this returns. `None` means the
    /// gesture changed nothing and no write-back was started. Errors are
    /// gestures the engine rejects; the view is left as it was.
    pub async fn drag_end(&self, gesture: Gesture) -> Result<Option<WriteBack>> {
        let (snapshot, writes, audit, planned, rolled_back) = {
            let mut view = self.view.write().await;
            let MovePlan {
                state,
                writes,
                audit,
            } = match apply_move(&view, &gesture)? {
                MoveOutcome::Unchanged => return Ok(None),
                MoveOutcome::Moved(plan) => plan,
            };
            let snapshot = std::mem::replace(&mut *view, state);
            let planned = self.generations.planned.fetch_add(1, Ordering::SeqCst) + 1;
            let rolled_back = self.generations.rolled_back.load(Ordering::SeqCst);
            (snapshot, writes, audit, planned, rolled_back)
        };

        let audit = match (audit, &self.options.actor) {
            (Some(event), Some(actor)) => Some(event.with_actor(actor.clone())),
            (audit, _) => audit,
        };

        debug!(
            item = gesture.item_str(),
            rows = writes.len(),
            "applied gesture optimistically"
        );

        let job = WriteBackJob {
            store: Arc::clone(&self.store),
            view: Arc::clone(&self.view),
            notifier: Arc::clone(&self.notifier),
            options: self.options.clone(),
            generations: Arc::clone(&self.generations),
            snapshot,
            writes,
            audit,
            planned,
            rolled_back,
        };

        Ok(Some(WriteBack {
            handle: tokio::spawn(job.run()),
        }))
    }
}

/// Everything a background write-back needs, moved onto its task
struct WriteBackJob<S> {
    store: Arc<S>,
    view: Arc<RwLock<BoardState>>,
    notifier: Arc<dyn Notifier>,
    options: SessionOptions,
    generations: Arc<Generations>,
    snapshot: BoardState,
    writes: Vec<RankWrite>,
    audit: Option<ActivityEvent>,
    /// `planned` count once this gesture was applied
    planned: u64,
    /// `rolled_back` count when this gesture was planned
    rolled_back: u64,
}

impl<S> WriteBackJob<S>
where
    S: BoardStore + 'static,
{
    async fn run(self) -> WriteBackOutcome {
        let rows = self.writes.len();

        match write_back(self.store.as_ref(), &self.writes, self.options.write_mode).await {
            Ok(()) => {
                info!(rows, "move committed");
                let audited = match &self.audit {
                    Some(event) => record_best_effort(self.store.as_ref(), event).await,
                    None => false,
                };
                if self.generations.rolled_back.load(Ordering::SeqCst) != self.rolled_back {
                    self.resync().await;
                }
                WriteBackOutcome::Committed { rows, audited }
            }
            Err(error) => {
                warn!(%error, rows, "write-back failed; restoring board");
                self.roll_back().await;
                self.notifier.notify(Notice::error(
                    format!("Couldn't save the move: {}", error),
                    self.options.notice_ttl,
                ));
                WriteBackOutcome::RolledBack {
                    error: error.to_string(),
                }
            }
        }
    }

    async fn roll_back(&self) {
        self.generations.rolled_back.fetch_add(1, Ordering::SeqCst);
        let overlapped = self.generations.planned.load(Ordering::SeqCst) != self.planned;

        let restored = match self.options.rollback {
            RollbackStrategy::Snapshot if !overlapped => self.snapshot.clone(),
            _ => match self.store.load_board().await {
                Ok(state) => state,
                Err(error) => {
                    warn!(%error, "refetch failed; restoring pre-move snapshot");
                    self.snapshot.clone()
                }
            },
        };
        *self.view.write().await = restored;
    }

    /// Reload the view after an earlier rollback discarded this move from it
    async fn resync(&self) {
        match self.store.load_board().await {
            Ok(state) => {
                debug!("reloading view after an overlapping rollback");
                *self.view.write().await = state;
                self.notifier.notify(Notice::info(
                    "The board was reloaded to show saved changes",
                    self.options.notice_ttl,
                ));
            }
            Err(error) => warn!(%error, "could not reload board after commit"),
        }
    }
}
