//! Kanban board engine: drag-and-drop reordering with optimistic write-back
//!
//! The core is [`reorder::apply_move`], a pure function that takes a board and
//! a finished drag gesture and returns the next board together with the rows
//! whose rank or column changed. Everything else is plumbing around it:
//!
//! - [`BoardSession`] shows the result at once, writes it back in the
//!   background, and rolls the view back if the store refuses.
//! - [`BoardStore`] is the persistence gateway. [`MemoryStore`] keeps rows in
//!   memory; [`KanbanContext`] keeps them as JSON files in a `.kanban`
//!   directory, guarded by a lock file.
//! - Commands ([`board`], [`column`], [`task`], [`activity`]) run against a
//!   [`KanbanContext`] and are journaled by [`KanbanOperationProcessor`].
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use taskboard_kanban::{
//!     board::InitBoard, BoardSession, Execute, Gesture, KanbanContext, SessionOptions,
//!     TracingNotifier,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = KanbanContext::new("/path/to/repo/.kanban");
//! InitBoard::new("My Project").execute(&ctx).await.into_result()?;
//!
//! let session = BoardSession::open(
//!     Arc::new(ctx),
//!     Arc::new(TracingNotifier),
//!     SessionOptions::default(),
//! )
//! .await?;
//!
//! let board = session.view().await.board.id;
//! if let Some(pending) = session.drag_end(Gesture::move_column(board, "done", 2, 0)).await? {
//!     println!("{:?}", pending.wait().await?);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Storage Structure
//!
//! ```text
//! repo/
//! └── .kanban/
//!     ├── board.json
//!     ├── config.toml              # optional
//!     ├── columns/{id}.json
//!     ├── tasks/{id}.json
//!     └── activity/
//!         ├── current.jsonl        # task moves between columns
//!         └── operations.jsonl     # command journal
//! ```

pub mod activity;
pub mod board;
pub mod column;
mod commit;
pub mod config;
mod context;
mod error;
pub mod notice;
mod processor;
pub mod reorder;
mod session;
pub mod store;
pub mod task;
pub mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use taskboard_operations::{
    async_trait, Execute, ExecutionResult, LogEntry, Operation, OperationProcessor,
};

pub use commit::{commit_gesture, Committed};
pub use config::{ConfigError, KanbanConfig, RollbackStrategy};
pub use context::{KanbanContext, KanbanLock};
pub use error::{KanbanError, Result};
pub use notice::{Notice, NoticeLevel, Notifier, TracingNotifier};
pub use processor::KanbanOperationProcessor;
pub use reorder::{apply_move, MoveOutcome, MovePlan};
pub use session::{BoardSession, SessionOptions, WriteBack, WriteBackOutcome};
pub use store::{write_back, BoardStore, MemoryStore, RankTarget, RankWrite, WriteMode};

pub use types::{
    ActivityEvent, ActivityKind, Board, BoardId, BoardState, Column, ColumnId, ColumnLane,
    DragGesture, DragLocation, Gesture, RankBase, Task, TaskId,
};
