//! Core types for the kanban engine

mod activity;
mod board;
mod gesture;
mod ids;
mod state;
mod task;

pub use activity::{ActivityEvent, ActivityKind};
pub use board::{Board, Column, RankBase};
pub use gesture::{DragGesture, DragLocation, Gesture};
pub use ids::{ActivityId, BoardId, ColumnId, TaskId};
pub use state::{BoardState, ColumnLane};
pub use task::Task;
