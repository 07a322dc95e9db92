//! Drag-and-drop gestures

use super::ids::{BoardId, ColumnId, TaskId};
use serde::{Deserialize, Serialize};

/// A position inside an ordered collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragLocation<C> {
    pub collection: C,
    pub index: usize,
}

impl<C> DragLocation<C> {
    pub fn new(collection: impl Into<C>, index: usize) -> Self {
        Self {
            collection: collection.into(),
            index,
        }
    }
}

/// One finished drag: what was picked up, where from, and where it landed.
///
/// `destination` is `None` when the item was dropped outside every target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragGesture<C, I> {
    pub item: I,
    pub source: DragLocation<C>,
    pub destination: Option<DragLocation<C>>,
}

impl<C: PartialEq, I> DragGesture<C, I> {
    /// Whether the drop landed outside every target
    pub fn is_cancelled(&self) -> bool {
        self.destination.is_none()
    }

    /// Whether the item lands in a different collection than it left
    pub fn crosses_collections(&self) -> bool {
        self.destination
            .as_ref()
            .is_some_and(|d| d.collection != self.source.collection)
    }
}

/// Columns are reordered within their board; tasks move within and between columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Gesture {
    Column(DragGesture<BoardId, ColumnId>),
    Task(DragGesture<ColumnId, TaskId>),
}

impl Gesture {
    /// A task dragged from `from[from_index]` and dropped at `to[to_index]`
    pub fn move_task(
        item: impl Into<TaskId>,
        from: impl Into<ColumnId>,
        from_index: usize,
        to: impl Into<ColumnId>,
        to_index: usize,
    ) -> Self {
        Self::Task(DragGesture {
            item: item.into(),
            source: DragLocation::new(from, from_index),
            destination: Some(DragLocation::new(to, to_index)),
        })
    }

    /// A task picked up and released outside any column
    pub fn cancelled_task(
        item: impl Into<TaskId>,
        from: impl Into<ColumnId>,
        from_index: usize,
    ) -> Self {
        Self::Task(DragGesture {
            item: item.into(),
            source: DragLocation::new(from, from_index),
            destination: None,
        })
    }

    /// A column dragged from `from_index` to `to_index` on `board`
    pub fn move_column(
        board: impl Into<BoardId>,
        item: impl Into<ColumnId>,
        from_index: usize,
        to_index: usize,
    ) -> Self {
        let board = board.into();
        Self::Column(DragGesture {
            item: item.into(),
            source: DragLocation::new(board.clone(), from_index),
            destination: Some(DragLocation::new(board, to_index)),
        })
    }

    /// A column picked up on `board` and released outside the board
    pub fn cancelled_column(
        board: impl Into<BoardId>,
        item: impl Into<ColumnId>,
        from_index: usize,
    ) -> Self {
        Self::Column(DragGesture {
            item: item.into(),
            source: DragLocation::new(board, from_index),
            destination: None,
        })
    }

    pub fn is_cancelled(&self) -> bool {
        match self {
            Self::Column(g) => g.is_cancelled(),
            Self::Task(g) => g.is_cancelled(),
        }
    }

    pub fn crosses_collections(&self) -> bool {
        match self {
            Self::Column(g) => g.crosses_collections(),
            Self::Task(g) => g.crosses_collections(),
        }
    }

    /// The dragged item's id as a string, for logging
    pub fn item_str(&self) -> &str {
        match self {
            Self::Column(g) => g.item.as_str(),
            Self::Task(g) => g.item.as_str(),
        }
    }
}
