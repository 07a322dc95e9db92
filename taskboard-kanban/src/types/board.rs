//! Board-level types: Board, Column, RankBase

use super::ids::{BoardId, ColumnId};
use crate::error::{KanbanError, Result};
use serde::{Deserialize, Serialize};

/// Where a board's ranks start counting.
///
/// A board keeps one convention for its whole life; every renumbering uses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankBase {
    Zero,
    #[default]
    One,
}

impl RankBase {
    /// First rank of a collection
    pub fn start(self) -> usize {
        match self {
            Self::Zero => 0,
            Self::One => 1,
        }
    }

    /// Rank for the item at `index` in its collection
    pub fn rank(self, index: usize) -> usize {
        self.start() + index
    }

    /// Rank after the highest of `orders`, or the first rank when empty
    pub fn next_after(self, orders: impl IntoIterator<Item = usize>) -> usize {
        orders
            .into_iter()
            .max()
            .map(|o| o + 1)
            .unwrap_or_else(|| self.start())
    }

    /// Whether `orders`, in sequence, are exactly `start, start + 1, ...`
    pub fn is_contiguous(self, orders: impl IntoIterator<Item = usize>) -> bool {
        orders
            .into_iter()
            .enumerate()
            .all(|(index, order)| order == self.rank(index))
    }
}

/// The board record. Columns and tasks live in their own rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Rank convention for every collection on this board
    #[serde(default)]
    pub rank_base: RankBase,
}

impl Board {
    /// Create a new board with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: BoardId::new(),
            name: name.into(),
            description: None,
            rank_base: RankBase::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_rank_base(mut self, rank_base: RankBase) -> Self {
        self.rank_base = rank_base;
        self
    }

    /// The columns a freshly initialized board starts with
    pub fn default_columns(&self) -> Vec<Column> {
        [("todo", "To Do"), ("doing", "Doing"), ("done", "Done")]
            .into_iter()
            .enumerate()
            .map(|(index, (id, name))| Column::new(id, name, self.rank_base.rank(index)))
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(KanbanError::invalid_value("name", "board name is empty"));
        }
        Ok(())
    }
}

/// A column: one ordered stage of the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub name: String,
    pub order: usize,
}

impl Column {
    pub fn new(id: impl Into<ColumnId>, name: impl Into<String>, order: usize) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            order,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.id.is_valid_slug() {
            return Err(KanbanError::invalid_value(
                "id",
                format!("'{}' is not a valid column slug", self.id),
            ));
        }
        if self.name.trim().is_empty() {
            return Err(KanbanError::invalid_value("name", "column name is empty"));
        }
        Ok(())
    }
}
