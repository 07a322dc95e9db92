//! Audit events

use super::ids::{ActivityId, ColumnId, TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// A task changed columns
    TaskMoved,
}

/// An immutable record of a state transition, written best-effort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub id: ActivityId,
    pub timestamp: DateTime<Utc>,
    pub kind: ActivityKind,
    pub item: TaskId,
    pub from: ColumnId,
    pub to: ColumnId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
}

impl ActivityEvent {
    /// A task moved from one column to another
    pub fn task_moved(item: TaskId, from: ColumnId, to: ColumnId) -> Self {
        Self {
            id: ActivityId::new(),
            timestamp: Utc::now(),
            kind: ActivityKind::TaskMoved,
            item,
            from,
            to,
            actor: None,
        }
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}
