//! Task record

use super::ids::{ColumnId, TaskId};
use crate::error::{KanbanError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A task/card. Owned by exactly one column at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Owning column
    pub column: ColumnId,

    /// Rank within the owning column
    pub order: usize,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assignees: Vec<String>,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a task at `order` in `column`
    pub fn new(title: impl Into<String>, column: impl Into<ColumnId>, order: usize) -> Self {
        Self {
            id: TaskId::new(),
            title: title.into(),
            description: String::new(),
            column: column.into(),
            order,
            labels: Vec::new(),
            assignees: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Replace the generated id
    pub fn with_id(mut self, id: impl Into<TaskId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_assignees(mut self, assignees: Vec<String>) -> Self {
        self.assignees = assignees;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.as_str().is_empty() {
            return Err(KanbanError::missing_field("id"));
        }
        if self.title.trim().is_empty() {
            return Err(KanbanError::invalid_value("title", "task title is empty"));
        }
        if !self.column.is_valid_slug() {
            return Err(KanbanError::invalid_value(
                "column",
                format!("'{}' is not a valid column slug", self.column),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_creation() {
        let task = Task::new("Write docs", "todo", 1);
        assert_eq!(task.title, "Write docs");
        assert_eq!(task.column.as_str(), "todo");
        assert_eq!(task.order, 1);
        assert!(task.validate().is_ok());
    }

    #[test]
    fn test_task_validation() {
        assert!(Task::new("", "todo", 1).validate().is_err());
        assert!(Task::new("ok", "To Do", 1).validate().is_err());
        assert!(Task::new("ok", "todo", 1).with_id("").validate().is_err());
    }

    #[test]
    fn test_task_minimal_json() {
        let json = r#"{"id": "T1", "title": "Hello", "column": "todo", "order": 2}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id.as_str(), "T1");
        assert!(task.labels.is_empty());
        assert!(task.description.is_empty());
    }

    #[test]
    fn test_task_rejects_missing_column() {
        let json = r#"{"id": "T1", "title": "Hello", "order": 2}"#;
        assert!(serde_json::from_str::<Task>(json).is_err());
    }

    #[test]
    fn test_task_serialization_omits_empty_fields() {
        let task = Task::new("Hello", "todo", 1);
        let value = serde_json::to_value(&task).unwrap();
        assert!(value.get("labels").is_none());
        assert!(value.get("description").is_none());
        assert_eq!(value["column"], "todo");
    }
}
