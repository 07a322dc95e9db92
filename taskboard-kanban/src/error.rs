//! Error types for the kanban engine

use std::path::PathBuf;
use thiserror::Error;

/// Result type for kanban operations
pub type Result<T> = std::result::Result<T, KanbanError>;

/// Errors that can occur in kanban operations
#[derive(Debug, Error)]
pub enum KanbanError {
    /// Board not initialized at the given path
    #[error("board not initialized at {path}")]
    NotInitialized { path: PathBuf },

    /// Board already exists
    #[error("board already exists at {path}")]
    AlreadyExists { path: PathBuf },

    #[error("task not found: {id}")]
    TaskNotFound { id: String },

    #[error("column not found: {id}")]
    ColumnNotFound { id: String },

    #[error("duplicate {item_type} ID: {id}")]
    DuplicateId { item_type: String, id: String },

    /// The gesture's source no longer matches the board: the item is not
    /// where the gesture says it was picked up
    #[error("stale gesture: '{item}' is not at index {index} of '{collection}'")]
    StaleGesture {
        item: String,
        collection: String,
        index: usize,
    },

    /// Drop position past the end of the destination collection
    #[error("index {index} is out of range for '{collection}' (length {len})")]
    IndexOutOfRange {
        collection: String,
        index: usize,
        len: usize,
    },

    /// Board ordering invariant does not hold
    #[error("board invariant violated: {message}")]
    InvariantViolation { message: String },

    #[error("missing required field: {field}")]
    MissingField { field: String },

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// A request to the persistence gateway was rejected or never arrived
    #[error("store request failed: {message}")]
    Store { message: String },

    /// The background write-back task ended without reporting
    #[error("write-back aborted: {message}")]
    WriteBackAborted { message: String },

    /// Lock is held by another process
    #[error("lock busy - another operation in progress")]
    LockBusy,

    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl KanbanError {
    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a duplicate ID error
    pub fn duplicate_id(item_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::DuplicateId {
            item_type: item_type.into(),
            id: id.into(),
        }
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Check if this is a retryable error
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LockBusy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KanbanError::TaskNotFound {
            id: "abc123".into(),
        };
        assert_eq!(err.to_string(), "task not found: abc123");

        let err = KanbanError::StaleGesture {
            item: "T1".into(),
            collection: "x".into(),
            index: 3,
        };
        assert_eq!(err.to_string(), "stale gesture: 'T1' is not at index 3 of 'x'");
    }

    #[test]
    fn test_store_error() {
        let err = KanbanError::store("connection reset");
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_retryable() {
        assert!(KanbanError::LockBusy.is_retryable());
        assert!(!KanbanError::TaskNotFound { id: "x".into() }.is_retryable());
        assert!(!KanbanError::store("down").is_retryable());
    }
}
