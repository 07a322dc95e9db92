//! Execution result types for operations

use crate::LogEntry;
use serde_json::Value;
use std::fmt::Display;

/// Result of executing an operation
///
/// - `Logged`: the operation changed state and belongs in the journal
/// - `Unlogged`: a read with no side effects
/// - `Failed`: an error, with a journal entry when the attempt itself matters
pub enum ExecutionResult<T, E> {
    Logged { value: T, log_entry: LogEntry },
    Unlogged { value: T },
    Failed {
        error: E,
        log_entry: Option<LogEntry>,
    },
}

impl<E: Display> ExecutionResult<Value, E> {
    /// Wrap the outcome of a mutating operation, journaling success and failure alike.
    pub fn journaled(
        op: impl Into<String>,
        input: Value,
        result: Result<Value, E>,
        duration_ms: u64,
    ) -> Self {
        match result {
            Ok(value) => Self::Logged {
                log_entry: LogEntry::new(op, input, value.clone(), None, duration_ms),
                value,
            },
            Err(error) => {
                let output = serde_json::json!({ "error": error.to_string() });
                Self::Failed {
                    log_entry: Some(LogEntry::new(op, input, output, None, duration_ms)),
                    error,
                }
            }
        }
    }

    /// Wrap the outcome of a read-only operation; nothing is journaled.
    pub fn read_only(result: Result<Value, E>) -> Self {
        match result {
            Ok(value) => Self::Unlogged { value },
            Err(error) => Self::Failed {
                error,
                log_entry: None,
            },
        }
    }
}

impl<T, E> ExecutionResult<T, E> {
    /// Extract the result (Ok or Err)
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Self::Logged { value, .. } | Self::Unlogged { value } => Ok(value),
            Self::Failed { error, .. } => Err(error),
        }
    }

    /// Get the value and log entry separately
    pub fn split(self) -> (Result<T, E>, Option<LogEntry>) {
        match self {
            Self::Logged { value, log_entry } => (Ok(value), Some(log_entry)),
            Self::Unlogged { value } => (Ok(value), None),
            Self::Failed { error, log_entry } => (Err(error), log_entry),
        }
    }

    /// Check if this should be logged
    pub fn should_log(&self) -> bool {
        matches!(
            self,
            Self::Logged { .. }
                | Self::Failed {
                    log_entry: Some(_),
                    ..
                }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_journaled_success() {
        let result: ExecutionResult<Value, String> = ExecutionResult::journaled(
            "add task",
            serde_json::json!({"title": "x"}),
            Ok(serde_json::json!({"id": "t1"})),
            3,
        );
        assert!(result.should_log());
        let (value, entry) = result.split();
        assert_eq!(value.unwrap()["id"], "t1");
        let entry = entry.unwrap();
        assert_eq!(entry.op, "add task");
        assert_eq!(entry.output["id"], "t1");
    }

    #[test]
    fn test_journaled_failure_records_error() {
        let result: ExecutionResult<Value, String> = ExecutionResult::journaled(
            "move task",
            Value::Null,
            Err("column not found: nope".to_string()),
            1,
        );
        assert!(result.should_log());
        let (value, entry) = result.split();
        assert_eq!(value.unwrap_err(), "column not found: nope");
        assert_eq!(entry.unwrap().output["error"], "column not found: nope");
    }

    #[test]
    fn test_read_only_is_unlogged() {
        let ok: ExecutionResult<Value, String> = ExecutionResult::read_only(Ok(Value::Null));
        assert!(!ok.should_log());

        let err: ExecutionResult<Value, String> =
            ExecutionResult::read_only(Err("boom".to_string()));
        assert!(!err.should_log());
        assert!(err.into_result().is_err());
    }
}
