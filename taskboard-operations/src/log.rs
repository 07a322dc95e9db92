//! Journal entries for executed operations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One line of the operation journal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// ULID
    pub id: String,

    pub timestamp: DateTime<Utc>,

    /// Canonical op string (e.g. "add task", "move column")
    pub op: String,

    /// The operation's parameters as JSON
    pub input: Value,

    /// The result value, or `{"error": ...}`
    pub output: Value,

    /// Who performed the operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,

    pub duration_ms: u64,
}

impl LogEntry {
    pub fn new(
        op: impl Into<String>,
        input: Value,
        output: Value,
        actor: Option<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            timestamp: Utc::now(),
            op: op.into(),
            input,
            output,
            actor,
            duration_ms,
        }
    }

    /// Set the actor
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Whether the journaled attempt failed
    pub fn is_error(&self) -> bool {
        self.output.get("error").is_some()
    }
}
