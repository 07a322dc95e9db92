//! # Taskboard Operations
//!
//! Commands are plain structs whose fields are their parameters. The
//! `#[operation]` attribute gives each one a verb and a noun, and
//! [`Execute`] runs it against a context, returning an [`ExecutionResult`]
//! that says whether the run belongs in the operation journal.
//!
//! ## Example
//!
//! ```ignore
//! use taskboard_operations::*;
//!
//! #[operation(verb = "add", noun = "task", description = "Append a task to a column")]
//! #[derive(Debug, Deserialize, Serialize)]
//! pub struct AddTask {
//!     pub title: String,
//!     pub column: ColumnId,
//! }
//!
//! #[async_trait]
//! impl Execute<KanbanContext, KanbanError> for AddTask {
//!     async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
//!         // returns ExecutionResult::Logged for mutations, Unlogged for reads
//!     }
//! }
//! ```

// Lets the `#[operation]` expansion name this crate from inside its own tests.
extern crate self as taskboard_operations;

mod execution_result;
mod log;
mod operation;
mod processor;

pub use execution_result::ExecutionResult;
pub use log::LogEntry;
pub use operation::{Execute, Operation};
pub use processor::OperationProcessor;

pub use taskboard_operations_macros::operation;

pub use async_trait::async_trait;
pub use serde_json::Value;
