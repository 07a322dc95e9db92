//! KanbanContext - file-backed board storage
//!
//! One JSON file per row under the `.kanban` directory:
//!
//! ```text
//! .kanban/
//!   board.json
//!   columns/{id}.json
//!   tasks/{id}.json
//!   activity/current.jsonl      audit events
//!   activity/operations.jsonl   operation journal
//!   .lock
//! ```
//!
//! The context provides data access, not logic. Commands do the work and
//! take the lock around read-compute-write; the [`BoardStore`] methods here
//! never lock on their own.

use crate::config::KanbanConfig;
use crate::error::{KanbanError, Result};
use crate::store::{BoardStore, RankTarget, RankWrite};
use crate::types::{ActivityEvent, Board, BoardState, Column, ColumnId, Task, TaskId};
use async_trait::async_trait;
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use taskboard_operations::LogEntry;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Context passed to every command - provides access, not logic
pub struct KanbanContext {
    /// Path to the .kanban directory
    root: PathBuf,
    config: KanbanConfig,
}

impl KanbanContext {
    /// Create a context with default configuration
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config: KanbanConfig::default(),
        }
    }

    /// Create a context, loading configuration from the directory and environment
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let config = KanbanConfig::load(&root)?;
        Ok(Self { root, config })
    }

    pub fn with_config(mut self, config: KanbanConfig) -> Self {
        self.config = config;
        self
    }

    /// Find the nearest .kanban directory at or above `start`
    pub fn find(start: impl AsRef<Path>) -> Result<Self> {
        let mut current = start.as_ref().to_path_buf();

        loop {
            let kanban_dir = current.join(".kanban");
            if kanban_dir.is_dir() {
                return Self::open(kanban_dir);
            }

            if !current.pop() {
                return Err(KanbanError::NotInitialized {
                    path: start.as_ref().to_path_buf(),
                });
            }
        }
    }

    pub fn config(&self) -> &KanbanConfig {
        &self.config
    }

    // =========================================================================
    // Path helpers
    // =========================================================================

    /// Get the root .kanban directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn board_path(&self) -> PathBuf {
        self.root.join("board.json")
    }

    pub fn columns_dir(&self) -> PathBuf {
        self.root.join("columns")
    }

    pub fn column_path(&self, id: &ColumnId) -> PathBuf {
        self.columns_dir().join(format!("{}.json", id))
    }

    pub fn tasks_dir(&self) -> PathBuf {
        self.root.join("tasks")
    }

    pub fn task_path(&self, id: &TaskId) -> PathBuf {
        self.tasks_dir().join(format!("{}.json", id))
    }

    pub fn activity_dir(&self) -> PathBuf {
        self.root.join("activity")
    }

    /// Audit events
    pub fn activity_path(&self) -> PathBuf {
        self.activity_dir().join("current.jsonl")
    }

    /// Operation journal
    pub fn journal_path(&self) -> PathBuf {
        self.activity_dir().join("operations.jsonl")
    }

    pub fn lock_path(&self) -> PathBuf {
        self.root.join(".lock")
    }

    // =========================================================================
    // Directory initialization
    // =========================================================================

    /// Check if the board is initialized
    pub fn is_initialized(&self) -> bool {
        self.board_path().exists()
    }

    /// Check if all required directories exist
    pub fn directories_exist(&self) -> bool {
        self.root.exists()
            && self.columns_dir().exists()
            && self.tasks_dir().exists()
            && self.activity_dir().exists()
    }

    /// Create the directory structure for a new board. Idempotent.
    pub async fn create_directories(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        fs::create_dir_all(self.columns_dir()).await?;
        fs::create_dir_all(self.tasks_dir()).await?;
        fs::create_dir_all(self.activity_dir()).await?;
        Ok(())
    }

    /// Ensure directories exist, creating them if needed
    pub async fn ensure_directories(&self) -> Result<()> {
        if !self.directories_exist() {
            self.create_directories().await?;
        }
        Ok(())
    }

    // =========================================================================
    // Board I/O
    // =========================================================================

    pub async fn read_board(&self) -> Result<Board> {
        let path = self.board_path();
        if !path.exists() {
            return Err(KanbanError::NotInitialized {
                path: self.root.clone(),
            });
        }
        read_json(&path).await
    }

    pub async fn write_board(&self, board: &Board) -> Result<()> {
        write_json(&self.board_path(), board).await
    }

    // =========================================================================
    // Column I/O
    // =========================================================================

    pub async fn read_column(&self, id: &ColumnId) -> Result<Column> {
        let path = self.column_path(id);
        if !path.exists() {
            return Err(KanbanError::ColumnNotFound { id: id.to_string() });
        }
        read_json(&path).await
    }

    pub async fn write_column(&self, column: &Column) -> Result<()> {
        write_json(&self.column_path(&column.id), column).await
    }

    pub async fn column_exists(&self, id: &ColumnId) -> bool {
        self.column_path(id).exists()
    }

    pub async fn list_column_ids(&self) -> Result<Vec<ColumnId>> {
        Ok(list_stems(&self.columns_dir())
            .await?
            .into_iter()
            .map(ColumnId::from_string)
            .collect())
    }

    pub async fn read_all_columns(&self) -> Result<Vec<Column>> {
        let ids = self.list_column_ids().await?;
        let mut columns = Vec::with_capacity(ids.len());
        for id in ids {
            columns.push(self.read_column(&id).await?);
        }
        Ok(columns)
    }

    // =========================================================================
    // Task I/O
    // =========================================================================

    pub async fn read_task(&self, id: &TaskId) -> Result<Task> {
        let path = self.task_path(id);
        if !path.exists() {
            return Err(KanbanError::TaskNotFound { id: id.to_string() });
        }
        read_json(&path).await
    }

    pub async fn write_task(&self, task: &Task) -> Result<()> {
        write_json(&self.task_path(&task.id), task).await
    }

    pub async fn list_task_ids(&self) -> Result<Vec<TaskId>> {
        Ok(list_stems(&self.tasks_dir())
            .await?
            .into_iter()
            .map(TaskId::from_string)
            .collect())
    }

    pub async fn read_all_tasks(&self) -> Result<Vec<Task>> {
        let ids = self.list_task_ids().await?;
        let mut tasks = Vec::with_capacity(ids.len());
        for id in ids {
            tasks.push(self.read_task(&id).await?);
        }
        Ok(tasks)
    }

    // =========================================================================
    // Logs
    // =========================================================================

    /// Append an entry to the operation journal
    pub async fn append_journal(&self, entry: &LogEntry) -> Result<()> {
        append_line(&self.journal_path(), entry).await
    }

    /// Operation journal entries, newest first
    pub async fn read_journal(&self, limit: Option<usize>) -> Result<Vec<LogEntry>> {
        read_lines(&self.journal_path(), limit).await
    }

    // =========================================================================
    // Locking
    // =========================================================================

    /// Try to acquire an exclusive lock (non-blocking)
    pub async fn lock(&self) -> Result<KanbanLock> {
        let lock_path = self.lock_path();

        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&lock_path)?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(KanbanLock { file }),
            Err(_) => Err(KanbanError::LockBusy),
        }
    }

    // =========================================================================
    // Rank writes
    // =========================================================================

    /// Read the row a write targets and return its path and new contents
    async fn stage(&self, write: &RankWrite) -> Result<(PathBuf, String)> {
        match write {
            RankWrite::Order {
                target: RankTarget::Column(id),
                order,
            } => {
                let mut column = self.read_column(id).await?;
                column.order = *order;
                Ok((self.column_path(id), serde_json::to_string_pretty(&column)?))
            }
            RankWrite::Order {
                target: RankTarget::Task(id),
                order,
            } => {
                let mut task = self.read_task(id).await?;
                task.order = *order;
                Ok((self.task_path(id), serde_json::to_string_pretty(&task)?))
            }
            RankWrite::OrderAndParent {
                task,
                order,
                column,
            } => {
                if !self.column_exists(column).await {
                    return Err(KanbanError::ColumnNotFound {
                        id: column.to_string(),
                    });
                }
                let mut row = self.read_task(task).await?;
                row.order = *order;
                row.column = column.clone();
                Ok((self.task_path(task), serde_json::to_string_pretty(&row)?))
            }
        }
    }
}

#[async_trait]
impl BoardStore for KanbanContext {
    async fn load_board(&self) -> Result<BoardState> {
        let board = self.read_board().await?;
        let columns = self.read_all_columns().await?;
        let tasks = self.read_all_tasks().await?;
        Ok(BoardState::from_rows(board, columns, tasks))
    }

    async fn update_order(&self, target: &RankTarget, order: usize) -> Result<()> {
        let write = RankWrite::Order {
            target: target.clone(),
            order,
        };
        let (path, content) = self.stage(&write).await?;
        atomic_write(&path, content.as_bytes()).await
    }

    async fn update_order_and_parent(
        &self,
        task: &TaskId,
        order: usize,
        column: &ColumnId,
    ) -> Result<()> {
        let write = RankWrite::OrderAndParent {
            task: task.clone(),
            order,
            column: column.clone(),
        };
        let (path, content) = self.stage(&write).await?;
        atomic_write(&path, content.as_bytes()).await
    }

    async fn append_activity(&self, event: &ActivityEvent) -> Result<()> {
        append_line(&self.activity_path(), event).await
    }

    async fn read_activity(&self, limit: Option<usize>) -> Result<Vec<ActivityEvent>> {
        read_lines(&self.activity_path(), limit).await
    }

    /// Stage every row into a temp file before renaming any of them, so a
    /// missing row or a failed write leaves the board untouched.
    async fn write_ranks(&self, writes: &[RankWrite]) -> Result<()> {
        let mut staged = Vec::with_capacity(writes.len());
        for write in writes {
            staged.push(self.stage(write).await?);
        }

        let mut temps = Vec::with_capacity(staged.len());
        for (path, content) in &staged {
            let temp = temp_path(path);
            if let Err(e) = fs::write(&temp, content).await {
                remove_temps(&temps).await;
                return Err(e.into());
            }
            temps.push(temp);
        }

        for ((path, _), temp) in staged.iter().zip(&temps) {
            fs::rename(temp, path).await?;
        }

        debug!(rows = staged.len(), "committed rank batch");
        Ok(())
    }
}

/// RAII lock guard - releases on drop
pub struct KanbanLock {
    file: std::fs::File,
}

impl Drop for KanbanLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

fn temp_path(path: &Path) -> PathBuf {
    path.with_extension("tmp")
}

async fn remove_temps(temps: &[PathBuf]) {
    for temp in temps {
        if let Err(e) = fs::remove_file(temp).await {
            warn!(path = %temp.display(), error = %e, "failed to remove temp file");
        }
    }
}

/// Atomic write via temp file and rename
async fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let temp = temp_path(path);
    fs::write(&temp, content).await?;
    fs::rename(&temp, path).await?;

    Ok(())
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    atomic_write(path, content.as_bytes()).await
}

/// File stems of the `.json` files in `dir`
async fn list_stems(dir: &Path) -> Result<Vec<String>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut stems = Vec::new();
    let mut entries = fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("json") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                stems.push(stem.to_string());
            }
        }
    }

    Ok(stems)
}

/// Append one JSON line
async fn append_line<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut line = serde_json::to_string(value)?;
    line.push('\n');

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;

    file.write_all(line.as_bytes()).await?;
    file.flush().await?;

    Ok(())
}

/// Read a JSONL file newest first, skipping lines that don't parse
async fn read_lines<T: DeserializeOwned>(path: &Path, limit: Option<usize>) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path).await?;
    let mut entries: Vec<T> = content
        .lines()
        .filter(|line| !line.is_empty())
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect();

    entries.reverse();

    if let Some(limit) = limit {
        entries.truncate(limit);
    }

    Ok(entries)
}
