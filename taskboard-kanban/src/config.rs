//! Engine configuration
//!
//! Sources, later ones winning:
//! 1. built-in defaults
//! 2. `config.toml`, `config.yaml`/`config.yml`, `config.json` inside the `.kanban` directory
//! 3. `TASKBOARD_*` environment variables (`TASKBOARD_RANK_BASE=zero`)

use crate::store::WriteMode;
use crate::types::RankBase;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "TASKBOARD_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        Self::Figment(Box::new(error))
    }
}

/// How the optimistic view recovers after a failed write-back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollbackStrategy {
    /// Reload the board from the store; fall back to the snapshot if that fails too
    #[default]
    Refetch,
    /// Restore the pre-gesture snapshot without asking the store
    Snapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KanbanConfig {
    /// Rank convention for boards created from now on
    pub rank_base: RankBase,
    pub write_mode: WriteMode,
    pub rollback: RollbackStrategy,
    /// How long an error notice stays on screen
    pub notice_ttl_ms: u64,
    /// Recorded on audit events
    pub actor: Option<String>,
}

impl Default for KanbanConfig {
    fn default() -> Self {
        Self {
            rank_base: RankBase::default(),
            write_mode: WriteMode::default(),
            rollback: RollbackStrategy::default(),
            notice_ttl_ms: 4000,
            actor: None,
        }
    }
}

impl KanbanConfig {
    /// Load configuration for the board rooted at `kanban_dir`
    pub fn load(kanban_dir: &Path) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(kanban_dir).extract()?;
        debug!(?config, "loaded kanban configuration");
        Ok(config)
    }

    /// The layered figment, exposed so callers can merge extra providers
    pub fn figment(kanban_dir: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(kanban_dir.join("config.toml")))
            .merge(Yaml::file(kanban_dir.join("config.yaml")))
            .merge(Yaml::file(kanban_dir.join("config.yml")))
            .merge(Json::file(kanban_dir.join("config.json")))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn notice_ttl(&self) -> Duration {
        Duration::from_millis(self.notice_ttl_ms)
    }
}
