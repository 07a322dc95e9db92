//! User-facing notices raised by the session

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A short-lived message for whoever is looking at the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// How long to keep it on screen
    pub ttl: Duration,
}

impl Notice {
    pub fn info(message: impl Into<String>, ttl: Duration) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
            ttl,
        }
    }

    pub fn error(message: impl Into<String>, ttl: Duration) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
            ttl,
        }
    }
}

/// Where notices go. UIs implement this to show a toast.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Writes notices to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        let ttl_ms = notice.ttl.as_millis() as u64;
        match notice.level {
            NoticeLevel::Info => info!(ttl_ms, "{}", notice.message),
            NoticeLevel::Error => error!(ttl_ms, "{}", notice.message),
        }
    }
}
