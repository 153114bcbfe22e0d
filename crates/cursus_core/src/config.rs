//! Core runtime configuration.
//!
//! # Responsibility
//! - Describe where records are stored and how logging is set up.
//! - Open the configured store connection.
//!
//! # Invariants
//! - `db_path = None` means an in-memory database (nothing survives exit).
//! - `log_dir = None` leaves logging uninitialized.

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::logging::{default_log_level, init_logging};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "CURSUS_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "CURSUS_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "CURSUS_LOG_DIR";

/// Configuration for a records session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreConfig {
    /// SQLite file holding the key-value store.
    #[serde(default)]
    pub db_path: Option<PathBuf>,
    /// One of `trace|debug|info|warn|error`.
    #[serde(default = "default_level_string")]
    pub log_level: String,
    /// Absolute directory for rolling log files.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_level_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Builds a config from `CURSUS_*` environment variables.
    ///
    /// Unset or blank variables fall back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: read(ENV_DB_PATH).map(PathBuf::from),
            log_level: read(ENV_LOG_LEVEL).unwrap_or_else(default_level_string),
            log_dir: read(ENV_LOG_DIR).map(PathBuf::from),
        }
    }

    /// Starts file logging when `log_dir` is set.
    ///
    /// Returns `Ok(false)` when logging is not configured.
    pub fn init_logging(&self) -> Result<bool, String> {
        let Some(dir) = self.log_dir.as_ref() else {
            return Ok(false);
        };
        let dir = dir
            .to_str()
            .ok_or_else(|| format!("log_dir is not valid UTF-8: `{}`", dir.display()))?;
        init_logging(&self.log_level, dir)?;
        Ok(true)
    }

    /// Opens the configured database with migrations applied.
    pub fn open_connection(&self) -> DbResult<Connection> {
        match self.db_path.as_ref() {
            Some(path) => open_db(path),
            None => open_db_in_memory(),
        }
    }
}

fn default_level_string() -> String {
    default_log_level().to_string()
}
