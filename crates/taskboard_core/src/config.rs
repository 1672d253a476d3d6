//! Process configuration read from the environment.
//!
//! # Responsibility
//! - Resolve listen port, database location and logging options.
//! - Keep parsing pure (`from_lookup`) so it can be tested without touching
//!   the real process environment.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const PORT_VAR: &str = "PORT";
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const LOG_LEVEL_VAR: &str = "TASKBOARD_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "TASKBOARD_LOG_DIR";

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATABASE_PATH: &str = "taskboard.sqlite3";
const MEMORY_DATABASE_URL: &str = ":memory:";
const SQLITE_SCHEME: &str = "sqlite://";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidPort(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPort(raw) => {
                write!(f, "{PORT_VAR} must be a port number in 0..=65535, got `{raw}`")
            }
        }
    }
}

impl Error for ConfigError {}

/// Where task records are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    File(PathBuf),
    Memory,
}

impl DatabaseLocation {
    /// Parses a connection string.
    ///
    /// Accepts a bare path, a `sqlite://` prefixed path, or `:memory:`.
    /// Blank input falls back to the default file.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let path = trimmed.strip_prefix(SQLITE_SCHEME).unwrap_or(trimmed);
        if path == MEMORY_DATABASE_URL {
            return Self::Memory;
        }
        if path.is_empty() {
            return Self::File(PathBuf::from(DEFAULT_DATABASE_PATH));
        }
        Self::File(PathBuf::from(path))
    }
}

impl Display for DatabaseLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Memory => write!(f, "{MEMORY_DATABASE_URL}"),
        }
    }
}

/// Store service settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub database: DatabaseLocation,
    pub log_level: String,
    /// Rolling log directory; `None` logs to stderr.
    pub log_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database: DatabaseLocation::File(PathBuf::from(DEFAULT_DATABASE_PATH)),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl ServerConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(raw) = read(PORT_VAR) {
            config.port = raw
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?;
        }
        if let Some(raw) = read(DATABASE_URL_VAR) {
            config.database = DatabaseLocation::parse(&raw);
        }
        if let Some(level) = read(LOG_LEVEL_VAR) {
            config.log_level = level;
        }
        config.log_dir = read(LOG_DIR_VAR).map(PathBuf::from);
        Ok(config)
    }
}
