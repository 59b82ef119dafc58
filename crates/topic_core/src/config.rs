//! Runtime configuration for topic log callers.
//!
//! # Responsibility
//! - Resolve where the entry store and log files live.
//! - Resolve the log level.
//!
//! # Invariants
//! - Precedence is explicit override, then environment, then per-user default.
//! - Blank environment values are ignored.
//! - The resolved `log_dir` is always absolute.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "TOPIC_DB";
pub const LOG_DIR_ENV: &str = "TOPIC_LOG_DIR";
pub const LOG_LEVEL_ENV: &str = "TOPIC_LOG_LEVEL";

const APP_DIR_NAME: &str = "topic";
const DB_FILE_NAME: &str = "topic.sqlite3";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug)]
pub enum ConfigError {
    /// No per-user data/cache directory could be determined.
    NoDataDir,
    /// The working directory was needed to absolutize a path but is unavailable.
    CurrentDir(std::io::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoDataDir => write!(
                f,
                "cannot determine a per-user data directory; set {DB_PATH_ENV} and {LOG_DIR_ENV}"
            ),
            Self::CurrentDir(err) => write!(f, "cannot read current directory: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NoDataDir => None,
            Self::CurrentDir(err) => Some(err),
        }
    }
}

/// Caller-supplied values that win over environment and defaults.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub db_path: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl TopicConfig {
    /// Resolves configuration from overrides, the process environment and
    /// per-user directories.
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    /// Same as [`TopicConfig::resolve`] with an explicit environment lookup.
    pub fn resolve_with(
        overrides: ConfigOverrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let lookup = |key: &str| {
            env(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = match overrides
            .db_path
            .or_else(|| lookup(DB_PATH_ENV).map(PathBuf::from))
        {
            Some(path) => path,
            None => default_db_path()?,
        };

        let log_dir = match overrides
            .log_dir
            .or_else(|| lookup(LOG_DIR_ENV).map(PathBuf::from))
        {
            Some(path) => absolutize(path)?,
            None => default_log_dir()?,
        };

        let log_level = overrides
            .log_level
            .or_else(|| lookup(LOG_LEVEL_ENV))
            .unwrap_or_else(|| default_log_level().to_string());

        Ok(Self {
            db_path,
            log_dir,
            log_level,
        })
    }
}

/// `<data_dir>/topic/topic.sqlite3`.
pub fn default_db_path() -> Result<PathBuf, ConfigError> {
    let base = dirs::data_dir().ok_or(ConfigError::NoDataDir)?;
    Ok(base.join(APP_DIR_NAME).join(DB_FILE_NAME))
}

/// `<cache_dir>/topic/logs`.
pub fn default_log_dir() -> Result<PathBuf, ConfigError> {
    let base = dirs::cache_dir().ok_or(ConfigError::NoDataDir)?;
    Ok(base.join(APP_DIR_NAME).join(LOG_DIR_NAME))
}

fn absolutize(path: PathBuf) -> Result<PathBuf, ConfigError> {
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
    Ok(cwd.join(path))
}
