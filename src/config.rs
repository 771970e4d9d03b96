//! Configuration management and validation.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `STANDINGS_*` environment variables, then command-line overrides applied by
//! the CLI layer. Every section is `#[serde(default)]`, so a config file only
//! needs the keys it changes.

use crate::constants::{
    APP_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_LOG_LEVEL, DEFAULT_PAGE_SIZE, VALID_LOG_LEVELS,
    env_vars,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Result store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Root of the JSON result store
    pub data_dir: PathBuf,

    /// Result rows per page file
    pub page_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .unwrap_or_else(|| PathBuf::from("data")),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Where scraped classification tables are read from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub tables_dir: PathBuf,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            tables_dir: PathBuf::from("tables"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StandingsConfig {
    /// Aggregate and report without writing standings back
    pub dry_run: bool,

    /// Show a progress bar while standings are written back
    pub show_progress: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub tables: TableConfig,
    pub standings: StandingsConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// `<config_dir>/standings-processor/config.toml`
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::configuration("Could not determine user config directory"))?;
        Ok(config_dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Parse a TOML config file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("Failed to read config file {}", path.display()), e))?;
        Self::from_toml(&content)
            .map_err(|e| Error::configuration(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::configuration(format!("Invalid TOML: {}", e)))
    }

    /// Defaults, then `config_file` when given, then the environment
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply `STANDINGS_*` environment variables
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup shaped like the environment
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(dir) = lookup(env_vars::DATA_DIR) {
            debug!("{} overrides data directory: {}", env_vars::DATA_DIR, dir);
            self.store.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(env_vars::TABLES_DIR) {
            debug!("{} overrides tables directory: {}", env_vars::TABLES_DIR, dir);
            self.tables.tables_dir = PathBuf::from(dir);
        }
        if let Some(size) = lookup(env_vars::PAGE_SIZE) {
            self.store.page_size = size.trim().parse().map_err(|_| {
                Error::configuration(format!(
                    "{} must be a positive integer, got '{}'",
                    env_vars::PAGE_SIZE,
                    size
                ))
            })?;
        }
        if let Some(level) = lookup(env_vars::LOG_LEVEL) {
            self.logging.level = level.trim().to_lowercase();
        }
        Ok(())
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.store.data_dir = data_dir.into();
        self
    }

    pub fn with_tables_dir(mut self, tables_dir: impl Into<PathBuf>) -> Self {
        self.tables.tables_dir = tables_dir.into();
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.store.page_size = page_size;
        self
    }

    pub fn with_dry_run(mut self) -> Self {
        self.standings.dry_run = true;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.store.page_size == 0 {
            return Err(Error::configuration("store.page_size must be at least 1"));
        }
        if self.store.data_dir.as_os_str().is_empty() {
            return Err(Error::configuration("store.data_dir must not be empty"));
        }
        if self.tables.tables_dir.as_os_str().is_empty() {
            return Err(Error::configuration("tables.tables_dir must not be empty"));
        }
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(Error::configuration(format!(
                "Unknown log level '{}', expected one of: {}",
                self.logging.level,
                VALID_LOG_LEVELS.join(", ")
            )));
        }
        Ok(())
    }
}
