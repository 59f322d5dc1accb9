//! Store configuration, loaded from `soulstore.toml` with environment overrides.

use crate::core::error::SoulError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "soulstore.toml";
pub const DATA_DIR_ENV: &str = "SOULSTORE_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the database file. Created on open.
    pub data_dir: PathBuf,
    pub db_name: String,
    /// How long a connection waits on a locked database before failing.
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            db_name: "soul.db".to_string(),
            busy_timeout_ms: 5_000,
        }
    }
}

impl StoreConfig {
    /// Config rooted at `data_dir` with every other field defaulted.
    pub fn at(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_name)
    }

    fn apply_env_overrides(mut self, data_dir: Option<String>) -> Self {
        if let Some(dir) = data_dir.filter(|d| !d.trim().is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        self
    }
}

/// Load store config from `<dir>/soulstore.toml`.
/// A missing file yields the defaults; `SOULSTORE_DATA_DIR` wins over both.
pub fn load_store_config(dir: &Path) -> Result<StoreConfig, SoulError> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    let config = if config_path.exists() {
        let content = fs::read_to_string(&config_path).map_err(SoulError::IoError)?;
        parse_store_config(&content)?
    } else {
        StoreConfig::default()
    };

    Ok(config.apply_env_overrides(std::env::var(DATA_DIR_ENV).ok()))
}

pub fn parse_store_config(content: &str) -> Result<StoreConfig, SoulError> {
    toml::from_str(content).map_err(|e| SoulError::ConfigError(e.to_string()))
}
