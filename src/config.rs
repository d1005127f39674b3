use std::fs;
use std::path::{Path, PathBuf};

use jiff::SignedDuration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::flatten::MAX_DEPTH;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config from '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Where the store lives, defaults to the local data directory
    #[serde(default)]
    pub store_path: Option<PathBuf>,

    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Seconds during which the last completion can be undone
    #[serde(default = "default_undo_window_secs")]
    pub undo_window_secs: u64,

    /// Used when RUST_LOG is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_max_depth() -> usize {
    MAX_DEPTH
}

fn default_undo_window_secs() -> u64 {
    3
}

fn default_log_filter() -> String {
    String::from("warn")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: None,
            max_depth: default_max_depth(),
            undo_window_secs: default_undo_window_secs(),
            log_filter: default_log_filter(),
        }
    }
}

impl Config {
    /// `<config dir>/organazr/config.toml`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("organazr")
            .join("config.toml")
    }

    /// Reads the config file. A missing file gives the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ConfigError::ReadFailed {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn store_path(&self) -> PathBuf {
        self.store_path.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("organazr")
                .join("store.json")
        })
    }

    pub fn undo_window(&self) -> SignedDuration {
        SignedDuration::from_secs(i64::try_from(self.undo_window_secs).unwrap_or(i64::MAX))
    }
}
