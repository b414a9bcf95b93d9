//! Server configuration loaded from `sales-summary.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::execution::ExecutionOptions;
use crate::service::DEFAULT_PARALLEL_THRESHOLD_ROWS;

/// Default config file name, looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = "sales-summary.toml";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "SALES_SUMMARY_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("no configuration file found")]
    NotFound,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub dataset: DatasetConfig,
    pub logging: LoggingConfig,
    pub execution: ExecutionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to (default: 127.0.0.1)
    pub host: String,
    /// Port to listen on (default: 8000)
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Sales CSV loaded at startup.
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or `tracing` filter directive; `RUST_LOG` takes precedence.
    pub level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Filter large datasets on a rayon pool.
    pub parallel: bool,
    /// Worker threads; unset means available parallelism.
    pub num_threads: Option<usize>,
    /// Rows per parallel chunk.
    pub chunk_size: usize,
    /// Datasets smaller than this are filtered sequentially.
    pub parallel_threshold_rows: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/sales_data.csv"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            num_threads: None,
            chunk_size: ExecutionOptions::default().chunk_size,
            parallel_threshold_rows: DEFAULT_PARALLEL_THRESHOLD_ROWS,
        }
    }
}

impl ExecutionConfig {
    pub fn options(&self) -> ExecutionOptions {
        ExecutionOptions {
            num_threads: self.num_threads,
            chunk_size: self.chunk_size,
        }
    }
}

impl Config {
    /// Load configuration from the first file found in:
    /// 1. `$SALES_SUMMARY_CONFIG`
    /// 2. `./sales-summary.toml`
    pub fn load() -> Result<Self, ConfigError> {
        for path in candidate_paths(std::env::var_os(CONFIG_ENV_VAR)) {
            if path.exists() {
                return Self::load_from(&path);
            }
        }
        Err(ConfigError::NotFound)
    }

    /// Load configuration from a specific file. Missing keys take their defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `host:port` to bind the HTTP listener to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Config files to try, in order: the env override (if set), then the working-directory file.
fn candidate_paths(env_override: Option<std::ffi::OsString>) -> Vec<PathBuf> {
    env_override
        .map(PathBuf::from)
        .into_iter()
        .chain(std::iter::once(PathBuf::from(CONFIG_FILE_NAME)))
        .collect()
}
