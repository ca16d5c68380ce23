//! # Service Configuration
//!
//! JSON configuration file with every field defaulted. A missing file means
//! all defaults. A handful of environment variables override the file:
//!
//! | Variable | Field |
//! |---|---|
//! | `ES_PRIMARY` | `search.primary_url` |
//! | `ES_FALLBACK` | `search.secondary_url` |
//! | `DB_PATH` | `relational.path` |
//! | `API_PORT` | `server.port` |

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::EndpointSet;
use crate::relational::RetryPolicy;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub relational: RelationalConfig,

    /// `EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default)]
    pub log_filter: Option<String>,
}

/// HTTP listener
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Search backend endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_primary_url")]
    pub primary_url: String,

    #[serde(default = "default_secondary_url")]
    pub secondary_url: String,

    /// Per-attempt timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_comment_index")]
    pub comment_index: String,

    #[serde(default = "default_submission_index")]
    pub submission_index: String,
}

fn default_primary_url() -> String {
    "http://127.0.0.1:9200".to_string()
}

fn default_secondary_url() -> String {
    "http://127.0.0.1:9201".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_comment_index() -> String {
    "/rc/comments/_search".to_string()
}

fn default_submission_index() -> String {
    "/rs/submissions/_search".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            primary_url: default_primary_url(),
            secondary_url: default_secondary_url(),
            timeout_secs: default_timeout_secs(),
            comment_index: default_comment_index(),
            submission_index: default_submission_index(),
        }
    }
}

impl SearchConfig {
    pub fn endpoints(&self) -> EndpointSet {
        EndpointSet {
            primary: self.primary_url.clone(),
            secondary: self.secondary_url.clone(),
            comment_index: self.comment_index.clone(),
            submission_index: self.submission_index.clone(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Relational archive
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationalConfig {
    /// Archive database file
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./archive.db")
}

fn default_max_attempts() -> u32 {
    5
}

fn default_retry_delay_ms() -> u64 {
    1000
}

impl Default for RelationalConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl RelationalConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            delay: Duration::from_millis(self.retry_delay_ms),
        }
    }
}

impl ServiceConfig {
    /// Load from `path` (defaults when the file does not exist), then apply
    /// environment overrides.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let mut config = Self::from_file(path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> ConfigResult<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "config file not found, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("ES_PRIMARY") {
            self.search.primary_url = url;
        }
        if let Some(url) = lookup("ES_FALLBACK") {
            self.search.secondary_url = url;
        }
        if let Some(path) = lookup("DB_PATH") {
            self.relational.path = PathBuf::from(path);
        }
        if let Some(port) = lookup("API_PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("API_PORT is not a port: {port:?}")))?;
        }
        Ok(())
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.search.timeout_secs == 0 {
            return Err(ConfigError::Invalid("search.timeout_secs must be > 0".to_string()));
        }
        if self.relational.max_attempts == 0 {
            return Err(ConfigError::Invalid("relational.max_attempts must be > 0".to_string()));
        }
        Ok(())
    }
}
