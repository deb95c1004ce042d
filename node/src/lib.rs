use serde::{Deserialize, Serialize};
use std::{num::NonZeroUsize, str::FromStr};
use thiserror::Error;
use tracing::Level;

pub mod driver;

pub use driver::{Driver, Entry, RunSummary};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Emit structured (JSON) logs instead of human-readable lines.
    #[serde(default)]
    pub json_logs: bool,
    /// Transactions per block when the log does not mark boundaries itself.
    #[serde(default = "default_block_size")]
    pub block_size: usize,
    /// Commit blocks that carry no transactions (each still advances the height).
    #[serde(default = "default_commit_empty_blocks")]
    pub commit_empty_blocks: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
            block_size: default_block_size(),
            commit_empty_blocks: default_commit_empty_blocks(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid log level: {value}")]
    InvalidLogLevel { value: String },
    #[error("{field} must be > 0 (got {value})")]
    InvalidNonZero { field: &'static str, value: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedConfig {
    pub log_level: Level,
    pub json_logs: bool,
    pub block_size: NonZeroUsize,
    pub commit_empty_blocks: bool,
}

impl Config {
    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        let log_level =
            Level::from_str(&self.log_level).map_err(|_| ConfigError::InvalidLogLevel {
                value: self.log_level.clone(),
            })?;
        let block_size = nonzero_usize("block_size", self.block_size)?;

        Ok(ValidatedConfig {
            log_level,
            json_logs: self.json_logs,
            block_size,
            commit_empty_blocks: self.commit_empty_blocks,
        })
    }
}

fn nonzero_usize(field: &'static str, value: usize) -> Result<NonZeroUsize, ConfigError> {
    NonZeroUsize::new(value).ok_or(ConfigError::InvalidNonZero { field, value })
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_block_size() -> usize {
    1
}

fn default_commit_empty_blocks() -> bool {
    true
}
