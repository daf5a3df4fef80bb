//! Environment configuration
//!
//! Settings come from environment variables; command-line flags override
//! them.
//!
//! - `NETCALC_WORKERS` - batch thread count (positive integer)
//! - `NETCALC_NO_COLOR` / `NO_COLOR` - disable colored output when set

use std::env;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Variable set to something unusable
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

/// Result type for configuration
pub type Result<T> = std::result::Result<T, ConfigError>;

pub const WORKERS_VAR: &str = "NETCALC_WORKERS";
pub const NO_COLOR_VARS: [&str; 2] = ["NETCALC_NO_COLOR", "NO_COLOR"];

/// Runtime settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Batch worker threads; `None` picks a default from the CPU count
    pub workers: Option<usize>,
    /// Colored human output
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workers: None,
            color: true,
        }
    }
}

impl Config {
    /// Read the settings every command uses
    ///
    /// Never fails; the worker count is only read by [`Config::load_workers`]
    /// so a bad `NETCALC_WORKERS` does not affect other commands.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // NO_COLOR disables color when present, regardless of value
        let color = NO_COLOR_VARS.iter().all(|name| lookup(name).is_none());

        Self {
            workers: None,
            color,
        }
    }

    /// Add the batch worker count from `NETCALC_WORKERS`
    pub fn load_workers(self) -> Result<Self> {
        self.workers_from_lookup(|name| env::var(name).ok())
    }

    fn workers_from_lookup<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(WORKERS_VAR) {
            self.workers = Some(parse_workers(&value)?);
        }
        Ok(self)
    }

    /// Apply a `--workers` flag on top of the environment
    pub fn with_workers(mut self, workers: Option<usize>) -> Result<Self> {
        if let Some(workers) = workers {
            if workers == 0 {
                return Err(ConfigError::InvalidValue {
                    name: "--workers",
                    value: workers.to_string(),
                });
            }
            self.workers = Some(workers);
        }
        Ok(self)
    }
}

fn parse_workers(value: &str) -> Result<usize> {
    match value.trim().parse::<usize>() {
        Ok(workers) if workers > 0 => Ok(workers),
        _ => Err(ConfigError::InvalidValue {
            name: WORKERS_VAR,
            value: value.to_string(),
        }),
    }
}
