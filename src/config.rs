// src/config.rs
//
// Runtime configuration loaded from the environment (and `.env`).

use std::path::PathBuf;
use std::str::FromStr;

use log::LevelFilter;

use crate::db::{default_database_path, PoolOptions};
use crate::error::{AppError, AppResult};

pub const ENV_DATABASE_PATH: &str = "MOVIESCORE_DATABASE_PATH";
pub const ENV_IN_MEMORY: &str = "MOVIESCORE_IN_MEMORY";
pub const ENV_POOL_SIZE: &str = "MOVIESCORE_POOL_SIZE";
pub const ENV_BUSY_TIMEOUT_MS: &str = "MOVIESCORE_BUSY_TIMEOUT_MS";
pub const ENV_SEED: &str = "MOVIESCORE_SEED";
pub const ENV_LOG_LEVEL: &str = "MOVIESCORE_LOG_LEVEL";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// SQLite database file
    pub database_path: PathBuf,
    /// Keep everything in process memory instead of SQLite
    pub in_memory: bool,
    pub pool: PoolOptions,
    /// Load the demo catalogue into an empty store
    pub seed: bool,
    pub log_level: LevelFilter,
}

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                              |
    /// |------------------------------|--------------------------------------|
    /// | `MOVIESCORE_DATABASE_PATH`   | `<data_dir>/moviescore/moviescore.db`|
    /// | `MOVIESCORE_IN_MEMORY`       | `false`                              |
    /// | `MOVIESCORE_POOL_SIZE`       | `8`                                  |
    /// | `MOVIESCORE_BUSY_TIMEOUT_MS` | `5000`                               |
    /// | `MOVIESCORE_SEED`            | `true`                               |
    /// | `MOVIESCORE_LOG_LEVEL`       | `info`                               |
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`], reading variables through `lookup`
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let database_path = match get(ENV_DATABASE_PATH) {
            Some(path) => PathBuf::from(path),
            None => default_database_path().map_err(|e| AppError::Config(e.to_string()))?,
        };

        let defaults = PoolOptions::default();
        let max_size: u32 = parse_or(get(ENV_POOL_SIZE), ENV_POOL_SIZE, defaults.max_size)?;
        if max_size == 0 {
            return Err(AppError::Config(format!("{} must be at least 1", ENV_POOL_SIZE)));
        }
        let busy_timeout_ms: u32 =
            parse_or(get(ENV_BUSY_TIMEOUT_MS), ENV_BUSY_TIMEOUT_MS, defaults.busy_timeout_ms)?;

        Ok(Self {
            database_path,
            in_memory: parse_flag(get(ENV_IN_MEMORY), ENV_IN_MEMORY, false)?,
            pool: PoolOptions {
                max_size,
                busy_timeout_ms,
            },
            seed: parse_flag(get(ENV_SEED), ENV_SEED, true)?,
            log_level: parse_or(get(ENV_LOG_LEVEL), ENV_LOG_LEVEL, LevelFilter::Info)?,
        })
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &str, default: T) -> AppResult<T> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| AppError::Config(format!("{} has invalid value '{}'", key, value))),
    }
}

fn parse_flag(raw: Option<String>, key: &str, default: bool) -> AppResult<bool> {
    match raw.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None => Ok(default),
        Some("1") | Some("true") | Some("yes") | Some("on") => Ok(true),
        Some("0") | Some("false") | Some("no") | Some("off") => Ok(false),
        Some(other) => Err(AppError::Config(format!(
            "{} must be a boolean, got '{}'",
            key, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> AppResult<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[(ENV_DATABASE_PATH, "/tmp/movies.db")]).unwrap();

        assert_eq!(cfg.database_path, PathBuf::from("/tmp/movies.db"));
        assert!(!cfg.in_memory);
        assert!(cfg.seed);
        assert_eq!(cfg.pool, PoolOptions::default());
        assert_eq!(cfg.log_level, LevelFilter::Info);
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            (ENV_DATABASE_PATH, "/tmp/movies.db"),
            (ENV_IN_MEMORY, "TRUE"),
            (ENV_POOL_SIZE, "2"),
            (ENV_BUSY_TIMEOUT_MS, "250"),
            (ENV_SEED, "off"),
            (ENV_LOG_LEVEL, "debug"),
        ])
        .unwrap();

        assert!(cfg.in_memory);
        assert!(!cfg.seed);
        assert_eq!(cfg.pool.max_size, 2);
        assert_eq!(cfg.pool.busy_timeout_ms, 250);
        assert_eq!(cfg.log_level, LevelFilter::Debug);
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        let base = (ENV_DATABASE_PATH, "/tmp/movies.db");

        for bad in [
            (ENV_POOL_SIZE, "many"),
            (ENV_POOL_SIZE, "0"),
            (ENV_BUSY_TIMEOUT_MS, "-1"),
            (ENV_IN_MEMORY, "maybe"),
            (ENV_LOG_LEVEL, "loud"),
        ] {
            assert!(
                matches!(config(&[base, bad]), Err(AppError::Config(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let cfg = config(&[(ENV_DATABASE_PATH, "/tmp/movies.db"), (ENV_POOL_SIZE, "  ")]).unwrap();
        assert_eq!(cfg.pool.max_size, 8);
    }
}
