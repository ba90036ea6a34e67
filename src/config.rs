use std::{env, path::PathBuf, time::Duration};

use thiserror::Error;

use crate::{classifier::DEFAULT_MIN_TRAINING_VOTES, tasks::types::CHECK_INTERVAL};

const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var} must be a number, got '{value}'")]
    NotANumber { var: &'static str, value: String },

    #[error("{var} must be greater than zero")]
    Zero { var: &'static str },

    #[error("could not determine the current directory")]
    NoCurrentDir,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub public_path: String,
    pub db_path: String,
    pub port: u16,
    pub check_interval: Duration,
    pub min_training_votes: usize,
}

impl AppConfig {
    /// Read configuration from the process environment (after `.env` is loaded).
    pub fn from_env() -> Result<Self, ConfigError> {
        let cwd = env::current_dir().map_err(|_| ConfigError::NoCurrentDir)?;
        Self::from_lookup(cwd, |var| env::var(var).ok())
    }

    pub fn from_lookup<F>(cwd: PathBuf, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let in_cwd = |name: &str| cwd.join(name).to_string_lossy().into_owned();

        let public_path = match lookup("FV_PUBLIC_PATH") {
            Some(path) => {
                log::info!("Using public path from FV_PUBLIC_PATH: {}", path);
                path
            }
            None => {
                let path = in_cwd("static");
                log::info!("Using default public path: {}", path);
                path
            }
        };

        let db_path = match lookup("FV_DATABASE_URL") {
            Some(path) => {
                log::info!("Using database path from FV_DATABASE_URL: {}", path);
                path
            }
            None => {
                let path = in_cwd("feedvote.db");
                log::info!("Using default database path: {}", path);
                path
            }
        };

        let port = parse_var(&lookup, "FV_PORT")?.unwrap_or(DEFAULT_PORT);

        let check_interval = match parse_var::<u64, _>(&lookup, "FV_CHECK_INTERVAL_SECS")? {
            Some(0) => {
                return Err(ConfigError::Zero {
                    var: "FV_CHECK_INTERVAL_SECS",
                })
            }
            Some(secs) => Duration::from_secs(secs),
            None => CHECK_INTERVAL,
        };

        let min_training_votes =
            parse_var(&lookup, "FV_MIN_TRAINING_VOTES")?.unwrap_or(DEFAULT_MIN_TRAINING_VOTES);

        Ok(AppConfig {
            public_path,
            db_path,
            port,
            check_interval,
            min_training_votes,
        })
    }
}

fn parse_var<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(value) => {
            log::info!("Using {} from environment: {}", var, value);
            value
                .trim()
                .parse::<T>()
                .map(Some)
                .map_err(|_| ConfigError::NotANumber { var, value })
        }
        None => Ok(None),
    }
}
