use crate::gateway::DEFAULT_BASE_URL;
use std::{env, fmt::Display, net::SocketAddr, path::PathBuf, str::FromStr};
use thiserror::Error;
use tracing::info;

pub const API_BASE_URL_VAR: &str = "POSTBOARD_API_BASE_URL";
pub const BIND_ADDR_VAR: &str = "POSTBOARD_BIND_ADDR";
pub const DATA_DIR_VAR: &str = "POSTBOARD_DATA_DIR";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_DATA_DIR: &str = ".postboard";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf,
}

impl Config {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick
    /// up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base_url: String = load(&lookup, API_BASE_URL_VAR, DEFAULT_BASE_URL)?;
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                key: API_BASE_URL_VAR,
                value: api_base_url,
                reason: "expected an http(s) URL".into(),
            });
        }

        Ok(Self {
            api_base_url,
            bind_addr: load(&lookup, BIND_ADDR_VAR, DEFAULT_BIND_ADDR)?,
            data_dir: load(&lookup, DATA_DIR_VAR, DEFAULT_DATA_DIR)?,
        })
    }
}

fn load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let raw = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value: raw,
    })
}
