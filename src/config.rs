use crate::engine::{AnnualizationMethod, EngineSettings, DEFAULT_TOP_TICKER_LIMIT};
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub annualization: AnnualizationMethod,
    pub top_ticker_limit: usize,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let annualization = match env_map.get("ANNUALIZATION_METHOD") {
            None => AnnualizationMethod::default(),
            Some(raw) => AnnualizationMethod::from_str(raw).map_err(|_| {
                ConfigError::InvalidValue(
                    "ANNUALIZATION_METHOD".to_string(),
                    format!("must be time_period or trade_weighted, got {}", raw),
                )
            })?,
        };

        let top_ticker_limit = match env_map.get("TOP_TICKER_LIMIT") {
            None => DEFAULT_TOP_TICKER_LIMIT,
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|limit| *limit > 0)
                .ok_or_else(|| {
                    ConfigError::InvalidValue(
                        "TOP_TICKER_LIMIT".to_string(),
                        "must be a positive integer".to_string(),
                    )
                })?,
        };

        Ok(Config {
            port,
            annualization,
            top_ticker_limit,
        })
    }

    /// Settings handed to the engine; the engine never reads the environment.
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            annualization: self.annualization,
            top_ticker_limit: self.top_ticker_limit,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            annualization: AnnualizationMethod::default(),
            top_ticker_limit: DEFAULT_TOP_TICKER_LIMIT,
        }
    }
}
