//! Planner configuration parsed from environment variables.
//!
//! In the browser there is no process environment, so [`PlannerConfig::from_env`]
//! simply yields the defaults there; hosts can also build the struct directly.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::str::FromStr;

use crate::consts::{DEFAULT_ITEM_INSET, DEFAULT_ITEM_SIZE, MIN_ITEM_SIZE};
use crate::scene::PlacementDefaults;

pub const DEFAULT_CATALOG_URL: &str = "http://localhost:8000/static/furniture_data.json";
pub const DEFAULT_CATALOG_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CATALOG_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Errors produced while reading configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable held a value that could not be parsed.
    #[error("config parse failed for {key}: {value:?}")]
    Parse { key: String, value: String },
    /// A value parsed but is outside its allowed range.
    #[error("invalid config value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    pub catalog_url: String,
    pub catalog_timeouts: CatalogTimeouts,
    pub placement: PlacementDefaults,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_owned(),
            catalog_timeouts: CatalogTimeouts {
                request_secs: DEFAULT_CATALOG_REQUEST_TIMEOUT_SECS,
                connect_secs: DEFAULT_CATALOG_CONNECT_TIMEOUT_SECS,
            },
            placement: PlacementDefaults::default(),
        }
    }
}

impl PlannerConfig {
    /// Build typed planner config from environment variables.
    ///
    /// All optional:
    /// - `ROOMFIT_CATALOG_URL`: catalog document URL
    /// - `ROOMFIT_CATALOG_TIMEOUT_SECS`: default 30
    /// - `ROOMFIT_CATALOG_CONNECT_TIMEOUT_SECS`: default 10
    /// - `ROOMFIT_ITEM_SIZE`: natural edge length of new items, default 100
    /// - `ROOMFIT_ITEM_INSET`: offset of new items from the top-left, default 10
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set but malformed or out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        let catalog_url = std::env::var("ROOMFIT_CATALOG_URL")
            .map(|v| v.trim().to_owned())
            .unwrap_or_else(|_| DEFAULT_CATALOG_URL.to_owned());
        if catalog_url.is_empty() {
            return Err(ConfigError::Invalid { key: "ROOMFIT_CATALOG_URL".into(), reason: "must not be blank".into() });
        }

        let catalog_timeouts = CatalogTimeouts {
            request_secs: env_parse("ROOMFIT_CATALOG_TIMEOUT_SECS", DEFAULT_CATALOG_REQUEST_TIMEOUT_SECS)?,
            connect_secs: env_parse("ROOMFIT_CATALOG_CONNECT_TIMEOUT_SECS", DEFAULT_CATALOG_CONNECT_TIMEOUT_SECS)?,
        };

        let size: f64 = env_parse("ROOMFIT_ITEM_SIZE", DEFAULT_ITEM_SIZE)?;
        if !size.is_finite() || size < MIN_ITEM_SIZE {
            return Err(ConfigError::Invalid {
                key: "ROOMFIT_ITEM_SIZE".into(),
                reason: format!("must be at least {MIN_ITEM_SIZE}"),
            });
        }
        let inset: f64 = env_parse("ROOMFIT_ITEM_INSET", DEFAULT_ITEM_INSET)?;
        if !inset.is_finite() || inset < 0.0 {
            return Err(ConfigError::Invalid { key: "ROOMFIT_ITEM_INSET".into(), reason: "must be non-negative".into() });
        }

        Ok(Self { catalog_url, catalog_timeouts, placement: PlacementDefaults { inset, size } })
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Parse { key: key.to_owned(), value: raw }),
        Err(std::env::VarError::NotPresent) => Ok(default),
        Err(std::env::VarError::NotUnicode(raw)) => {
            Err(ConfigError::Parse { key: key.to_owned(), value: raw.to_string_lossy().into_owned() })
        }
    }
}
