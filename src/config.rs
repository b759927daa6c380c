//! Configuration Module
//!
//! Handles loading the pokedex configuration from environment variables and
//! command-line overrides.

use std::env::{self, VarError};

use crate::cache::CacheConfig;
use crate::cli::Cli;
use crate::error::{CacheError, Result};

/// Default cache interval: three minutes
pub const DEFAULT_CACHE_INTERVAL_MS: i64 = 3 * 60 * 1000;

/// Default PokeAPI endpoint
pub const DEFAULT_API_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Pokedex configuration parameters.
///
/// Durations are kept as signed milliseconds until [`Config::cache_config`]
/// validates them, so non-positive input is reported instead of wrapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum age of a cached response in milliseconds
    pub cache_interval_ms: i64,
    /// Time between cache sweeps in milliseconds, derived when unset
    pub reap_period_ms: Option<i64>,
    /// Base URL of the PokeAPI
    pub api_base_url: String,
    /// Debug logging
    pub verbose: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `POKEDEX_CACHE_INTERVAL_MS` - Cache interval (default: 180000)
    /// - `POKEDEX_REAP_PERIOD_MS` - Sweep period (default: interval truncated to seconds)
    /// - `POKEDEX_API_BASE_URL` - API base URL (default: https://pokeapi.co/api/v2)
    /// - `POKEDEX_VERBOSE` - `1` or `true` enables debug logging
    ///
    /// # Errors
    /// `InvalidConfiguration` when a millisecond variable is set but is not an
    /// integer.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            cache_interval_ms: env_millis("POKEDEX_CACHE_INTERVAL_MS")?
                .unwrap_or(defaults.cache_interval_ms),
            reap_period_ms: env_millis("POKEDEX_REAP_PERIOD_MS")?,
            api_base_url: env::var("POKEDEX_API_BASE_URL").unwrap_or(defaults.api_base_url),
            verbose: env::var("POKEDEX_VERBOSE")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.verbose),
        })
    }

    /// Applies command-line flags on top of this config.
    pub fn with_cli(mut self, cli: &Cli) -> Self {
        if let Some(interval) = cli.cache_interval_ms {
            self.cache_interval_ms = interval;
        }
        if let Some(period) = cli.reap_period_ms {
            self.reap_period_ms = Some(period);
        }
        if let Some(url) = &cli.api_base_url {
            self.api_base_url = url.clone();
        }
        self.verbose |= cli.verbose;
        self
    }

    /// Validates the cache settings.
    pub fn cache_config(&self) -> Result<CacheConfig> {
        CacheConfig::from_millis(self.cache_interval_ms, self.reap_period_ms)
    }
}

/// Reads an optional millisecond setting. Unset is `None`, garbage is an error.
fn env_millis(name: &str) -> Result<Option<i64>> {
    let raw = match env::var(name) {
        Ok(raw) => raw,
        Err(VarError::NotPresent) => return Ok(None),
        Err(VarError::NotUnicode(raw)) => {
            return Err(CacheError::InvalidConfiguration(format!(
                "{} is not valid unicode: {:?}",
                name, raw
            )))
        }
    };

    raw.trim().parse().map(Some).map_err(|_| {
        CacheError::InvalidConfiguration(format!(
            "{} must be a whole number of milliseconds, got {:?}",
            name, raw
        ))
    })
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_interval_ms: DEFAULT_CACHE_INTERVAL_MS,
            reap_period_ms: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            verbose: false,
        }
    }
}
