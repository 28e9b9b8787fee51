//! Dashboard configuration, loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration.

use breadth_core::breadth::{BreadthParams, DEFAULT_MIN_STOCKS};
use breadth_core::data::{
    FetchWindow, IndexSpec, MarketIndex, TickerOrigin, DEFAULT_FETCH_THREADS,
    DEFAULT_LOOKBACK_YEARS,
};
use breadth_core::domain::{DEFAULT_STRONG_THRESHOLD, DEFAULT_WEAK_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// User-defined index, computed like the static built-ins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomIndex {
    pub name: String,
    pub tickers: Vec<String>,
}

impl CustomIndex {
    pub fn to_spec(&self) -> IndexSpec {
        IndexSpec::new(
            self.name.clone(),
            self.tickers.iter().map(|t| t.trim().to_string()).collect(),
            TickerOrigin::Custom,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Years of daily history to fetch.
    pub lookback_years: u32,
    /// Lifetime of computed breadth results.
    pub price_ttl_secs: u64,
    /// Lifetime of scraped constituent lists.
    pub constituents_ttl_secs: u64,
    /// Minimum tickers with a defined MA20 for a day to count.
    pub min_stocks: usize,
    /// Size of the private HTTP fetch pool.
    pub fetch_threads: usize,
    pub strong_threshold: f64,
    pub weak_threshold: f64,
    #[serde(rename = "custom_index")]
    pub custom_indices: Vec<CustomIndex>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            lookback_years: DEFAULT_LOOKBACK_YEARS,
            price_ttl_secs: 300,
            constituents_ttl_secs: 86_400,
            min_stocks: DEFAULT_MIN_STOCKS,
            fetch_threads: DEFAULT_FETCH_THREADS,
            strong_threshold: DEFAULT_STRONG_THRESHOLD,
            weak_threshold: DEFAULT_WEAK_THRESHOLD,
            custom_indices: Vec::new(),
        }
    }
}

impl DashboardConfig {
    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.lookback_years == 0 {
            return invalid("lookback_years must be at least 1".into());
        }
        if self.min_stocks == 0 {
            return invalid("min_stocks must be at least 1".into());
        }
        if self.fetch_threads == 0 {
            return invalid("fetch_threads must be at least 1".into());
        }
        for (name, v) in [
            ("strong_threshold", self.strong_threshold),
            ("weak_threshold", self.weak_threshold),
        ] {
            if !(0.0..=100.0).contains(&v) {
                return invalid(format!("{name} must be within [0, 100], got {v}"));
            }
        }
        if self.weak_threshold >= self.strong_threshold {
            return invalid(format!(
                "weak_threshold ({}) must be below strong_threshold ({})",
                self.weak_threshold, self.strong_threshold
            ));
        }

        let mut names: HashSet<String> = MarketIndex::ALL
            .iter()
            .map(|i| i.name().to_lowercase())
            .collect();
        for custom in &self.custom_indices {
            let name = custom.name.trim();
            if name.is_empty() {
                return invalid("custom index name must not be empty".into());
            }
            if !names.insert(name.to_lowercase()) {
                return invalid(format!("duplicate index name '{name}'"));
            }
            if custom.tickers.iter().all(|t| t.trim().is_empty()) {
                return invalid(format!("custom index '{name}' has no tickers"));
            }
        }
        Ok(())
    }

    pub fn price_ttl(&self) -> Duration {
        Duration::from_secs(self.price_ttl_secs)
    }

    pub fn constituents_ttl(&self) -> Duration {
        Duration::from_secs(self.constituents_ttl_secs)
    }

    pub fn breadth_params(&self) -> BreadthParams {
        BreadthParams {
            min_stocks: self.min_stocks,
        }
    }

    /// Fetch window ending today.
    pub fn fetch_window(&self) -> FetchWindow {
        FetchWindow::ending_today(self.lookback_years)
    }
}
