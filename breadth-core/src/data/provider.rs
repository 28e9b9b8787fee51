//! Price provider trait and structured error types.
//!
//! `PriceProvider` abstracts over close-price sources (Yahoo Finance, the
//! offline synthetic generator, in-memory fixtures) so the fetch layer and the
//! dashboard can swap them freely and tests never touch the network.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One daily close from a provider. `close` is `None` when the provider
/// reports the date but no price (trading halt).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyClose {
    pub date: NaiveDate,
    pub close: Option<f64>,
}

impl DailyClose {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            close: Some(close),
        }
    }
}

/// Structured error types for data operations.
///
/// Displayable in both CLI and TUI contexts. None of these reach the top level
/// of a refresh: the fetch layer turns them into absent tickers or absent
/// indices.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("hard stop: data provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("no table with a '{column}' column at {url}")]
    TableNotFound { url: String, column: String },

    #[error("data error: {0}")]
    Other(String),
}

/// Result of a successful fetch for a single symbol.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    pub closes: Vec<DailyClose>,
    pub source: DataSource,
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    YahooFinance,
    Synthetic,
    InMemory,
}

/// Source of daily close history.
///
/// Implementations must be shareable across the fetch pool's threads.
pub trait PriceProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily closes for a symbol over an inclusive date range.
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate)
        -> Result<FetchResult, DataError>;

    /// Whether the provider currently accepts requests (not blocked).
    fn is_available(&self) -> bool;

    /// True for generated, non-market data.
    fn is_synthetic(&self) -> bool {
        false
    }
}

/// Fixed close series per symbol. Symbols it does not know fail with
/// `SymbolNotFound`, like a delisted ticker would.
#[derive(Debug, Clone, Default)]
pub struct StaticPriceProvider {
    series: std::collections::HashMap<String, Vec<DailyClose>>,
}

impl StaticPriceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, symbol: &str, closes: Vec<DailyClose>) -> Self {
        self.series.insert(symbol.to_string(), closes);
        self
    }

    pub fn insert(&mut self, symbol: &str, closes: Vec<DailyClose>) {
        self.series.insert(symbol.to_string(), closes);
    }
}

impl PriceProvider for StaticPriceProvider {
    fn name(&self) -> &str {
        "in_memory"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let closes: Vec<DailyClose> = self
            .series
            .get(symbol)
            .ok_or_else(|| DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            })?
            .iter()
            .filter(|c| c.date >= start && c.date <= end)
            .copied()
            .collect();
        Ok(FetchResult {
            symbol: symbol.to_string(),
            closes,
            source: DataSource::InMemory,
        })
    }

    fn is_available(&self) -> bool {
        true
    }
}
