//! Price fetch orchestrator: pulls close history for a ticker list in
//! parallel and aligns it into one price table.
//!
//! Individual ticker failures only drop that ticker's column. A fetch that
//! yields nothing usable comes back as `None` and is logged; it never raises.

use super::align::align_closes;
use super::provider::{DailyClose, DataError, PriceProvider};
use crate::domain::PriceTable;
use chrono::{Months, NaiveDate};
use rayon::prelude::*;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Default history window.
pub const DEFAULT_LOOKBACK_YEARS: u32 = 5;

/// Default size of the private fetch pool.
pub const DEFAULT_FETCH_THREADS: usize = 8;

/// Inclusive date range to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FetchWindow {
    /// `years` back from `end`.
    pub fn trailing_years(end: NaiveDate, years: u32) -> Self {
        let start = end
            .checked_sub_months(Months::new(years.saturating_mul(12)))
            .unwrap_or(NaiveDate::MIN);
        Self { start, end }
    }

    /// `years` back from today (local time).
    pub fn ending_today(years: u32) -> Self {
        Self::trailing_years(chrono::Local::now().date_naive(), years)
    }
}

/// Outcome counts of one fetch.
#[derive(Debug, Default)]
pub struct FetchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<(String, DataError)>,
}

impl FetchSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Fetch every ticker and align the results.
///
/// Returns `None` for an empty ticker list, an unavailable provider, or when
/// every ticker failed.
pub fn fetch_price_table(
    provider: &dyn PriceProvider,
    tickers: &[String],
    window: FetchWindow,
    threads: usize,
) -> Option<PriceTable> {
    fetch_price_table_with_summary(provider, tickers, window, threads).0
}

/// Like [`fetch_price_table`], also returning per-ticker outcome counts.
pub fn fetch_price_table_with_summary(
    provider: &dyn PriceProvider,
    tickers: &[String],
    window: FetchWindow,
    threads: usize,
) -> (Option<PriceTable>, FetchSummary) {
    let mut seen = HashSet::new();
    let unique: Vec<&String> = tickers.iter().filter(|t| seen.insert(t.as_str())).collect();
    let mut summary = FetchSummary {
        total: unique.len(),
        ..FetchSummary::default()
    };

    if unique.is_empty() {
        return (None, summary);
    }
    if !provider.is_available() {
        warn!(provider = provider.name(), "provider unavailable, skipping fetch");
        summary.failed = summary.total;
        return (None, summary);
    }

    let pool = match rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .thread_name(|i| format!("breadth-fetch-{i}"))
        .build()
    {
        Ok(pool) => pool,
        Err(e) => {
            warn!(error = %e, "failed to build fetch pool");
            summary.failed = summary.total;
            return (None, summary);
        }
    };

    let results: Vec<(String, Result<Vec<DailyClose>, DataError>)> = pool.install(|| {
        unique
            .par_iter()
            .map(|ticker| {
                let result = provider
                    .fetch(ticker, window.start, window.end)
                    .map(|r| r.closes);
                ((*ticker).clone(), result)
            })
            .collect()
    });

    let mut series = Vec::with_capacity(results.len());
    for (ticker, result) in results {
        match result {
            Ok(closes) => {
                summary.succeeded += 1;
                series.push((ticker, closes));
            }
            Err(e) => {
                debug!(ticker = %ticker, error = %e, "ticker fetch failed");
                summary.failed += 1;
                summary.errors.push((ticker, e));
            }
        }
    }

    info!(
        provider = provider.name(),
        tickers = summary.total,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "price fetch complete"
    );

    if series.is_empty() {
        warn!(provider = provider.name(), tickers = summary.total, "no ticker returned data");
        return (None, summary);
    }

    let table = align_closes(series);
    if table.is_empty() {
        return (None, summary);
    }
    (Some(table), summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::provider::{FetchResult, StaticPriceProvider};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn window() -> FetchWindow {
        FetchWindow { start: d(1), end: d(31) }
    }

    fn tickers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn provider() -> StaticPriceProvider {
        StaticPriceProvider::new()
            .with_series("A", vec![DailyClose::new(d(4), 1.0), DailyClose::new(d(5), 1.1)])
            .with_series("B", vec![DailyClose::new(d(5), 2.0)])
    }

    struct Offline;

    impl PriceProvider for Offline {
        fn name(&self) -> &str {
            "offline"
        }
        fn fetch(&self, _: &str, _: NaiveDate, _: NaiveDate) -> Result<FetchResult, DataError> {
            Err(DataError::CircuitBreakerTripped)
        }
        fn is_available(&self) -> bool {
            false
        }
    }

    #[test]
    fn empty_ticker_list_is_none() {
        assert!(fetch_price_table(&provider(), &[], window(), 2).is_none());
    }

    #[test]
    fn failed_tickers_are_absent_columns() {
        let (table, summary) =
            fetch_price_table_with_summary(&provider(), &tickers(&["A", "GONE", "B"]), window(), 2);
        let table = table.unwrap();
        assert_eq!(table.tickers(), &tickers(&["A", "B"]));
        assert_eq!(table.row_count(), 2);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert!(!summary.all_succeeded());
        assert_eq!(summary.errors[0].0, "GONE");
    }

    #[test]
    fn all_failed_is_none() {
        assert!(fetch_price_table(&provider(), &tickers(&["X", "Y"]), window(), 2).is_none());
    }

    #[test]
    fn unavailable_provider_is_none() {
        assert!(fetch_price_table(&Offline, &tickers(&["A"]), window(), 1).is_none());
    }

    #[test]
    fn duplicate_tickers_fetched_once() {
        let table =
            fetch_price_table(&provider(), &tickers(&["A", "A", "B"]), window(), 4).unwrap();
        assert_eq!(table.ticker_count(), 2);
    }

    #[test]
    fn trailing_window() {
        let w = FetchWindow::trailing_years(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(), 5);
        assert_eq!(w.start, NaiveDate::from_ymd_opt(2019, 2, 28).unwrap());
    }
}
