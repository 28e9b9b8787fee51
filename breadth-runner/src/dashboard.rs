//! Dashboard orchestration: ticker provider → price fetch → breadth, per
//! index, with results cached by (index, ticker set).
//!
//! Each index is isolated: a failed fetch or a degenerate computation leaves
//! that row without data and the rest of the refresh carries on.

use crate::cache::TtlCache;
use crate::config::DashboardConfig;
use crate::tickers::TickerProvider;
use breadth_core::breadth::compute_breadth;
use breadth_core::data::{
    fetch_price_table, CircuitBreaker, HtmlSource, HttpHtmlSource, IndexSpec, PriceProvider,
    SyntheticProvider, TickerOrigin, YahooProvider,
};
use breadth_core::domain::{BreadthLevel, BreadthOutput, BreadthSnapshot, MaWindow};
use chrono::NaiveDateTime;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Cache key: index identity plus a hash of its ticker list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BreadthKey {
    pub index: String,
    pub tickers_hash: String,
}

impl BreadthKey {
    pub fn for_spec(spec: &IndexSpec) -> Self {
        Self {
            index: spec.name.clone(),
            tickers_hash: spec.tickers_hash(),
        }
    }
}

/// One dashboard row.
#[derive(Debug, Clone)]
pub struct IndexReport {
    pub name: String,
    pub slug: String,
    pub ticker_count: usize,
    pub origin: TickerOrigin,
    /// `None` when no usable data came back.
    pub output: Option<Arc<BreadthOutput>>,
}

impl IndexReport {
    pub fn snapshot(&self) -> Option<&BreadthSnapshot> {
        self.output.as_ref().map(|o| &o.snapshot)
    }

    pub fn has_data(&self) -> bool {
        self.output.is_some()
    }
}

/// Result of a full refresh.
#[derive(Debug, Clone)]
pub struct DashboardReport {
    pub rows: Vec<IndexReport>,
    /// Local time the refresh finished.
    pub updated_at: NaiveDateTime,
    pub synthetic: bool,
}

impl DashboardReport {
    pub fn find(&self, name: &str) -> Option<&IndexReport> {
        let needle = name.trim();
        self.rows.iter().find(|r| {
            r.name.eq_ignore_ascii_case(needle)
                || breadth_core::data::universe::short_label(&r.name).eq_ignore_ascii_case(needle)
                || r.slug.eq_ignore_ascii_case(needle)
        })
    }

    pub fn with_data(&self) -> usize {
        self.rows.iter().filter(|r| r.has_data()).count()
    }
}

/// Refresh progress callbacks.
pub trait RefreshProgress {
    fn on_index_start(&self, name: &str, index: usize, total: usize);

    fn on_index_complete(&self, report: &IndexReport, index: usize, total: usize);

    fn on_refresh_complete(&self, report: &DashboardReport);

    /// Checked before each index; `true` stops the refresh early.
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Progress reporter that logs through `tracing`.
pub struct LogProgress;

impl RefreshProgress for LogProgress {
    fn on_index_start(&self, name: &str, index: usize, total: usize) {
        info!(index = name, position = index + 1, total, "computing breadth");
    }

    fn on_index_complete(&self, report: &IndexReport, _index: usize, _total: usize) {
        match report.snapshot() {
            Some(s) => info!(
                index = %report.name,
                ma20 = s.pct_above_ma20,
                ma50 = s.pct_above_ma50,
                ma200 = s.pct_above_ma200,
                "breadth ready"
            ),
            None => warn!(index = %report.name, "no data available"),
        }
    }

    fn on_refresh_complete(&self, report: &DashboardReport) {
        info!(
            indices = report.rows.len(),
            with_data = report.with_data(),
            synthetic = report.synthetic,
            "refresh complete"
        );
    }
}

/// Progress reporter that does nothing.
pub struct NoProgress;

impl RefreshProgress for NoProgress {
    fn on_index_start(&self, _: &str, _: usize, _: usize) {}
    fn on_index_complete(&self, _: &IndexReport, _: usize, _: usize) {}
    fn on_refresh_complete(&self, _: &DashboardReport) {}
}

pub struct Dashboard {
    config: DashboardConfig,
    prices: Arc<dyn PriceProvider>,
    tickers: TickerProvider,
    breadth_cache: TtlCache<BreadthKey, Option<Arc<BreadthOutput>>>,
}

impl Dashboard {
    pub fn new(
        config: DashboardConfig,
        prices: Arc<dyn PriceProvider>,
        html: Option<Arc<dyn HtmlSource>>,
    ) -> Self {
        let tickers = TickerProvider::new(html, config.constituents_ttl());
        let breadth_cache = TtlCache::new(config.price_ttl());
        Self {
            config,
            prices,
            tickers,
            breadth_cache,
        }
    }

    /// Yahoo prices and Wikipedia constituents.
    pub fn live(config: DashboardConfig) -> Result<Self, breadth_core::data::DataError> {
        let breaker = Arc::new(CircuitBreaker::default_provider());
        let prices: Arc<dyn PriceProvider> = Arc::new(YahooProvider::new(breaker)?);
        let html: Arc<dyn HtmlSource> = Arc::new(HttpHtmlSource::new()?);
        Ok(Self::new(config, prices, Some(html)))
    }

    /// Generated prices and static constituent lists; never touches the network.
    pub fn synthetic(config: DashboardConfig) -> Self {
        Self::new(config, Arc::new(SyntheticProvider::new()), None)
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn is_synthetic(&self) -> bool {
        self.prices.is_synthetic()
    }

    /// Every index with its current ticker list.
    pub fn indices(&self) -> Vec<IndexSpec> {
        self.tickers.resolve_all(&self.config.custom_indices)
    }

    /// Breadth for one index, served from cache within the price TTL.
    pub fn compute(&self, spec: &IndexSpec) -> Option<Arc<BreadthOutput>> {
        self.compute_at(spec, Instant::now())
    }

    pub fn compute_at(&self, spec: &IndexSpec, now: Instant) -> Option<Arc<BreadthOutput>> {
        if spec.tickers.is_empty() {
            return None;
        }
        let key = BreadthKey::for_spec(spec);
        self.breadth_cache.get_or_compute_at(&key, now, || {
            let window = self.config.fetch_window();
            let table = fetch_price_table(
                self.prices.as_ref(),
                &spec.tickers,
                window,
                self.config.fetch_threads,
            )?;
            compute_breadth(&spec.name, &table, &self.config.breadth_params()).map(Arc::new)
        })
    }

    pub fn report_for(&self, spec: &IndexSpec) -> IndexReport {
        IndexReport {
            name: spec.name.clone(),
            slug: spec.slug(),
            ticker_count: spec.ticker_count(),
            origin: spec.origin,
            output: self.compute(spec),
        }
    }

    /// Run every index in order, reporting progress.
    pub fn refresh(&self, progress: &dyn RefreshProgress) -> DashboardReport {
        let specs = self.indices();
        let total = specs.len();
        let mut rows = Vec::with_capacity(total);
        for (i, spec) in specs.iter().enumerate() {
            if progress.is_cancelled() {
                info!(done = i, total, "refresh cancelled");
                break;
            }
            progress.on_index_start(&spec.name, i, total);
            let row = self.report_for(spec);
            progress.on_index_complete(&row, i, total);
            rows.push(row);
        }
        let report = DashboardReport {
            rows,
            updated_at: chrono::Local::now().naive_local(),
            synthetic: self.is_synthetic(),
        };
        progress.on_refresh_complete(&report);
        report
    }

    /// Drop cached breadth results and constituent lists.
    pub fn invalidate(&self) {
        self.breadth_cache.invalidate_all();
        self.tickers.invalidate();
        info!("caches cleared");
    }

    /// Colour class of a value under the configured thresholds.
    pub fn classify(&self, value: f64) -> BreadthLevel {
        BreadthLevel::classify(value, self.config.strong_threshold, self.config.weak_threshold)
    }
}

/// Snapshot cell value, if the row has data.
pub fn snapshot_value(row: &IndexReport, window: MaWindow) -> Option<f64> {
    row.snapshot().map(|s| s.value(window))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CustomIndex;
    use breadth_core::data::{DailyClose, DataError, FetchResult};
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Synthetic prices with a request counter; `FAIL*` tickers error.
    struct Counting {
        inner: SyntheticProvider,
        calls: AtomicUsize,
    }

    impl Counting {
        fn new() -> Self {
            Self {
                inner: SyntheticProvider::new(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl PriceProvider for Counting {
        fn name(&self) -> &str {
            "counting"
        }
        fn fetch(
            &self,
            symbol: &str,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<FetchResult, DataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if symbol.starts_with("FAIL") {
                return Err(DataError::SymbolNotFound {
                    symbol: symbol.to_string(),
                });
            }
            self.inner.fetch(symbol, start, end)
        }
        fn is_available(&self) -> bool {
            true
        }
    }

    fn config_with(custom: Vec<CustomIndex>) -> DashboardConfig {
        DashboardConfig {
            lookback_years: 1,
            custom_indices: custom,
            ..DashboardConfig::default()
        }
    }

    fn custom(name: &str, tickers: &[&str]) -> CustomIndex {
        CustomIndex {
            name: name.into(),
            tickers: tickers.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn compute_is_cached_within_ttl() {
        let prices = Arc::new(Counting::new());
        let dash = Dashboard::new(config_with(vec![]), prices.clone(), None);
        let spec = IndexSpec::new(
            "Six",
            (0..6).map(|i| format!("T{i}")).collect(),
            TickerOrigin::Custom,
        );

        let t0 = Instant::now();
        let a = dash.compute_at(&spec, t0).unwrap();
        let b = dash.compute_at(&spec, t0 + Duration::from_secs(299)).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(prices.calls.load(Ordering::SeqCst), 6);

        dash.compute_at(&spec, t0 + Duration::from_secs(300)).unwrap();
        assert_eq!(prices.calls.load(Ordering::SeqCst), 12);
    }

    #[test]
    fn changed_ticker_set_is_a_new_key() {
        let prices = Arc::new(Counting::new());
        let dash = Dashboard::new(config_with(vec![]), prices.clone(), None);
        let tickers: Vec<String> = (0..6).map(|i| format!("T{i}")).collect();
        let a = IndexSpec::new("X", tickers.clone(), TickerOrigin::Custom);
        let mut more = tickers;
        more.push("T6".into());
        let b = IndexSpec::new("X", more, TickerOrigin::Custom);

        dash.compute(&a);
        dash.compute(&b);
        assert_eq!(prices.calls.load(Ordering::SeqCst), 13);
    }

    #[test]
    fn invalidate_refetches() {
        let prices = Arc::new(Counting::new());
        let dash = Dashboard::new(config_with(vec![]), prices.clone(), None);
        let spec = IndexSpec::new("X", vec!["A".into(), "B".into()], TickerOrigin::Custom);
        dash.compute(&spec);
        dash.invalidate();
        dash.compute(&spec);
        assert_eq!(prices.calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn failures_are_isolated_per_index() {
        let dash = Dashboard::new(
            config_with(vec![
                custom("Broken", &["FAIL1", "FAIL2"]),
                custom("Good", &["A", "B", "C", "D", "E", "F"]),
            ]),
            Arc::new(Counting::new()),
            None,
        );
        let report = dash.refresh(&NoProgress);
        assert_eq!(report.rows.len(), 9);
        assert!(!report.find("Broken").unwrap().has_data());
        assert!(report.find("good").unwrap().has_data());
        // 3-ticker fallbacks cannot reach the 5-stock floor
        assert!(!report.find("S&P 500").unwrap().has_data());
        assert!(report.find("hsi").unwrap().has_data());
    }

    #[test]
    fn synthetic_dashboard_reports_counts() {
        let dash = Dashboard::synthetic(config_with(vec![]));
        assert!(dash.is_synthetic());
        let specs = dash.indices();
        let counts: Vec<usize> = specs.iter().map(|s| s.ticker_count()).collect();
        assert_eq!(counts, vec![3, 3, 89, 30, 30, 131, 44]);
    }

    #[test]
    fn classify_uses_configured_thresholds() {
        let config = DashboardConfig {
            strong_threshold: 70.0,
            weak_threshold: 30.0,
            ..DashboardConfig::default()
        };
        let dash = Dashboard::synthetic(config);
        assert_eq!(dash.classify(70.0), BreadthLevel::Strong);
        assert_eq!(dash.classify(50.0), BreadthLevel::Neutral);
        assert_eq!(dash.classify(30.0), BreadthLevel::Weak);
    }

    #[test]
    fn empty_ticker_list_has_no_data() {
        let dash = Dashboard::synthetic(config_with(vec![]));
        let spec = IndexSpec::new("Empty", vec![], TickerOrigin::Custom);
        assert!(dash.compute(&spec).is_none());
    }

    #[test]
    fn static_prices_flow_through() {
        let mut provider = breadth_core::data::StaticPriceProvider::new();
        let today = chrono::Local::now().date_naive();
        for t in ["A", "B", "C", "D", "E"] {
            let closes = (0..30)
                .map(|d| DailyClose::new(today - chrono::Duration::days(29 - d), 10.0 + d as f64))
                .collect();
            provider.insert(t, closes);
        }
        let dash = Dashboard::new(config_with(vec![]), Arc::new(provider), None);
        let spec = IndexSpec::new(
            "Five",
            ["A", "B", "C", "D", "E"].iter().map(|s| s.to_string()).collect(),
            TickerOrigin::Custom,
        );
        let out = dash.compute(&spec).unwrap();
        assert_eq!(out.snapshot.pct_above_ma20, 100.0);
    }
}
