//! Breadth calculator.
//!
//! Turns a raw price table into the daily share of tickers trading above their
//! 20/50/200-day simple moving averages. Steps run in a fixed order:
//!
//! 1. drop ticker columns with no closes at all
//! 2. drop dates on which no ticker traded (holidays), before any fill
//! 3. forward-fill remaining gaps; leading gaps stay empty
//! 4. per-ticker SMA for each window, defined only on a full window
//! 5. denominator per day and window: tickers with a defined SMA
//! 6. numerator: tickers whose close is strictly above their SMA
//! 7. keep a day only when the MA20 denominator reaches `min_stocks`;
//!    undefined percentages on kept days become 0
//! 8. snapshot = last kept day, rounded to two decimals

use crate::domain::{
    BreadthHistory, BreadthOutput, BreadthPoint, BreadthSnapshot, MaWindow, PriceTable,
    MA_WINDOWS,
};
use crate::indicators::Sma;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default minimum number of tickers with a defined MA20 for a day to count.
pub const DEFAULT_MIN_STOCKS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreadthParams {
    pub min_stocks: usize,
}

impl Default for BreadthParams {
    fn default() -> Self {
        Self {
            min_stocks: DEFAULT_MIN_STOCKS,
        }
    }
}

/// Raw per-day counts before the validity filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyCounts {
    pub date: NaiveDate,
    /// Tickers with a defined SMA, per window (20, 50, 200).
    pub defined: [usize; 3],
    /// Tickers closing strictly above their SMA, per window.
    pub above: [usize; 3],
}

impl DailyCounts {
    fn new(date: NaiveDate) -> Self {
        Self {
            date,
            defined: [0; 3],
            above: [0; 3],
        }
    }

    /// Percentage above the window's SMA, undefined with an empty denominator.
    pub fn pct(&self, window: MaWindow) -> Option<f64> {
        let i = window.index();
        if self.defined[i] == 0 {
            return None;
        }
        Some(self.above[i] as f64 / self.defined[i] as f64 * 100.0)
    }
}

/// Compute breadth for one index.
///
/// Returns `None` when nothing survives cleaning or when no day passes the
/// validity filter.
pub fn compute_breadth(
    index_name: &str,
    table: &PriceTable,
    params: &BreadthParams,
) -> Option<BreadthOutput> {
    let mut table = table.clone();
    let dropped_columns = table.prune_empty_columns();
    let dropped_rows = table.prune_empty_rows();
    if table.is_empty() {
        debug!(index = index_name, "price table empty after cleaning");
        return None;
    }
    table.forward_fill();

    let counts = daily_counts(&table);
    let history = retain_valid_days(&counts, params.min_stocks);
    debug!(
        index = index_name,
        tickers = table.ticker_count(),
        rows = table.row_count(),
        dropped_columns,
        dropped_rows,
        retained = history.len(),
        "breadth computed"
    );
    if history.is_empty() {
        return None;
    }

    let snapshot = BreadthSnapshot::from_history(index_name, &history);
    Some(BreadthOutput { snapshot, history })
}

/// Per-day defined/above counts for a cleaned, forward-filled table.
pub fn daily_counts(table: &PriceTable) -> Vec<DailyCounts> {
    let mut counts: Vec<DailyCounts> = table.dates().map(DailyCounts::new).collect();
    let smas: Vec<Sma> = MA_WINDOWS.iter().map(|&p| Sma::new(p)).collect();

    for col in 0..table.ticker_count() {
        let closes = table.column(col);
        for (w, sma) in smas.iter().enumerate() {
            for (day, ma) in sma.compute(&closes).into_iter().enumerate() {
                let (Some(ma), Some(close)) = (ma, closes[day]) else {
                    continue;
                };
                counts[day].defined[w] += 1;
                if close > ma {
                    counts[day].above[w] += 1;
                }
            }
        }
    }
    counts
}

/// Apply the MA20 validity filter and zero-fill undefined percentages.
pub fn retain_valid_days(counts: &[DailyCounts], min_stocks: usize) -> BreadthHistory {
    let ma20 = MaWindow::Ma20.index();
    let points = counts
        .iter()
        .filter(|c| c.defined[ma20] >= min_stocks)
        .map(|c| BreadthPoint {
            date: c.date,
            pct_above_ma20: c.pct(MaWindow::Ma20).unwrap_or(0.0),
            pct_above_ma50: c.pct(MaWindow::Ma50).unwrap_or(0.0),
            pct_above_ma200: c.pct(MaWindow::Ma200).unwrap_or(0.0),
        })
        .collect();
    BreadthHistory::new(points)
}
