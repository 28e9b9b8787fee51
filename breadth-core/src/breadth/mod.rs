//! Market breadth: share of an index's tickers above their moving averages.

pub mod calculator;

pub use calculator::{
    compute_breadth, daily_counts, retain_valid_days, BreadthParams, DailyCounts,
    DEFAULT_MIN_STOCKS,
};
