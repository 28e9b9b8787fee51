//! Market breadth runner: configuration, caching, dashboard refresh, export.
//!
//! This crate builds on `breadth-core` to provide:
//! - TOML configuration with validated defaults and custom indices
//! - A TTL cache with single-flight recomputation
//! - The ticker provider (scraped lists cached for a day)
//! - Dashboard refresh over every index with per-index failure isolation
//! - JSON/CSV export of snapshots and histories

pub mod cache;
pub mod config;
pub mod dashboard;
pub mod export;
pub mod tickers;

pub use cache::TtlCache;
pub use config::{ConfigError, CustomIndex, DashboardConfig};
pub use dashboard::{
    snapshot_value, BreadthKey, Dashboard, DashboardReport, IndexReport, LogProgress, NoProgress,
    RefreshProgress,
};
pub use export::{
    export_history_csv, export_points_csv, export_snapshot_json, save_report, snapshot_rows,
    SnapshotRow,
};
pub use tickers::TickerProvider;
