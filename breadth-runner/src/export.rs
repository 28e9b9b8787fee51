//! Export: snapshot JSON and per-index history CSV.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use breadth_core::domain::{BreadthHistory, BreadthPoint};
use serde::{Deserialize, Serialize};

use crate::dashboard::{DashboardReport, IndexReport};

/// One row of `snapshot.json`. Percentages are `null` for indices without
/// data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRow {
    pub index_name: String,
    pub ticker_count: usize,
    pub tickers_source: String,
    pub pct_above_ma20: Option<f64>,
    pub pct_above_ma50: Option<f64>,
    pub pct_above_ma200: Option<f64>,
    pub history_days: usize,
}

impl From<&IndexReport> for SnapshotRow {
    fn from(row: &IndexReport) -> Self {
        let snapshot = row.snapshot();
        Self {
            index_name: row.name.clone(),
            ticker_count: row.ticker_count,
            tickers_source: row.origin.label().to_string(),
            pct_above_ma20: snapshot.map(|s| s.pct_above_ma20),
            pct_above_ma50: snapshot.map(|s| s.pct_above_ma50),
            pct_above_ma200: snapshot.map(|s| s.pct_above_ma200),
            history_days: row.output.as_ref().map_or(0, |o| o.history.len()),
        }
    }
}

pub fn snapshot_rows(report: &DashboardReport) -> Vec<SnapshotRow> {
    report.rows.iter().map(SnapshotRow::from).collect()
}

/// Serialize the snapshot table to pretty JSON.
pub fn export_snapshot_json(report: &DashboardReport) -> Result<String> {
    serde_json::to_string_pretty(&snapshot_rows(report))
        .context("failed to serialize snapshot to JSON")
}

/// History as CSV, percentages rounded to two decimals.
pub fn export_history_csv(history: &BreadthHistory) -> Result<String> {
    export_points_csv(history.points())
}

/// Same as [`export_history_csv`] for a slice, e.g. one range of a history.
pub fn export_points_csv(points: &[BreadthPoint]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "pct_above_ma20", "pct_above_ma50", "pct_above_ma200"])?;
    for p in points {
        wtr.write_record([
            &p.date.to_string(),
            &format!("{:.2}", p.pct_above_ma20),
            &format!("{:.2}", p.pct_above_ma50),
            &format!("{:.2}", p.pct_above_ma200),
        ])?;
    }
    let bytes = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

/// Write `snapshot.json` plus `history_<slug>.csv` for each index with data.
/// Returns the paths written.
pub fn save_report(report: &DashboardReport, output_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create export dir: {}", output_dir.display()))?;

    let mut written = Vec::new();
    let snapshot_path = output_dir.join("snapshot.json");
    std::fs::write(&snapshot_path, export_snapshot_json(report)?)
        .with_context(|| format!("failed to write {}", snapshot_path.display()))?;
    written.push(snapshot_path);

    for row in &report.rows {
        let Some(output) = &row.output else { continue };
        let path = output_dir.join(format!("history_{}.csv", row.slug));
        std::fs::write(&path, export_history_csv(&output.history)?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}
