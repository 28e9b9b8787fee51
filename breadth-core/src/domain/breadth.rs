//! Breadth results: per-day history, latest snapshot, and the helpers the
//! presentation layer uses to slice and colour them.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Moving-average windows tracked for every index.
pub const MA_WINDOWS: [usize; 3] = [20, 50, 200];

/// Default percentage at or above which breadth reads as strong.
pub const DEFAULT_STRONG_THRESHOLD: f64 = 80.0;

/// Default percentage at or below which breadth reads as weak.
pub const DEFAULT_WEAK_THRESHOLD: f64 = 20.0;

/// One of the three moving-average windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaWindow {
    Ma20,
    Ma50,
    Ma200,
}

impl MaWindow {
    pub const ALL: [MaWindow; 3] = [MaWindow::Ma20, MaWindow::Ma50, MaWindow::Ma200];

    pub fn period(self) -> usize {
        MA_WINDOWS[self.index()]
    }

    /// Position in `ALL` and in the per-window arrays of the calculator.
    pub fn index(self) -> usize {
        match self {
            MaWindow::Ma20 => 0,
            MaWindow::Ma50 => 1,
            MaWindow::Ma200 => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MaWindow::Ma20 => "% > MA20",
            MaWindow::Ma50 => "% > MA50",
            MaWindow::Ma200 => "% > MA200",
        }
    }
}

/// Breadth percentages for a single retained trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreadthPoint {
    pub date: NaiveDate,
    pub pct_above_ma20: f64,
    pub pct_above_ma50: f64,
    pub pct_above_ma200: f64,
}

impl BreadthPoint {
    pub fn value(&self, window: MaWindow) -> f64 {
        match window {
            MaWindow::Ma20 => self.pct_above_ma20,
            MaWindow::Ma50 => self.pct_above_ma50,
            MaWindow::Ma200 => self.pct_above_ma200,
        }
    }
}

/// Date-ordered breadth history of one index.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BreadthHistory {
    points: Vec<BreadthPoint>,
}

impl BreadthHistory {
    /// Wrap points, sorting them by date.
    pub fn new(mut points: Vec<BreadthPoint>) -> Self {
        points.sort_by_key(|p| p.date);
        Self { points }
    }

    pub fn points(&self) -> &[BreadthPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&BreadthPoint> {
        self.points.first()
    }

    pub fn latest(&self) -> Option<&BreadthPoint> {
        self.points.last()
    }

    /// Points inside the preset range, measured back from the latest date.
    pub fn range(&self, range: HistoryRange) -> &[BreadthPoint] {
        let Some(latest) = self.latest() else {
            return &[];
        };
        match range.start_date(latest.date) {
            None => &self.points,
            Some(start) => {
                let first = self.points.partition_point(|p| p.date < start);
                &self.points[first..]
            }
        }
    }

    /// `(date, value)` pairs for one window inside a range.
    pub fn series(&self, window: MaWindow, range: HistoryRange) -> Vec<(NaiveDate, f64)> {
        self.range(range)
            .iter()
            .map(|p| (p.date, p.value(window)))
            .collect()
    }
}

/// Latest-day breadth for one index, rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreadthSnapshot {
    pub index_name: String,
    pub pct_above_ma20: f64,
    pub pct_above_ma50: f64,
    pub pct_above_ma200: f64,
}

impl BreadthSnapshot {
    /// Snapshot of the latest history row; all zeros when the history is empty.
    pub fn from_history(index_name: &str, history: &BreadthHistory) -> Self {
        let (ma20, ma50, ma200) = history
            .latest()
            .map(|p| (p.pct_above_ma20, p.pct_above_ma50, p.pct_above_ma200))
            .unwrap_or((0.0, 0.0, 0.0));
        Self {
            index_name: index_name.to_string(),
            pct_above_ma20: round2(ma20),
            pct_above_ma50: round2(ma50),
            pct_above_ma200: round2(ma200),
        }
    }

    pub fn value(&self, window: MaWindow) -> f64 {
        match window {
            MaWindow::Ma20 => self.pct_above_ma20,
            MaWindow::Ma50 => self.pct_above_ma50,
            MaWindow::Ma200 => self.pct_above_ma200,
        }
    }
}

/// Calculator output for one index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreadthOutput {
    pub snapshot: BreadthSnapshot,
    pub history: BreadthHistory,
}

/// Round to two decimals, exact halves to even (3.125 -> 3.12).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Colour class of a breadth percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreadthLevel {
    Strong,
    Neutral,
    Weak,
}

impl BreadthLevel {
    /// `value >= strong` is strong, `value <= weak` is weak.
    pub fn classify(value: f64, strong: f64, weak: f64) -> Self {
        if value >= strong {
            BreadthLevel::Strong
        } else if value <= weak {
            BreadthLevel::Weak
        } else {
            BreadthLevel::Neutral
        }
    }
}

/// Chart range presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HistoryRange {
    #[serde(rename = "1m")]
    OneMonth,
    #[serde(rename = "6m")]
    SixMonths,
    #[serde(rename = "ytd")]
    YearToDate,
    #[serde(rename = "1y")]
    OneYear,
    #[default]
    #[serde(rename = "all")]
    All,
}

impl HistoryRange {
    pub const ALL: [HistoryRange; 5] = [
        HistoryRange::OneMonth,
        HistoryRange::SixMonths,
        HistoryRange::YearToDate,
        HistoryRange::OneYear,
        HistoryRange::All,
    ];

    pub fn label(self) -> &'static str {
        match self {
            HistoryRange::OneMonth => "1m",
            HistoryRange::SixMonths => "6m",
            HistoryRange::YearToDate => "YTD",
            HistoryRange::OneYear => "1y",
            HistoryRange::All => "All",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|r| *r == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// First date inside the range, or `None` for the full history.
    pub fn start_date(self, latest: NaiveDate) -> Option<NaiveDate> {
        match self {
            HistoryRange::OneMonth => latest.checked_sub_months(Months::new(1)),
            HistoryRange::SixMonths => latest.checked_sub_months(Months::new(6)),
            HistoryRange::YearToDate => NaiveDate::from_ymd_opt(latest.year(), 1, 1),
            HistoryRange::OneYear => latest.checked_sub_months(Months::new(12)),
            HistoryRange::All => None,
        }
    }
}

impl fmt::Display for HistoryRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for HistoryRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "1m" => Ok(HistoryRange::OneMonth),
            "6m" => Ok(HistoryRange::SixMonths),
            "ytd" => Ok(HistoryRange::YearToDate),
            "1y" => Ok(HistoryRange::OneYear),
            "all" | "max" => Ok(HistoryRange::All),
            other => Err(format!("unknown range '{other}' (expected 1m, 6m, ytd, 1y, all)")),
        }
    }
}
