//! Price table: daily closes on an ordered date axis, one column per ticker.
//!
//! Rows are kept sorted by date. Each row holds one nullable close per ticker
//! column; `None` means the ticker has no print for that date (not yet listed,
//! suspended, delisted, or the exchange was closed).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while assembling a table by hand.
#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    #[error("row for {date} has {actual} closes, table has {expected} tickers")]
    ColumnMismatch {
        date: NaiveDate,
        expected: usize,
        actual: usize,
    },

    #[error("row for {date} is not after the previous row ({previous})")]
    OutOfOrder { previous: NaiveDate, date: NaiveDate },
}

/// One trading date and the close of every ticker column on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub date: NaiveDate,
    pub closes: Vec<Option<f64>>,
}

impl PriceRow {
    /// True when no ticker has a close on this date.
    pub fn is_empty(&self) -> bool {
        self.closes.iter().all(Option::is_none)
    }
}

/// Sparse (date, ticker) → close table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceTable {
    tickers: Vec<String>,
    rows: Vec<PriceRow>,
}

impl PriceTable {
    /// Empty table with the given ticker columns.
    pub fn new(tickers: Vec<String>) -> Self {
        Self {
            tickers,
            rows: Vec::new(),
        }
    }

    /// Build a table from pre-assembled rows, validating shape and order.
    pub fn from_rows(
        tickers: Vec<String>,
        rows: impl IntoIterator<Item = (NaiveDate, Vec<Option<f64>>)>,
    ) -> Result<Self, TableError> {
        let mut table = Self::new(tickers);
        for (date, closes) in rows {
            table.push_row(date, closes)?;
        }
        Ok(table)
    }

    /// Append a row. Non-finite closes are stored as `None`.
    pub fn push_row(
        &mut self,
        date: NaiveDate,
        closes: Vec<Option<f64>>,
    ) -> Result<(), TableError> {
        if closes.len() != self.tickers.len() {
            return Err(TableError::ColumnMismatch {
                date,
                expected: self.tickers.len(),
                actual: closes.len(),
            });
        }
        if let Some(last) = self.rows.last() {
            if date <= last.date {
                return Err(TableError::OutOfOrder {
                    previous: last.date,
                    date,
                });
            }
        }
        let closes = closes
            .into_iter()
            .map(|c| c.filter(|v| v.is_finite()))
            .collect();
        self.rows.push(PriceRow { date, closes });
        Ok(())
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn rows(&self) -> &[PriceRow] {
        &self.rows
    }

    pub fn ticker_count(&self) -> usize {
        self.tickers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// A table with no tickers or no dates carries no information.
    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty() || self.rows.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.rows.iter().map(|r| r.date)
    }

    /// Close for a ticker on the row at `row_idx`.
    pub fn close(&self, row_idx: usize, ticker: &str) -> Option<f64> {
        let col = self.tickers.iter().position(|t| t == ticker)?;
        self.rows.get(row_idx).and_then(|r| r.closes[col])
    }

    /// All closes of one ticker column, in date order.
    pub fn column(&self, col: usize) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.closes[col]).collect()
    }

    /// Drop ticker columns that never have a close. Returns how many were dropped.
    pub fn prune_empty_columns(&mut self) -> usize {
        let keep: Vec<bool> = (0..self.tickers.len())
            .map(|col| self.rows.iter().any(|r| r.closes[col].is_some()))
            .collect();
        let dropped = keep.iter().filter(|k| !**k).count();
        if dropped == 0 {
            return 0;
        }

        let mut flags = keep.iter();
        self.tickers.retain(|_| *flags.next().unwrap_or(&false));
        for row in &mut self.rows {
            let mut flags = keep.iter();
            row.closes.retain(|_| *flags.next().unwrap_or(&false));
        }
        dropped
    }

    /// Drop dates on which no ticker has a close (exchange closed).
    /// Returns how many rows were dropped.
    pub fn prune_empty_rows(&mut self) -> usize {
        let before = self.rows.len();
        self.rows.retain(|r| !r.is_empty());
        before - self.rows.len()
    }

    /// Replace each missing close with the ticker's most recent prior close.
    /// Leading gaps (no prior close yet) stay `None`.
    pub fn forward_fill(&mut self) {
        let mut last: Vec<Option<f64>> = vec![None; self.tickers.len()];
        for row in &mut self.rows {
            for (col, close) in row.closes.iter_mut().enumerate() {
                match close {
                    Some(v) => last[col] = Some(*v),
                    None => *close = last[col],
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn tickers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn push_row_rejects_wrong_width() {
        let mut t = PriceTable::new(tickers(&["A", "B"]));
        let err = t.push_row(d(2), vec![Some(1.0)]).unwrap_err();
        assert_eq!(
            err,
            TableError::ColumnMismatch {
                date: d(2),
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn push_row_rejects_unsorted_dates() {
        let mut t = PriceTable::new(tickers(&["A"]));
        t.push_row(d(3), vec![Some(1.0)]).unwrap();
        assert!(matches!(
            t.push_row(d(2), vec![Some(1.0)]),
            Err(TableError::OutOfOrder { .. })
        ));
    }

    #[test]
    fn nan_is_stored_as_missing() {
        let t = PriceTable::from_rows(tickers(&["A"]), vec![(d(2), vec![Some(f64::NAN)])]).unwrap();
        assert_eq!(t.rows()[0].closes[0], None);
    }

    #[test]
    fn prune_columns_drops_never_traded() {
        let mut t = PriceTable::from_rows(
            tickers(&["A", "DEAD", "B"]),
            vec![
                (d(2), vec![Some(1.0), None, Some(2.0)]),
                (d(3), vec![Some(1.5), None, None]),
            ],
        )
        .unwrap();
        assert_eq!(t.prune_empty_columns(), 1);
        assert_eq!(t.tickers(), &["A".to_string(), "B".to_string()]);
        assert_eq!(t.rows()[1].closes, vec![Some(1.5), None]);
    }

    #[test]
    fn prune_rows_drops_holidays() {
        let mut t = PriceTable::from_rows(
            tickers(&["A", "B"]),
            vec![
                (d(2), vec![Some(1.0), Some(2.0)]),
                (d(3), vec![None, None]),
                (d(4), vec![None, Some(2.5)]),
            ],
        )
        .unwrap();
        assert_eq!(t.prune_empty_rows(), 1);
        let dates: Vec<_> = t.dates().collect();
        assert_eq!(dates, vec![d(2), d(4)]);
    }

    #[test]
    fn forward_fill_keeps_leading_gaps() {
        let mut t = PriceTable::from_rows(
            tickers(&["A", "IPO"]),
            vec![
                (d(2), vec![Some(10.0), None]),
                (d(3), vec![None, Some(5.0)]),
                (d(4), vec![Some(11.0), None]),
            ],
        )
        .unwrap();
        t.forward_fill();
        assert_eq!(t.column(0), vec![Some(10.0), Some(10.0), Some(11.0)]);
        assert_eq!(t.column(1), vec![None, Some(5.0), Some(5.0)]);
    }

    #[test]
    fn close_lookup_by_ticker() {
        let rows = vec![(d(2), vec![Some(1.0), Some(2.0)])];
        let t = PriceTable::from_rows(tickers(&["A", "B"]), rows).unwrap();
        assert_eq!(t.close(0, "B"), Some(2.0));
        assert_eq!(t.close(0, "C"), None);
        assert_eq!(t.close(5, "A"), None);
    }
}
