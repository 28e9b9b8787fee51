//! Multi-ticker time alignment.
//!
//! Per-ticker close series are merged onto the union of their dates. A ticker
//! without a print on some date gets `None` there; no fill happens here, that
//! is the calculator's job after holiday rows are gone.

use super::provider::DailyClose;
use crate::domain::PriceTable;
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

/// Build a price table from per-ticker series. Columns keep the input order;
/// a duplicated date within one series keeps its last value.
pub fn align_closes(series: Vec<(String, Vec<DailyClose>)>) -> PriceTable {
    let dates: Vec<NaiveDate> = series
        .iter()
        .flat_map(|(_, closes)| closes.iter().map(|c| c.date))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let lookups: Vec<HashMap<NaiveDate, Option<f64>>> = series
        .iter()
        .map(|(_, closes)| closes.iter().map(|c| (c.date, c.close)).collect())
        .collect();

    let tickers: Vec<String> = series.into_iter().map(|(t, _)| t).collect();
    let mut table = PriceTable::new(tickers);
    for date in dates {
        let closes = lookups
            .iter()
            .map(|m| m.get(&date).copied().flatten())
            .collect();
        if let Err(e) = table.push_row(date, closes) {
            unreachable!("aligned rows are sorted and full width: {e}");
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(date: &str, close: f64) -> DailyClose {
        DailyClose::new(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(), close)
    }

    #[test]
    fn missing_dates_become_none() {
        let table = align_closes(vec![
            (
                "SPY".into(),
                vec![
                    close("2024-01-02", 100.0),
                    close("2024-01-03", 101.0),
                    close("2024-01-04", 102.0),
                ],
            ),
            (
                "QQQ".into(),
                vec![close("2024-01-02", 200.0), close("2024-01-04", 202.0)],
            ),
        ]);

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.tickers(), &["SPY".to_string(), "QQQ".to_string()]);
        assert_eq!(table.close(1, "SPY"), Some(101.0));
        assert_eq!(table.close(1, "QQQ"), None);
        assert_eq!(table.close(2, "QQQ"), Some(202.0));
    }

    #[test]
    fn unsorted_input_is_ordered() {
        let table = align_closes(vec![(
            "A".into(),
            vec![close("2024-01-04", 3.0), close("2024-01-02", 1.0)],
        )]);
        let dates: Vec<_> = table.dates().map(|d| d.to_string()).collect();
        assert_eq!(dates, vec!["2024-01-02", "2024-01-04"]);
    }

    #[test]
    fn empty_series_keeps_column() {
        let table = align_closes(vec![
            ("A".into(), vec![close("2024-01-02", 1.0)]),
            ("B".into(), vec![]),
        ]);
        assert_eq!(table.ticker_count(), 2);
        assert_eq!(table.column(1), vec![None]);
    }
}
