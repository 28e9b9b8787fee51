//! Synthetic price provider for offline runs.
//!
//! Each ticker gets a deterministic random walk (seed = BLAKE3 of the symbol)
//! on weekdays, layered over a shared market path so breadth moves in waves
//! instead of hovering around 50%. The data is clearly fake and tagged as
//! synthetic.

use super::provider::{DailyClose, DataError, DataSource, FetchResult, PriceProvider};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Default)]
pub struct SyntheticProvider;

impl SyntheticProvider {
    pub fn new() -> Self {
        Self
    }
}

fn rng_for(label: &str) -> StdRng {
    StdRng::from_seed(*blake3::hash(label.as_bytes()).as_bytes())
}

fn weekdays(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let mut current = start;
    std::iter::from_fn(move || {
        while current <= end {
            let day = current;
            current += Duration::days(1);
            if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
                return Some(day);
            }
        }
        None
    })
}

/// Daily market return for each weekday in range: slow regime swings plus noise.
fn market_returns(start: NaiveDate, end: NaiveDate) -> Vec<f64> {
    let mut rng = rng_for("market");
    let mut regime = 0.0_f64;
    weekdays(start, end)
        .map(|_| {
            if rng.gen_bool(0.02) {
                regime = rng.gen_range(-0.004..0.004);
            }
            regime + rng.gen_range(-0.008..0.008)
        })
        .collect()
}

/// Random walk for one symbol over the weekdays in `[start, end]`.
pub fn generate_closes(symbol: &str, start: NaiveDate, end: NaiveDate) -> Vec<DailyClose> {
    let mut rng = rng_for(symbol);
    let beta: f64 = rng.gen_range(0.5..1.5);
    let mut price: f64 = rng.gen_range(5.0..300.0);

    weekdays(start, end)
        .zip(market_returns(start, end))
        .map(|(date, market)| {
            let idio: f64 = rng.gen_range(-0.02..0.02);
            price *= 1.0 + beta * market + idio;
            price = price.max(0.01);
            DailyClose::new(date, price)
        })
        .collect()
}

impl PriceProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        Ok(FetchResult {
            symbol: symbol.to_string(),
            closes: generate_closes(symbol, start, end),
            source: DataSource::Synthetic,
        })
    }

    fn is_available(&self) -> bool {
        true
    }

    fn is_synthetic(&self) -> bool {
        true
    }
}
