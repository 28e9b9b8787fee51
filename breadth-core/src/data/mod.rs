//! Data acquisition: index constituents, price providers, and the parallel
//! fetch that turns a ticker list into a price table.

pub mod align;
pub mod circuit_breaker;
pub mod constituents;
pub mod fetch;
pub mod provider;
pub mod synthetic;
pub mod universe;
pub mod yahoo;

pub use align::align_closes;
pub use circuit_breaker::CircuitBreaker;
pub use constituents::{
    clean_us_ticker, parse_ticker_column, resolve_index, scrape_constituents, HtmlSource,
    HttpHtmlSource, ScrapeRule, StaticHtmlSource, TablePick,
};
pub use fetch::{
    fetch_price_table, fetch_price_table_with_summary, FetchSummary, FetchWindow,
    DEFAULT_FETCH_THREADS, DEFAULT_LOOKBACK_YEARS,
};
pub use provider::{
    DailyClose, DataError, DataSource, FetchResult, PriceProvider, StaticPriceProvider,
};
pub use synthetic::SyntheticProvider;
pub use universe::{IndexSpec, MarketIndex, TickerOrigin};
pub use yahoo::YahooProvider;
