//! Constituent scraping for the US indices.
//!
//! S&P 500 comes from the first table of Wikipedia's "List of S&P 500
//! companies" page (column `Symbol`); Nasdaq-100 from the first table on the
//! "Nasdaq-100" page that has a `Ticker` column. Symbols are normalised to
//! Yahoo's share-class convention (`BRK.B` → `BRK-B`). Any failure falls back
//! to the short static list and is only logged.

use super::provider::DataError;
use super::universe::{IndexSpec, MarketIndex, TickerOrigin};
use super::yahoo::HTTP_TIMEOUT;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use tracing::{debug, warn};

pub const SP500_URL: &str = "https://en.wikipedia.org/wiki/List_of_S%26P_500_companies";
pub const NASDAQ100_URL: &str = "https://en.wikipedia.org/wiki/Nasdaq-100";

/// Which table on the page holds the constituents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TablePick {
    /// The first table; it must carry the column.
    First,
    /// The first table that carries the column.
    FirstWithColumn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeRule {
    pub url: &'static str,
    pub column: &'static str,
    pub pick: TablePick,
}

impl ScrapeRule {
    /// Rule for a scraped index, `None` for fixed ones.
    pub fn for_index(index: MarketIndex) -> Option<Self> {
        match index {
            MarketIndex::Sp500 => Some(Self {
                url: SP500_URL,
                column: "Symbol",
                pick: TablePick::First,
            }),
            MarketIndex::Nasdaq100 => Some(Self {
                url: NASDAQ100_URL,
                column: "Ticker",
                pick: TablePick::FirstWithColumn,
            }),
            _ => None,
        }
    }
}

/// Anything that can return the HTML of a page.
pub trait HtmlSource: Send + Sync {
    fn fetch_html(&self, url: &str) -> Result<String, DataError>;
}

/// Blocking HTTP page fetcher.
pub struct HttpHtmlSource {
    client: reqwest::blocking::Client,
}

impl HttpHtmlSource {
    pub fn new() -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent("Mozilla/5.0")
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl HtmlSource for HttpHtmlSource {
    fn fetch_html(&self, url: &str) -> Result<String, DataError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(DataError::Other(format!("HTTP {status} for {url}")));
        }
        resp.text()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))
    }
}

/// Pages served from memory, keyed by URL. Unknown URLs fail like a network error.
#[derive(Debug, Clone, Default)]
pub struct StaticHtmlSource {
    pages: HashMap<String, String>,
}

impl StaticHtmlSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }
}

impl HtmlSource for StaticHtmlSource {
    fn fetch_html(&self, url: &str) -> Result<String, DataError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| DataError::NetworkUnreachable(format!("no page for {url}")))
    }
}

/// Yahoo uses `-` for share classes where exchanges use `.`.
pub fn clean_us_ticker(ticker: &str) -> String {
    ticker.trim().replace('.', "-")
}

fn selector(css: &str) -> Result<Selector, DataError> {
    Selector::parse(css).map_err(|e| DataError::Other(format!("bad selector '{css}': {e:?}")))
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Pull the ticker column out of a page according to `rule`.
pub fn parse_ticker_column(html: &str, rule: &ScrapeRule) -> Result<Vec<String>, DataError> {
    let document = Html::parse_document(html);
    let table_sel = selector("table")?;
    let row_sel = selector("tr")?;
    let cell_sel = selector("th, td")?;
    let td_sel = selector("td")?;

    let not_found = || DataError::TableNotFound {
        url: rule.url.to_string(),
        column: rule.column.to_string(),
    };

    let tables: Vec<ElementRef<'_>> = match rule.pick {
        TablePick::First => document.select(&table_sel).take(1).collect(),
        TablePick::FirstWithColumn => document.select(&table_sel).collect(),
    };

    for table in tables {
        let rows: Vec<ElementRef<'_>> = table.select(&row_sel).collect();
        // header = first row made only of <th> cells
        let Some(header_pos) = rows.iter().position(|r| {
            r.select(&td_sel).next().is_none() && r.select(&cell_sel).next().is_some()
        }) else {
            continue;
        };
        let Some(col) = rows[header_pos]
            .select(&cell_sel)
            .position(|c| cell_text(c) == rule.column)
        else {
            continue;
        };

        let tickers: Vec<String> = rows[header_pos + 1..]
            .iter()
            .filter_map(|r| r.select(&cell_sel).nth(col))
            .map(cell_text)
            .filter(|t| !t.is_empty())
            .map(|t| clean_us_ticker(&t))
            .collect();
        return Ok(tickers);
    }
    Err(not_found())
}

/// Fetch and parse the constituents of a scraped index.
pub fn scrape_constituents(
    source: &dyn HtmlSource,
    rule: &ScrapeRule,
) -> Result<Vec<String>, DataError> {
    let html = source.fetch_html(rule.url)?;
    let tickers = parse_ticker_column(&html, rule)?;
    if tickers.is_empty() {
        return Err(DataError::ResponseFormatChanged(format!(
            "'{}' column at {} is empty",
            rule.column, rule.url
        )));
    }
    Ok(tickers)
}

/// Constituents of a built-in index. Scraped indices try `source` first and
/// fall back to the static list on any failure; with no source the static
/// list is used directly.
pub fn resolve_index(index: MarketIndex, source: Option<&dyn HtmlSource>) -> IndexSpec {
    let (Some(rule), Some(source)) = (ScrapeRule::for_index(index), source) else {
        return IndexSpec::from_static(index);
    };

    match scrape_constituents(source, &rule) {
        Ok(tickers) => {
            debug!(index = index.name(), tickers = tickers.len(), "constituents scraped");
            IndexSpec::new(index.name(), tickers, TickerOrigin::Scraped)
        }
        Err(e) => {
            warn!(
                index = index.name(),
                error = %e,
                "constituent scrape failed, using fallback list"
            );
            IndexSpec::from_static(index)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SP500_PAGE: &str = r#"<html><body>
        <table id="constituents" class="wikitable sortable">
          <tbody>
            <tr><th>Symbol</th><th>Security</th><th>GICS Sector</th></tr>
            <tr><td><a href="/x">MMM</a></td><td>3M</td><td>Industrials</td></tr>
            <tr><td>BRK.B</td><td>Berkshire Hathaway</td><td>Financials</td></tr>
            <tr><td> BF.B </td><td>Brown-Forman</td><td>Consumer Staples</td></tr>
          </tbody>
        </table>
        <table class="wikitable"><tr><th>Date</th><th>Added</th></tr>
          <tr><td>2024-01-01</td><td>XYZ</td></tr></table>
        </body></html>"#;

    const NDX_PAGE: &str = r#"<html><body>
        <table class="infobox"><tr><th>Foundation</th><td>1985</td></tr></table>
        <table class="wikitable"><tr><th>Year</th><th>Return</th></tr><tr><td>2023</td><td>53.8</td></tr></table>
        <table id="constituents" class="wikitable">
          <tr><th>Company</th><th>Ticker</th><th>GICS Sector</th></tr>
          <tr><td>Adobe Inc.</td><td>ADBE</td><td>Information Technology</td></tr>
          <tr><td>Alphabet Inc. (Class A)</td><td>GOOGL</td><td>Communication Services</td></tr>
          <tr><td>Apple Inc.</td><td>AAPL</td><td>Information Technology</td></tr>
        </table>
        </body></html>"#;

    fn rule(index: MarketIndex) -> ScrapeRule {
        ScrapeRule::for_index(index).unwrap()
    }

    #[test]
    fn sp500_first_table_symbol_column() {
        let tickers = parse_ticker_column(SP500_PAGE, &rule(MarketIndex::Sp500)).unwrap();
        assert_eq!(tickers, vec!["MMM", "BRK-B", "BF-B"]);
    }

    #[test]
    fn nasdaq_first_table_with_ticker_column() {
        let tickers = parse_ticker_column(NDX_PAGE, &rule(MarketIndex::Nasdaq100)).unwrap();
        assert_eq!(tickers, vec!["ADBE", "GOOGL", "AAPL"]);
    }

    #[test]
    fn first_table_without_column_is_an_error() {
        // Symbol column only exists in a later table
        let page = r#"<table><tr><th>Name</th></tr><tr><td>x</td></tr></table>
                      <table><tr><th>Symbol</th></tr><tr><td>AAA</td></tr></table>"#;
        let err = parse_ticker_column(page, &rule(MarketIndex::Sp500)).unwrap_err();
        assert!(matches!(err, DataError::TableNotFound { .. }));
    }

    #[test]
    fn clean_replaces_dots() {
        assert_eq!(clean_us_ticker("BRK.B"), "BRK-B");
        assert_eq!(clean_us_ticker(" AAPL "), "AAPL");
    }

    #[test]
    fn resolve_uses_scraped_list() {
        let source = StaticHtmlSource::new().with_page(SP500_URL, SP500_PAGE);
        let spec = resolve_index(MarketIndex::Sp500, Some(&source));
        assert_eq!(spec.origin, TickerOrigin::Scraped);
        assert_eq!(spec.ticker_count(), 3);
        assert_eq!(spec.name, "S&P 500 (SPX)");
    }

    #[test]
    fn resolve_falls_back_on_fetch_failure() {
        let source = StaticHtmlSource::new();
        let spec = resolve_index(MarketIndex::Nasdaq100, Some(&source));
        assert_eq!(spec.origin, TickerOrigin::Fallback);
        assert_eq!(spec.tickers, vec!["AAPL", "MSFT", "NVDA"]);
    }

    #[test]
    fn resolve_falls_back_on_empty_column() {
        let page = "<table><tr><th>Symbol</th></tr></table>";
        let source = StaticHtmlSource::new().with_page(SP500_URL, page);
        let spec = resolve_index(MarketIndex::Sp500, Some(&source));
        assert_eq!(spec.tickers, vec!["AAPL", "MSFT", "GOOGL"]);
    }

    #[test]
    fn fixed_indices_never_scrape() {
        let spec = resolve_index(MarketIndex::HangSengTech, None);
        assert_eq!(spec.origin, TickerOrigin::Static);
        assert_eq!(spec.ticker_count(), 30);
        assert!(ScrapeRule::for_index(MarketIndex::Klci).is_none());
    }
}
