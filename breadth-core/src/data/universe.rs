//! Index universe: the seven tracked indices and their constituent lists.
//!
//! S&P 500 and Nasdaq-100 are scraped from Wikipedia (see `constituents`) and
//! only fall back to the short lists here. The five Asian indices are fixed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Built-in indices, in dashboard display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MarketIndex {
    Sp500,
    Nasdaq100,
    HangSeng,
    HangSengTech,
    Klci,
    MyxTechnology,
    MyxPlantation,
}

impl MarketIndex {
    pub const ALL: [MarketIndex; 7] = [
        MarketIndex::Sp500,
        MarketIndex::Nasdaq100,
        MarketIndex::HangSeng,
        MarketIndex::HangSengTech,
        MarketIndex::Klci,
        MarketIndex::MyxTechnology,
        MarketIndex::MyxPlantation,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            MarketIndex::Sp500 => "S&P 500 (SPX)",
            MarketIndex::Nasdaq100 => "Nasdaq 100 (NDX)",
            MarketIndex::HangSeng => "Hang Seng (HSI)",
            MarketIndex::HangSengTech => "Hang Seng Tech",
            MarketIndex::Klci => "FBM KLCI",
            MarketIndex::MyxTechnology => "MYX: Technology",
            MarketIndex::MyxPlantation => "MYX: Plantation",
        }
    }

    /// File-name friendly identifier.
    pub fn slug(self) -> &'static str {
        match self {
            MarketIndex::Sp500 => "sp500",
            MarketIndex::Nasdaq100 => "nasdaq100",
            MarketIndex::HangSeng => "hsi",
            MarketIndex::HangSengTech => "hstech",
            MarketIndex::Klci => "klci",
            MarketIndex::MyxTechnology => "myx-technology",
            MarketIndex::MyxPlantation => "myx-plantation",
        }
    }

    /// Name without the parenthesised ticker, e.g. `S&P 500`.
    pub fn short_label(self) -> &'static str {
        short_label(self.name())
    }

    /// Whether the constituents are scraped rather than fixed.
    pub fn is_scraped(self) -> bool {
        matches!(self, MarketIndex::Sp500 | MarketIndex::Nasdaq100)
    }

    /// Static list: the full constituents for fixed indices, the fallback
    /// for scraped ones.
    pub fn static_tickers(self) -> &'static [&'static str] {
        match self {
            MarketIndex::Sp500 => &SP500_FALLBACK,
            MarketIndex::Nasdaq100 => &NASDAQ100_FALLBACK,
            MarketIndex::HangSeng => &HANG_SENG,
            MarketIndex::HangSengTech => &HANG_SENG_TECH,
            MarketIndex::Klci => &KLCI,
            MarketIndex::MyxTechnology => &MYX_TECHNOLOGY,
            MarketIndex::MyxPlantation => &MYX_PLANTATION,
        }
    }

    /// Match a full name, short label, or slug, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        let needle = name.trim();
        Self::ALL.into_iter().find(|idx| {
            idx.name().eq_ignore_ascii_case(needle)
                || idx.short_label().eq_ignore_ascii_case(needle)
                || idx.slug().eq_ignore_ascii_case(needle)
        })
    }
}

impl fmt::Display for MarketIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Text before the first `(`, trimmed.
pub fn short_label(name: &str) -> &str {
    name.split('(').next().unwrap_or(name).trim()
}

/// File-name friendly form of an arbitrary index name.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// How an index's ticker list was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickerOrigin {
    /// Scraped from the live constituent page.
    Scraped,
    /// Scrape failed; the short built-in list is in use.
    Fallback,
    /// Fixed built-in list.
    Static,
    /// User-defined in the config file.
    Custom,
}

impl TickerOrigin {
    pub fn label(self) -> &'static str {
        match self {
            TickerOrigin::Scraped => "live",
            TickerOrigin::Fallback => "fallback",
            TickerOrigin::Static => "static",
            TickerOrigin::Custom => "custom",
        }
    }
}

/// An index name with the ordered tickers to compute it from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSpec {
    pub name: String,
    pub tickers: Vec<String>,
    pub origin: TickerOrigin,
}

impl IndexSpec {
    pub fn new(name: impl Into<String>, tickers: Vec<String>, origin: TickerOrigin) -> Self {
        Self {
            name: name.into(),
            tickers,
            origin,
        }
    }

    /// Built-in index with its static list.
    pub fn from_static(index: MarketIndex) -> Self {
        let origin = if index.is_scraped() {
            TickerOrigin::Fallback
        } else {
            TickerOrigin::Static
        };
        Self::new(
            index.name(),
            index.static_tickers().iter().map(|t| t.to_string()).collect(),
            origin,
        )
    }

    pub fn ticker_count(&self) -> usize {
        self.tickers.len()
    }

    pub fn slug(&self) -> String {
        MarketIndex::from_name(&self.name)
            .map(|idx| idx.slug().to_string())
            .unwrap_or_else(|| slugify(&self.name))
    }

    /// BLAKE3 of the ordered ticker list; identifies a ticker-set snapshot.
    pub fn tickers_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for t in &self.tickers {
            hasher.update(t.as_bytes());
            hasher.update(b"\n");
        }
        hasher.finalize().to_hex().to_string()
    }
}

// ─── Constituent lists ───────────────────────────────────────────────

pub const SP500_FALLBACK: [&str; 3] = ["AAPL", "MSFT", "GOOGL"];

pub const NASDAQ100_FALLBACK: [&str; 3] = ["AAPL", "MSFT", "NVDA"];

pub const HANG_SENG: [&str; 89] = [
    "0001.HK", "0002.HK", "0003.HK", "0005.HK", "0006.HK", "0011.HK", "0012.HK", "0016.HK",
    "0017.HK", "0027.HK", "0066.HK", "0101.HK", "0175.HK", "0241.HK", "0267.HK", "0285.HK",
    "0288.HK", "0316.HK", "0386.HK", "0388.HK", "0522.HK", "0669.HK", "0688.HK", "0700.HK",
    "0762.HK", "0823.HK", "0857.HK", "0868.HK", "0883.HK", "0939.HK", "0941.HK", "0960.HK",
    "0968.HK", "0981.HK", "0992.HK", "1038.HK", "1044.HK", "1088.HK", "1093.HK", "1109.HK",
    "1113.HK", "1177.HK", "1209.HK", "1211.HK", "1299.HK", "1378.HK", "1398.HK", "1810.HK",
    "1876.HK", "1928.HK", "1929.HK", "1997.HK", "2007.HK", "2015.HK", "2020.HK", "2269.HK",
    "2313.HK", "2318.HK", "2319.HK", "2331.HK", "2382.HK", "2388.HK", "2628.HK", "2688.HK",
    "2899.HK", "3690.HK", "3692.HK", "3968.HK", "3988.HK", "6098.HK", "6618.HK", "6690.HK",
    "6862.HK", "9618.HK", "9633.HK", "9888.HK", "9961.HK", "9988.HK", "9999.HK", "0019.HK",
    "0836.HK", "1099.HK", "1193.HK", "1972.HK", "3998.HK", "0010.HK", "0031.HK", "0041.HK",
    "0083.HK",
];

pub const HANG_SENG_TECH: [&str; 30] = [
    "0700.HK", "9988.HK", "3690.HK", "1810.HK", "9618.HK", "1024.HK", "2015.HK", "0981.HK",
    "0285.HK", "0780.HK", "0992.HK", "1347.HK", "1797.HK", "2382.HK", "3888.HK", "6618.HK",
    "9626.HK", "9888.HK", "9961.HK", "9999.HK", "0522.HK", "0772.HK", "1478.HK", "1833.HK",
    "2013.HK", "2018.HK", "3033.HK", "6060.HK", "6690.HK", "9868.HK",
];

pub const KLCI: [&str; 30] = [
    "1155.KL", "1023.KL", "1295.KL", "5347.KL", "5183.KL", "6033.KL", "5285.KL", "4065.KL",
    "2445.KL", "1961.KL", "4707.KL", "5819.KL", "6947.KL", "5296.KL", "8869.KL", "6012.KL",
    "3816.KL", "4197.KL", "5225.KL", "5398.KL", "5211.KL", "4863.KL", "1066.KL", "5168.KL",
    "0166.KL", "7084.KL", "4677.KL", "6742.KL", "5326.KL", "5681.KL",
];

pub const MYX_TECHNOLOGY: [&str; 131] = [
    "0002.KL", "0005.KL", "0006.KL", "0008.KL", "0010.KL", "0012.KL", "0018.KL", "0020.KL",
    "0021.KL", "0022.KL", "0023.KL", "0025.KL", "0029.KL", "0034.KL", "0035.KL", "0036.KL",
    "0040.KL", "0041.KL", "0045.KL", "0051.KL", "0055.KL", "0060.KL", "0065.KL", "0068.KL",
    "0069.KL", "0070.KL", "0079.KL", "0083.KL", "0085.KL", "0086.KL", "0090.KL", "0093.KL",
    "0097.KL", "0104.KL", "0105.KL", "0106.KL", "0107.KL", "0109.KL", "0111.KL", "0112.KL",
    "0113.KL", "0117.KL", "0118.KL", "0119.KL", "0120.KL", "0126.KL", "0127.KL", "0128.KL",
    "0131.KL", "0132.KL", "0138.KL", "0140.KL", "0143.KL", "0145.KL", "0146.KL", "0151.KL",
    "0152.KL", "0154.KL", "0155.KL", "0156.KL", "0157.KL", "0158.KL", "0163.KL", "0165.KL",
    "0166.KL", "0167.KL", "0169.KL", "0174.KL", "0175.KL", "0176.KL", "0181.KL", "0191.KL",
    "0196.KL", "0200.KL", "0201.KL", "0202.KL", "0203.KL", "0205.KL", "0206.KL", "0208.KL",
    "0209.KL", "0212.KL", "0236.KL", "0246.KL", "0249.KL", "0251.KL", "0253.KL", "0258.KL",
    "0259.KL", "0263.KL", "0265.KL", "0272.KL", "0275.KL", "0276.KL", "0277.KL", "0278.KL",
    "0279.KL", "0290.KL", "0305.KL", "0306.KL", "0319.KL", "0328.KL", "0343.KL", "0358.KL",
    "3867.KL", "4359.KL", "4456.KL", "5005.KL", "5011.KL", "5028.KL", "5036.KL", "5161.KL",
    "5162.KL", "5195.KL", "5204.KL", "5216.KL", "5286.KL", "5292.KL", "5301.KL", "5309.KL",
    "5347.KL", "7022.KL", "7160.KL", "7181.KL", "7204.KL", "8338.KL", "9008.KL", "9075.KL",
    "9334.KL", "9377.KL", "9393.KL",
];

pub const MYX_PLANTATION: [&str; 44] = [
    "2089.KL", "7501.KL", "9695.KL", "2291.KL", "5138.KL", "5112.KL", "5026.KL", "5027.KL",
    "5135.KL", "2569.KL", "5323.KL", "5319.KL", "8966.KL", "7382.KL", "7054.KL", "5223.KL",
    "5222.KL", "5113.KL", "5069.KL", "5029.KL", "5012.KL", "4936.KL", "4383.KL", "4316.KL",
    "3948.KL", "2593.KL", "2542.KL", "2453.KL", "2445.KL", "2135.KL", "2038.KL", "1996.KL",
    "1929.KL", "1902.KL", "1899.KL", "0355.KL", "0189.KL", "5126.KL", "5285.KL", "6262.KL",
    "9059.KL", "2607.KL", "1961.KL", "2054.KL",
];
