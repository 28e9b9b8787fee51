//! Ticker provider: index → ordered tickers, with scraped lists cached for a
//! day.

use crate::cache::TtlCache;
use crate::config::CustomIndex;
use breadth_core::data::{resolve_index, HtmlSource, IndexSpec, MarketIndex};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub struct TickerProvider {
    source: Option<Arc<dyn HtmlSource>>,
    cache: TtlCache<MarketIndex, IndexSpec>,
}

impl TickerProvider {
    /// `source` is used for the scraped indices; `None` keeps every index on
    /// its static list (offline mode).
    pub fn new(source: Option<Arc<dyn HtmlSource>>, ttl: Duration) -> Self {
        Self {
            source,
            cache: TtlCache::new(ttl),
        }
    }

    pub fn offline() -> Self {
        Self::new(None, Duration::from_secs(86_400))
    }

    /// Constituents of one built-in index.
    pub fn resolve(&self, index: MarketIndex) -> IndexSpec {
        if !index.is_scraped() {
            return IndexSpec::from_static(index);
        }
        self.cache.get_or_compute(&index, || {
            debug!(index = index.name(), "resolving constituents");
            resolve_index(index, self.source.as_deref())
        })
    }

    /// The seven built-ins in display order, then custom indices.
    pub fn resolve_all(&self, custom: &[CustomIndex]) -> Vec<IndexSpec> {
        MarketIndex::ALL
            .into_iter()
            .map(|idx| self.resolve(idx))
            .chain(custom.iter().map(CustomIndex::to_spec))
            .collect()
    }

    pub fn invalidate(&self) {
        self.cache.invalidate_all();
    }
}
