//! Price fetcher backed by in-memory series.

use super::PriceFetcher;
use crate::types::PriceTable;
use crate::Result;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};

/// Per-symbol price history held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPriceFetcher {
    series: BTreeMap<String, BTreeMap<NaiveDate, Option<f64>>>,
}

impl InMemoryPriceFetcher {
    /// Create an empty fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from already-keyed series.
    pub fn from_map(series: BTreeMap<String, BTreeMap<NaiveDate, Option<f64>>>) -> Self {
        Self { series }
    }

    /// Add (or replace) the full history of a symbol.
    pub fn with_series<I>(mut self, symbol: &str, prices: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, Option<f64>)>,
    {
        self.insert(symbol, prices);
        self
    }

    /// Add (or replace) the full history of a symbol.
    pub fn insert<I>(&mut self, symbol: &str, prices: I)
    where
        I: IntoIterator<Item = (NaiveDate, Option<f64>)>,
    {
        self.series
            .insert(symbol.to_string(), prices.into_iter().collect());
    }
}

impl PriceFetcher for InMemoryPriceFetcher {
    fn fetch_closing_prices(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceTable> {
        if start >= end {
            return Ok(PriceTable::default());
        }

        let mut seen = HashSet::new();
        let selected: Vec<(String, BTreeMap<NaiveDate, Option<f64>>)> = symbols
            .iter()
            .filter(|s| seen.insert(s.as_str()))
            .filter_map(|symbol| {
                let history = self.series.get(symbol)?;
                let window = history
                    .range(start..end)
                    .map(|(date, price)| (*date, *price))
                    .collect();
                Some((symbol.clone(), window))
            })
            .collect();

        let omitted = seen.len() - selected.len();
        if omitted > 0 {
            tracing::debug!("{} requested symbol(s) unknown to the price source", omitted);
        }

        PriceTable::from_series(selected)
    }
}
