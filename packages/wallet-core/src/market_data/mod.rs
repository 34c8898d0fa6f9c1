//! Market data collaborators.
//!
//! The statistics pipeline only needs daily closing prices. Where they come
//! from is behind the [`PriceFetcher`] trait:
//!
//! - **In memory**: series handed over by the caller (tests, embedding apps)
//! - **JSON file**: a price-history snapshot exported from a data provider

mod json_file;
mod memory;

pub use json_file::JsonPriceFetcher;
pub use memory::InMemoryPriceFetcher;

use crate::types::PriceTable;
use crate::Result;
use chrono::NaiveDate;

/// Source of daily closing prices.
pub trait PriceFetcher {
    /// Fetch closing prices for `symbols` between `start` (inclusive) and
    /// `end` (exclusive).
    ///
    /// Symbols the source does not know are omitted from the returned table;
    /// partial data is never an error. Callers decide whether a missing
    /// column is fatal.
    fn fetch_closing_prices(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceTable>;
}
