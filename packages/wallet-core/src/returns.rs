//! Daily simple returns from closing prices.

use crate::market_data::PriceFetcher;
use crate::types::{PriceTable, ReturnMode, ReturnTable};
use crate::{Error, Result};
use chrono::NaiveDate;

/// Convert a price table into simple daily returns.
///
/// Each column is forward-filled, then `r[t] = p[t] / p[t-1] - 1`. The first
/// date has no prior price and is dropped. A division by a zero price gives
/// `0.0` instead of an infinity; `0 / 0` stays missing.
///
/// In [`ReturnMode::Strict`] every row that still has a missing cell is
/// removed. In [`ReturnMode::Lenient`] gaps (e.g. before a symbol's first
/// quote) are kept.
///
/// # Errors
///
/// `DataUnavailable` if the table has no dates or no symbols.
pub fn compute_returns(prices: &PriceTable, mode: ReturnMode) -> Result<ReturnTable> {
    if prices.is_empty() {
        return Err(Error::DataUnavailable("price table is empty".to_string()));
    }

    let mut columns: Vec<Vec<Option<f64>>> = prices
        .columns()
        .iter()
        .map(|col| pct_change(&forward_fill(col)))
        .collect();
    let mut dates = prices.dates()[1..].to_vec();

    if mode == ReturnMode::Strict {
        let complete: Vec<bool> = (0..dates.len())
            .map(|i| columns.iter().all(|col| col[i].is_some()))
            .collect();

        let mut keep = complete.iter();
        dates.retain(|_| *keep.next().unwrap_or(&false));
        for col in &mut columns {
            let mut keep = complete.iter();
            col.retain(|_| *keep.next().unwrap_or(&false));
        }
    }

    tracing::debug!(
        "Computed {:?} returns: {} of {} price rows kept",
        mode,
        dates.len(),
        prices.len()
    );

    ReturnTable::new(dates, prices.symbols().to_vec(), columns, mode)
}

/// Fetch prices and compute returns, checking every requested symbol came back.
///
/// # Errors
///
/// `DataUnavailable` if the fetch is empty or a requested symbol has no column.
pub fn fetch_returns<F: PriceFetcher>(
    fetcher: &F,
    symbols: &[String],
    start: NaiveDate,
    end: NaiveDate,
    mode: ReturnMode,
) -> Result<ReturnTable> {
    let prices = fetcher.fetch_closing_prices(symbols, start, end)?;
    require_symbols(&prices, symbols)?;
    compute_returns(&prices, mode)
}

/// Fail with `DataUnavailable` unless every symbol has a column in `prices`.
pub fn require_symbols(prices: &PriceTable, symbols: &[String]) -> Result<()> {
    if prices.is_empty() {
        return Err(Error::DataUnavailable(format!(
            "no prices returned for {}",
            symbols.join(", ")
        )));
    }

    let missing: Vec<&str> = symbols
        .iter()
        .filter(|s| prices.column(s).is_none())
        .map(String::as_str)
        .collect();

    if !missing.is_empty() {
        return Err(Error::DataUnavailable(format!(
            "no price column for {}",
            missing.join(", ")
        )));
    }

    Ok(())
}

/// Replace each gap with the most recent known value; leading gaps stay.
fn forward_fill(prices: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut last = None;
    prices
        .iter()
        .map(|p| {
            if p.is_some() {
                last = *p;
            }
            last
        })
        .collect()
}

/// Period-over-period change, one element shorter than the input.
fn pct_change(prices: &[Option<f64>]) -> Vec<Option<f64>> {
    prices
        .windows(2)
        .map(|w| match (w[0], w[1]) {
            (Some(prev), Some(cur)) => {
                let r = cur / prev - 1.0;
                if r.is_nan() {
                    None
                } else if r.is_infinite() {
                    Some(0.0)
                } else {
                    Some(r)
                }
            }
            _ => None,
        })
        .collect()
}
