//! Per-asset return and risk statistics.
//!
//! Provides annualized mean returns, variances, covariance and correlation
//! matrices for any set of assets.

pub mod moments;

use crate::config::{CovarianceScaling, WalletConfig};
use crate::market_data::PriceFetcher;
use crate::returns::fetch_returns;
use crate::types::{ReturnMode, ReturnTable};
use crate::{Error, Result};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Statistics of each asset in a return table.
///
/// Vectors and matrix rows/columns follow `symbols` order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetStatistics {
    /// Asset symbols
    pub symbols: Vec<String>,
    /// Number of daily returns the statistics were computed from
    pub observations: usize,
    /// Mean daily return
    pub mean_daily_returns: Vec<f64>,
    /// Mean daily return times trading days (arithmetic, not compounded)
    pub mean_annual_returns: Vec<f64>,
    /// Daily sample variance times trading days
    pub annual_variance: Vec<f64>,
    /// Daily sample covariance matrix, annualized per [`CovarianceScaling`]
    pub covariance_matrix: DMatrix<f64>,
    /// Pearson correlation matrix (`NaN` against constant series)
    pub correlation_matrix: DMatrix<f64>,
}

impl AssetStatistics {
    fn index_of(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }

    /// Annualized mean return of one asset.
    pub fn mean_annual_return(&self, symbol: &str) -> Option<f64> {
        self.index_of(symbol).map(|i| self.mean_annual_returns[i])
    }

    /// Annualized variance of one asset.
    pub fn variance(&self, symbol: &str) -> Option<f64> {
        self.index_of(symbol).map(|i| self.annual_variance[i])
    }

    /// Annualized covariance between two assets.
    pub fn covariance(&self, a: &str, b: &str) -> Option<f64> {
        Some(self.covariance_matrix[(self.index_of(a)?, self.index_of(b)?)])
    }

    /// Correlation between two assets.
    pub fn correlation(&self, a: &str, b: &str) -> Option<f64> {
        Some(self.correlation_matrix[(self.index_of(a)?, self.index_of(b)?)])
    }
}

/// Compute asset statistics with the dashboard's covariance scaling.
///
/// `returns` must come from [`ReturnMode::Strict`] so every statistic is
/// computed over the same rows.
///
/// # Errors
///
/// - `InvalidTable` for a lenient return table
/// - `InsufficientHistory` if fewer than two return rows are available
pub fn compute_statistics(
    returns: &ReturnTable,
    trading_days_per_year: u32,
) -> Result<AssetStatistics> {
    compute_statistics_scaled(returns, trading_days_per_year, CovarianceScaling::default())
}

/// Compute asset statistics with an explicit covariance scaling.
pub fn compute_statistics_scaled(
    returns: &ReturnTable,
    trading_days_per_year: u32,
    scaling: CovarianceScaling,
) -> Result<AssetStatistics> {
    if returns.mode() != ReturnMode::Strict {
        return Err(Error::InvalidTable(
            "asset statistics need row-complete (strict) returns".to_string(),
        ));
    }
    if returns.len() < 2 {
        return Err(Error::InsufficientHistory(format!(
            "{} return row(s), need at least 2 for variance",
            returns.len()
        )));
    }

    let days = f64::from(trading_days_per_year);
    let columns = returns.columns();

    let mean_daily_returns: Vec<f64> = columns.iter().map(|c| moments::mean(c)).collect();
    let mean_annual_returns = mean_daily_returns.iter().map(|m| m * days).collect();
    let annual_variance = columns
        .iter()
        .map(|c| moments::variance(c) * days)
        .collect();

    let covariance_matrix =
        moments::covariance_matrix(columns) * scaling.multiplier(trading_days_per_year);
    let correlation_matrix = moments::correlation_matrix(columns);

    if correlation_matrix.iter().any(|c| c.is_nan()) {
        tracing::warn!("Correlation undefined for at least one asset pair");
    }

    Ok(AssetStatistics {
        symbols: returns.symbols().to_vec(),
        observations: returns.len(),
        mean_daily_returns,
        mean_annual_returns,
        annual_variance,
        covariance_matrix,
        correlation_matrix,
    })
}

/// Strict returns of a set of stocks together with their statistics.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StockStatistics {
    /// Row-complete daily returns
    pub returns: ReturnTable,
    #[serde(flatten)]
    pub statistics: AssetStatistics,
}

/// Fetch prices for `symbols` over the configured window and describe them.
pub fn stock_statistics<F: PriceFetcher>(
    fetcher: &F,
    symbols: &[String],
    config: &WalletConfig,
) -> Result<StockStatistics> {
    let returns = fetch_returns(fetcher, symbols, config.start, config.end, ReturnMode::Strict)?;
    let statistics = compute_statistics_scaled(
        &returns,
        config.trading_days_per_year,
        config.covariance_scaling,
    )?;

    tracing::debug!(
        "Stock statistics for {} symbol(s) over {} rows",
        symbols.len(),
        returns.len()
    );

    Ok(StockStatistics {
        returns,
        statistics,
    })
}
