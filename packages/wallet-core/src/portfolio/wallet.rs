//! Equal-weighted wallet statistics.

use super::performance::{compare_cumulative, row_mean_returns, BenchmarkComparison};
use super::risk::{annual_volatility, portfolio_variance, sharpe_ratio};
use crate::config::WalletConfig;
use crate::market_data::PriceFetcher;
use crate::returns::fetch_returns;
use crate::statistics::moments;
use crate::types::{DateSeries, ReturnMode, ReturnTable};
use crate::{Error, Result};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Headline figures of the equal-weighted wallet, plus the per-asset inputs
/// the dashboard charts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortfolioStatistics {
    /// Requested symbols, in weight order
    pub symbols: Vec<String>,
    /// `1/N` for each of the N requested symbols
    pub weights: Vec<f64>,
    /// Lenient daily returns (gaps kept)
    pub daily_returns: ReturnTable,
    /// Row-wise mean of `daily_returns`, for cumulative charts
    pub portfolio_daily_returns: DateSeries,
    /// Mean daily return per asset (`NaN` for an asset without returns)
    pub mean_daily_returns: Vec<f64>,
    /// Mean daily return per asset times trading days
    pub mean_annual_returns: Vec<f64>,
    /// Annualized pairwise covariance matrix
    pub covariance_matrix: DMatrix<f64>,
    /// Pairwise correlation matrix
    pub correlation_matrix: DMatrix<f64>,
    /// `weights · mean_daily_returns × trading days`
    pub annual_return: f64,
    /// `weights · (covariance_matrix · weights)`
    pub annual_variance: f64,
    /// Square root of `annual_variance` (`NaN` if negative)
    pub annual_volatility: f64,
    /// Excess return over `risk_free_rate` per unit of volatility
    pub sharpe_ratio: f64,
    /// Risk-free rate the Sharpe ratio was computed with
    pub risk_free_rate: f64,
}

/// Weight vector giving each of `n` assets the same share.
pub fn equal_weights(n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    vec![1.0 / n as f64; n]
}

/// Annualized portfolio return: `Σ wᵢ · mᵢ × trading days`.
///
/// Assets whose mean daily return is undefined contribute nothing, but their
/// weight is not redistributed.
///
/// # Errors
///
/// `DimensionMismatch` if the two vectors differ in length.
pub fn portfolio_annual_return(
    weights: &[f64],
    mean_daily_returns: &[f64],
    trading_days_per_year: u32,
) -> Result<f64> {
    if weights.len() != mean_daily_returns.len() {
        return Err(Error::DimensionMismatch(format!(
            "{} weights against {} mean returns",
            weights.len(),
            mean_daily_returns.len()
        )));
    }

    let daily: f64 = weights
        .iter()
        .zip(mean_daily_returns)
        .filter(|(_, m)| !m.is_nan())
        .map(|(w, m)| w * m)
        .sum();

    Ok(daily * f64::from(trading_days_per_year))
}

/// Fetch the configured basket and compute the wallet statistics.
///
/// # Errors
///
/// - `InvalidConfig` if the configuration does not validate
/// - `DataUnavailable` if the fetch is empty or a symbol has no column
/// - `InsufficientHistory` if fewer than two return rows remain
pub fn compute_wallet_statistics<F: PriceFetcher>(
    fetcher: &F,
    config: &WalletConfig,
) -> Result<PortfolioStatistics> {
    config.validate()?;

    let symbols = config.unique_tickers();
    let returns = fetch_returns(fetcher, &symbols, config.start, config.end, ReturnMode::Lenient)?;

    wallet_statistics_from_returns(returns, config)
}

/// Compute the wallet statistics from already computed daily returns.
///
/// Every column of `returns` counts as one requested asset.
pub fn wallet_statistics_from_returns(
    returns: ReturnTable,
    config: &WalletConfig,
) -> Result<PortfolioStatistics> {
    if returns.len() < 2 {
        return Err(Error::InsufficientHistory(format!(
            "{} return row(s), need at least 2 for variance",
            returns.len()
        )));
    }

    for (symbol, col) in returns.symbols().iter().zip(returns.columns()) {
        if col.iter().all(Option::is_none) {
            tracing::warn!("No returns for {}, it keeps its weight with no contribution", symbol);
        }
    }

    let days = config.trading_days_per_year;
    let columns = returns.columns();
    let weights = equal_weights(columns.len());

    let mean_daily_returns: Vec<f64> = columns.iter().map(|c| moments::mean(c)).collect();
    let mean_annual_returns = mean_daily_returns
        .iter()
        .map(|m| m * f64::from(days))
        .collect();

    let covariance_matrix = moments::covariance_matrix(columns)
        * config.covariance_scaling.multiplier(days);
    let correlation_matrix = moments::correlation_matrix(columns);

    let annual_return = portfolio_annual_return(&weights, &mean_daily_returns, days)?;
    let annual_variance = portfolio_variance(&weights, &covariance_matrix)?;
    let annual_volatility = annual_volatility(annual_variance);
    let sharpe_ratio = sharpe_ratio(annual_return, config.risk_free_rate, annual_volatility);

    let portfolio_daily_returns = row_mean_returns(&returns);

    tracing::info!(
        "Wallet of {} assets over {} days: return {:.4}, volatility {:.4}, sharpe {:.2}",
        weights.len(),
        returns.len(),
        annual_return,
        annual_volatility,
        sharpe_ratio
    );

    Ok(PortfolioStatistics {
        symbols: returns.symbols().to_vec(),
        weights,
        daily_returns: returns,
        portfolio_daily_returns,
        mean_daily_returns,
        mean_annual_returns,
        covariance_matrix,
        correlation_matrix,
        annual_return,
        annual_variance,
        annual_volatility,
        sharpe_ratio,
        risk_free_rate: config.risk_free_rate,
    })
}

/// Compare the wallet's cumulative performance with the configured benchmark.
///
/// Benchmark returns are computed in strict mode from a single-symbol fetch.
pub fn benchmark_comparison<F: PriceFetcher>(
    fetcher: &F,
    wallet: &PortfolioStatistics,
    config: &WalletConfig,
) -> Result<BenchmarkComparison> {
    let symbols = [config.benchmark.clone()];
    let returns = fetch_returns(fetcher, &symbols, config.start, config.end, ReturnMode::Strict)?;

    let column = returns
        .column(&config.benchmark)
        .ok_or_else(|| Error::DataUnavailable(format!("no returns for {}", config.benchmark)))?;
    let benchmark_daily = DateSeries::new(returns.dates().to_vec(), column.to_vec());

    Ok(compare_cumulative(
        &wallet.portfolio_daily_returns,
        &benchmark_daily,
        &config.benchmark,
    ))
}
