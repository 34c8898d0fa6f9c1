//! Portfolio aggregation module.
//!
//! Provides equal-weight wallet statistics, risk metrics and cumulative
//! performance against a benchmark.

mod performance;
mod risk;
mod wallet;

pub use performance::{
    compare_cumulative, cumulative_returns, row_mean_returns, BenchmarkComparison,
};
pub use risk::{annual_volatility, portfolio_variance, sharpe_ratio};
pub use wallet::{
    benchmark_comparison, compute_wallet_statistics, equal_weights, portfolio_annual_return,
    wallet_statistics_from_returns, PortfolioStatistics,
};
