//! Wallet Core - Return and risk statistics for an equal-weighted basket.
//!
//! This crate turns daily closing-price history into the figures shown on the
//! green wallet dashboard:
//!
//! - **Returns**: forward-filled simple daily returns, strict or lenient
//! - **Asset statistics**: annualized mean/variance, covariance, correlation
//! - **Portfolio statistics**: equal weights, annual return, volatility, Sharpe
//! - **Benchmark comparison**: cumulative portfolio vs. index performance
//!
//! Price data comes from a [`PriceFetcher`] collaborator; every computation is
//! a pure function of what the fetcher returns and the [`WalletConfig`].
//!
//! # Example
//!
//! ```rust,no_run
//! use wallet_core::{compute_wallet_statistics, JsonPriceFetcher, WalletConfig};
//!
//! let config = WalletConfig::load()?;
//! let fetcher = JsonPriceFetcher::open("prices.json")?;
//!
//! let wallet = compute_wallet_statistics(&fetcher, &config)?;
//! println!("Sharpe ratio: {:.2}", wallet.sharpe_ratio);
//! # Ok::<(), wallet_core::Error>(())
//! ```

pub mod config;
pub mod market_data;
pub mod portfolio;
pub mod reference;
pub mod returns;
pub mod statistics;
pub mod types;

// Re-export commonly used types
pub use config::{CovarianceScaling, WalletConfig};
pub use market_data::{InMemoryPriceFetcher, JsonPriceFetcher, PriceFetcher};
pub use reference::ReferenceData;
pub use types::{ApiResponse, DateSeries, PriceTable, ReturnMode, ReturnTable};

// Re-export main functionality
pub use portfolio::{
    annual_volatility, benchmark_comparison, compare_cumulative, compute_wallet_statistics,
    cumulative_returns, equal_weights, portfolio_annual_return, portfolio_variance,
    row_mean_returns, sharpe_ratio, wallet_statistics_from_returns, BenchmarkComparison,
    PortfolioStatistics,
};
pub use returns::{compute_returns, fetch_returns};
pub use statistics::{compute_statistics, stock_statistics, AssetStatistics, StockStatistics};

/// Error types for wallet-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Insufficient history: {0}")]
    InsufficientHistory(String),

    #[error("Invalid table: {0}")]
    InvalidTable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),
}

/// Result type for wallet-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Whether a metric carries a value.
///
/// Metrics that would need a division by zero or the square root of a
/// negative number are reported as `NaN` rather than as an error.
pub fn is_defined(metric: f64) -> bool {
    !metric.is_nan()
}
