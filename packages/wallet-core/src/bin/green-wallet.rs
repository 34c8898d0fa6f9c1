//! Green wallet CLI - Command line interface for the wallet statistics.
//!
//! Every command prints a JSON `ApiResponse` on stdout; logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wallet_core::{
    benchmark_comparison, compute_wallet_statistics, stock_statistics, ApiResponse,
    JsonPriceFetcher, ReferenceData, WalletConfig,
};

#[derive(Parser)]
#[command(name = "green-wallet")]
#[command(about = "Green wallet CLI - return, risk and benchmark statistics")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to $GREEN_WALLET_CONFIG or ~/.green-wallet/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Per-asset statistics from strict (row-complete) returns
    Stats {
        /// JSON price-history file
        #[arg(short, long)]
        prices: PathBuf,
        /// Symbols to analyse (comma-separated, defaults to the wallet basket)
        #[arg(short, long)]
        symbols: Option<String>,
    },
    /// Equal-weighted wallet statistics
    Wallet {
        /// JSON price-history file
        #[arg(short, long)]
        prices: PathBuf,
    },
    /// Cumulative wallet performance against the benchmark
    Compare {
        /// JSON price-history file
        #[arg(short, long)]
        prices: PathBuf,
    },
    /// Reference description of holdings
    Describe {
        /// Symbol to describe (all holdings when omitted)
        #[arg(short, long)]
        symbol: Option<String>,
        /// TOML reference-data file (built-in data when omitted)
        #[arg(short, long)]
        reference: Option<PathBuf>,
    },
    /// Print the effective configuration
    Config,
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let output = match run(cli) {
        Ok(output) => output,
        Err(e) => {
            tracing::error!("{:#}", e);
            to_json(&ApiResponse::<()>::err(format!("{:#}", e)))
        }
    };

    println!("{}", output);
}

fn run(cli: Cli) -> Result<String> {
    let config = match &cli.config {
        Some(path) => WalletConfig::load_from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => WalletConfig::load().context("loading default config")?,
    };

    match cli.command {
        Commands::Stats { prices, symbols } => handle_stats(&config, &prices, symbols),
        Commands::Wallet { prices } => handle_wallet(&config, &prices),
        Commands::Compare { prices } => handle_compare(&config, &prices),
        Commands::Describe { symbol, reference } => handle_describe(&config, symbol, reference),
        Commands::Config => Ok(to_json(&ApiResponse::ok(&config))),
    }
}

fn open_prices(path: &Path) -> Result<JsonPriceFetcher> {
    JsonPriceFetcher::open(path).with_context(|| format!("opening prices {}", path.display()))
}

fn handle_stats(config: &WalletConfig, prices: &Path, symbols: Option<String>) -> Result<String> {
    let fetcher = open_prices(prices)?;
    let symbols: Vec<String> = match symbols {
        Some(list) => list.split(',').map(|s| s.trim().to_string()).collect(),
        None => config.unique_tickers(),
    };

    let stats = stock_statistics(&fetcher, &symbols, config)?;
    Ok(to_json(&ApiResponse::ok(json!({
        "symbols": stats.statistics.symbols,
        "observations": stats.statistics.observations,
        "mean_annual_returns": stats.statistics.mean_annual_returns,
        "annual_variance": stats.statistics.annual_variance,
        "covariance_matrix": stats.statistics.covariance_matrix,
        "correlation_matrix": stats.statistics.correlation_matrix,
    }))))
}

fn handle_wallet(config: &WalletConfig, prices: &Path) -> Result<String> {
    let fetcher = open_prices(prices)?;
    let wallet = compute_wallet_statistics(&fetcher, config)?;

    Ok(to_json(&ApiResponse::ok(json!({
        "symbols": wallet.symbols,
        "weights": wallet.weights,
        "mean_annual_returns": wallet.mean_annual_returns,
        "correlation_matrix": wallet.correlation_matrix,
        "annual_return": wallet.annual_return,
        "annual_variance": wallet.annual_variance,
        "annual_volatility": wallet.annual_volatility,
        "sharpe_ratio": wallet.sharpe_ratio,
        "risk_free_rate": wallet.risk_free_rate,
    }))))
}

fn handle_compare(config: &WalletConfig, prices: &Path) -> Result<String> {
    let fetcher = open_prices(prices)?;
    let wallet = compute_wallet_statistics(&fetcher, config)?;
    let comparison = benchmark_comparison(&fetcher, &wallet, config)?;

    Ok(to_json(&ApiResponse::ok(json!({
        "comparison": comparison,
        "excess_growth": comparison.excess_growth(),
    }))))
}

fn handle_describe(
    config: &WalletConfig,
    symbol: Option<String>,
    reference: Option<PathBuf>,
) -> Result<String> {
    let data = match reference {
        Some(path) => ReferenceData::load_from_path(&path)
            .with_context(|| format!("loading reference data {}", path.display()))?,
        None => ReferenceData::builtin(),
    };

    match symbol {
        Some(symbol) => Ok(to_json(&ApiResponse::ok(data.describe(&symbol)?))),
        None => Ok(to_json(&ApiResponse::ok(json!({
            "profiles": data.profiles,
            "scpi_yields": data.scpi_yields,
            "mean_scpi_yield": data.mean_scpi_yield(),
            "implied_temperature": data.implied_temperature(&config.unique_tickers()),
        })))),
    }
}

fn to_json<T: Serialize>(response: &ApiResponse<T>) -> String {
    serde_json::to_string_pretty(response)
        .unwrap_or_else(|e| format!(r#"{{"ok":false,"error":"serialization failed: {}"}}"#, e))
}
