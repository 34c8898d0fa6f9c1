//! Pipeline configuration: basket, date range and annualization constants.

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Scaling applied to a daily covariance matrix to annualize it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CovarianceScaling {
    /// Multiply by `sqrt(trading_days_per_year)`, as the dashboard figures do
    #[default]
    SqrtFactor,
    /// Multiply by `trading_days_per_year`, consistent with variance scaling
    Factor,
}

impl CovarianceScaling {
    /// Multiplier for a given number of trading days per year.
    pub fn multiplier(self, trading_days_per_year: u32) -> f64 {
        let days = f64::from(trading_days_per_year);
        match self {
            Self::SqrtFactor => days.sqrt(),
            Self::Factor => days,
        }
    }
}

/// Everything the pipeline needs besides price data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WalletConfig {
    /// Symbols in the equal-weighted basket
    pub tickers: Vec<String>,
    /// First date of the analysis window (inclusive)
    pub start: NaiveDate,
    /// End of the analysis window (exclusive)
    pub end: NaiveDate,
    /// Index the portfolio is compared against
    pub benchmark: String,
    /// Annual risk-free rate used by the Sharpe ratio (0.02 = 2%)
    pub risk_free_rate: f64,
    /// Trading days used to annualize daily figures
    pub trading_days_per_year: u32,
    /// Annualization of covariance matrices
    pub covariance_scaling: CovarianceScaling,
}

pub const DEFAULT_TICKERS: [&str; 10] = [
    "MSFT", "OR", "EN.PA", "CA", "UL", "SU", "SAP", "ALV.DE", "EART.L", "PAWD.L",
];

pub const DEFAULT_BENCHMARK: &str = "^SPX";
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.02;
pub const DEFAULT_TRADING_DAYS: u32 = 252;

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            tickers: DEFAULT_TICKERS.iter().map(|s| s.to_string()).collect(),
            start: NaiveDate::from_ymd_opt(2019, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap_or_default(),
            benchmark: DEFAULT_BENCHMARK.to_string(),
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            trading_days_per_year: DEFAULT_TRADING_DAYS,
            covariance_scaling: CovarianceScaling::default(),
        }
    }
}

impl WalletConfig {
    /// Load the configuration from the default path.
    ///
    /// Default path: `~/.green-wallet/config.toml`
    /// Can be overridden with `GREEN_WALLET_CONFIG` environment variable.
    /// A missing file yields the built-in defaults.
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::default_path())
    }

    /// Get the default configuration file path.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = env::var("GREEN_WALLET_CONFIG") {
            return PathBuf::from(path);
        }

        directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(".green-wallet/config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Load and validate a configuration file.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        tracing::debug!(
            "Loaded config from {} ({} tickers)",
            path.display(),
            config.tickers.len()
        );
        Ok(config)
    }

    /// Use a different basket, keeping the other settings.
    pub fn with_tickers<I, S>(mut self, tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tickers = tickers.into_iter().map(Into::into).collect();
        self
    }

    /// Use a different analysis window, keeping the other settings.
    pub fn with_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Check the settings are usable by the pipeline.
    pub fn validate(&self) -> Result<()> {
        if self.tickers.is_empty() {
            return Err(Error::InvalidConfig("tickers cannot be empty".to_string()));
        }

        if self.tickers.iter().any(|t| t.trim().is_empty()) {
            return Err(Error::InvalidConfig("tickers cannot be blank".to_string()));
        }

        if self.start >= self.end {
            return Err(Error::InvalidConfig(format!(
                "start {} must be before end {}",
                self.start, self.end
            )));
        }

        if self.trading_days_per_year == 0 {
            return Err(Error::InvalidConfig(
                "trading_days_per_year must be positive".to_string(),
            ));
        }

        if !self.risk_free_rate.is_finite() {
            return Err(Error::InvalidConfig(
                "risk_free_rate must be finite".to_string(),
            ));
        }

        Ok(())
    }

    /// Requested tickers with duplicates removed, first occurrence kept.
    pub fn unique_tickers(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.tickers
            .iter()
            .filter(|t| seen.insert(t.as_str()))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = WalletConfig::default();

        assert_eq!(config.tickers.len(), 10);
        assert_eq!(config.tickers[0], "MSFT");
        assert_eq!(config.start, NaiveDate::from_ymd_opt(2019, 1, 1).unwrap());
        assert_eq!(config.end, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        assert_eq!(config.risk_free_rate, 0.02);
        assert_eq!(config.trading_days_per_year, 252);
        assert_eq!(config.covariance_scaling, CovarianceScaling::SqrtFactor);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_covariance_multiplier() {
        assert!((CovarianceScaling::SqrtFactor.multiplier(252) - 252f64.sqrt()).abs() < 1e-12);
        assert_eq!(CovarianceScaling::Factor.multiplier(252), 252.0);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = WalletConfig::load_from_path(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, WalletConfig::default());
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
tickers = ["MSFT", "SAP"]
start = "2020-01-01"
risk_free_rate = 0.03
covariance_scaling = "factor"
"#,
        )
        .unwrap();

        let config = WalletConfig::load_from_path(&path).unwrap();
        assert_eq!(config.tickers, vec!["MSFT", "SAP"]);
        assert_eq!(config.start, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(config.risk_free_rate, 0.03);
        assert_eq!(config.covariance_scaling, CovarianceScaling::Factor);
        // Unset fields keep their defaults
        assert_eq!(config.trading_days_per_year, 252);
        assert_eq!(config.benchmark, "^SPX");
    }

    #[test]
    fn test_load_rejects_invalid_range() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "start = \"2025-01-01\"\nend = \"2024-01-01\"\n").unwrap();

        let result = WalletConfig::load_from_path(&path);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_load_rejects_malformed_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "tickers = [").unwrap();

        assert!(matches!(
            WalletConfig::load_from_path(&path),
            Err(Error::Toml(_))
        ));
    }

    #[test]
    fn test_validate() {
        let empty = WalletConfig::default().with_tickers(Vec::<String>::new());
        assert!(matches!(empty.validate(), Err(Error::InvalidConfig(_))));

        let mut zero_days = WalletConfig::default();
        zero_days.trading_days_per_year = 0;
        assert!(zero_days.validate().is_err());

        let mut bad_rate = WalletConfig::default();
        bad_rate.risk_free_rate = f64::NAN;
        assert!(bad_rate.validate().is_err());
    }

    #[test]
    fn test_unique_tickers() {
        let config = WalletConfig::default().with_tickers(["MSFT", "SAP", "MSFT"]);
        assert_eq!(config.unique_tickers(), vec!["MSFT", "SAP"]);
    }
}
