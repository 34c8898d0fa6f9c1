//! Static reference data shown next to the computed statistics.
//!
//! Descriptions and historical SCPI yields are not derived from prices; they
//! are injected as a lookup table so the dashboard can be re-pointed at a
//! different basket without touching the pipeline.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Kind of instrument held in the wallet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AssetCategory {
    Stock,
    Etf,
    Scpi,
}

/// Descriptive profile of one holding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetProfile {
    /// Full instrument name
    pub name: String,
    pub category: AssetCategory,
    /// Sustainability label (e.g. "Article 9 SFDR", "ISR")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Implied temperature rise in °C, for equities with a published figure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implied_temperature: Option<f64>,
    /// Free-text description
    pub summary: String,
}

/// Distribution rate of an SCPI for one calendar year.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AnnualYield {
    pub year: i32,
    /// Yield as a fraction (0.0401 = 4.01%)
    pub rate: f64,
}

/// Lookup tables for holdings' descriptions and SCPI yields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ReferenceData {
    #[serde(default)]
    pub profiles: BTreeMap<String, AssetProfile>,
    #[serde(default)]
    pub scpi_yields: Vec<AnnualYield>,
}

impl ReferenceData {
    /// Load reference data from a TOML file.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut data: Self = toml::from_str(&content)?;
        data.scpi_yields.sort_by_key(|y| y.year);
        Ok(data)
    }

    /// Reference data for the default green wallet basket.
    pub fn builtin() -> Self {
        let stock = |name: &str, temperature: f64, summary: &str| AssetProfile {
            name: name.to_string(),
            category: AssetCategory::Stock,
            label: None,
            implied_temperature: Some(temperature),
            summary: summary.to_string(),
        };

        let profiles = BTreeMap::from([
            (
                "MSFT".to_string(),
                stock(
                    "Microsoft Corporation",
                    1.4,
                    "Net-zero target for 2045 covering scopes 1-3; implied temperature rise 1.4°C; MSCI ESG rating A.",
                ),
            ),
            (
                "OR".to_string(),
                stock(
                    "L'Oréal SA",
                    1.3,
                    "Net-zero target for 2050 covering all scopes; implied temperature rise 1.3°C; MSCI ESG rating AA.",
                ),
            ),
            (
                "EN.PA".to_string(),
                stock(
                    "Bouygues SA",
                    1.5,
                    "Net-zero target for 2050 covering 97% of emissions; implied temperature rise 1.5°C; MSCI ESG rating AA.",
                ),
            ),
            (
                "CA".to_string(),
                stock(
                    "Carrefour SA",
                    1.4,
                    "Net-zero target for 2040; implied temperature rise 1.4°C; MSCI ESG rating AA. Tobacco and alcohol exposure tolerated at AA or above.",
                ),
            ),
            (
                "UL".to_string(),
                stock(
                    "Unilever PLC",
                    1.5,
                    "Net-zero target for 2040 covering all scopes; implied temperature rise 1.5°C; MSCI ESG rating AAA.",
                ),
            ),
            (
                "SU".to_string(),
                stock(
                    "Schneider Electric SE",
                    1.3,
                    "Net-zero target for 2040 covering all scopes; implied temperature rise 1.3°C; MSCI ESG rating AAA.",
                ),
            ),
            (
                "SAP".to_string(),
                stock(
                    "SAP SE",
                    1.5,
                    "Net-zero target for 2030 covering all scopes; implied temperature rise 1.5°C; MSCI ESG rating AA.",
                ),
            ),
            (
                "ALV.DE".to_string(),
                stock(
                    "Allianz SE",
                    1.5,
                    "Net-zero target for 2050 covering all scopes; implied temperature rise 1.5°C; MSCI ESG rating AA.",
                ),
            ),
            (
                "EART.L".to_string(),
                AssetProfile {
                    name: "Amundi Euro Government Green Bond UCITS ETF Acc".to_string(),
                    category: AssetCategory::Etf,
                    label: Some("Article 9 SFDR".to_string()),
                    implied_temperature: None,
                    summary: "Tracks the Solactive Euro Government Green Bond Index (ISIN LU2356220926).".to_string(),
                },
            ),
            (
                "PAWD.L".to_string(),
                AssetProfile {
                    name: "Invesco MSCI World ESG Climate Paris Aligned UCITS ETF Acc".to_string(),
                    category: AssetCategory::Etf,
                    label: Some("Article 9 SFDR".to_string()),
                    implied_temperature: None,
                    summary: "Tracks the MSCI World ESG Climate Paris Aligned Benchmark Select index (ISIN IE000V93BNU0).".to_string(),
                },
            ),
            (
                "SCPI Accimmo Pierre".to_string(),
                AssetProfile {
                    name: "SCPI Accimmo Pierre".to_string(),
                    category: AssetCategory::Scpi,
                    label: Some("ISR".to_string()),
                    implied_temperature: None,
                    summary: "BNP Paribas REIM office real estate fund with a best-in-progress ESG approach.".to_string(),
                },
            ),
        ]);

        let scpi_yields = [(2019, 0.0401), (2020, 0.0381), (2021, 0.0461), (2022, 0.0380), (2023, 0.0351)]
            .into_iter()
            .map(|(year, rate)| AnnualYield { year, rate })
            .collect();

        Self {
            profiles,
            scpi_yields,
        }
    }

    /// Profile of a holding.
    pub fn describe(&self, symbol: &str) -> Result<&AssetProfile> {
        self.profiles
            .get(symbol)
            .ok_or_else(|| Error::UnknownSymbol(symbol.to_string()))
    }

    /// Equal-weighted implied temperature of the given holdings.
    ///
    /// Holdings without a published figure, or without a profile, are left
    /// out of the average. `None` if no holding has one.
    pub fn implied_temperature(&self, symbols: &[String]) -> Option<f64> {
        let temperatures: Vec<f64> = symbols
            .iter()
            .filter_map(|s| self.profiles.get(s)?.implied_temperature)
            .collect();

        if temperatures.is_empty() {
            return None;
        }
        Some(temperatures.iter().sum::<f64>() / temperatures.len() as f64)
    }

    /// SCPI yield for a year, if published.
    pub fn scpi_yield(&self, year: i32) -> Option<f64> {
        self.scpi_yields
            .iter()
            .find(|y| y.year == year)
            .map(|y| y.rate)
    }

    /// Average of the published SCPI yields.
    pub fn mean_scpi_yield(&self) -> Option<f64> {
        if self.scpi_yields.is_empty() {
            return None;
        }
        let total: f64 = self.scpi_yields.iter().map(|y| y.rate).sum();
        Some(total / self.scpi_yields.len() as f64)
    }
}
