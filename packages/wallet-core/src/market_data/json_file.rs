//! Price fetcher reading a JSON price-history snapshot.

use super::{InMemoryPriceFetcher, PriceFetcher};
use crate::types::PriceTable;
use crate::{Error, Result};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Closing prices loaded from a file shaped like
/// `{ "MSFT": { "2019-01-02": 101.12, "2019-01-03": null }, ... }`.
#[derive(Debug, Clone)]
pub struct JsonPriceFetcher {
    path: PathBuf,
    prices: InMemoryPriceFetcher,
}

impl JsonPriceFetcher {
    /// Load a price-history file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(Error::DataUnavailable(format!(
                "price file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(&path)?;
        let series: BTreeMap<String, BTreeMap<NaiveDate, Option<f64>>> =
            serde_json::from_str(&content)?;

        tracing::debug!(
            "Loaded {} price series from {}",
            series.len(),
            path.display()
        );

        Ok(Self {
            path,
            prices: InMemoryPriceFetcher::from_map(series),
        })
    }

    /// Write price series to a file readable by [`JsonPriceFetcher::open`].
    pub fn save(
        path: impl AsRef<Path>,
        series: &BTreeMap<String, BTreeMap<NaiveDate, Option<f64>>>,
    ) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(series)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the file this fetcher was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PriceFetcher for JsonPriceFetcher {
    fn fetch_closing_prices(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceTable> {
        self.prices.fetch_closing_prices(symbols, start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 6, d).unwrap()
    }

    #[test]
    fn test_open_and_fetch() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prices.json");
        fs::write(
            &path,
            r#"{
                "MSFT": { "2021-06-01": 250.0, "2021-06-02": null, "2021-06-03": 252.5 },
                "SAP": { "2021-06-02": 120.0 }
            }"#,
        )
        .unwrap();

        let fetcher = JsonPriceFetcher::open(&path).unwrap();
        let symbols = vec!["MSFT".to_string(), "SAP".to_string()];
        let table = fetcher
            .fetch_closing_prices(&symbols, date(1), date(30))
            .unwrap();

        assert_eq!(table.dates(), &[date(1), date(2), date(3)]);
        assert_eq!(
            table.column("MSFT").unwrap(),
            &[Some(250.0), None, Some(252.5)]
        );
        assert_eq!(table.column("SAP").unwrap(), &[None, Some(120.0), None]);
    }

    #[test]
    fn test_save_then_open() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/prices.json");

        let series = BTreeMap::from([(
            "UL".to_string(),
            BTreeMap::from([(date(1), Some(55.0)), (date(2), Some(56.0))]),
        )]);
        JsonPriceFetcher::save(&path, &series).unwrap();

        let fetcher = JsonPriceFetcher::open(&path).unwrap();
        assert_eq!(fetcher.path(), path.as_path());

        let table = fetcher
            .fetch_closing_prices(&["UL".to_string()], date(1), date(3))
            .unwrap();
        assert_eq!(table.column("UL").unwrap(), &[Some(55.0), Some(56.0)]);
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempdir().unwrap();
        let result = JsonPriceFetcher::open(dir.path().join("absent.json"));
        assert!(matches!(result, Err(Error::DataUnavailable(_))));
    }

    #[test]
    fn test_open_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prices.json");
        fs::write(&path, r#"{ "MSFT": { "not-a-date": 1.0 } }"#).unwrap();

        assert!(matches!(JsonPriceFetcher::open(&path), Err(Error::Json(_))));
    }
}
