//! Core data types for the wallet statistics pipeline.

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Daily closing prices, one column per symbol, indexed by trading date.
///
/// Cells are `None` where the provider had no quote (holidays, listing gaps).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(try_from = "RawPriceTable")]
pub struct PriceTable {
    /// Trading dates, ascending and unique
    dates: Vec<NaiveDate>,
    /// Column labels
    symbols: Vec<String>,
    /// One column per symbol, aligned with `dates`
    columns: Vec<Vec<Option<f64>>>,
}

impl PriceTable {
    /// Build a table from a date axis and per-symbol columns.
    ///
    /// `NaN` prices are stored as missing.
    pub fn new(
        dates: Vec<NaiveDate>,
        symbols: Vec<String>,
        columns: Vec<Vec<Option<f64>>>,
    ) -> Result<Self> {
        validate_shape(&dates, &symbols, &columns)?;
        let columns = columns
            .into_iter()
            .map(|col| col.into_iter().map(|p| p.filter(|v| !v.is_nan())).collect())
            .collect();

        Ok(Self {
            dates,
            symbols,
            columns,
        })
    }

    /// Build a table from per-symbol price maps.
    ///
    /// The date axis is the union of every series' dates; a symbol without a
    /// quote on a given date gets a missing cell.
    pub fn from_series<I, S>(series: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, BTreeMap<NaiveDate, Option<f64>>)>,
        S: Into<String>,
    {
        let series: Vec<(String, BTreeMap<NaiveDate, Option<f64>>)> =
            series.into_iter().map(|(s, m)| (s.into(), m)).collect();

        let dates: Vec<NaiveDate> = series
            .iter()
            .flat_map(|(_, prices)| prices.keys().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut symbols = Vec::with_capacity(series.len());
        let mut columns = Vec::with_capacity(series.len());
        for (symbol, prices) in series {
            columns.push(
                dates
                    .iter()
                    .map(|d| prices.get(d).copied().flatten())
                    .collect(),
            );
            symbols.push(symbol);
        }

        Self::new(dates, symbols, columns)
    }

    /// Trading dates.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Column labels.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// All columns, in `symbols()` order.
    pub fn columns(&self) -> &[Vec<Option<f64>>] {
        &self.columns
    }

    /// Price column for a symbol.
    pub fn column(&self, symbol: &str) -> Option<&[Option<f64>]> {
        self.symbols
            .iter()
            .position(|s| s == symbol)
            .map(|idx| self.columns[idx].as_slice())
    }

    /// Number of trading dates.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// A table with no dates or no symbols carries no prices.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() || self.symbols.is_empty()
    }
}

/// Serialized form of a [`PriceTable`], validated on the way in.
#[derive(Deserialize)]
struct RawPriceTable {
    dates: Vec<NaiveDate>,
    symbols: Vec<String>,
    columns: Vec<Vec<Option<f64>>>,
}

impl TryFrom<RawPriceTable> for PriceTable {
    type Error = Error;

    fn try_from(raw: RawPriceTable) -> Result<Self> {
        Self::new(raw.dates, raw.symbols, raw.columns)
    }
}

/// How rows with unresolved gaps are treated after forward-filling.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReturnMode {
    /// Drop every row that still has a missing cell
    Strict,
    /// Keep rows, leaving missing cells in place
    Lenient,
}

/// Simple daily returns derived from a [`PriceTable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawReturnTable")]
pub struct ReturnTable {
    dates: Vec<NaiveDate>,
    symbols: Vec<String>,
    columns: Vec<Vec<Option<f64>>>,
    /// Gap treatment this table was built with
    mode: ReturnMode,
}

impl ReturnTable {
    /// Build a return table directly from columns.
    pub fn new(
        dates: Vec<NaiveDate>,
        symbols: Vec<String>,
        columns: Vec<Vec<Option<f64>>>,
        mode: ReturnMode,
    ) -> Result<Self> {
        validate_shape(&dates, &symbols, &columns)?;
        if mode == ReturnMode::Strict && columns.iter().flatten().any(Option::is_none) {
            return Err(Error::InvalidTable(
                "strict return table cannot contain missing cells".to_string(),
            ));
        }

        Ok(Self {
            dates,
            symbols,
            columns,
            mode,
        })
    }

    /// Trading dates.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Column labels.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// All columns, in `symbols()` order.
    pub fn columns(&self) -> &[Vec<Option<f64>>] {
        &self.columns
    }

    /// Return column for a symbol.
    pub fn column(&self, symbol: &str) -> Option<&[Option<f64>]> {
        self.symbols
            .iter()
            .position(|s| s == symbol)
            .map(|idx| self.columns[idx].as_slice())
    }

    /// Cells of one row, in `symbols()` order.
    pub fn row(&self, idx: usize) -> impl Iterator<Item = Option<f64>> + '_ {
        self.columns.iter().map(move |col| col[idx])
    }

    pub fn mode(&self) -> ReturnMode {
        self.mode
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

#[derive(Deserialize)]
struct RawReturnTable {
    dates: Vec<NaiveDate>,
    symbols: Vec<String>,
    columns: Vec<Vec<Option<f64>>>,
    mode: ReturnMode,
}

impl TryFrom<RawReturnTable> for ReturnTable {
    type Error = Error;

    fn try_from(raw: RawReturnTable) -> Result<Self> {
        Self::new(raw.dates, raw.symbols, raw.columns, raw.mode)
    }
}

fn validate_shape(
    dates: &[NaiveDate],
    symbols: &[String],
    columns: &[Vec<Option<f64>>],
) -> Result<()> {
    if symbols.len() != columns.len() {
        return Err(Error::InvalidTable(format!(
            "{} symbols but {} columns",
            symbols.len(),
            columns.len()
        )));
    }

    if let Some((symbol, col)) = symbols
        .iter()
        .zip(columns)
        .find(|(_, col)| col.len() != dates.len())
    {
        return Err(Error::InvalidTable(format!(
            "column {} has {} rows, expected {}",
            symbol,
            col.len(),
            dates.len()
        )));
    }

    if let Some(pair) = dates.windows(2).find(|w| w[0] >= w[1]) {
        return Err(Error::InvalidTable(format!(
            "dates must be strictly ascending ({} then {})",
            pair[0], pair[1]
        )));
    }

    let unique: BTreeSet<&String> = symbols.iter().collect();
    if unique.len() != symbols.len() {
        return Err(Error::InvalidTable("duplicate symbol column".to_string()));
    }

    Ok(())
}

/// A single dated series, e.g. portfolio daily or cumulative returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DateSeries {
    pub dates: Vec<NaiveDate>,
    /// `None` where the value is undefined for that date
    pub values: Vec<Option<f64>>,
}

impl DateSeries {
    pub fn new(dates: Vec<NaiveDate>, values: Vec<Option<f64>>) -> Self {
        debug_assert_eq!(dates.len(), values.len());
        Self { dates, values }
    }

    /// Value on a given date, if the date is on the axis and the value defined.
    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.dates
            .binary_search(&date)
            .ok()
            .and_then(|idx| self.values[idx])
    }

    /// Last defined value.
    pub fn last_value(&self) -> Option<f64> {
        self.values.iter().rev().find_map(|v| *v)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// JSON envelope printed by the CLI: `data` on success, `error` otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response.
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_price_table_from_series_unions_dates() {
        let msft = BTreeMap::from([(date(2), Some(10.0)), (date(3), Some(11.0))]);
        let sap = BTreeMap::from([(date(3), Some(20.0)), (date(4), Some(21.0))]);

        let table = PriceTable::from_series([("MSFT", msft), ("SAP", sap)]).unwrap();

        assert_eq!(table.dates(), &[date(2), date(3), date(4)]);
        assert_eq!(table.column("MSFT").unwrap(), &[Some(10.0), Some(11.0), None]);
        assert_eq!(table.column("SAP").unwrap(), &[None, Some(20.0), Some(21.0)]);
        assert!(table.column("UL").is_none());
    }

    #[test]
    fn test_price_table_nan_is_missing() {
        let table = PriceTable::new(
            vec![date(2), date(3)],
            vec!["MSFT".to_string()],
            vec![vec![Some(f64::NAN), Some(1.0)]],
        )
        .unwrap();

        assert_eq!(table.column("MSFT").unwrap(), &[None, Some(1.0)]);
    }

    #[test]
    fn test_price_table_rejects_unsorted_dates() {
        let result = PriceTable::new(
            vec![date(3), date(2)],
            vec!["MSFT".to_string()],
            vec![vec![Some(1.0), Some(2.0)]],
        );
        assert!(matches!(result, Err(Error::InvalidTable(_))));
    }

    #[test]
    fn test_price_table_rejects_ragged_columns() {
        let result = PriceTable::new(
            vec![date(2), date(3)],
            vec!["MSFT".to_string()],
            vec![vec![Some(1.0)]],
        );
        assert!(matches!(result, Err(Error::InvalidTable(_))));
    }

    #[test]
    fn test_empty_price_table() {
        assert!(PriceTable::default().is_empty());

        let no_symbols = PriceTable::new(vec![date(2)], vec![], vec![]).unwrap();
        assert!(no_symbols.is_empty());
    }

    #[test]
    fn test_strict_return_table_rejects_gaps() {
        let result = ReturnTable::new(
            vec![date(2)],
            vec!["MSFT".to_string()],
            vec![vec![None]],
            ReturnMode::Strict,
        );
        assert!(matches!(result, Err(Error::InvalidTable(_))));

        let lenient = ReturnTable::new(
            vec![date(2)],
            vec!["MSFT".to_string()],
            vec![vec![None]],
            ReturnMode::Lenient,
        );
        assert!(lenient.is_ok());
    }

    #[test]
    fn test_date_series_lookup() {
        let series = DateSeries::new(vec![date(2), date(3), date(4)], vec![Some(1.0), None, Some(3.0)]);

        assert_eq!(series.get(date(2)), Some(1.0));
        assert_eq!(series.get(date(3)), None);
        assert_eq!(series.get(date(5)), None);
        assert_eq!(series.last_value(), Some(3.0));
    }

    #[test]
    fn test_deserialize_ragged_price_table_fails() {
        let json = r#"{
            "dates": ["2024-01-02", "2024-01-03", "2024-01-04"],
            "symbols": ["A", "B"],
            "columns": [[1.0, 2.0, 3.0], [1.0]]
        }"#;

        let err = serde_json::from_str::<PriceTable>(json).unwrap_err();
        assert!(err.to_string().contains("column B has 1 rows"), "{}", err);
    }

    #[test]
    fn test_deserialize_price_table_validates() {
        let unsorted = r#"{
            "dates": ["2024-01-03", "2024-01-02"],
            "symbols": ["A"],
            "columns": [[1.0, 2.0]]
        }"#;
        assert!(serde_json::from_str::<PriceTable>(unsorted).is_err());

        let valid = r#"{
            "dates": ["2024-01-02", "2024-01-03"],
            "symbols": ["A"],
            "columns": [[null, 2.0]]
        }"#;
        let table: PriceTable = serde_json::from_str(valid).unwrap();
        assert_eq!(table.column("A").unwrap(), &[None, Some(2.0)]);
    }

    #[test]
    fn test_deserialize_return_table_validates() {
        let gap_in_strict = r#"{
            "dates": ["2024-01-02"],
            "symbols": ["A"],
            "columns": [[null]],
            "mode": "strict"
        }"#;
        assert!(serde_json::from_str::<ReturnTable>(gap_in_strict).is_err());

        let ragged = r#"{
            "dates": ["2024-01-02", "2024-01-03"],
            "symbols": ["A", "B"],
            "columns": [[0.01, 0.02], [0.01]],
            "mode": "lenient"
        }"#;
        assert!(serde_json::from_str::<ReturnTable>(ragged).is_err());

        let table = ReturnTable::new(
            vec![date(2), date(3)],
            vec!["A".to_string()],
            vec![vec![Some(0.01), None]],
            ReturnMode::Lenient,
        )
        .unwrap();
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(serde_json::from_str::<ReturnTable>(&json).unwrap(), table);
    }

    #[test]
    fn test_api_response_wraps_series() {
        let series = DateSeries::new(vec![date(2)], vec![Some(1.01)]);
        let json = serde_json::to_value(ApiResponse::ok(series)).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["data"]["values"][0], 1.01);
        assert!(json.get("error").is_none());

        let err = serde_json::to_value(ApiResponse::<DateSeries>::err("no prices")).unwrap();
        assert_eq!(err["ok"], false);
        assert_eq!(err["error"], "no prices");
        assert!(err.get("data").is_none());
    }
}
