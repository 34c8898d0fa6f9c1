//! Portfolio performance series and benchmark comparison.

use crate::types::{DateSeries, ReturnTable};
use serde::{Deserialize, Serialize};

/// Equal-weighted daily portfolio return for charting.
///
/// Each row is the plain mean of the assets that have a return that day;
/// a row with no returns at all is undefined. This differs from the headline
/// annual return, which weights every requested asset.
pub fn row_mean_returns(returns: &ReturnTable) -> DateSeries {
    let values = (0..returns.len())
        .map(|i| {
            let (sum, n) = returns
                .row(i)
                .flatten()
                .fold((0.0_f64, 0usize), |(sum, n), r| (sum + r, n + 1));
            (n > 0).then(|| sum / n as f64)
        })
        .collect();

    DateSeries::new(returns.dates().to_vec(), values)
}

/// Growth of one unit invested: running product of `1 + r`.
///
/// Undefined days stay undefined and leave the running product unchanged.
pub fn cumulative_returns(daily: &DateSeries) -> DateSeries {
    let mut growth = 1.0;
    let values = daily
        .values
        .iter()
        .map(|r| {
            r.map(|r| {
                growth *= 1.0 + r;
                growth
            })
        })
        .collect();

    DateSeries::new(daily.dates.clone(), values)
}

/// Cumulative portfolio performance against a benchmark on one date axis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BenchmarkComparison {
    /// Benchmark symbol
    pub benchmark: String,
    /// Cumulative growth of the equal-weighted portfolio
    pub portfolio: DateSeries,
    /// Cumulative growth of the benchmark
    pub index: DateSeries,
}

impl BenchmarkComparison {
    /// Last portfolio growth minus last benchmark growth.
    pub fn excess_growth(&self) -> Option<f64> {
        Some(self.portfolio.last_value()? - self.index.last_value()?)
    }
}

/// Compound both daily series and put them on a shared date axis.
///
/// Each series is compounded over its own full history first. The axis of
/// the shorter series is kept and the other series is looked up on those
/// dates (left join); dates it lacks are undefined. On a tie the portfolio
/// axis wins.
pub fn compare_cumulative(
    portfolio_daily: &DateSeries,
    benchmark_daily: &DateSeries,
    benchmark: &str,
) -> BenchmarkComparison {
    let portfolio = cumulative_returns(portfolio_daily);
    let index = cumulative_returns(benchmark_daily);

    let axis = if index.len() < portfolio.len() {
        index.dates.clone()
    } else {
        portfolio.dates.clone()
    };

    let align = |series: &DateSeries| {
        DateSeries::new(axis.clone(), axis.iter().map(|d| series.get(*d)).collect())
    };

    BenchmarkComparison {
        benchmark: benchmark.to_string(),
        portfolio: align(&portfolio),
        index: align(&index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ReturnMode;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 9, d).unwrap()
    }

    fn series(days: &[u32], values: &[Option<f64>]) -> DateSeries {
        DateSeries::new(days.iter().copied().map(date).collect(), values.to_vec())
    }

    #[test]
    fn test_cumulative_returns() {
        let daily = series(&[1, 2], &[Some(0.01), Some(-0.01)]);
        let cumulative = cumulative_returns(&daily);

        assert_relative_eq!(cumulative.values[0].unwrap(), 1.01, epsilon = 1e-12);
        assert_relative_eq!(cumulative.values[1].unwrap(), 0.9999, epsilon = 1e-12);
    }

    #[test]
    fn test_cumulative_returns_skips_undefined_days() {
        let daily = series(&[1, 2, 3], &[Some(0.1), None, Some(0.1)]);
        let cumulative = cumulative_returns(&daily);

        assert_eq!(cumulative.values[1], None);
        assert_relative_eq!(cumulative.values[2].unwrap(), 1.21, epsilon = 1e-12);
    }

    #[test]
    fn test_row_mean_ignores_missing_cells() {
        let returns = ReturnTable::new(
            vec![date(1), date(2), date(3)],
            vec!["A".to_string(), "B".to_string()],
            vec![
                vec![Some(0.02), Some(0.01), None],
                vec![None, Some(0.03), None],
            ],
            ReturnMode::Lenient,
        )
        .unwrap();

        let daily = row_mean_returns(&returns);

        assert_eq!(daily.dates, returns.dates());
        assert_relative_eq!(daily.values[0].unwrap(), 0.02, epsilon = 1e-12);
        assert_relative_eq!(daily.values[1].unwrap(), 0.02, epsilon = 1e-12);
        assert_eq!(daily.values[2], None);
    }

    #[test]
    fn test_compare_keeps_shorter_axis() {
        let portfolio = series(&[1, 2, 3, 4], &[Some(0.01); 4]);
        let index = series(&[2, 4, 5], &[Some(0.02), Some(0.02), Some(0.02)]);

        let comparison = compare_cumulative(&portfolio, &index, "^SPX");

        assert_eq!(comparison.benchmark, "^SPX");
        assert_eq!(comparison.portfolio.dates, vec![date(2), date(4), date(5)]);
        assert_eq!(comparison.index.dates, comparison.portfolio.dates);

        // Portfolio compounded over its own history before alignment
        assert_relative_eq!(comparison.portfolio.values[0].unwrap(), 1.01f64.powi(2), epsilon = 1e-12);
        assert_relative_eq!(comparison.portfolio.values[1].unwrap(), 1.01f64.powi(4), epsilon = 1e-12);
        assert_eq!(comparison.portfolio.values[2], None);
        assert_relative_eq!(comparison.index.values[2].unwrap(), 1.02f64.powi(3), epsilon = 1e-12);
    }

    #[test]
    fn test_compare_tie_uses_portfolio_axis() {
        let portfolio = series(&[1, 2], &[Some(0.01), Some(0.01)]);
        let index = series(&[2, 3], &[Some(0.0), Some(0.0)]);

        let comparison = compare_cumulative(&portfolio, &index, "^SPX");
        assert_eq!(comparison.index.dates, vec![date(1), date(2)]);
        assert_eq!(comparison.index.values, vec![None, Some(1.0)]);
    }

    #[test]
    fn test_excess_growth() {
        let portfolio = series(&[1, 2], &[Some(0.1), Some(0.0)]);
        let index = series(&[1, 2], &[Some(0.05), Some(0.0)]);

        let comparison = compare_cumulative(&portfolio, &index, "^SPX");
        assert_relative_eq!(comparison.excess_growth().unwrap(), 0.05, epsilon = 1e-12);
    }
}
