//! Sample moments over return columns with gaps.
//!
//! Missing cells are skipped. Pairwise statistics use only the rows where both
//! columns have a value. All estimators use the sample (n - 1) denominator and
//! return `NaN` when fewer than two observations are available.
//!
//! A side whose values are all identical is constant: its covariance is
//! exactly `0.0` and its correlations are `NaN`, whatever rounding the mean
//! would otherwise leave behind.

use nalgebra::DMatrix;

/// Mean of the available values.
pub fn mean(values: &[Option<f64>]) -> f64 {
    let (sum, n) = values
        .iter()
        .flatten()
        .fold((0.0_f64, 0usize), |(sum, n), v| (sum + v, n + 1));

    if n == 0 {
        return f64::NAN;
    }
    sum / n as f64
}

/// Sample variance of the available values.
pub fn variance(values: &[Option<f64>]) -> f64 {
    covariance(values, values)
}

/// Sample covariance over rows where both columns have a value.
pub fn covariance(a: &[Option<f64>], b: &[Option<f64>]) -> f64 {
    let pairs = paired(a, b);
    let n = pairs.len();
    if n < 2 {
        return f64::NAN;
    }

    if is_constant(pairs.iter().map(|(x, _)| *x)) || is_constant(pairs.iter().map(|(_, y)| *y)) {
        return 0.0;
    }

    let (mean_a, mean_b) = pair_means(&pairs);
    let sxy: f64 = pairs
        .iter()
        .map(|(x, y)| (x - mean_a) * (y - mean_b))
        .sum();

    sxy / (n - 1) as f64
}

/// Pearson correlation over rows where both columns have a value.
///
/// `NaN` when either side is constant over those rows.
pub fn correlation(a: &[Option<f64>], b: &[Option<f64>]) -> f64 {
    let pairs = paired(a, b);
    if pairs.len() < 2 {
        return f64::NAN;
    }
    if is_constant(pairs.iter().map(|(x, _)| *x)) || is_constant(pairs.iter().map(|(_, y)| *y)) {
        return f64::NAN;
    }

    let (mean_a, mean_b) = pair_means(&pairs);
    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_a;
        let dy = y - mean_b;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    sxy / (sxx * syy).sqrt()
}

/// Sample covariance matrix of the given columns.
pub fn covariance_matrix(columns: &[Vec<Option<f64>>]) -> DMatrix<f64> {
    let n = columns.len();
    DMatrix::from_fn(n, n, |i, j| covariance(&columns[i], &columns[j]))
}

/// Correlation matrix of the given columns.
///
/// The diagonal is exactly `1.0` for columns with at least two distinct
/// values, `NaN` otherwise.
pub fn correlation_matrix(columns: &[Vec<Option<f64>>]) -> DMatrix<f64> {
    let n = columns.len();
    DMatrix::from_fn(n, n, |i, j| {
        if i == j {
            let values: Vec<f64> = columns[i].iter().flatten().copied().collect();
            if values.len() >= 2 && !is_constant(values.into_iter()) {
                1.0
            } else {
                f64::NAN
            }
        } else {
            correlation(&columns[i], &columns[j])
        }
    })
}

fn paired(a: &[Option<f64>], b: &[Option<f64>]) -> Vec<(f64, f64)> {
    a.iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect()
}

fn is_constant(mut values: impl Iterator<Item = f64>) -> bool {
    match values.next() {
        Some(first) => values.all(|v| v == first),
        None => true,
    }
}

fn pair_means(pairs: &[(f64, f64)]) -> (f64, f64) {
    let n = pairs.len() as f64;
    let (sa, sb) = pairs
        .iter()
        .fold((0.0_f64, 0.0_f64), |(sa, sb), (x, y)| (sa + x, sb + y));
    (sa / n, sb / n)
}
