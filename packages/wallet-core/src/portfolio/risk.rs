//! Portfolio risk metrics calculation.
//!
//! Provides portfolio variance, volatility and Sharpe ratio from annualized
//! inputs. Undefined results are `NaN`, never a panic.

use crate::{Error, Result};
use nalgebra::{DMatrix, DVector};

/// Portfolio variance as the quadratic form `w · (Σ w)`.
///
/// Undefined covariance cells (assets without enough data) contribute zero,
/// so such an asset keeps its weight without adding risk.
///
/// # Errors
///
/// `DimensionMismatch` if `covariance` is not `n × n` for `n` weights.
pub fn portfolio_variance(weights: &[f64], covariance: &DMatrix<f64>) -> Result<f64> {
    let n = weights.len();
    if covariance.nrows() != n || covariance.ncols() != n {
        return Err(Error::DimensionMismatch(format!(
            "{} weights against a {}x{} covariance matrix",
            n,
            covariance.nrows(),
            covariance.ncols()
        )));
    }

    let w = DVector::from_column_slice(weights);
    let sigma = covariance.map(|c| if c.is_nan() { 0.0 } else { c });

    Ok(w.dot(&(sigma * &w)))
}

/// Annual volatility from annual variance.
///
/// A negative variance (numerical noise in the covariance matrix) has no
/// square root and yields `NaN`.
pub fn annual_volatility(annual_variance: f64) -> f64 {
    if annual_variance.is_nan() || annual_variance < 0.0 {
        tracing::warn!("Volatility undefined for variance {}", annual_variance);
        return f64::NAN;
    }
    annual_variance.sqrt()
}

/// Calculate Sharpe ratio from annualized figures.
///
/// # Arguments
///
/// * `annual_return` - Annualized portfolio return
/// * `risk_free_rate` - Annual risk-free rate (e.g., 0.02 for 2%)
/// * `annual_volatility` - Annualized portfolio volatility
///
/// # Returns
///
/// `(annual_return - risk_free_rate) / annual_volatility`, or `NaN` when the
/// volatility is zero or undefined.
pub fn sharpe_ratio(annual_return: f64, risk_free_rate: f64, annual_volatility: f64) -> f64 {
    if annual_volatility == 0.0 || annual_volatility.is_nan() {
        tracing::warn!("Sharpe ratio undefined for volatility {}", annual_volatility);
        return f64::NAN;
    }

    (annual_return - risk_free_rate) / annual_volatility
}
