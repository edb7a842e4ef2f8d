//! Scalar Gaussian likelihood shapes.

use std::f64::consts::PI;

use crate::error::{InferenceError, Result};

fn check_sigma(sigma: f64) -> Result<()> {
    if sigma.is_finite() && sigma > 0.0 {
        Ok(())
    } else {
        Err(InferenceError::InvalidParameter(format!("sigma must be > 0, got {sigma}")))
    }
}

/// `0.5 · ((predicted - observed) / sigma)²`.
pub fn gaussian_nll(observed: f64, predicted: f64, sigma: f64) -> Result<f64> {
    check_sigma(sigma)?;
    let z = (predicted - observed) / sigma;
    Ok(0.5 * z * z)
}

/// Normalized log-density `ln N(x | mu, sigma)`.
pub fn gaussian_log_density(x: f64, mu: f64, sigma: f64) -> Result<f64> {
    check_sigma(sigma)?;
    let z = (x - mu) / sigma;
    Ok(-0.5 * z * z - (sigma * (2.0 * PI).sqrt()).ln())
}
