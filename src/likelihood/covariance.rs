//! Covariance-weighted Gaussian likelihood.
//!
//! ```text
//! chi2    = rᵀ C⁻¹ r
//! loglike = -chi2/2 - (N·ln 2π + ln|C|)/2
//! ```
//!
//! The inverse and the log-determinant are recomputed on every call. That is
//! fine for tens of points; it does not scale to large N.

use std::f64::consts::PI;

use nalgebra::{DMatrix, DVector};

use crate::error::{InferenceError, Result};
use crate::math::{invert, sign_log_det};

fn check_dims(residual: &[f64], cov: &DMatrix<f64>) -> Result<()> {
    if !cov.is_square() || cov.nrows() != residual.len() {
        return Err(InferenceError::Shape(format!(
            "residual of length {} does not match a {}x{} covariance",
            residual.len(),
            cov.nrows(),
            cov.ncols()
        )));
    }
    Ok(())
}

/// `rᵀ C⁻¹ r`.
pub fn chi2_gaussian_cov(residual: &[f64], cov: &DMatrix<f64>) -> Result<f64> {
    check_dims(residual, cov)?;
    let inv = invert(cov)?;
    let r = DVector::from_column_slice(residual);
    Ok(r.dot(&(&inv * &r)))
}

/// Full multivariate normal log-likelihood of `residual` under `cov`.
pub fn loglike_gaussian_cov(residual: &[f64], cov: &DMatrix<f64>) -> Result<f64> {
    check_dims(residual, cov)?;
    let (sign, log_det) = sign_log_det(cov)?;
    if sign <= 0.0 {
        return Err(InferenceError::NonPositiveDefinite { sign });
    }
    let chi2 = chi2_gaussian_cov(residual, cov)?;
    let n = residual.len() as f64;
    Ok(-0.5 * chi2 - 0.5 * (n * (2.0 * PI).ln() + log_det))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn identity_covariance_reduces_to_squared_norm() {
        let r = [1.0, -2.0, 0.5];
        let cov = DMatrix::<f64>::identity(3, 3);
        let ll = loglike_gaussian_cov(&r, &cov).unwrap();
        let norm2: f64 = r.iter().map(|v| v * v).sum();
        let expected = -0.5 * norm2 - 0.5 * (3.0 * (2.0 * PI).ln());
        assert_abs_diff_eq!(ll, expected, epsilon = 1e-10);
    }

    #[test]
    fn diagonal_chi2_is_sum_of_pulls() {
        let r = [0.1, 0.2];
        let cov = DMatrix::from_row_slice(2, 2, &[0.04, 0.0, 0.0, 0.09]);
        let chi2 = chi2_gaussian_cov(&r, &cov).unwrap();
        assert!(chi2 >= 0.0);
        // 0.25 + 0.4444...
        assert_abs_diff_eq!(chi2, 0.1 * 0.1 / 0.04 + 0.2 * 0.2 / 0.09, epsilon = 1e-12);
        assert_abs_diff_eq!(chi2, 25.0 / 36.0, epsilon = 1e-12);
    }

    #[test]
    fn correlated_covariance_uses_full_inverse() {
        // C = [[2, 1], [1, 2]] → C⁻¹ = [[2, -1], [-1, 2]] / 3
        let cov = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 2.0]);
        let chi2 = chi2_gaussian_cov(&[1.0, 1.0], &cov).unwrap();
        assert_abs_diff_eq!(chi2, 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn indefinite_covariance_is_rejected() {
        let cov = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 1.0]);
        let err = loglike_gaussian_cov(&[0.1, 0.1], &cov).unwrap_err();
        assert!(matches!(err, InferenceError::NonPositiveDefinite { .. }));
    }

    #[test]
    fn length_mismatch_is_a_shape_error() {
        let cov = DMatrix::<f64>::identity(2, 2);
        assert!(matches!(
            chi2_gaussian_cov(&[1.0, 2.0, 3.0], &cov),
            Err(InferenceError::Shape(_))
        ));
    }
}
