//! Dense matrix helpers for covariance handling.

use nalgebra::DMatrix;

use crate::error::{InferenceError, Result};

/// Absolute tolerance for the symmetry check.
pub const SYMMETRY_ATOL: f64 = 1e-10;
/// Relative tolerance for the symmetry check.
pub const SYMMETRY_RTOL: f64 = 1e-10;

/// Sign and natural log of `|det(m)|`, computed from an LU factorization.
///
/// Returns `(0.0, -inf)` for a singular matrix, mirroring the usual `slogdet`
/// convention.
pub fn sign_log_det(m: &DMatrix<f64>) -> Result<(f64, f64)> {
    if !m.is_square() {
        return Err(InferenceError::Shape(format!(
            "log-determinant needs a square matrix, got {}x{}",
            m.nrows(),
            m.ncols()
        )));
    }

    let lu = m.clone().lu();
    let mut sign: f64 = lu.p().determinant();
    let mut log_abs = 0.0;
    let u = lu.u();
    for i in 0..u.nrows() {
        let d = u[(i, i)];
        if d == 0.0 || !d.is_finite() {
            return Ok((0.0, f64::NEG_INFINITY));
        }
        sign *= d.signum();
        log_abs += d.abs().ln();
    }
    Ok((sign, log_abs))
}

/// Inverse of a square matrix; `SingularMatrix` if it does not exist.
pub fn invert(m: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    if !m.is_square() {
        return Err(InferenceError::Shape(format!(
            "cannot invert a {}x{} matrix",
            m.nrows(),
            m.ncols()
        )));
    }
    let inv = m.clone().try_inverse().ok_or(InferenceError::SingularMatrix)?;
    if inv.iter().all(|v| v.is_finite()) {
        Ok(inv)
    } else {
        Err(InferenceError::SingularMatrix)
    }
}

/// Elementwise `m == mᵀ` within `|a - b| <= atol + rtol·|b|`.
pub fn ensure_symmetric(m: &DMatrix<f64>) -> Result<()> {
    let n = m.nrows();
    for row in 0..n {
        for col in (row + 1)..n {
            let upper = m[(row, col)];
            let lower = m[(col, row)];
            // NaN never compares close.
            if !((upper - lower).abs() <= SYMMETRY_ATOL + SYMMETRY_RTOL * lower.abs()) {
                return Err(InferenceError::AsymmetricMatrix {
                    row,
                    col,
                    upper,
                    lower,
                });
            }
        }
    }
    Ok(())
}
