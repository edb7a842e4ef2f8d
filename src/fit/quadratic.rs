//! Least-squares fit of a quadratic response to tabulated points.
//!
//! The design matrix has columns `[x², x, 1]`; the fit is unweighted and
//! unregularized. Rank-deficient input (fewer than 3 distinct `x`) gets the
//! minimum-norm solution from the SVD solver rather than an error.

use nalgebra::{DMatrix, DVector};

use crate::domain::QuadraticModel;
use crate::error::{InferenceError, Result};
use crate::math::solve_least_squares;

/// Degrees of freedom of a quadratic.
const MIN_POINTS: usize = 3;

/// Fit `y = a·x² + b·x + c` to `(x, y)` points.
pub fn fit_quadratic(points: &[(f64, f64)]) -> Result<QuadraticModel> {
    if points.len() < MIN_POINTS {
        return Err(InferenceError::InsufficientData {
            what: "quadratic fit",
            needed: MIN_POINTS,
            found: points.len(),
        });
    }
    if points.iter().any(|(x, y)| !(x.is_finite() && y.is_finite())) {
        return Err(InferenceError::InvalidParameter(
            "quadratic fit points must be finite".to_string(),
        ));
    }

    let n = points.len();
    let mut x = DMatrix::<f64>::zeros(n, 3);
    let mut y = DVector::<f64>::zeros(n);
    for (i, &(xi, yi)) in points.iter().enumerate() {
        x[(i, 0)] = xi * xi;
        x[(i, 1)] = xi;
        x[(i, 2)] = 1.0;
        y[i] = yi;
    }

    let beta = solve_least_squares(&x, &y).ok_or_else(|| {
        InferenceError::InvalidParameter("quadratic least-squares solution is not finite".to_string())
    })?;

    Ok(QuadraticModel {
        a: beta[0],
        b: beta[1],
        c: beta[2],
    })
}
