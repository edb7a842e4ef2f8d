//! Ordinary least squares.
//!
//! We solve small problems of the form
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! through an SVD of the (tall) design matrix. Columns are scaled to unit norm
//! first, so designs whose columns differ by many orders of magnitude (e.g.
//! `[x², x, 1]` with `x ~ 1e-5`) keep their full rank.
//!
//! Singular values below a relative cutoff (`ε · max(m, n) · σ_max`) are
//! treated as zero, which gives the minimum-norm solution of the scaled problem
//! for rank-deficient designs (e.g. fewer distinct abscissae than columns)
//! instead of an error. Nalgebra's `QR::solve` is meant for square systems, so
//! it is not used here.

use nalgebra::{DMatrix, DVector};

/// Cutoff below which singular values are zeroed in the pseudo-inverse.
pub fn rank_tolerance(singular_values: &DVector<f64>, nrows: usize, ncols: usize) -> f64 {
    let sigma_max = singular_values.iter().copied().fold(0.0_f64, f64::max);
    f64::EPSILON * nrows.max(ncols) as f64 * sigma_max
}

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the solution contains non-finite values.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let (nrows, ncols) = x.shape();
    let scales: Vec<f64> = x
        .column_iter()
        .map(|c| {
            let norm = c.norm();
            if norm > 0.0 && norm.is_finite() { norm } else { 1.0 }
        })
        .collect();

    let mut scaled = x.clone();
    for (j, &s) in scales.iter().enumerate() {
        scaled.column_mut(j).unscale_mut(s);
    }

    let svd = scaled.svd(true, true);
    let tol = rank_tolerance(&svd.singular_values, nrows, ncols);
    let beta_scaled = svd.solve(y, tol).ok()?;
    let beta = DVector::from_iterator(ncols, beta_scaled.iter().zip(&scales).map(|(b, s)| b / s));
    if beta.iter().all(|v| v.is_finite()) {
        Some(beta)
    } else {
        None
    }
}
