//! ΔNLL interval extraction on a 1D scan.
//!
//! The interval is the span of grid points whose NLL lies within `delta` of
//! the scan minimum. Its resolution is limited by the grid; there is no
//! analytic inversion.

use crate::error::{InferenceError, Result};

/// Return `(lo, hi)`: the extreme grid values with `nll - min(nll) <= delta`.
pub fn find_interval(grid: &[f64], nll: &[f64], delta: f64) -> Result<(f64, f64)> {
    if grid.len() != nll.len() {
        return Err(InferenceError::Shape(format!(
            "grid has {} points but nll has {}",
            grid.len(),
            nll.len()
        )));
    }

    // Deterministic argmin: first minimum wins, NaNs are never selected.
    let mut idx_min: Option<usize> = None;
    for (i, &v) in nll.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match idx_min {
            Some(best) if nll[best] <= v => {}
            _ => idx_min = Some(i),
        }
    }
    let Some(idx_min) = idx_min else {
        return Err(InferenceError::EmptyInterval { delta });
    };
    let nll0 = nll[idx_min];

    let mut bounds: Option<(f64, f64)> = None;
    for (&x, &v) in grid.iter().zip(nll) {
        if v - nll0 <= delta {
            bounds = Some(match bounds {
                None => (x, x),
                Some((lo, hi)) => (lo.min(x), hi.max(x)),
            });
        }
    }

    bounds.ok_or(InferenceError::EmptyInterval { delta })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parabola_interval_matches_analytic_width() {
        // nll = 0.5 x² → ΔNLL = 0.5 at |x| = 1.
        let grid: Vec<f64> = (0..=16).map(|i| -2.0 + i as f64 * 0.25).collect();
        let nll: Vec<f64> = grid.iter().map(|x| 0.5 * x * x).collect();
        let (lo, hi) = find_interval(&grid, &nll, 0.5).unwrap();
        assert_eq!((lo, hi), (-1.0, 1.0));
    }

    #[test]
    fn negative_threshold_yields_empty_interval() {
        let grid = [0.0, 1.0, 2.0];
        let nll = [1.0, 0.0, 1.0];
        assert!(matches!(
            find_interval(&grid, &nll, -0.1),
            Err(InferenceError::EmptyInterval { .. })
        ));
    }

    #[test]
    fn empty_scan_yields_empty_interval() {
        assert!(matches!(
            find_interval(&[], &[], 1.0),
            Err(InferenceError::EmptyInterval { .. })
        ));
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        assert!(matches!(
            find_interval(&[0.0, 1.0], &[0.0], 1.0),
            Err(InferenceError::Shape(_))
        ));
    }
}
