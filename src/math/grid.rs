//! Scan axis generation.
//!
//! Every scan in this crate is a deterministic, uniformly spaced grid. Both
//! endpoints are always included so the grid itself is the prior support.

use crate::error::{InferenceError, Result};

/// Generate `steps` linearly spaced points between `min` and `max` (inclusive).
pub fn lin_space(min: f64, max: f64, steps: usize) -> Result<Vec<f64>> {
    if !(min.is_finite() && max.is_finite() && max > min) {
        return Err(InferenceError::InvalidParameter(format!(
            "invalid axis range: min={min}, max={max} (must be finite and max > min)"
        )));
    }
    if steps < 2 {
        return Err(InferenceError::InvalidParameter(format!(
            "axis needs at least 2 points, got {steps}"
        )));
    }

    let step = (max - min) / (steps as f64 - 1.0);
    let mut out = Vec::with_capacity(steps);
    for i in 0..steps - 1 {
        out.push(min + step * i as f64);
    }
    // Pin the last point so `max` is hit exactly.
    out.push(max);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lin_space_includes_endpoints() {
        let v = lin_space(3.0, 4.5, 101).unwrap();
        assert_eq!(v.len(), 101);
        assert_eq!(v[0], 3.0);
        assert_eq!(v[100], 4.5);
        assert!((v[50] - 3.75).abs() < 1e-12);
    }

    #[test]
    fn lin_space_rejects_bad_ranges() {
        assert!(lin_space(1.0, 1.0, 5).is_err());
        assert!(lin_space(2.0, 1.0, 5).is_err());
        assert!(lin_space(0.0, 1.0, 1).is_err());
        assert!(lin_space(f64::NAN, 1.0, 5).is_err());
    }
}
