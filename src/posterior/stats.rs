//! Summary statistics over discretized densities.
//!
//! Numerical notes:
//! - Log-densities are exponentiated after subtracting their maximum
//!   (log-sum-exp), so very negative or very large values do not under/overflow.
//! - Credible intervals are read off the empirical CDF by linear
//!   interpolation. They are equal-tailed intervals, accurate for unimodal
//!   marginals; for multimodal marginals they are not highest-density regions.

use crate::domain::Interval;
use crate::error::{InferenceError, Result};

/// Exponentiate and normalize log-densities so they sum to 1.
pub fn normalize_log_densities(log_densities: &[f64]) -> Result<Vec<f64>> {
    let max = log_densities.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return Err(InferenceError::Normalization(format!(
            "maximum log-density is {max}"
        )));
    }

    let weights: Vec<f64> = log_densities.iter().map(|&v| (v - max).exp()).collect();
    let total: f64 = weights.iter().sum();
    if !(total.is_finite() && total > 0.0) {
        return Err(InferenceError::Normalization(format!(
            "sum of weights is {total}"
        )));
    }
    Ok(weights.into_iter().map(|w| w / total).collect())
}

/// Multiply `prior` by `exp(log_weights)` (stabilized) and renormalize.
pub fn reweight(prior: &[f64], log_weights: &[f64]) -> Result<Vec<f64>> {
    if prior.len() != log_weights.len() {
        return Err(InferenceError::Shape(format!(
            "prior has {} entries but weights have {}",
            prior.len(),
            log_weights.len()
        )));
    }
    let max = log_weights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return Err(InferenceError::Normalization(format!(
            "maximum log-weight is {max}"
        )));
    }

    let joint: Vec<f64> = prior
        .iter()
        .zip(log_weights)
        .map(|(&p, &lw)| p * (lw - max).exp())
        .collect();
    let total: f64 = joint.iter().sum();
    if !(total.is_finite() && total > 0.0) {
        return Err(InferenceError::Normalization(format!(
            "joint sum is {total}"
        )));
    }
    Ok(joint.into_iter().map(|p| p / total).collect())
}

/// `Σ xᵢ·pᵢ` for a normalized `p`.
pub fn weighted_mean(x: &[f64], p: &[f64]) -> f64 {
    x.iter().zip(p).map(|(xi, pi)| xi * pi).sum()
}

/// Index of the first maximum. NaNs are never selected.
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some(b) if values[b] >= v => {}
            _ => best = Some(i),
        }
    }
    best
}

/// Equal-tailed credible interval at `level` from a discretized density.
///
/// `level = 0.68` reads the 0.16 and 0.84 quantiles off the CDF.
pub fn credible_interval(x: &[f64], p: &[f64], level: f64) -> Result<Interval> {
    if x.is_empty() || x.len() != p.len() {
        return Err(InferenceError::Shape(format!(
            "axis has {} points but density has {}",
            x.len(),
            p.len()
        )));
    }
    if !(level > 0.0 && level < 1.0) {
        return Err(InferenceError::InvalidParameter(format!(
            "credible level must be in (0, 1), got {level}"
        )));
    }

    let mut cdf = Vec::with_capacity(p.len());
    let mut acc = 0.0;
    for &pi in p {
        acc += pi;
        cdf.push(acc);
    }
    let last = acc;
    if !(last.is_finite() && last > 0.0) {
        return Err(InferenceError::Normalization(format!(
            "density sums to {last}"
        )));
    }
    for c in &mut cdf {
        *c /= last;
    }

    let lo_q = (1.0 - level) / 2.0;
    let hi_q = 1.0 - lo_q;
    Ok([interp(lo_q, &cdf, x), interp(hi_q, &cdf, x)])
}

/// Piecewise-linear interpolation of `(xp, fp)` at `q`.
///
/// `xp` must be non-decreasing. Outside `[xp[0], xp[last]]` the end values
/// of `fp` are returned; empty input gives NaN.
fn interp(q: f64, xp: &[f64], fp: &[f64]) -> f64 {
    let n = xp.len().min(fp.len());
    if n == 0 {
        return f64::NAN;
    }
    let (xp, fp) = (&xp[..n], &fp[..n]);
    let last = n - 1;
    if q <= xp[0] {
        return fp[0];
    }
    if q >= xp[last] {
        return fp[last];
    }
    // xp[j] <= q < xp[j + 1]
    let j = xp.partition_point(|&v| v <= q) - 1;
    let span = xp[j + 1] - xp[j];
    fp[j] + (q - xp[j]) * (fp[j + 1] - fp[j]) / span
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn normalization_survives_extreme_log_densities() {
        let p = normalize_log_densities(&[-1e6, -1e6 + 2.0_f64.ln(), -1e6]).unwrap();
        assert_abs_diff_eq!(p[0], 0.25, epsilon = 1e-9);
        assert_abs_diff_eq!(p[1], 0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(p.iter().sum::<f64>(), 1.0, epsilon = 1e-12);

        let p = normalize_log_densities(&[800.0, 800.0]).unwrap();
        assert_eq!(p, vec![0.5, 0.5]);
    }

    #[test]
    fn all_impossible_cells_fail_normalization() {
        let err = normalize_log_densities(&[f64::NEG_INFINITY; 3]).unwrap_err();
        assert!(matches!(err, InferenceError::Normalization(_)));
        assert!(normalize_log_densities(&[]).is_err());
    }

    #[test]
    fn reweight_multiplies_and_renormalizes() {
        let prior = [0.5, 0.5];
        let joint = reweight(&prior, &[0.0, 3.0_f64.ln()]).unwrap();
        assert_abs_diff_eq!(joint[0], 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(joint[1], 0.75, epsilon = 1e-12);
    }

    #[test]
    fn argmax_takes_first_maximum() {
        assert_eq!(argmax(&[1.0, 3.0, 3.0, f64::NAN]), Some(1));
        assert_eq!(argmax(&[f64::NAN, 2.0]), Some(1));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn interp_clamps_and_interpolates() {
        let xp = [0.0, 0.5, 1.0];
        let fp = [10.0, 20.0, 40.0];
        assert_eq!(interp(-1.0, &xp, &fp), 10.0);
        assert_eq!(interp(2.0, &xp, &fp), 40.0);
        assert_abs_diff_eq!(interp(0.25, &xp, &fp), 15.0, epsilon = 1e-12);
        assert_abs_diff_eq!(interp(0.75, &xp, &fp), 30.0, epsilon = 1e-12);
        assert!(interp(0.5, &[], &[]).is_nan());
    }

    #[test]
    fn credible_interval_of_uniform_density_is_central() {
        let x: Vec<f64> = (0..=100).map(|i| i as f64).collect();
        let p = vec![1.0 / 101.0; 101];
        let [lo, hi] = credible_interval(&x, &p, 0.68).unwrap();
        assert!(lo < 50.0 && hi > 50.0);
        assert_abs_diff_eq!(lo + hi, 99.0, epsilon = 1e-9);
        let [lo95, hi95] = credible_interval(&x, &p, 0.95).unwrap();
        assert!(lo95 < lo && hi95 > hi);
    }

    #[test]
    fn weighted_mean_of_point_mass() {
        assert_eq!(weighted_mean(&[1.0, 2.0, 3.0], &[0.0, 1.0, 0.0]), 2.0);
    }
}
