//! Synthetic BAO-style datasets.
//!
//! The truth is a flat-ΛCDM `D_V/r_d` distorted by the running closure at a
//! chosen `γ`. Noise is Gaussian with a relative per-point sigma and a
//! nearest-neighbour correlation, drawn through the Cholesky factor of the
//! covariance so the written covariance is the one the noise came from.

use nalgebra::{DMatrix, DVector};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::domain::BaoDataset;
use crate::error::{InferenceError, Result};
use crate::models::{alpha_from_gamma, dv_over_rd_ratio};

/// Speed of light in km/s.
const C_KM_S: f64 = 299_792.458;

/// Simpson intervals for the comoving-distance integral (must be even).
const SIMPSON_STEPS: usize = 512;

/// Mock generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockConfig {
    pub z: Vec<f64>,

    /// Fiducial cosmology.
    pub h0: f64,
    pub omega_m: f64,
    pub rd_mpc: f64,

    /// Closure used to distort the fiducial.
    pub gamma_true: f64,
    pub gamma_ref: f64,
    pub kappa_b: f64,
    pub p_sensitivity: f64,

    /// Per-point sigma as a fraction of the true value.
    pub rel_sigma: f64,
    /// Correlation between neighbouring redshifts.
    pub rho: f64,
    pub seed: u64,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            z: vec![0.38, 0.51, 0.61, 1.48],
            h0: 67.4,
            omega_m: 0.315,
            rd_mpc: 147.09,
            gamma_true: 11.0 / 3.0,
            gamma_ref: 11.0 / 3.0,
            kappa_b: 1.0,
            p_sensitivity: 0.25,
            rel_sigma: 0.01,
            rho: 0.2,
            seed: 42,
        }
    }
}

/// A generated dataset with the curves it was drawn from.
#[derive(Debug, Clone)]
pub struct MockDataset {
    pub dataset: BaoDataset,
    /// Undistorted `D_V/r_d`.
    pub fiducial: Vec<f64>,
    /// Distorted, noise-free `D_V/r_d`.
    pub truth: Vec<f64>,
}

/// Flat-ΛCDM expansion rate in km/s/Mpc.
fn hubble(z: f64, h0: f64, omega_m: f64) -> f64 {
    h0 * (omega_m * (1.0 + z).powi(3) + (1.0 - omega_m)).sqrt()
}

/// Comoving distance `D_M(z)` in Mpc (Simpson's rule).
pub fn comoving_distance(z: f64, h0: f64, omega_m: f64) -> f64 {
    if z == 0.0 {
        return 0.0;
    }
    let h = z / SIMPSON_STEPS as f64;
    let f = |x: f64| 1.0 / hubble(x, h0, omega_m);
    let mut acc = f(0.0) + f(z);
    for i in 1..SIMPSON_STEPS {
        let w = if i % 2 == 1 { 4.0 } else { 2.0 };
        acc += w * f(i as f64 * h);
    }
    C_KM_S * acc * h / 3.0
}

/// Volume-averaged distance `D_V(z) = [c·z/H(z) · D_M(z)²]^(1/3)` in Mpc.
pub fn volume_distance(z: f64, h0: f64, omega_m: f64) -> f64 {
    let dm = comoving_distance(z, h0, omega_m);
    (C_KM_S * z / hubble(z, h0, omega_m) * dm * dm).cbrt()
}

fn validate(cfg: &MockConfig) -> Result<()> {
    if cfg.z.len() < 2 {
        return Err(InferenceError::InsufficientData {
            what: "mock redshift list",
            needed: 2,
            found: cfg.z.len(),
        });
    }
    if let Some(z) = cfg.z.iter().find(|z| !(z.is_finite() && **z > 0.0)) {
        return Err(InferenceError::InvalidParameter(format!("mock redshifts must be > 0, got {z}")));
    }
    if !(cfg.h0 > 0.0 && cfg.rd_mpc > 0.0) {
        return Err(InferenceError::InvalidParameter("h0 and rd_mpc must be > 0".to_string()));
    }
    if !(0.0..=1.0).contains(&cfg.omega_m) {
        return Err(InferenceError::InvalidParameter(format!(
            "omega_m must lie in [0, 1], got {}",
            cfg.omega_m
        )));
    }
    if !(cfg.rel_sigma.is_finite() && cfg.rel_sigma > 0.0) {
        return Err(InferenceError::InvalidParameter(format!(
            "rel_sigma must be > 0, got {}",
            cfg.rel_sigma
        )));
    }
    if !(cfg.rho.abs() < 1.0) {
        return Err(InferenceError::InvalidParameter(format!("|rho| must be < 1, got {}", cfg.rho)));
    }
    Ok(())
}

/// Tridiagonal covariance: `σ_i = rel·y_i`, neighbours correlated by `rho`.
pub fn neighbour_covariance(values: &[f64], rel_sigma: f64, rho: f64) -> DMatrix<f64> {
    let n = values.len();
    let sigma: Vec<f64> = values.iter().map(|v| rel_sigma * v.abs()).collect();
    DMatrix::from_fn(n, n, |i, j| match i.abs_diff(j) {
        0 => sigma[i] * sigma[i],
        1 => rho * sigma[i] * sigma[j],
        _ => 0.0,
    })
}

/// Draw a mock dataset.
pub fn generate_mock(cfg: &MockConfig) -> Result<MockDataset> {
    validate(cfg)?;

    let alpha = alpha_from_gamma(cfg.gamma_true, cfg.gamma_ref, cfg.kappa_b);
    let fiducial: Vec<f64> = cfg
        .z
        .iter()
        .map(|&z| volume_distance(z, cfg.h0, cfg.omega_m) / cfg.rd_mpc)
        .collect();
    let truth: Vec<f64> = cfg
        .z
        .iter()
        .zip(&fiducial)
        .map(|(&z, &y)| y * dv_over_rd_ratio(z, alpha, cfg.p_sensitivity))
        .collect();

    let cov = neighbour_covariance(&truth, cfg.rel_sigma, cfg.rho);
    let chol = cov.clone().cholesky().ok_or_else(|| {
        InferenceError::InvalidParameter(format!(
            "rho = {} gives a covariance that is not positive definite",
            cfg.rho
        ))
    })?;

    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| InferenceError::InvalidParameter(format!("noise distribution error: {e}")))?;
    let draws = DVector::from_iterator(truth.len(), (0..truth.len()).map(|_| normal.sample(&mut rng)));
    let noise = chol.l() * draws;

    let observed: Vec<f64> = truth.iter().zip(noise.iter()).map(|(y, e)| y + e).collect();
    tracing::debug!(
        n = observed.len(),
        gamma_true = cfg.gamma_true,
        alpha,
        seed = cfg.seed,
        "generated mock dataset"
    );

    Ok(MockDataset {
        dataset: BaoDataset::new(cfg.z.clone(), observed, cov)?,
        fiducial,
        truth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn fiducial_distances_match_planck_like_values() {
        let cfg = MockConfig::default();
        let y = volume_distance(0.51, cfg.h0, cfg.omega_m) / cfg.rd_mpc;
        assert_relative_eq!(y, 12.8286, max_relative = 1e-4);
        let y = volume_distance(1.48, cfg.h0, cfg.omega_m) / cfg.rd_mpc;
        assert_relative_eq!(y, 25.9321, max_relative = 1e-4);
    }

    #[test]
    fn reference_gamma_leaves_fiducial_undistorted() {
        let mock = generate_mock(&MockConfig::default()).unwrap();
        for (t, f) in mock.truth.iter().zip(&mock.fiducial) {
            assert_relative_eq!(*t, *f, max_relative = 1e-14);
        }
    }

    #[test]
    fn larger_gamma_shrinks_the_truth() {
        // alpha < 0 for gamma > gamma_ref, so (1+z)^(alpha·p) < 1.
        let cfg = MockConfig {
            gamma_true: 4.2,
            ..MockConfig::default()
        };
        let mock = generate_mock(&cfg).unwrap();
        assert!(mock.truth.iter().zip(&mock.fiducial).all(|(t, f)| t < f));
    }

    #[test]
    fn same_seed_same_draw() {
        let a = generate_mock(&MockConfig::default()).unwrap();
        let b = generate_mock(&MockConfig::default()).unwrap();
        assert_eq!(a.dataset.dv_over_rd(), b.dataset.dv_over_rd());

        let c = generate_mock(&MockConfig {
            seed: 7,
            ..MockConfig::default()
        })
        .unwrap();
        assert_ne!(a.dataset.dv_over_rd(), c.dataset.dv_over_rd());
    }

    #[test]
    fn noise_scales_with_rel_sigma() {
        let cfg = MockConfig {
            rel_sigma: 1e-9,
            ..MockConfig::default()
        };
        let mock = generate_mock(&cfg).unwrap();
        for (obs, t) in mock.dataset.dv_over_rd().iter().zip(&mock.truth) {
            assert_relative_eq!(*obs, *t, max_relative = 1e-7);
        }
    }

    #[test]
    fn covariance_is_tridiagonal() {
        let cov = neighbour_covariance(&[10.0, 20.0, 30.0], 0.1, 0.5);
        assert_relative_eq!(cov[(0, 0)], 1.0, max_relative = 1e-12);
        assert_relative_eq!(cov[(0, 1)], 0.5 * 1.0 * 2.0, max_relative = 1e-12);
        assert_eq!(cov[(0, 2)], 0.0);
        assert_eq!(cov[(1, 2)], cov[(2, 1)]);
    }

    #[test]
    fn rejects_bad_settings() {
        let bad_rho = MockConfig {
            rho: 1.0,
            ..MockConfig::default()
        };
        assert!(matches!(generate_mock(&bad_rho), Err(InferenceError::InvalidParameter(_))));

        let one_point = MockConfig {
            z: vec![0.5],
            ..MockConfig::default()
        };
        assert!(matches!(
            generate_mock(&one_point),
            Err(InferenceError::InsufficientData { .. })
        ));
    }
}
