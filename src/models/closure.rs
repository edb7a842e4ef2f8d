//! Closure relation and the predictions derived from it.
//!
//! The toy bridge from the coupling exponent `γ` to observables is:
//!
//! - `alpha(γ) = -kappa_b · (γ - γ_ref)`
//! - `v_ratio(z) = (1 + z)^alpha`            (effective vev running)
//! - `rd_ratio = v_ratio(z_rec)^beta`        (sound-horizon sensitivity)
//! - `H0_early = H0_local · rd_ratio`
//!
//! At `γ = γ_ref` every ratio is exactly 1.

use crate::domain::InferenceConfig;

pub fn alpha_from_gamma(gamma: f64, gamma_ref: f64, kappa_b: f64) -> f64 {
    -kappa_b * (gamma - gamma_ref)
}

/// `(1 + z)^alpha`.
pub fn v_ratio_at(z: f64, alpha: f64) -> f64 {
    (1.0 + z).powf(alpha)
}

pub fn rd_ratio_from_v_ratio(v_ratio: f64, beta_rd_sensitivity: f64) -> f64 {
    v_ratio.powf(beta_rd_sensitivity)
}

/// Early-universe `H0` inferred from a local `H0` at coupling `gamma`.
pub fn predict_h0_early(
    h0_local: f64,
    z_rec: f64,
    gamma: f64,
    gamma_ref: f64,
    kappa_b: f64,
    beta_rd_sensitivity: f64,
) -> f64 {
    let alpha = alpha_from_gamma(gamma, gamma_ref, kappa_b);
    let v_ratio = v_ratio_at(z_rec, alpha);
    h0_local * rd_ratio_from_v_ratio(v_ratio, beta_rd_sensitivity)
}

/// [`predict_h0_early`] with the closure constants taken from a config.
pub fn predict_h0_early_for(config: &InferenceConfig, gamma: f64, h0_local: f64) -> f64 {
    predict_h0_early(
        h0_local,
        config.z_rec,
        gamma,
        config.gamma_ref,
        config.kappa_b,
        config.beta_rd_sensitivity,
    )
}

/// Multiplicative distortion of `D_V/r_d` at redshift `z`: `(1 + z)^(alpha·p)`.
pub fn dv_over_rd_ratio(z: f64, alpha: f64, p_sensitivity: f64) -> f64 {
    (1.0 + z).powf(alpha * p_sensitivity)
}
