//! Calibration of the running exponent against a target `H0` tension.
//!
//! We want `H0_early / H0_local = rd_true / rd0 = (1 + z_rec)^(alpha·p)`, hence
//!
//! ```text
//! alpha = ln(target_ratio) / (p · ln(1 + z_rec))
//! ```

use crate::domain::{CalibrationConfig, CalibrationResult};
use crate::error::{InferenceError, Result};
use crate::math::lin_space;
use crate::models::closure::{rd_ratio_from_v_ratio, v_ratio_at};

/// Solve for the running exponent that reproduces `target_ratio` at `z_rec`.
pub fn alpha_for_target_ratio(z_rec: f64, p_sensitivity: f64, target_ratio: f64) -> Result<f64> {
    if p_sensitivity == 0.0 || !p_sensitivity.is_finite() {
        return Err(InferenceError::InvalidParameter(format!(
            "p_sensitivity must be finite and non-zero, got {p_sensitivity}"
        )));
    }
    if !(target_ratio.is_finite() && target_ratio > 0.0) {
        return Err(InferenceError::InvalidParameter(format!(
            "target ratio must be > 0, got {target_ratio}"
        )));
    }
    if !(z_rec.is_finite() && z_rec > 0.0) {
        return Err(InferenceError::InvalidParameter(format!("z_rec must be > 0, got {z_rec}")));
    }
    Ok(target_ratio.ln() / (p_sensitivity * (1.0 + z_rec).ln()))
}

/// Solve the calibration and tabulate `v_eff(z)/v0` on `[0, z_max]`.
pub fn calibrate(config: &CalibrationConfig) -> Result<CalibrationResult> {
    if !(config.h0_local.is_finite() && config.h0_local > 0.0) {
        return Err(InferenceError::InvalidConfig(format!(
            "H0_local must be > 0, got {}",
            config.h0_local
        )));
    }
    if !(config.rd0_mpc.is_finite() && config.rd0_mpc > 0.0) {
        return Err(InferenceError::InvalidConfig(format!(
            "rd0_mpc must be > 0, got {}",
            config.rd0_mpc
        )));
    }

    let target_ratio = config.h0_early_target / config.h0_local;
    let alpha = alpha_for_target_ratio(config.z_rec, config.p_sensitivity, target_ratio)?;

    let v_ratio_rec = v_ratio_at(config.z_rec, alpha);
    let rd_true_mpc = config.rd0_mpc * rd_ratio_from_v_ratio(v_ratio_rec, config.p_sensitivity);
    let h0_early_inferred = config.h0_local * (rd_true_mpc / config.rd0_mpc);

    let z = lin_space(0.0, config.z_max, config.n_z)
        .map_err(|e| InferenceError::InvalidConfig(format!("redshift scan: {e}")))?;
    let v_ratio = z.iter().map(|&zi| v_ratio_at(zi, alpha)).collect();

    Ok(CalibrationResult {
        target_ratio,
        alpha,
        v_ratio_rec,
        rd_true_mpc,
        h0_early_inferred,
        z,
        v_ratio,
    })
}
