//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - deserialized from YAML configs
//! - used in-memory during grid evaluation
//! - exported to JSON for downstream reporting/plotting

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::error::{InferenceError, Result};

/// Quadratic response `y(x) = a·x² + b·x + c`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadraticModel {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl QuadraticModel {
    pub fn evaluate(&self, x: f64) -> f64 {
        self.a * x * x + self.b * x + self.c
    }

    /// Elementwise [`QuadraticModel::evaluate`].
    pub fn evaluate_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.evaluate(x)).collect()
    }
}

/// Configuration of the two-parameter `(γ, H0_local)` grid inference.
///
/// Field names on the wire follow the flat YAML layout used by the inference
/// configs (`H0_local_obs`, `grid_H0`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Reference (recombination) redshift.
    pub z_rec: f64,
    /// Fiducial sound-horizon scale in Mpc. Echoed only.
    pub rd0_mpc: f64,

    #[serde(rename = "H0_local_obs")]
    pub h0_local_obs: f64,
    #[serde(rename = "H0_local_sigma")]
    pub h0_local_sigma: f64,

    #[serde(rename = "H0_early_obs")]
    pub h0_early_obs: f64,
    #[serde(rename = "H0_early_sigma")]
    pub h0_early_sigma: f64,

    /// Closure relation: `alpha(γ) = -kappa_b·(γ - gamma_ref)`.
    pub gamma_ref: f64,
    pub kappa_b: f64,
    /// `rd_true/rd0 = v_ratio^beta_rd_sensitivity`.
    pub beta_rd_sensitivity: f64,

    pub gamma_min: f64,
    pub gamma_max: f64,
    #[serde(rename = "H0_min")]
    pub h0_min: f64,
    #[serde(rename = "H0_max")]
    pub h0_max: f64,

    pub grid_gamma: usize,
    #[serde(rename = "grid_H0")]
    pub grid_h0: usize,
}

impl InferenceConfig {
    /// Check every invariant the grid engine relies on.
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("z_rec", self.z_rec),
            ("rd0_mpc", self.rd0_mpc),
            ("H0_local_obs", self.h0_local_obs),
            ("H0_early_obs", self.h0_early_obs),
            ("gamma_ref", self.gamma_ref),
            ("kappa_b", self.kappa_b),
            ("beta_rd_sensitivity", self.beta_rd_sensitivity),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(InferenceError::InvalidConfig(format!("{name} must be finite, got {value}")));
            }
        }
        if self.z_rec <= -1.0 {
            return Err(InferenceError::InvalidConfig(format!(
                "z_rec must be > -1, got {}",
                self.z_rec
            )));
        }

        for (name, sigma) in [
            ("H0_local_sigma", self.h0_local_sigma),
            ("H0_early_sigma", self.h0_early_sigma),
        ] {
            if !(sigma.is_finite() && sigma > 0.0) {
                return Err(InferenceError::InvalidConfig(format!("{name} must be > 0, got {sigma}")));
            }
        }

        for (name, lo, hi) in [
            ("gamma", self.gamma_min, self.gamma_max),
            ("H0", self.h0_min, self.h0_max),
        ] {
            if !(lo.is_finite() && hi.is_finite() && lo < hi) {
                return Err(InferenceError::InvalidConfig(format!(
                    "{name} bounds must be finite with min < max, got [{lo}, {hi}]"
                )));
            }
        }

        for (name, steps) in [("grid_gamma", self.grid_gamma), ("grid_H0", self.grid_h0)] {
            if steps < 2 {
                return Err(InferenceError::InvalidConfig(format!("{name} must be >= 2, got {steps}")));
            }
        }

        Ok(())
    }
}

/// A BAO-style mock dataset: `D_V/r_d` at N redshifts plus its covariance.
///
/// Only constructible through [`BaoDataset::new`], which enforces the shape,
/// symmetry and invertibility invariants.
#[derive(Debug, Clone)]
pub struct BaoDataset {
    z: Vec<f64>,
    dv_over_rd: Vec<f64>,
    cov: DMatrix<f64>,
}

impl BaoDataset {
    pub fn new(z: Vec<f64>, dv_over_rd: Vec<f64>, cov: DMatrix<f64>) -> Result<Self> {
        if z.len() != dv_over_rd.len() {
            return Err(InferenceError::Shape(format!(
                "z has {} entries but dv_over_rd has {}",
                z.len(),
                dv_over_rd.len()
            )));
        }
        if z.len() < 2 {
            return Err(InferenceError::InsufficientData {
                what: "BAO dataset",
                needed: 2,
                found: z.len(),
            });
        }
        if !cov.is_square() {
            return Err(InferenceError::Shape(format!(
                "covariance must be square, got {}x{}",
                cov.nrows(),
                cov.ncols()
            )));
        }
        if cov.nrows() != z.len() {
            return Err(InferenceError::Shape(format!(
                "covariance dimension {} does not match data length {}",
                cov.nrows(),
                z.len()
            )));
        }
        crate::math::ensure_symmetric(&cov)?;
        crate::math::invert(&cov)?;

        Ok(Self { z, dv_over_rd, cov })
    }

    pub fn len(&self) -> usize {
        self.z.len()
    }

    pub fn is_empty(&self) -> bool {
        self.z.is_empty()
    }

    pub fn z(&self) -> &[f64] {
        &self.z
    }

    pub fn dv_over_rd(&self) -> &[f64] {
        &self.dv_over_rd
    }

    pub fn cov(&self) -> &DMatrix<f64> {
        &self.cov
    }
}

/// The two scan axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridAxes {
    pub gamma: Vec<f64>,
    #[serde(rename = "H0_local")]
    pub h0_local: Vec<f64>,
}

/// Normalized posterior: marginals plus the full table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosteriorTables {
    pub p_gamma: Vec<f64>,
    #[serde(rename = "p_H0_local")]
    pub p_h0_local: Vec<f64>,
    /// `table[i][j]` is the probability of cell `(gamma[i], H0_local[j])`.
    pub table: Vec<Vec<f64>>,
}

/// Lower/upper edge of a credible interval.
pub type Interval = [f64; 2];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosteriorSummary {
    pub gamma_mean: f64,
    pub gamma_map: f64,
    pub gamma_68: Interval,
    pub gamma_95: Interval,
    #[serde(rename = "H0_local_mean")]
    pub h0_local_mean: f64,
    #[serde(rename = "H0_local_map")]
    pub h0_local_map: f64,
    #[serde(rename = "H0_local_68")]
    pub h0_local_68: Interval,
    #[serde(rename = "H0_local_95")]
    pub h0_local_95: Interval,
    #[serde(rename = "H0_early_pred_map")]
    pub h0_early_pred_map: f64,
}

/// Penalized-likelihood scores for one model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InfoCriteria {
    /// Free parameters.
    pub k: usize,
    /// Independent observations.
    pub n: usize,
    #[serde(rename = "logL_max")]
    pub log_l_max: f64,
    #[serde(rename = "AIC")]
    pub aic: f64,
    #[serde(rename = "BIC")]
    pub bic: f64,
}

/// Running-γ model against the nested fixed-γ model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelComparison {
    pub running_gamma: InfoCriteria,
    pub fixed_gamma: InfoCriteria,
    /// `AIC(fixed) - AIC(running)`; positive favours the running model.
    #[serde(rename = "delta_AIC")]
    pub delta_aic: f64,
    /// `BIC(fixed) - BIC(running)`; positive favours the running model.
    #[serde(rename = "delta_BIC")]
    pub delta_bic: f64,
}

/// Output of one grid inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosteriorResult {
    pub grid: GridAxes,
    pub posterior: PosteriorTables,
    pub summary: PosteriorSummary,
    pub model_comparison: ModelComparison,
    pub config_echo: InferenceConfig,
}

/// Joint `γ` posterior after reweighting by an independent dataset likelihood.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointPosterior {
    pub p_gamma_joint: Vec<f64>,
    pub gamma_mean_joint: f64,
    pub gamma_map_joint: f64,
    pub gamma_68_joint: Interval,
    pub gamma_95_joint: Interval,
}

/// Dataset block echoed next to a joint inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetEcho {
    #[serde(rename = "N")]
    pub n: usize,
    pub z: Vec<f64>,
    pub dv_over_rd: Vec<f64>,
    pub p_sensitivity: f64,
}

impl DatasetEcho {
    pub fn from_dataset(dataset: &BaoDataset, p_sensitivity: f64) -> Self {
        Self {
            n: dataset.len(),
            z: dataset.z().to_vec(),
            dv_over_rd: dataset.dv_over_rd().to_vec(),
            p_sensitivity,
        }
    }
}

/// Output of the grid inference combined with a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetInferenceResult {
    pub base: PosteriorResult,
    pub dataset: DatasetEcho,
    pub joint: JointPosterior,
}

/// Asimov forecast configuration (quadratic rate model + ΔNLL scan).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsimovConfig {
    /// Relative uncertainty on the rate at the Asimov truth.
    pub rel_uncert_rate: f64,
    /// Tabulated `(kappa, rate)` calibration points.
    pub sigma_points: Vec<(f64, f64)>,
    pub kappa_min: f64,
    pub kappa_max: f64,
    pub n_grid: usize,
    pub cl68_delta_nll: f64,
    pub cl95_delta_nll: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsimovResult {
    pub model: QuadraticModel,
    /// Rate at the Asimov truth `kappa = 1`.
    pub sigma_sm: f64,
    pub sigma_err: f64,
    pub interval_68: Interval,
    pub interval_95: Interval,
}

/// Calibration of the running exponent against a target `H0_early/H0_local`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    pub v0_gev: f64,
    pub z_rec: f64,
    pub rd0_mpc: f64,
    pub p_sensitivity: f64,
    pub h0_local: f64,
    pub h0_early_target: f64,
    pub z_max: f64,
    pub n_z: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationResult {
    pub target_ratio: f64,
    pub alpha: f64,
    /// `v_eff(z_rec)/v0`.
    pub v_ratio_rec: f64,
    pub rd_true_mpc: f64,
    pub h0_early_inferred: f64,
    pub z: Vec<f64>,
    /// `v_eff(z)/v0` on `z`.
    pub v_ratio: Vec<f64>,
}

/// Reference scenario used across the test suites.
#[cfg(test)]
pub(crate) fn reference_config() -> InferenceConfig {
    InferenceConfig {
        z_rec: 1100.0,
        rd0_mpc: 147.0,
        h0_local_obs: 73.0,
        h0_local_sigma: 1.0,
        h0_early_obs: 67.4,
        h0_early_sigma: 0.6,
        gamma_ref: 11.0 / 3.0,
        kappa_b: 1.0,
        beta_rd_sensitivity: 0.25,
        gamma_min: 3.0,
        gamma_max: 4.5,
        h0_min: 60.0,
        h0_max: 80.0,
        grid_gamma: 101,
        grid_h0: 81,
    }
}
