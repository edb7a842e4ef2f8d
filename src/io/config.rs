//! YAML configuration loading.
//!
//! Three documents are understood:
//!
//! - inference: flat [`InferenceConfig`] keys, optionally extended with a
//!   dataset (`bao_csv`, `bao_cov`, `bao_p_sensitivity`)
//! - Asimov forecast: nested `assumptions` / `sigma_points_fb` / `scan` / `intervals`
//! - calibration: nested `model` / `targets` / `scan`
//!
//! Loaders only deserialize and validate; they never run inference.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::domain::{AsimovConfig, CalibrationConfig, InferenceConfig};
use crate::error::{InferenceError, Result};
use crate::posterior::DatasetModel;

/// Inference config plus the dataset it should be combined with.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetRunConfig {
    pub inference: InferenceConfig,
    pub bao_csv: PathBuf,
    pub bao_cov: PathBuf,
    pub model: DatasetModel,
}

fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(InferenceError::NotFound(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path).map_err(|source| InferenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value = serde_yaml_ng::from_str(&text)
        .map_err(|e| InferenceError::InvalidConfig(format!("{}: {e}", path.display())))?;
    tracing::debug!(path = %path.display(), "config loaded");
    Ok(value)
}

/// Load and validate a flat inference config.
pub fn load_inference_config(path: &Path) -> Result<InferenceConfig> {
    let cfg: InferenceConfig = read_yaml(path)?;
    cfg.validate()?;
    Ok(cfg)
}

#[derive(Debug, Deserialize)]
struct DatasetRunFile {
    #[serde(flatten)]
    inference: InferenceConfig,
    bao_csv: PathBuf,
    bao_cov: PathBuf,
    bao_p_sensitivity: f64,
    #[serde(default)]
    bao_fiducial: Option<Vec<f64>>,
}

/// Load an inference config that also names a dataset.
///
/// Relative dataset paths are looked up next to the config file first and
/// fall back to the working directory.
pub fn load_dataset_run_config(path: &Path) -> Result<DatasetRunConfig> {
    let raw: DatasetRunFile = read_yaml(path)?;
    raw.inference.validate()?;
    if !raw.bao_p_sensitivity.is_finite() {
        return Err(InferenceError::InvalidConfig(format!(
            "bao_p_sensitivity must be finite, got {}",
            raw.bao_p_sensitivity
        )));
    }

    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    let model = DatasetModel {
        gamma_ref: raw.inference.gamma_ref,
        kappa_b: raw.inference.kappa_b,
        p_sensitivity: raw.bao_p_sensitivity,
        fiducial: raw.bao_fiducial,
    };

    Ok(DatasetRunConfig {
        bao_csv: resolve_relative(base_dir, raw.bao_csv),
        bao_cov: resolve_relative(base_dir, raw.bao_cov),
        inference: raw.inference,
        model,
    })
}

fn resolve_relative(base_dir: &Path, p: PathBuf) -> PathBuf {
    if p.is_absolute() {
        return p;
    }
    let candidate = base_dir.join(&p);
    if candidate.exists() { candidate } else { p }
}

#[derive(Debug, Deserialize)]
struct AsimovFile {
    assumptions: AsimovAssumptions,
    sigma_points_fb: Vec<SigmaPoint>,
    scan: KappaScan,
    intervals: DeltaNllThresholds,
}

#[derive(Debug, Deserialize)]
struct AsimovAssumptions {
    rel_uncert_rate: f64,
}

#[derive(Debug, Deserialize)]
struct SigmaPoint {
    kappa_lambda: f64,
    sigma_fb: f64,
}

#[derive(Debug, Deserialize)]
struct KappaScan {
    kappa_min: f64,
    kappa_max: f64,
    n_grid: usize,
}

#[derive(Debug, Deserialize)]
struct DeltaNllThresholds {
    cl68_delta_nll: f64,
    cl95_delta_nll: f64,
}

/// Load an Asimov forecast config.
pub fn load_asimov_config(path: &Path) -> Result<AsimovConfig> {
    let raw: AsimovFile = read_yaml(path)?;
    let cfg = AsimovConfig {
        rel_uncert_rate: raw.assumptions.rel_uncert_rate,
        sigma_points: raw
            .sigma_points_fb
            .iter()
            .map(|p| (p.kappa_lambda, p.sigma_fb))
            .collect(),
        kappa_min: raw.scan.kappa_min,
        kappa_max: raw.scan.kappa_max,
        n_grid: raw.scan.n_grid,
        cl68_delta_nll: raw.intervals.cl68_delta_nll,
        cl95_delta_nll: raw.intervals.cl95_delta_nll,
    };

    if !(cfg.rel_uncert_rate.is_finite() && cfg.rel_uncert_rate > 0.0) {
        return Err(InferenceError::InvalidConfig(format!(
            "assumptions.rel_uncert_rate must be > 0, got {}",
            cfg.rel_uncert_rate
        )));
    }
    if !(cfg.kappa_min < cfg.kappa_max) || cfg.n_grid < 2 {
        return Err(InferenceError::InvalidConfig(format!(
            "scan needs kappa_min < kappa_max and n_grid >= 2, got [{}, {}] x {}",
            cfg.kappa_min, cfg.kappa_max, cfg.n_grid
        )));
    }
    Ok(cfg)
}

#[derive(Debug, Deserialize)]
struct CalibrationFile {
    model: CalibrationModel,
    targets: CalibrationTargets,
    scan: RedshiftScan,
}

#[derive(Debug, Deserialize)]
struct CalibrationModel {
    v0_gev: f64,
    z_rec: f64,
    rd0_mpc: f64,
    p_sensitivity: f64,
}

#[derive(Debug, Deserialize)]
struct CalibrationTargets {
    #[serde(rename = "H0_local")]
    h0_local: f64,
    #[serde(rename = "H0_early_target")]
    h0_early_target: f64,
}

#[derive(Debug, Deserialize)]
struct RedshiftScan {
    z_max: f64,
    n_z: usize,
}

/// Load a calibration config.
pub fn load_calibration_config(path: &Path) -> Result<CalibrationConfig> {
    let raw: CalibrationFile = read_yaml(path)?;
    let cfg = CalibrationConfig {
        v0_gev: raw.model.v0_gev,
        z_rec: raw.model.z_rec,
        rd0_mpc: raw.model.rd0_mpc,
        p_sensitivity: raw.model.p_sensitivity,
        h0_local: raw.targets.h0_local,
        h0_early_target: raw.targets.h0_early_target,
        z_max: raw.scan.z_max,
        n_z: raw.scan.n_z,
    };
    if !(cfg.z_max > 0.0) || cfg.n_z < 2 {
        return Err(InferenceError::InvalidConfig(format!(
            "scan needs z_max > 0 and n_z >= 2, got z_max = {}, n_z = {}",
            cfg.z_max, cfg.n_z
        )));
    }
    Ok(cfg)
}
