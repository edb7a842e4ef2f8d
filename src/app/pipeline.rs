//! Shared command pipelines.
//!
//! Each function covers one command's workflow end to end (load -> compute),
//! leaving presentation and JSON export to `app`:
//!
//! - infer: config -> grid posterior
//! - infer-data: config -> grid posterior -> dataset load -> joint reweighting
//! - asimov: config -> quadratic fit -> ΔNLL intervals
//! - calibrate: config -> closure exponent
//! - mock: settings -> synthetic dataset -> files

use std::path::Path;

use crate::data::{MockConfig, MockDataset, generate_mock};
use crate::domain::{
    AsimovConfig, AsimovResult, CalibrationConfig, CalibrationResult, DatasetEcho, DatasetInferenceResult,
    PosteriorResult,
};
use crate::error::AppError;
use crate::io::{RowError, load_dataset_with_report, write_dataset};
use crate::likelihood::asimov_forecast;
use crate::models::calibrate;
use crate::posterior::{grid_posterior, joint_reweight};

/// Outputs of an `infer-data` run.
#[derive(Debug, Clone)]
pub struct DatasetRunOutput {
    pub result: DatasetInferenceResult,
    /// Table rows skipped during ingest.
    pub row_errors: Vec<RowError>,
}

/// Load an inference config and evaluate the grid posterior.
pub fn run_infer(config_path: &Path) -> Result<PosteriorResult, AppError> {
    let config = crate::io::load_inference_config(config_path)?;
    tracing::info!(
        grid_gamma = config.grid_gamma,
        grid_h0 = config.grid_h0,
        "evaluating grid posterior"
    );

    let result = grid_posterior(&config)?;
    tracing::info!(
        gamma_map = result.summary.gamma_map,
        h0_local_map = result.summary.h0_local_map,
        delta_aic = result.model_comparison.delta_aic,
        "posterior complete"
    );
    Ok(result)
}

/// Grid posterior plus dataset reweighting of the `γ` marginal.
pub fn run_infer_data(config_path: &Path) -> Result<DatasetRunOutput, AppError> {
    let run = crate::io::load_dataset_run_config(config_path)?;

    tracing::info!(table = %run.bao_csv.display(), cov = %run.bao_cov.display(), "loading dataset");
    let loaded = load_dataset_with_report(&run.bao_csv, &run.bao_cov)?;

    let base = grid_posterior(&run.inference)?;
    let joint = joint_reweight(&base, &loaded.dataset, &run.model)?;
    tracing::info!(
        n = loaded.dataset.len(),
        gamma_map = base.summary.gamma_map,
        gamma_map_joint = joint.gamma_map_joint,
        "joint posterior complete"
    );

    Ok(DatasetRunOutput {
        result: DatasetInferenceResult {
            base,
            dataset: DatasetEcho::from_dataset(&loaded.dataset, run.model.p_sensitivity),
            joint,
        },
        row_errors: loaded.row_errors,
    })
}

/// Asimov forecast from a YAML config.
pub fn run_asimov(config_path: &Path) -> Result<(AsimovConfig, AsimovResult), AppError> {
    let config = crate::io::load_asimov_config(config_path)?;
    tracing::info!(points = config.sigma_points.len(), n_grid = config.n_grid, "running Asimov scan");
    let result = asimov_forecast(&config)?;
    Ok((config, result))
}

/// Closure calibration from a YAML config.
pub fn run_calibrate(config_path: &Path) -> Result<(CalibrationConfig, CalibrationResult), AppError> {
    let config = crate::io::load_calibration_config(config_path)?;
    let result = calibrate(&config)?;
    tracing::info!(target_ratio = result.target_ratio, alpha = result.alpha, "calibration solved");
    Ok((config, result))
}

/// Generate a mock dataset and write it to `table_path` / `cov_path`.
pub fn run_mock(config: &MockConfig, table_path: &Path, cov_path: &Path) -> Result<MockDataset, AppError> {
    let mock = generate_mock(config)?;
    let ds = &mock.dataset;
    write_dataset(table_path, cov_path, ds.z(), ds.dv_over_rd(), ds.cov())?;
    tracing::info!(table = %table_path.display(), cov = %cov_path.display(), n = ds.len(), "mock written");
    Ok(mock)
}
