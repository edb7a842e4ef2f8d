//! Joint reweighting of the `γ` marginal by an independent dataset.
//!
//! The dataset constrains `γ` only (not `H0_local`), so the joint posterior
//! is the grid marginal times the per-`γ` dataset likelihood. The two datasets
//! are assumed conditionally independent given `γ`.

use serde::{Deserialize, Serialize};

use crate::domain::{BaoDataset, JointPosterior, PosteriorResult};
use crate::error::{InferenceError, Result};
use crate::likelihood::loglike_gaussian_cov;
use crate::models::{alpha_from_gamma, dv_over_rd_ratio};
use crate::posterior::engine::{LEVEL_68, LEVEL_95};
use crate::posterior::stats::{argmax, credible_interval, reweight, weighted_mean};

/// Closure constants needed to predict the dataset at a given `γ`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetModel {
    pub gamma_ref: f64,
    pub kappa_b: f64,
    /// Exponent applied to `(1+z)^alpha` for `D_V/r_d`.
    pub p_sensitivity: f64,
    /// Fiducial (no-running) `D_V/r_d`. `None` uses the observed values.
    pub fiducial: Option<Vec<f64>>,
}

/// Dataset log-likelihood at coupling `gamma`.
///
/// `y_pred = y_fid · (1+z)^(alpha(γ)·p)`; residual `y_obs - y_pred`.
pub fn dataset_log_likelihood(dataset: &BaoDataset, model: &DatasetModel, gamma: f64) -> Result<f64> {
    let observed = dataset.dv_over_rd();
    let fiducial = match &model.fiducial {
        Some(fid) => {
            if fid.len() != observed.len() {
                return Err(InferenceError::Shape(format!(
                    "fiducial has {} entries but dataset has {}",
                    fid.len(),
                    observed.len()
                )));
            }
            fid.as_slice()
        }
        None => observed,
    };

    let alpha = alpha_from_gamma(gamma, model.gamma_ref, model.kappa_b);
    let residual: Vec<f64> = dataset
        .z()
        .iter()
        .zip(observed)
        .zip(fiducial)
        .map(|((&z, &y_obs), &y_fid)| y_obs - y_fid * dv_over_rd_ratio(z, alpha, model.p_sensitivity))
        .collect();

    loglike_gaussian_cov(&residual, dataset.cov())
}

/// Update the `γ` marginal of `base` with the dataset likelihood.
pub fn joint_reweight(
    base: &PosteriorResult,
    dataset: &BaoDataset,
    model: &DatasetModel,
) -> Result<JointPosterior> {
    let gammas = &base.grid.gamma;
    let log_w = gammas
        .iter()
        .map(|&g| dataset_log_likelihood(dataset, model, g))
        .collect::<Result<Vec<f64>>>()?;

    let p_joint = reweight(&base.posterior.p_gamma, &log_w)?;
    let idx = argmax(&p_joint)
        .ok_or_else(|| InferenceError::Normalization("joint posterior is empty".to_string()))?;

    Ok(JointPosterior {
        gamma_mean_joint: weighted_mean(gammas, &p_joint),
        gamma_map_joint: gammas[idx],
        gamma_68_joint: credible_interval(gammas, &p_joint, LEVEL_68)?,
        gamma_95_joint: credible_interval(gammas, &p_joint, LEVEL_95)?,
        p_gamma_joint: p_joint,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::reference_config;
    use crate::posterior::grid_posterior;
    use approx::assert_abs_diff_eq;
    use nalgebra::DMatrix;

    fn dataset(dv: Vec<f64>, sigma: f64) -> BaoDataset {
        let n = dv.len();
        let z = vec![0.38, 0.51, 0.61, 1.48][..n].to_vec();
        let cov = DMatrix::<f64>::from_diagonal_element(n, n, sigma * sigma);
        BaoDataset::new(z, dv, cov).unwrap()
    }

    fn model(gamma_ref: f64) -> DatasetModel {
        DatasetModel {
            gamma_ref,
            kappa_b: 1.0,
            p_sensitivity: 0.25,
            fiducial: None,
        }
    }

    #[test]
    fn observed_fiducial_peaks_at_reference_gamma() {
        let ds = dataset(vec![10.2, 13.4, 15.9, 26.5], 0.2);
        let m = model(11.0 / 3.0);
        let at_ref = dataset_log_likelihood(&ds, &m, 11.0 / 3.0).unwrap();
        let away = dataset_log_likelihood(&ds, &m, 3.9).unwrap();
        assert!(at_ref > away);
    }

    #[test]
    fn joint_posterior_is_normalized_and_on_grid() {
        let cfg = reference_config();
        let base = grid_posterior(&cfg).unwrap();
        let ds = dataset(vec![10.2, 13.4, 15.9, 26.5], 0.5);
        let joint = joint_reweight(&base, &ds, &model(cfg.gamma_ref)).unwrap();

        assert_eq!(joint.p_gamma_joint.len(), base.grid.gamma.len());
        assert_abs_diff_eq!(joint.p_gamma_joint.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
        assert!(base.grid.gamma.contains(&joint.gamma_map_joint));
        assert!(joint.gamma_68_joint[0] <= joint.gamma_68_joint[1]);
    }

    #[test]
    fn flat_dataset_likelihood_leaves_marginal_unchanged() {
        let cfg = reference_config();
        let base = grid_posterior(&cfg).unwrap();
        // p_sensitivity = 0 makes the prediction independent of gamma.
        let ds = dataset(vec![10.2, 13.4], 0.5);
        let mut m = model(cfg.gamma_ref);
        m.p_sensitivity = 0.0;
        let joint = joint_reweight(&base, &ds, &m).unwrap();
        for (a, b) in joint.p_gamma_joint.iter().zip(&base.posterior.p_gamma) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(joint.gamma_mean_joint, base.summary.gamma_mean, epsilon = 1e-9);
    }

    #[test]
    fn fiducial_length_mismatch_is_rejected() {
        let ds = dataset(vec![10.2, 13.4], 0.5);
        let mut m = model(11.0 / 3.0);
        m.fiducial = Some(vec![10.0]);
        assert!(matches!(
            dataset_log_likelihood(&ds, &m, 3.7),
            Err(InferenceError::Shape(_))
        ));
    }
}
