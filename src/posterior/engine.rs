//! Grid posterior over `(γ, H0_local)`.
//!
//! The posterior is evaluated by brute force on a dense grid, in row-major
//! order (`γ` outer), single-threaded.
//!
//! Likelihood per cell:
//!
//! ```text
//! ln L = ln N(H0_local_obs | H0_local, σ_local)
//!      + ln N(H0_early_obs | H0_local · rd_ratio(γ), σ_early)
//! ```
//!
//! Priors are uniform inside the configured bounds; the grid is the support.

use crate::domain::{
    GridAxes, InferenceConfig, ModelComparison, PosteriorResult, PosteriorSummary, PosteriorTables,
};
use crate::error::{InferenceError, Result};
use crate::likelihood::gaussian_log_density;
use crate::math::lin_space;
use crate::models::predict_h0_early_for;
use crate::posterior::comparison::{compare_models, info_criteria};
use crate::posterior::stats::{argmax, credible_interval, normalize_log_densities, weighted_mean};

/// Independent observational constraints (local and early `H0`).
pub const N_OBSERVATIONS: usize = 2;
/// Free parameters of the running model: `γ`, `H0_local`.
pub const K_RUNNING: usize = 2;
/// Free parameters of the fixed-γ model: `H0_local`.
pub const K_FIXED: usize = 1;

pub const LEVEL_68: f64 = 0.68;
pub const LEVEL_95: f64 = 0.95;

/// Log-likelihood of one `(γ, H0_local)` cell.
pub fn log_likelihood(config: &InferenceConfig, gamma: f64, h0_local: f64) -> Result<f64> {
    let h0_early_pred = predict_h0_early_for(config, gamma, h0_local);
    let ll_local = gaussian_log_density(config.h0_local_obs, h0_local, config.h0_local_sigma)?;
    let ll_early = gaussian_log_density(config.h0_early_obs, h0_early_pred, config.h0_early_sigma)?;
    Ok(ll_local + ll_early)
}

/// Run the full grid inference.
pub fn grid_posterior(config: &InferenceConfig) -> Result<PosteriorResult> {
    config.validate()?;

    let gammas = lin_space(config.gamma_min, config.gamma_max, config.grid_gamma)?;
    let h0s = lin_space(config.h0_min, config.h0_max, config.grid_h0)?;
    let n_h0 = h0s.len();

    // Row-major: cell (i, j) lives at i * n_h0 + j.
    let mut log_post = Vec::with_capacity(gammas.len() * n_h0);
    for &gamma in &gammas {
        for &h0 in &h0s {
            log_post.push(log_likelihood(config, gamma, h0)?);
        }
    }

    let post = normalize_log_densities(&log_post)?;

    let mut p_gamma = vec![0.0; gammas.len()];
    let mut p_h0 = vec![0.0; n_h0];
    for (i, row) in post.chunks(n_h0).enumerate() {
        for (j, &p) in row.iter().enumerate() {
            p_gamma[i] += p;
            p_h0[j] += p;
        }
    }

    let idx = argmax(&log_post)
        .ok_or_else(|| InferenceError::Normalization("posterior has no finite cell".to_string()))?;
    let gamma_map = gammas[idx / n_h0];
    let h0_map = h0s[idx % n_h0];
    let log_l_max = log_post[idx];

    let summary = PosteriorSummary {
        gamma_mean: weighted_mean(&gammas, &p_gamma),
        gamma_map,
        gamma_68: credible_interval(&gammas, &p_gamma, LEVEL_68)?,
        gamma_95: credible_interval(&gammas, &p_gamma, LEVEL_95)?,
        h0_local_mean: weighted_mean(&h0s, &p_h0),
        h0_local_map: h0_map,
        h0_local_68: credible_interval(&h0s, &p_h0, LEVEL_68)?,
        h0_local_95: credible_interval(&h0s, &p_h0, LEVEL_95)?,
        h0_early_pred_map: predict_h0_early_for(config, gamma_map, h0_map),
    };

    let model_comparison = compare_with_fixed_gamma(config, &h0s, log_l_max)?;

    let table = post.chunks(n_h0).map(|row| row.to_vec()).collect();

    Ok(PosteriorResult {
        grid: GridAxes {
            gamma: gammas,
            h0_local: h0s,
        },
        posterior: PosteriorTables {
            p_gamma,
            p_h0_local: p_h0,
            table,
        },
        summary,
        model_comparison,
        config_echo: config.clone(),
    })
}

/// Score the running model against the nested model with `γ = γ_ref`.
///
/// With `γ` fixed the closure collapses (`alpha = 0`), so the early prediction
/// equals `H0_local` and only the `H0` axis is profiled.
fn compare_with_fixed_gamma(
    config: &InferenceConfig,
    h0s: &[f64],
    log_l_max: f64,
) -> Result<ModelComparison> {
    let mut log_l_fixed_max = f64::NEG_INFINITY;
    for &h0 in h0s {
        let ll = gaussian_log_density(config.h0_local_obs, h0, config.h0_local_sigma)?
            + gaussian_log_density(config.h0_early_obs, h0, config.h0_early_sigma)?;
        log_l_fixed_max = log_l_fixed_max.max(ll);
    }

    let running = info_criteria(log_l_max, K_RUNNING, N_OBSERVATIONS);
    let fixed = info_criteria(log_l_fixed_max, K_FIXED, N_OBSERVATIONS);
    Ok(compare_models(running, fixed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::reference_config;
    use approx::assert_abs_diff_eq;

    #[test]
    fn reference_scenario_produces_every_block() {
        let cfg = reference_config();
        let res = grid_posterior(&cfg).unwrap();

        assert_eq!(res.grid.gamma.len(), 101);
        assert_eq!(res.grid.h0_local.len(), 81);
        assert_eq!(res.posterior.p_gamma.len(), 101);
        assert_eq!(res.posterior.p_h0_local.len(), 81);
        assert_eq!(res.posterior.table.len(), 101);
        assert!(res.posterior.table.iter().all(|row| row.len() == 81));

        assert!(cfg.gamma_min <= res.summary.gamma_map && res.summary.gamma_map <= cfg.gamma_max);
        assert!(res.model_comparison.delta_aic.is_finite());

        let json = serde_json::to_value(&res).unwrap();
        for key in ["summary", "model_comparison", "posterior", "grid", "config_echo"] {
            let block = json.get(key).unwrap_or_else(|| panic!("missing {key}"));
            assert!(block.as_object().is_some_and(|o| !o.is_empty()), "{key} is empty");
        }
    }

    #[test]
    fn posterior_table_and_marginals_sum_to_one() {
        let res = grid_posterior(&reference_config()).unwrap();
        let total: f64 = res.posterior.table.iter().flatten().sum();
        assert_abs_diff_eq!(total, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(res.posterior.p_gamma.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(res.posterior.p_h0_local.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn map_and_intervals_stay_inside_bounds() {
        let mut cfg = reference_config();
        // Push the likelihood peak outside the H0 range: the MAP must still be on the grid.
        cfg.h0_min = 60.0;
        cfg.h0_max = 65.0;
        cfg.grid_h0 = 11;
        let res = grid_posterior(&cfg).unwrap();
        let s = &res.summary;
        assert!(cfg.gamma_min <= s.gamma_map && s.gamma_map <= cfg.gamma_max);
        assert!(cfg.h0_min <= s.h0_local_map && s.h0_local_map <= cfg.h0_max);
        for [lo, hi] in [s.gamma_68, s.gamma_95] {
            assert!(cfg.gamma_min <= lo && lo <= hi && hi <= cfg.gamma_max);
        }
        for [lo, hi] in [s.h0_local_68, s.h0_local_95] {
            assert!(cfg.h0_min <= lo && lo <= hi && hi <= cfg.h0_max);
        }
    }

    #[test]
    fn map_reproduces_the_early_tension() {
        let cfg = reference_config();
        let res = grid_posterior(&cfg).unwrap();
        let s = &res.summary;

        // Running gamma absorbs the tension: gamma moves above gamma_ref and the
        // early prediction at the MAP lands near the early observation.
        assert!(s.gamma_map > cfg.gamma_ref);
        assert!((s.h0_early_pred_map - cfg.h0_early_obs).abs() < 1.5);
        assert!(s.gamma_68[0] <= s.gamma_mean && s.gamma_mean <= s.gamma_68[1]);
        assert!(s.gamma_95[0] <= s.gamma_68[0] && s.gamma_68[1] <= s.gamma_95[1]);
    }

    #[test]
    fn running_model_wins_when_observations_disagree() {
        let res = grid_posterior(&reference_config()).unwrap();
        let mc = &res.model_comparison;
        assert_eq!((mc.running_gamma.k, mc.fixed_gamma.k), (2, 1));
        assert_eq!((mc.running_gamma.n, mc.fixed_gamma.n), (2, 2));
        assert!(mc.running_gamma.log_l_max >= mc.fixed_gamma.log_l_max);
        assert!(mc.delta_aic > 0.0);
        assert_abs_diff_eq!(mc.delta_aic, mc.fixed_gamma.aic - mc.running_gamma.aic, epsilon = 1e-12);
    }

    #[test]
    fn fixed_gamma_model_is_preferred_without_tension() {
        let mut cfg = reference_config();
        cfg.h0_early_obs = cfg.h0_local_obs;
        let res = grid_posterior(&cfg).unwrap();
        // No tension: the extra parameter buys (almost) nothing and is penalized.
        assert!(res.model_comparison.delta_aic < 0.0);
        assert!(res.model_comparison.delta_bic < 0.0);
    }

    #[test]
    fn invalid_config_fails_before_evaluation() {
        let mut cfg = reference_config();
        cfg.h0_local_sigma = -1.0;
        assert!(matches!(grid_posterior(&cfg), Err(InferenceError::InvalidConfig(_))));

        let mut cfg = reference_config();
        cfg.grid_gamma = 1;
        assert!(matches!(grid_posterior(&cfg), Err(InferenceError::InvalidConfig(_))));
    }

    #[test]
    fn tighter_early_sigma_does_not_widen_gamma_interval() {
        let mut loose = reference_config();
        loose.h0_early_sigma = 2.0;
        let mut tight = reference_config();
        tight.h0_early_sigma = 0.5;
        let w = |cfg: &InferenceConfig| {
            let s = grid_posterior(cfg).unwrap().summary;
            s.gamma_95[1] - s.gamma_95[0]
        };
        assert!(w(&tight) <= w(&loose));
    }

    #[test]
    fn evaluation_is_deterministic() {
        let a = grid_posterior(&reference_config()).unwrap();
        let b = grid_posterior(&reference_config()).unwrap();
        assert_eq!(a, b);
    }
}
