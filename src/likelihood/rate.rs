//! Asimov Gaussian likelihood on an inclusive rate.
//!
//! The predicted rate comes from a fitted [`QuadraticModel`] of the coupling;
//! the "observed" rate is the model at the assumed truth, so the NLL is zero
//! there by construction.

use crate::domain::{AsimovConfig, AsimovResult, QuadraticModel};
use crate::error::{InferenceError, Result};
use crate::fit::fit_quadratic;
use crate::likelihood::interval::find_interval;
use crate::math::lin_space;

/// Coupling value of the Asimov truth (Standard Model).
pub const KAPPA_SM: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateGaussianLikelihood {
    model: QuadraticModel,
    observed: f64,
    sigma: f64,
}

impl RateGaussianLikelihood {
    pub fn new(model: QuadraticModel, observed: f64, sigma: f64) -> Result<Self> {
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(InferenceError::InvalidParameter(format!(
                "rate uncertainty must be > 0, got {sigma}"
            )));
        }
        Ok(Self {
            model,
            observed,
            sigma,
        })
    }

    pub fn nll(&self, kappa: f64) -> f64 {
        let z = (self.model.evaluate(kappa) - self.observed) / self.sigma;
        0.5 * z * z
    }

    pub fn nll_grid(&self, kappas: &[f64]) -> Vec<f64> {
        kappas.iter().map(|&k| self.nll(k)).collect()
    }
}

/// Asimov forecast: fit the rate model, scan the coupling, extract ΔNLL intervals.
pub fn asimov_forecast(config: &AsimovConfig) -> Result<AsimovResult> {
    if !(config.rel_uncert_rate.is_finite() && config.rel_uncert_rate > 0.0) {
        return Err(InferenceError::InvalidConfig(format!(
            "rel_uncert_rate must be > 0, got {}",
            config.rel_uncert_rate
        )));
    }

    let model = fit_quadratic(&config.sigma_points)?;
    let sigma_sm = model.evaluate(KAPPA_SM);
    let sigma_err = config.rel_uncert_rate * sigma_sm;
    let like = RateGaussianLikelihood::new(model, sigma_sm, sigma_err)?;

    let grid = lin_space(config.kappa_min, config.kappa_max, config.n_grid)
        .map_err(|e| InferenceError::InvalidConfig(format!("kappa scan: {e}")))?;
    let nll = like.nll_grid(&grid);

    let (lo68, hi68) = find_interval(&grid, &nll, config.cl68_delta_nll)?;
    let (lo95, hi95) = find_interval(&grid, &nll, config.cl95_delta_nll)?;

    Ok(AsimovResult {
        model,
        sigma_sm,
        sigma_err,
        interval_68: [lo68, hi68],
        interval_95: [lo95, hi95],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const POINTS: [(f64, f64); 3] = [(0.0, 71.01), (1.0, 43.00), (2.0, 15.85)];

    fn width_95(rel: f64) -> f64 {
        let model = fit_quadratic(&POINTS).unwrap();
        let sigma_sm = model.evaluate(KAPPA_SM);
        let like = RateGaussianLikelihood::new(model, sigma_sm, rel * sigma_sm).unwrap();
        let grid = lin_space(-5.0, 10.0, 3001).unwrap();
        let nll = like.nll_grid(&grid);
        let (lo, hi) = find_interval(&grid, &nll, 1.92).unwrap();
        hi - lo
    }

    #[test]
    fn interval_shrinks_when_uncertainty_decreases() {
        assert!(width_95(0.15) < width_95(0.30));
    }

    #[test]
    fn tighter_sigma_never_widens_interval() {
        let rels = [0.05, 0.1, 0.2, 0.4, 0.8];
        for pair in rels.windows(2) {
            assert!(width_95(pair[0]) <= width_95(pair[1]));
        }
    }

    #[test]
    fn nll_matches_scalar_form_and_vanishes_at_truth() {
        let model = fit_quadratic(&POINTS).unwrap();
        let sigma_sm = model.evaluate(KAPPA_SM);
        let like = RateGaussianLikelihood::new(model, sigma_sm, 4.0).unwrap();
        assert!(like.nll(KAPPA_SM).abs() < 1e-20);
        let scalar = crate::likelihood::gaussian_nll(sigma_sm, model.evaluate(2.5), 4.0).unwrap();
        assert!((like.nll(2.5) - scalar).abs() < 1e-12);
    }

    #[test]
    fn asimov_forecast_brackets_the_truth() {
        let cfg = AsimovConfig {
            rel_uncert_rate: 0.3,
            sigma_points: POINTS.to_vec(),
            kappa_min: -5.0,
            kappa_max: 10.0,
            n_grid: 3001,
            cl68_delta_nll: 0.5,
            cl95_delta_nll: 1.92,
        };
        let res = asimov_forecast(&cfg).unwrap();
        assert!(res.interval_68[0] <= KAPPA_SM && KAPPA_SM <= res.interval_68[1]);
        assert!(res.interval_95[0] <= res.interval_68[0]);
        assert!(res.interval_95[1] >= res.interval_68[1]);
        assert!((res.sigma_err - 0.3 * res.sigma_sm).abs() < 1e-12);
    }

    #[test]
    fn zero_uncertainty_is_rejected() {
        let model = fit_quadratic(&POINTS).unwrap();
        assert!(RateGaussianLikelihood::new(model, 43.0, 0.0).is_err());
    }
}
