//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the numeric code stays clean and testable
//! - output changes are localized
//!
//! Everything printed here is plain ASCII.

use std::path::Path;

use crate::data::{MockConfig, MockDataset};
use crate::domain::{
    AsimovConfig, AsimovResult, CalibrationConfig, CalibrationResult, DatasetInferenceResult, Interval,
    PosteriorResult,
};

/// Rows in a marginal bar chart.
const BAR_ROWS: usize = 15;
/// Width of the longest bar.
const BAR_WIDTH: usize = 40;

/// Summary of a grid inference run.
pub fn format_inference_summary(config_path: &Path, res: &PosteriorResult) -> String {
    let cfg = &res.config_echo;
    let s = &res.summary;
    let mc = &res.model_comparison;
    let mut out = String::new();

    out.push_str("=== gridpost - (gamma, H0_local) grid posterior ===\n");
    out.push_str(&format!("Config: {}\n", config_path.display()));
    out.push_str(&format!(
        "Grid: gamma [{:.4}, {:.4}] x {} | H0_local [{:.2}, {:.2}] x {}\n",
        cfg.gamma_min, cfg.gamma_max, cfg.grid_gamma, cfg.h0_min, cfg.h0_max, cfg.grid_h0
    ));
    out.push_str(&format!(
        "Observed: H0_local = {:.2} +/- {:.2} | H0_early = {:.2} +/- {:.2}\n",
        cfg.h0_local_obs, cfg.h0_local_sigma, cfg.h0_early_obs, cfg.h0_early_sigma
    ));
    out.push_str(&format!("gamma_ref: {:.6}\n", cfg.gamma_ref));

    out.push_str("\nPosterior:\n");
    out.push_str(&format!(
        "- gamma    : map={:.6} mean={:.6} 68%={} 95%={}\n",
        s.gamma_map,
        s.gamma_mean,
        fmt_interval(s.gamma_68, 4),
        fmt_interval(s.gamma_95, 4)
    ));
    out.push_str(&format!(
        "- H0_local : map={:.3} mean={:.3} 68%={} 95%={}\n",
        s.h0_local_map,
        s.h0_local_mean,
        fmt_interval(s.h0_local_68, 3),
        fmt_interval(s.h0_local_95, 3)
    ));
    out.push_str(&format!("- H0_early_pred at MAP: {:.3}\n", s.h0_early_pred_map));

    out.push_str("\nModel comparison (fixed - running):\n");
    out.push_str(&format!(
        "  {:<14} {:>3} {:>12} {:>10} {:>10}\n",
        "model", "k", "logL_max", "AIC", "BIC"
    ));
    for (name, ic) in [("running_gamma", &mc.running_gamma), ("fixed_gamma", &mc.fixed_gamma)] {
        out.push_str(&format!(
            "  {:<14} {:>3} {:>12.4} {:>10.3} {:>10.3}\n",
            name, ic.k, ic.log_l_max, ic.aic, ic.bic
        ));
    }
    out.push_str(&format!("  delta_AIC = {:.3} | delta_BIC = {:.3}\n", mc.delta_aic, mc.delta_bic));

    out.push_str("\np(gamma):\n");
    out.push_str(&marginal_bars(&res.grid.gamma, &res.posterior.p_gamma));
    out
}

/// Summary of a grid inference combined with a dataset.
pub fn format_dataset_summary(config_path: &Path, res: &DatasetInferenceResult) -> String {
    let mut out = format_inference_summary(config_path, &res.base);
    let d = &res.dataset;
    let j = &res.joint;

    out.push_str("\nDataset:\n");
    out.push_str(&format!("- N = {} | p_sensitivity = {:.4}\n", d.n, d.p_sensitivity));
    out.push_str(&format!("  {:>8} {:>12}\n", "z", "dv_over_rd"));
    for (z, y) in d.z.iter().zip(&d.dv_over_rd) {
        out.push_str(&format!("  {z:>8.4} {y:>12.4}\n"));
    }

    out.push_str("\nJoint (grid x dataset):\n");
    out.push_str(&format!(
        "- gamma    : map={:.6} mean={:.6} 68%={} 95%={}\n",
        j.gamma_map_joint,
        j.gamma_mean_joint,
        fmt_interval(j.gamma_68_joint, 4),
        fmt_interval(j.gamma_95_joint, 4)
    ));
    out.push_str("\np(gamma | joint):\n");
    out.push_str(&marginal_bars(&res.base.grid.gamma, &j.p_gamma_joint));
    out
}

/// Summary of an Asimov forecast.
pub fn format_asimov_summary(config_path: &Path, cfg: &AsimovConfig, res: &AsimovResult) -> String {
    let mut out = String::new();
    out.push_str("=== gridpost - Asimov kappa forecast (SM truth) ===\n");
    out.push_str(&format!("Config: {}\n", config_path.display()));
    out.push_str(&format!(
        "Quadratic fit: a={:.6e}, b={:.6e}, c={:.6e}\n",
        res.model.a, res.model.b, res.model.c
    ));
    out.push_str(&format!("rate at kappa=1: {:.4}\n", res.sigma_sm));
    out.push_str(&format!(
        "rel_uncert_rate: {:.3} -> sigma_err = {:.4}\n",
        cfg.rel_uncert_rate, res.sigma_err
    ));
    out.push_str(&format!(
        "68% interval (dNLL = {}): {}\n",
        cfg.cl68_delta_nll,
        fmt_interval(res.interval_68, 3)
    ));
    out.push_str(&format!(
        "95% interval (dNLL = {}): {}\n",
        cfg.cl95_delta_nll,
        fmt_interval(res.interval_95, 3)
    ));
    out
}

/// Summary of a calibration solve.
pub fn format_calibration_summary(config_path: &Path, cfg: &CalibrationConfig, res: &CalibrationResult) -> String {
    let mut out = String::new();
    out.push_str("=== gridpost - closure calibration ===\n");
    out.push_str(&format!("Config: {}\n", config_path.display()));
    out.push_str(&format!(
        "Targets: H0_local = {:.3} | H0_early = {:.3} | ratio = {:.6}\n",
        cfg.h0_local, cfg.h0_early_target, res.target_ratio
    ));
    out.push_str(&format!("alpha: {:.6e}\n", res.alpha));
    out.push_str(&format!("v_eff(z_rec)/v0: {:.6}\n", res.v_ratio_rec));
    out.push_str(&format!(
        "rd_true: {:.3} Mpc (rd0 = {:.3} Mpc)\n",
        res.rd_true_mpc, cfg.rd0_mpc
    ));
    out.push_str(&format!("H0_early inferred: {:.3}\n", res.h0_early_inferred));
    out
}

/// Summary of a generated mock dataset.
pub fn format_mock_summary(cfg: &MockConfig, mock: &MockDataset, table: &Path, cov: &Path) -> String {
    let mut out = String::new();
    out.push_str("=== gridpost - mock dataset ===\n");
    out.push_str(&format!(
        "gamma_true = {:.6} | gamma_ref = {:.6} | p = {:.4} | rel_sigma = {:.4} | rho = {:.3} | seed = {}\n",
        cfg.gamma_true, cfg.gamma_ref, cfg.p_sensitivity, cfg.rel_sigma, cfg.rho, cfg.seed
    ));
    out.push_str(&format!(
        "  {:>8} {:>12} {:>12} {:>12} {:>10}\n",
        "z", "fiducial", "truth", "observed", "sigma"
    ));
    let ds = &mock.dataset;
    for i in 0..ds.len() {
        out.push_str(&format!(
            "  {:>8.4} {:>12.4} {:>12.4} {:>12.4} {:>10.4}\n",
            ds.z()[i],
            mock.fiducial[i],
            mock.truth[i],
            ds.dv_over_rd()[i],
            ds.cov()[(i, i)].sqrt()
        ));
    }
    out.push_str(&format!("wrote: {} ; {}\n", table.display(), cov.display()));
    out
}

/// Horizontal bar chart of a 1D distribution, binned down to a few rows.
pub fn marginal_bars(x: &[f64], p: &[f64]) -> String {
    let n = x.len().min(p.len());
    if n == 0 {
        return String::new();
    }
    let rows = n.min(BAR_ROWS);

    let mut binned = Vec::with_capacity(rows);
    for r in 0..rows {
        let lo = r * n / rows;
        let hi = ((r + 1) * n / rows).max(lo + 1);
        let mass: f64 = p[lo..hi].iter().sum();
        let center = 0.5 * (x[lo] + x[hi - 1]);
        binned.push((center, mass));
    }

    let peak = binned.iter().map(|(_, m)| *m).fold(0.0_f64, f64::max);
    let mut out = String::new();
    for (center, mass) in binned {
        let len = if peak > 0.0 {
            ((mass / peak) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        out.push_str(&format!("  {center:>10.4} |{:<width$}| {mass:.4}\n", "#".repeat(len), width = BAR_WIDTH));
    }
    out
}

fn fmt_interval(v: Interval, digits: usize) -> String {
    format!("[{:.*}, {:.*}]", digits, v[0], digits, v[1])
}
