//! Model comparison with penalized likelihoods.
//!
//! For a model with `k` free parameters fitted to `n` observations:
//!
//! - `AIC = 2k - 2·ln L_max`
//! - `BIC = k·ln(n) - 2·ln L_max`
//!
//! Deltas are reported as `competitor - primary`, so a positive delta favours
//! the primary (richer) model.

use crate::domain::{InfoCriteria, ModelComparison};

/// Information criteria from a maximized log-likelihood.
pub fn info_criteria(log_l_max: f64, k: usize, n: usize) -> InfoCriteria {
    let kf = k as f64;
    InfoCriteria {
        k,
        n,
        log_l_max,
        aic: 2.0 * kf - 2.0 * log_l_max,
        bic: kf * (n as f64).ln() - 2.0 * log_l_max,
    }
}

/// Compare a primary model against a nested competitor.
pub fn compare_models(primary: InfoCriteria, competitor: InfoCriteria) -> ModelComparison {
    ModelComparison {
        running_gamma: primary,
        fixed_gamma: competitor,
        delta_aic: competitor.aic - primary.aic,
        delta_bic: competitor.bic - primary.bic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn criteria_follow_textbook_definitions() {
        let ic = info_criteria(-3.0, 2, 2);
        assert_abs_diff_eq!(ic.aic, 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(ic.bic, 2.0 * 2.0_f64.ln() + 6.0, epsilon = 1e-12);
    }

    #[test]
    fn delta_is_positive_when_primary_fits_much_better() {
        let primary = info_criteria(-2.0, 2, 2);
        let nested = info_criteria(-10.0, 1, 2);
        let cmp = compare_models(primary, nested);
        // 2·8 likelihood gain against a penalty of 2 (AIC) or ln 2 (BIC).
        assert_abs_diff_eq!(cmp.delta_aic, 14.0, epsilon = 1e-12);
        assert_abs_diff_eq!(cmp.delta_bic, 16.0 - 2.0_f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn equal_fits_penalize_the_extra_parameter() {
        let cmp = compare_models(info_criteria(-5.0, 2, 2), info_criteria(-5.0, 1, 2));
        assert!(cmp.delta_aic < 0.0);
        assert!(cmp.delta_bic < 0.0);
    }
}
