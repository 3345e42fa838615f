//! Point summaries for the Bayesian test kinds
//!
//! Neither function samples a posterior or estimates `P(test > control)`; they
//! report the quantities a fuller analysis would start from.

use crate::types::MainTestResult;
use ab_core::numeric::{mean, std_dev};

pub const CONVERSIONS_INFO: &str = "For a complete Bayesian approach, consider posterior sampling.";
pub const MEANS_INFO: &str = "In-depth Bayesian means testing requires priors & sampling.";

/// Parameters of the uniform Beta prior
const PRIOR_ALPHA: f64 = 1.0;
const PRIOR_BETA: f64 = 1.0;

/// Posterior mean of a Beta(1, 1)-Bernoulli model after `successes` out of
/// `total` trials
///
/// ```rust
/// use ab_inference::bayesian::beta_posterior_mean;
///
/// assert_eq!(beta_posterior_mean(3.0, 8.0), 0.4);
/// ```
pub fn beta_posterior_mean(successes: f64, total: f64) -> f64 {
    let alpha = PRIOR_ALPHA + successes;
    let beta = PRIOR_BETA + (total - successes);
    alpha / (alpha + beta)
}

/// Conversion counts and posterior means for 0/1 samples
///
/// Values are summed as-is, so non-binary data produces meaningless rates.
pub fn bayesian_conversions(control: &[f64], test: &[f64]) -> MainTestResult {
    let control_conversions: f64 = control.iter().sum();
    let test_conversions: f64 = test.iter().sum();
    let control_total = control.len() as f64;
    let test_total = test.len() as f64;

    MainTestResult::BayesianConversions {
        control_conversions,
        control_total,
        test_conversions,
        test_total,
        control_posterior_mean: beta_posterior_mean(control_conversions, control_total),
        test_posterior_mean: beta_posterior_mean(test_conversions, test_total),
        info: CONVERSIONS_INFO.to_string(),
    }
}

/// Mean, sample standard deviation and size of each group
pub fn bayesian_means(control: &[f64], test: &[f64]) -> MainTestResult {
    MainTestResult::BayesianMeans {
        control_mean: mean(control),
        control_std: std_dev(control),
        control_n: control.len(),
        test_mean: mean(test),
        test_std: std_dev(test),
        test_n: test.len(),
        info: MEANS_INFO.to_string(),
    }
}
