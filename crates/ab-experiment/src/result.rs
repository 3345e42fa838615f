//! Result record of one A/B test run and its text summary

use ab_inference::{MainTestResult, TestType, ZeroTestResult};
use ab_transform::TransformKind;
use serde::Serialize;
use std::fmt;

/// Everything produced by [`AbTest::run_test`](crate::AbTest::run_test)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    pub column: String,
    pub test_type: TestType,
    pub transform: TransformKind,
    pub zero_inflation: bool,
    pub alpha: f64,
    /// Present when zero inflation handling was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zero_test: Option<ZeroTestResult>,
    pub main_test: MainTestResult,
}

impl TestResult {
    /// p-value of the main test, `None` for error and Bayesian results
    pub fn p_value(&self) -> Option<f64> {
        self.main_test.p_value()
    }

    /// Whether the main test rejects at `alpha`
    ///
    /// Always false when there is no p-value or it is NaN.
    pub fn is_significant(&self) -> bool {
        self.p_value().is_some_and(|p| p < self.alpha)
    }

    /// Error message of the main test, if it could not be run
    pub fn error(&self) -> Option<&str> {
        self.main_test.error()
    }
}

fn percent(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}

fn verdict(significant: bool) -> &'static str {
    if significant {
        "Statistically significant difference."
    } else {
        "No statistically significant difference detected."
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "A/B Test on '{}' using '{}' test.",
            self.column, self.test_type
        )?;
        write!(
            f,
            "Applied transform='{}', zero_inflation={}. (alpha={})",
            self.transform, self.zero_inflation, self.alpha
        )?;

        if let Some(zero) = &self.zero_test {
            write!(
                f,
                "\nZero-proportion test: control_zero_rate={}, test_zero_rate={}, p-value={:.3}",
                percent(zero.control_zero_rate),
                percent(zero.test_zero_rate),
                zero.p_value
            )?;
        }

        match &self.main_test {
            MainTestResult::Error { error } => write!(f, "\nMain Test Error: {}", error),
            MainTestResult::TTest {
                p_value,
                control_mean,
                test_mean,
                ..
            } => write!(
                f,
                "\nControl Mean={:.2}, Test Mean={:.2}, p-value={:.4}\n{}",
                control_mean,
                test_mean,
                p_value,
                verdict(self.is_significant())
            ),
            MainTestResult::MannWhitney {
                p_value,
                control_median,
                test_median,
                ..
            } => write!(
                f,
                "\nControl Median={:.2}, Test Median={:.2}, p-value={:.4}\n{}",
                control_median,
                test_median,
                p_value,
                verdict(self.is_significant())
            ),
            MainTestResult::BayesianConversions {
                control_posterior_mean,
                test_posterior_mean,
                ..
            } => write!(
                f,
                "\nBayesian Beta-Bernoulli: control_mean={:.3}, test_mean={:.3}\n\
                 For deeper inference, consider posterior sampling (not shown).",
                control_posterior_mean, test_posterior_mean
            ),
            MainTestResult::BayesianMeans {
                control_mean,
                test_mean,
                info,
                ..
            } => write!(
                f,
                "\nBayesian normal approach (basic): control_mean={:.2}, test_mean={:.2}\n{}",
                control_mean, test_mean, info
            ),
        }
    }
}
