//! Dispatch from a test kind to the test implementation

use crate::bayesian::{bayesian_conversions, bayesian_means};
use crate::mann_whitney::mann_whitney_u;
use crate::ttest::t_test;
use crate::types::{MainTestResult, TTestVariance, TestType, MIN_GROUP_SIZE};
use ab_core::numeric::{mean, median};
use tracing::debug;

/// Run `kind` on two already-cleaned samples with the default t-test variance
///
/// Never fails: data shortfalls and numerical failures come back as
/// [`MainTestResult::Error`].
pub fn run_test(control: &[f64], test: &[f64], kind: TestType) -> MainTestResult {
    run_test_with(control, test, kind, TTestVariance::default())
}

fn without_nan(sample: &[f64]) -> Vec<f64> {
    sample.iter().copied().filter(|x| !x.is_nan()).collect()
}

/// Run `kind` on two already-cleaned samples
///
/// The t-test omits NaN values before checking group sizes, so the reported
/// sample sizes and means cover the values actually tested.
pub fn run_test_with(
    control: &[f64],
    test: &[f64],
    kind: TestType,
    variance: TTestVariance,
) -> MainTestResult {
    let omitted;
    let (control, test) = if kind == TestType::TTest {
        omitted = (without_nan(control), without_nan(test));
        (omitted.0.as_slice(), omitted.1.as_slice())
    } else {
        (control, test)
    };

    if control.len() < MIN_GROUP_SIZE || test.len() < MIN_GROUP_SIZE {
        debug!(
            control_n = control.len(),
            test_n = test.len(),
            "skipping {} on undersized groups",
            kind
        );
        return MainTestResult::insufficient_data();
    }
    let sample_sizes = (control.len(), test.len());

    let outcome = match kind {
        TestType::TTest => t_test(control, test, variance).map(|t| MainTestResult::TTest {
            sample_sizes,
            test_statistic: t.statistic,
            p_value: t.p_value,
            control_mean: mean(control),
            test_mean: mean(test),
        }),
        TestType::MannWhitney => {
            mann_whitney_u(control, test).map(|u| MainTestResult::MannWhitney {
                sample_sizes,
                test_statistic: u.statistic,
                p_value: u.p_value,
                control_median: median(control),
                test_median: median(test),
            })
        }
        TestType::BayesianConversions => Ok(bayesian_conversions(control, test)),
        TestType::BayesianMeans => Ok(bayesian_means(control, test)),
    };

    outcome.unwrap_or_else(|e| MainTestResult::error_message(e.to_string()))
}

/// Run the test named `name`
///
/// An unknown name yields an error record naming it rather than failing.
pub fn run_named_test(control: &[f64], test: &[f64], name: &str) -> MainTestResult {
    match name.parse::<TestType>() {
        Ok(kind) => run_test(control, test, kind),
        Err(e) => MainTestResult::error_message(e.to_string()),
    }
}
