//! Two-sample t-test

use crate::types::{TTestVariance, MIN_GROUP_SIZE};
use ab_core::numeric::{mean, variance};
use ab_core::{Error, Result};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Statistic and two-sided p-value of a t-test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TTestOutcome {
    /// `(mean(control) - mean(test)) / se`
    pub statistic: f64,
    pub p_value: f64,
    pub degrees_of_freedom: f64,
}

/// Two-sided two-sample t-test of `control` against `test`
///
/// NaN values are omitted from both samples. A zero standard error yields
/// an infinite statistic with p = 0 when the means differ, and NaN for both
/// when they are equal.
pub fn t_test(
    control: &[f64],
    test: &[f64],
    variance_kind: TTestVariance,
) -> Result<TTestOutcome> {
    let control: Vec<f64> = control.iter().copied().filter(|x| !x.is_nan()).collect();
    let test: Vec<f64> = test.iter().copied().filter(|x| !x.is_nan()).collect();
    let (control, test) = (control.as_slice(), test.as_slice());
    let (n1, n2) = (control.len(), test.len());
    if n1 < MIN_GROUP_SIZE || n2 < MIN_GROUP_SIZE {
        return Err(Error::insufficient(MIN_GROUP_SIZE, n1.min(n2)));
    }
    let (n1f, n2f) = (n1 as f64, n2 as f64);
    let (m1, m2) = (mean(control), mean(test));
    let (v1, v2) = (variance(control), variance(test));

    let (se, df) = match variance_kind {
        TTestVariance::Student => {
            let df = n1f + n2f - 2.0;
            let pooled = ((n1f - 1.0) * v1 + (n2f - 1.0) * v2) / df;
            ((pooled * (1.0 / n1f + 1.0 / n2f)).sqrt(), df)
        }
        TTestVariance::Welch => {
            let a = v1 / n1f;
            let b = v2 / n2f;
            let df = (a + b).powi(2) / (a * a / (n1f - 1.0) + b * b / (n2f - 1.0));
            ((a + b).sqrt(), df)
        }
    };

    let statistic = (m1 - m2) / se;
    let p_value = if statistic.is_nan() {
        f64::NAN
    } else if statistic.is_infinite() {
        0.0
    } else {
        let dist = StudentsT::new(0.0, 1.0, df).map_err(|e| {
            Error::Computation(format!("Failed to create t-distribution: {}", e))
        })?;
        (2.0 * dist.sf(statistic.abs())).min(1.0)
    };

    Ok(TTestOutcome {
        statistic,
        p_value,
        degrees_of_freedom: df,
    })
}
