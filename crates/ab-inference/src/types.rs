//! Test kinds and result records

use ab_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Message reported when a group has fewer than two observations
pub const INSUFFICIENT_DATA: &str = "Insufficient data in control/test for chosen test.";

/// Minimum number of observations per group for any test
pub const MIN_GROUP_SIZE: usize = 2;

/// Statistical procedure applied to the two samples
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestType {
    /// Two-sample t-test on the means
    #[default]
    TTest,
    /// Two-sided Mann-Whitney U test
    #[serde(rename = "mannwhitney")]
    MannWhitney,
    /// Beta-Bernoulli posterior means for 0/1 data
    BayesianConversions,
    /// Per-group mean, standard deviation and count
    BayesianMeans,
}

impl TestType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::TTest => "t_test",
            Self::MannWhitney => "mannwhitney",
            Self::BayesianConversions => "bayesian_conversions",
            Self::BayesianMeans => "bayesian_means",
        }
    }

    pub fn all() -> [Self; 4] {
        [
            Self::TTest,
            Self::MannWhitney,
            Self::BayesianConversions,
            Self::BayesianMeans,
        ]
    }

    /// Whether the test produces a p-value
    pub fn is_frequentist(&self) -> bool {
        matches!(self, Self::TTest | Self::MannWhitney)
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for TestType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| Error::UnknownTestType(s.to_string()))
    }
}

/// Variance assumption of the t-test
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TTestVariance {
    /// Pooled variance, `n1 + n2 - 2` degrees of freedom
    #[default]
    Student,
    /// Separate variances with Welch-Satterthwaite degrees of freedom
    Welch,
}

/// Outcome of the main test
///
/// Serialises without a tag, using the field names of the result
/// dictionaries consumed by reporting code. Callers must check
/// [`MainTestResult::error`] before reading the typed fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MainTestResult {
    TTest {
        sample_sizes: (usize, usize),
        test_statistic: f64,
        p_value: f64,
        control_mean: f64,
        test_mean: f64,
    },
    MannWhitney {
        sample_sizes: (usize, usize),
        test_statistic: f64,
        p_value: f64,
        control_median: f64,
        test_median: f64,
    },
    BayesianConversions {
        control_conversions: f64,
        control_total: f64,
        test_conversions: f64,
        test_total: f64,
        control_posterior_mean: f64,
        test_posterior_mean: f64,
        info: String,
    },
    BayesianMeans {
        control_mean: f64,
        control_std: f64,
        control_n: usize,
        test_mean: f64,
        test_std: f64,
        test_n: usize,
        info: String,
    },
    Error {
        error: String,
    },
}

impl MainTestResult {
    pub fn error_message(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    pub fn insufficient_data() -> Self {
        Self::error_message(INSUFFICIENT_DATA)
    }

    /// Error message, if the test could not be run
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error { error } => Some(error),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error().is_some()
    }

    /// p-value of the frequentist tests
    pub fn p_value(&self) -> Option<f64> {
        match self {
            Self::TTest { p_value, .. } | Self::MannWhitney { p_value, .. } => Some(*p_value),
            _ => None,
        }
    }

    /// Test statistic of the frequentist tests
    pub fn statistic(&self) -> Option<f64> {
        match self {
            Self::TTest { test_statistic, .. } | Self::MannWhitney { test_statistic, .. } => {
                Some(*test_statistic)
            }
            _ => None,
        }
    }

    /// `(control, test)` sample sizes, if the result carries them
    pub fn sample_sizes(&self) -> Option<(usize, usize)> {
        match self {
            Self::TTest { sample_sizes, .. } | Self::MannWhitney { sample_sizes, .. } => {
                Some(*sample_sizes)
            }
            Self::BayesianMeans {
                control_n, test_n, ..
            } => Some((*control_n, *test_n)),
            Self::BayesianConversions {
                control_total,
                test_total,
                ..
            } => Some((*control_total as usize, *test_total as usize)),
            Self::Error { .. } => None,
        }
    }
}
