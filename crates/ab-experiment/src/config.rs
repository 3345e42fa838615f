//! Configuration of a single A/B test run

use ab_core::{Error, Result};
use ab_inference::{TTestVariance, TestType};
use ab_transform::{TransformKind, TransformParams};
use serde::{Deserialize, Serialize};

/// Knobs of [`AbTest::run_test`](crate::AbTest::run_test)
///
/// Missing fields take their defaults when deserialising:
///
/// ```rust
/// use ab_experiment::TestConfig;
/// use ab_inference::TestType;
///
/// let config: TestConfig =
///     serde_json::from_str(r#"{"test_type": "mannwhitney", "zero_inflation": true}"#).unwrap();
/// assert_eq!(config.test_type, TestType::MannWhitney);
/// assert_eq!(config.alpha, 0.05);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestConfig {
    pub test_type: TestType,
    pub transform: TransformKind,
    /// Compare zero proportions first, then test the non-zero values only
    pub zero_inflation: bool,
    /// Significance level used when interpreting the p-value
    pub alpha: f64,
    pub add_constant: f64,
    pub winsor_percentile: f64,
    pub trim_percentile: f64,
    pub t_test_variance: TTestVariance,
}

impl Default for TestConfig {
    fn default() -> Self {
        let params = TransformParams::default();
        Self {
            test_type: TestType::TTest,
            transform: TransformKind::None,
            zero_inflation: false,
            alpha: 0.05,
            add_constant: params.add_constant,
            winsor_percentile: params.winsor_percentile,
            trim_percentile: params.trim_percentile,
            t_test_variance: TTestVariance::Student,
        }
    }
}

impl TestConfig {
    pub fn new(test_type: TestType) -> Self {
        Self {
            test_type,
            ..Default::default()
        }
    }

    pub fn with_test_type(mut self, test_type: TestType) -> Self {
        self.test_type = test_type;
        self
    }

    pub fn with_transform(mut self, transform: TransformKind) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_zero_inflation(mut self, enabled: bool) -> Self {
        self.zero_inflation = enabled;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_add_constant(mut self, constant: f64) -> Self {
        self.add_constant = constant;
        self
    }

    pub fn with_winsor_percentile(mut self, p: f64) -> Self {
        self.winsor_percentile = p;
        self
    }

    pub fn with_trim_percentile(mut self, p: f64) -> Self {
        self.trim_percentile = p;
        self
    }

    pub fn with_t_test_variance(mut self, variance: TTestVariance) -> Self {
        self.t_test_variance = variance;
        self
    }

    pub fn transform_params(&self) -> TransformParams {
        TransformParams {
            add_constant: self.add_constant,
            winsor_percentile: self.winsor_percentile,
            trim_percentile: self.trim_percentile,
        }
    }

    /// Check parameter ranges
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(Error::InvalidParameter(format!(
                "alpha must be in (0, 1), got {}",
                self.alpha
            )));
        }
        for p in [self.winsor_percentile, self.trim_percentile] {
            if !(0.0..=100.0).contains(&p) {
                return Err(Error::invalid_percentile(p));
            }
        }
        Ok(())
    }
}
