//! Orchestration of a single A/B comparison

use crate::config::TestConfig;
use crate::result::TestResult;
use ab_core::{GroupLabel, Result, Table, Value};
use ab_inference::{run_test_with, split_zero_inflated, MainTestResult, NOT_ENOUGH_NONZERO};
use ab_transform::{SampleTransform, Transform};
use tracing::{debug, instrument};

/// Exact-match predicates selecting the rows of one group
pub type GroupFilter = Vec<(String, Value)>;

/// Control and test partitions of an observation table
///
/// Both partitions are private copies; the source table can be reused.
#[derive(Debug, Clone, PartialEq)]
pub struct AbTest {
    control: Table,
    test: Table,
}

impl AbTest {
    /// Partition `table` into the rows matching every predicate of
    /// `control_filter` and of `test_filter`
    ///
    /// Fails with `MissingColumn` if a filter names an absent column.
    pub fn new(
        table: &Table,
        control_filter: &[(String, Value)],
        test_filter: &[(String, Value)],
    ) -> Result<Self> {
        let control = table.filter_eq(control_filter)?;
        let test = table.filter_eq(test_filter)?;
        debug!(
            control_rows = control.n_rows(),
            test_rows = test.n_rows(),
            "partitioned observations"
        );
        Ok(Self { control, test })
    }

    /// Partition on a label column holding `"control"` / `"test"`
    pub fn from_label_column(table: &Table, label_column: &str) -> Result<Self> {
        let filter = |label: GroupLabel| vec![(label_column.to_string(), Value::from(label))];
        Self::new(table, &filter(GroupLabel::Control), &filter(GroupLabel::Test))
    }

    pub fn control(&self) -> &Table {
        &self.control
    }

    pub fn test(&self) -> &Table {
        &self.test
    }

    /// Run the configured test on `column`
    ///
    /// Configuration problems (absent or non-numeric column, out-of-range
    /// parameters) are returned as errors. Data shortfalls and transform
    /// failures are recorded in [`TestResult::main_test`].
    #[instrument(skip(self, config), fields(
        test_type = %config.test_type,
        transform = %config.transform,
        zero_inflation = config.zero_inflation,
    ))]
    pub fn run_test(&self, column: &str, config: &TestConfig) -> Result<TestResult> {
        config.validate()?;
        let transform = Transform::from_kind(config.transform, &config.transform_params())?;
        let control_cells = self.control.numeric_values(column)?;
        let test_cells = self.test.numeric_values(column)?;

        let mut result = TestResult {
            column: column.to_string(),
            test_type: config.test_type,
            transform: config.transform,
            zero_inflation: config.zero_inflation,
            alpha: config.alpha,
            zero_test: None,
            main_test: MainTestResult::insufficient_data(),
        };

        let (control, test) = if config.zero_inflation {
            let split = split_zero_inflated(&control_cells, &test_cells);
            result.zero_test = Some(split.zero_test);
            if split.control_nonzero.len() < 2 || split.test_nonzero.len() < 2 {
                debug!(
                    control_nonzero = split.control_nonzero.len(),
                    test_nonzero = split.test_nonzero.len(),
                    "skipping main test"
                );
                result.main_test = MainTestResult::error_message(NOT_ENOUGH_NONZERO);
                return Ok(result);
            }
            (split.control_nonzero, split.test_nonzero)
        } else {
            (
                control_cells.into_iter().flatten().collect::<Vec<_>>(),
                test_cells.into_iter().flatten().collect::<Vec<_>>(),
            )
        };

        result.main_test = match (transform.apply(&control), transform.apply(&test)) {
            (Ok(control), Ok(test)) => {
                debug!(control_n = control.len(), test_n = test.len(), "running main test");
                run_test_with(&control, &test, config.test_type, config.t_test_variance)
            }
            (Err(e), _) | (_, Err(e)) => {
                debug!("transform failed: {}", e);
                MainTestResult::error_message(e.to_string())
            }
        };
        Ok(result)
    }

    /// Run several `(column, config)` pairs against the same partitions
    ///
    /// Results keep the input order. With the `parallel` feature the runs
    /// are spread over the rayon thread pool.
    pub fn run_many(&self, runs: &[(String, TestConfig)]) -> Result<Vec<TestResult>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            runs.par_iter()
                .map(|(column, config)| self.run_test(column, config))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            runs.iter()
                .map(|(column, config)| self.run_test(column, config))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ab_core::{Column, Error};
    use ab_inference::{TestType, INSUFFICIENT_DATA};
    use ab_transform::TransformKind;
    use approx::assert_abs_diff_eq;

    fn sessions() -> Table {
        Table::new(vec![
            Column::from_values(
                "trafficSource",
                ["google", "google", "google", "other", "other", "other", "direct"],
            ),
            Column::from_values(
                "revenue",
                [Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0), Some(6.0), Some(100.0)],
            ),
            Column::from_values("channel", ["a", "b", "c", "d", "e", "f", "g"]),
        ])
        .unwrap()
    }

    fn by_source(table: &Table) -> AbTest {
        AbTest::new(
            table,
            &[("trafficSource".to_string(), Value::from("google"))],
            &[("trafficSource".to_string(), Value::from("other"))],
        )
        .unwrap()
    }

    #[test]
    fn test_t_test_end_to_end() {
        let table = sessions();
        let ab = by_source(&table);
        assert_eq!(ab.control().n_rows(), 3);
        assert_eq!(ab.test().n_rows(), 3);

        let result = ab.run_test("revenue", &TestConfig::default()).unwrap();
        assert!(result.zero_test.is_none());
        assert_abs_diff_eq!(result.p_value().unwrap(), 0.0213, epsilon = 1e-4);
        assert!(result.is_significant());
        assert_eq!(table, sessions());
    }

    #[test]
    fn test_configuration_errors() {
        let ab = by_source(&sessions());
        assert!(matches!(
            ab.run_test("missing", &TestConfig::default()),
            Err(Error::MissingColumn(_))
        ));
        assert!(matches!(
            ab.run_test("channel", &TestConfig::default()),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(AbTest::new(
            &sessions(),
            &[("nope".to_string(), Value::from("x"))],
            &[]
        )
        .is_err());
    }

    #[test]
    fn test_single_control_row_is_in_band() {
        let table = sessions();
        let ab = AbTest::new(
            &table,
            &[("trafficSource".to_string(), Value::from("direct"))],
            &[("trafficSource".to_string(), Value::from("other"))],
        )
        .unwrap();
        let result = ab.run_test("revenue", &TestConfig::default()).unwrap();
        assert_eq!(result.error(), Some(INSUFFICIENT_DATA));
        assert!(!result.is_significant());
    }

    #[test]
    fn test_transform_failure_is_in_band() {
        let table = Table::new(vec![
            Column::from_values("g", ["c", "c", "t", "t"]),
            Column::from_values("x", [2.0, 2.0, 1.0, 3.0]),
        ])
        .unwrap();
        let ab = AbTest::new(
            &table,
            &[("g".to_string(), Value::from("c"))],
            &[("g".to_string(), Value::from("t"))],
        )
        .unwrap();
        let config = TestConfig::default().with_transform(TransformKind::BoxCox);
        let result = ab.run_test("x", &config).unwrap();
        assert!(result.error().unwrap().contains("constant"));
    }

    #[test]
    fn test_zero_inflation_shortfall() {
        let table = Table::new(vec![
            Column::from_values("g", ["c", "c", "c", "t", "t", "t"]),
            Column::from_values("x", [0.0, 0.0, 5.0, 0.0, 2.0, 3.0]),
        ])
        .unwrap();
        let ab = AbTest::from_label_column(
            &table.with_column(Column::from_values(
                "group",
                ["control", "control", "control", "test", "test", "test"],
            ))
            .unwrap(),
            "group",
        )
        .unwrap();
        let config = TestConfig::new(TestType::MannWhitney).with_zero_inflation(true);
        let result = ab.run_test("x", &config).unwrap();
        let zero = result.zero_test.as_ref().unwrap();
        assert_abs_diff_eq!(zero.control_zero_rate, 2.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(zero.test_zero_rate, 1.0 / 3.0, epsilon = 1e-12);
        assert_eq!(result.error(), Some(NOT_ENOUGH_NONZERO));
    }

    #[test]
    fn test_run_many_keeps_order() {
        let ab = by_source(&sessions());
        let runs = vec![
            ("revenue".to_string(), TestConfig::new(TestType::MannWhitney)),
            ("revenue".to_string(), TestConfig::new(TestType::BayesianMeans)),
            ("revenue".to_string(), TestConfig::default()),
        ];
        let results = ab.run_many(&runs).unwrap();
        let kinds: Vec<TestType> = results.iter().map(|r| r.test_type).collect();
        assert_eq!(
            kinds,
            vec![TestType::MannWhitney, TestType::BayesianMeans, TestType::TTest]
        );
        assert!(ab
            .run_many(&[("missing".to_string(), TestConfig::default())])
            .is_err());
    }
}
