//! A/B testing operations on Polars DataFrames

use crate::convert::{table_from_dataframe, table_to_dataframe};
use crate::Result;
use ab_aggregate::AggregationConfig;
use ab_experiment::{AbTest, GroupAssigner, TestConfig, TestResult};
use polars::prelude::*;
use tracing::debug;

/// Extension trait for A/B testing operations on Polars DataFrames
///
/// Every method copies the frame into a table first; the frame itself is
/// never modified.
pub trait AbFrameExt {
    /// Test one metric between the `"control"` and `"test"` rows of a label
    /// column
    ///
    /// # Arguments
    /// * `label_column` - Column holding the group labels
    /// * `metric` - Column holding the metric to compare
    /// * `config` - Test, transform and zero-inflation settings
    fn ab_test(&self, label_column: &str, metric: &str, config: &TestConfig)
        -> Result<TestResult>;

    /// Append the label column produced by `assigner`
    fn assign_groups<A: GroupAssigner + ?Sized>(&self, assigner: &A) -> Result<DataFrame>;

    /// Collapse session rows to one row per user (or per user and group)
    fn aggregate_users(&self, config: &AggregationConfig) -> Result<DataFrame>;
}

impl AbFrameExt for DataFrame {
    fn ab_test(
        &self,
        label_column: &str,
        metric: &str,
        config: &TestConfig,
    ) -> Result<TestResult> {
        let table = table_from_dataframe(self)?;
        let ab = AbTest::from_label_column(&table, label_column)?;
        debug!(
            control = ab.control().n_rows(),
            test = ab.test().n_rows(),
            "split dataframe"
        );
        Ok(ab.run_test(metric, config)?)
    }

    fn assign_groups<A: GroupAssigner + ?Sized>(&self, assigner: &A) -> Result<DataFrame> {
        let table = table_from_dataframe(self)?;
        table_to_dataframe(&assigner.assign(&table)?)
    }

    fn aggregate_users(&self, config: &AggregationConfig) -> Result<DataFrame> {
        let table = table_from_dataframe(self)?;
        table_to_dataframe(&ab_aggregate::aggregate_users(&table, config)?)
    }
}
