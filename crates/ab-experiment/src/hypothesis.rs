//! Ready-made experiments for the three business hypotheses
//!
//! Each runner assigns groups on a copy of the user table, partitions on the
//! assigner's label column and runs the hypothesis' default test on its
//! default metric. The `*_config` functions expose those defaults so callers
//! can adjust them and use [`run_hypothesis`] directly.

use crate::ab_test::AbTest;
use crate::assign::{CrossSellAssigner, GroupAssigner, PricingAssigner, RecommendationAssigner};
use crate::config::TestConfig;
use crate::result::TestResult;
use ab_core::{Result, Table};
use ab_inference::TestType;
use tracing::instrument;

/// Metric compared by the recommendation and cross-sell hypotheses
pub const REVENUE_METRIC: &str = "totalTransactionRevenue";

/// Metric compared by the pricing hypothesis
pub const TRANSACTIONS_METRIC: &str = "transactions";

/// Personalised recommendations: t-test on revenue, no zero inflation
pub fn recommendation_config() -> TestConfig {
    TestConfig::new(TestType::TTest)
}

/// Dynamic pricing: Mann-Whitney on transactions with zero inflation
pub fn pricing_config() -> TestConfig {
    TestConfig::new(TestType::MannWhitney).with_zero_inflation(true)
}

/// Cross-selling: t-test on revenue with zero inflation
pub fn cross_sell_config() -> TestConfig {
    TestConfig::new(TestType::TTest).with_zero_inflation(true)
}

/// Assign with `assigner`, then test `metric` between its groups
#[instrument(
    skip(table, assigner, config),
    fields(rows = table.n_rows(), label = assigner.label_column())
)]
pub fn run_hypothesis<A: GroupAssigner + ?Sized>(
    table: &Table,
    assigner: &A,
    metric: &str,
    config: &TestConfig,
) -> Result<TestResult> {
    let assigned = assigner.assign(table)?;
    AbTest::from_label_column(&assigned, assigner.label_column())?.run_test(metric, config)
}

/// Random 50/50 split (seed 42) compared on revenue
pub fn run_recommendation_test(table: &Table) -> Result<TestResult> {
    run_hypothesis(
        table,
        &RecommendationAssigner::default(),
        REVENUE_METRIC,
        &recommendation_config(),
    )
}

/// Users at or above `threshold` revenue compared on transactions
pub fn run_pricing_test(table: &Table, threshold: f64) -> Result<TestResult> {
    run_hypothesis(
        table,
        &PricingAssigner::new(threshold),
        TRANSACTIONS_METRIC,
        &pricing_config(),
    )
}

/// Buyers of `indicator_column` compared on revenue
pub fn run_cross_sell_test(table: &Table, indicator_column: &str) -> Result<TestResult> {
    run_hypothesis(
        table,
        &CrossSellAssigner::new(indicator_column),
        REVENUE_METRIC,
        &cross_sell_config(),
    )
}
