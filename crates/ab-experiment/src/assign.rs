//! Group assignment rules
//!
//! Each assigner returns a copy of the user table with a label column holding
//! `"control"` or `"test"`. The input table is left untouched.

use ab_core::{Column, Error, GroupLabel, Result, Table, Value, ValueKey};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Default user id column
pub const DEFAULT_USER_ID: &str = "fullVisitorId";

/// A rule that labels every row of a table as control or test
pub trait GroupAssigner {
    /// Name of the label column this assigner appends
    fn label_column(&self) -> &str;

    /// Return a copy of `table` with the label column appended
    fn assign(&self, table: &Table) -> Result<Table>;
}

fn require(table: &Table, column: &str) -> Result<()> {
    if table.has_column(column) {
        Ok(())
    } else {
        Err(Error::missing_column(column))
    }
}

fn count_labels(labels: &[Value]) -> (usize, usize) {
    let test = labels
        .iter()
        .filter(|v| v.as_str() == Some(GroupLabel::Test.as_str()))
        .count();
    let control = labels
        .iter()
        .filter(|v| v.as_str() == Some(GroupLabel::Control.as_str()))
        .count();
    (control, test)
}

/// Random 50/50 split of users for the recommendation hypothesis
///
/// One uniform draw is taken per unique user id in order of first
/// appearance; a draw below 0.5 puts the user in control. The same seed and
/// user order always produce the same split. Rows without a user id are left
/// unlabelled.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationAssigner {
    user_id_column: String,
    label_column: String,
    seed: u64,
}

impl Default for RecommendationAssigner {
    fn default() -> Self {
        Self {
            user_id_column: DEFAULT_USER_ID.to_string(),
            label_column: "rec_group".to_string(),
            seed: 42,
        }
    }
}

impl RecommendationAssigner {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    pub fn with_user_id_column(mut self, column: impl Into<String>) -> Self {
        self.user_id_column = column.into();
        self
    }

    pub fn with_label_column(mut self, column: impl Into<String>) -> Self {
        self.label_column = column.into();
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl GroupAssigner for RecommendationAssigner {
    fn label_column(&self) -> &str {
        &self.label_column
    }

    #[instrument(skip(self, table), fields(rows = table.n_rows(), seed = self.seed))]
    fn assign(&self, table: &Table) -> Result<Table> {
        let ids = table.column(&self.user_id_column)?;
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut groups: HashMap<ValueKey, GroupLabel> = HashMap::new();

        let labels: Vec<Value> = ids
            .values()
            .iter()
            .map(|id| match id.key() {
                Some(key) => {
                    let label = *groups.entry(key).or_insert_with(|| {
                        if rng.gen::<f64>() < 0.5 {
                            GroupLabel::Control
                        } else {
                            GroupLabel::Test
                        }
                    });
                    Value::from(label)
                }
                None => Value::Null,
            })
            .collect();

        let (control, test) = count_labels(&labels);
        debug!(users = groups.len(), control, test, "assigned recommendation groups");
        table.with_column(Column::new(self.label_column.clone(), labels))
    }
}

/// Threshold rule for the pricing hypothesis: a metric at or above the
/// threshold means test, anything else (including missing) means control
#[derive(Debug, Clone, PartialEq)]
pub struct PricingAssigner {
    metric_column: String,
    threshold: f64,
    label_column: String,
}

impl Default for PricingAssigner {
    fn default() -> Self {
        Self {
            metric_column: "totalTransactionRevenue".to_string(),
            threshold: 200.0,
            label_column: "price_group".to_string(),
        }
    }
}

impl PricingAssigner {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            ..Default::default()
        }
    }

    pub fn with_metric_column(mut self, column: impl Into<String>) -> Self {
        self.metric_column = column.into();
        self
    }

    pub fn with_label_column(mut self, column: impl Into<String>) -> Self {
        self.label_column = column.into();
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl GroupAssigner for PricingAssigner {
    fn label_column(&self) -> &str {
        &self.label_column
    }

    #[instrument(skip(self, table), fields(rows = table.n_rows(), threshold = self.threshold))]
    fn assign(&self, table: &Table) -> Result<Table> {
        require(table, &self.metric_column)?;
        let labels: Vec<Value> = table
            .numeric_values(&self.metric_column)?
            .into_iter()
            .map(|metric| match metric {
                Some(x) if x >= self.threshold => GroupLabel::Test.into(),
                _ => GroupLabel::Control.into(),
            })
            .collect();

        let (control, test) = count_labels(&labels);
        debug!(control, test, "assigned pricing groups");
        table.with_column(Column::new(self.label_column.clone(), labels))
    }
}

/// Indicator rule for the cross-sell hypothesis: users whose indicator
/// equals 1 form the test group
#[derive(Debug, Clone, PartialEq)]
pub struct CrossSellAssigner {
    indicator_column: String,
    label_column: String,
}

impl Default for CrossSellAssigner {
    fn default() -> Self {
        Self {
            indicator_column: "bought_item_x".to_string(),
            label_column: "cross_sell_group".to_string(),
        }
    }
}

impl CrossSellAssigner {
    pub fn new(indicator_column: impl Into<String>) -> Self {
        Self {
            indicator_column: indicator_column.into(),
            ..Default::default()
        }
    }

    pub fn with_label_column(mut self, column: impl Into<String>) -> Self {
        self.label_column = column.into();
        self
    }
}

impl GroupAssigner for CrossSellAssigner {
    fn label_column(&self) -> &str {
        &self.label_column
    }

    #[instrument(skip(self, table), fields(rows = table.n_rows()))]
    fn assign(&self, table: &Table) -> Result<Table> {
        let indicator = table.column(&self.indicator_column)?;
        let one = Value::Number(1.0);
        let labels: Vec<Value> = indicator
            .values()
            .iter()
            .map(|v| {
                if v.matches(&one) {
                    GroupLabel::Test.into()
                } else {
                    GroupLabel::Control.into()
                }
            })
            .collect();

        let (control, test) = count_labels(&labels);
        debug!(control, test, "assigned cross-sell groups");
        table.with_column(Column::new(self.label_column.clone(), labels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(table: &Table, column: &str) -> Vec<String> {
        table
            .column(column)
            .unwrap()
            .values()
            .iter()
            .map(|v| v.to_string())
            .collect()
    }

    #[test]
    fn test_pricing_threshold() {
        let table = Table::new(vec![Column::from_values(
            "totalTransactionRevenue",
            [Some(50.0), Some(250.0), Some(199.0), Some(200.0), None],
        )])
        .unwrap();
        let assigned = PricingAssigner::default().assign(&table).unwrap();
        assert_eq!(
            labels(&assigned, "price_group"),
            vec!["control", "test", "control", "test", "control"]
        );
        assert_eq!(table.n_columns(), 1);
    }

    #[test]
    fn test_cross_sell_indicator() {
        let table = Table::new(vec![Column::new(
            "bought_item_x",
            vec![
                Value::from(1.0),
                Value::from(0.0),
                Value::Null,
                Value::from(true),
                Value::from("1"),
            ],
        )])
        .unwrap();
        let assigned = CrossSellAssigner::default().assign(&table).unwrap();
        assert_eq!(
            labels(&assigned, "cross_sell_group"),
            vec!["test", "control", "control", "test", "control"]
        );
    }

    #[test]
    fn test_recommendation_is_per_user_and_deterministic() {
        let table = Table::new(vec![Column::from_values(
            "fullVisitorId",
            ["u1", "u2", "u1", "u3", "u2", "u4", "u5", "u6"],
        )])
        .unwrap();
        let assigner = RecommendationAssigner::default();
        let first = labels(&assigner.assign(&table).unwrap(), "rec_group");
        let second = labels(&assigner.assign(&table).unwrap(), "rec_group");
        assert_eq!(first, second);
        assert_eq!(first[0], first[2]);
        assert_eq!(first[1], first[4]);
        assert!(first.iter().all(|l| l == "control" || l == "test"));
    }

    #[test]
    fn test_recommendation_seed_changes_split() {
        let ids: Vec<String> = (0..64).map(|i| format!("user{i}")).collect();
        let table = Table::new(vec![Column::from_values("fullVisitorId", ids)]).unwrap();
        let a = labels(&RecommendationAssigner::new(1).assign(&table).unwrap(), "rec_group");
        let b = labels(&RecommendationAssigner::new(2).assign(&table).unwrap(), "rec_group");
        assert_ne!(a, b);
    }

    #[test]
    fn test_missing_columns() {
        let table = Table::new(vec![Column::from_values("other", [1.0])]).unwrap();
        assert!(matches!(
            PricingAssigner::default().assign(&table),
            Err(Error::MissingColumn(c)) if c == "totalTransactionRevenue"
        ));
        assert!(matches!(
            CrossSellAssigner::default().assign(&table),
            Err(Error::MissingColumn(_))
        ));
        assert!(matches!(
            RecommendationAssigner::default().assign(&table),
            Err(Error::MissingColumn(_))
        ));
    }
}
