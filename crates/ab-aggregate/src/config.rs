//! Aggregation configuration builder

use crate::strategy::{
    CategoricalStrategy, ColumnStrategy, DateStrategy, MultiGroupPolicy, NumericStrategy,
};
use ab_core::{ColumnType, Result, Value};
use std::collections::BTreeMap;

/// Settings for [`aggregate_users`](crate::aggregate_users)
///
/// ```rust
/// use ab_aggregate::{AggregationConfig, CategoricalStrategy, MultiGroupPolicy, NumericStrategy};
///
/// let config = AggregationConfig::new("fullVisitorId")
///     .with_group_column("group")
///     .with_multi_group(MultiGroupPolicy::First)
///     .with_numeric_strategy(NumericStrategy::Mean)
///     .with_column_strategy("deviceCategory", CategoricalStrategy::Unique)
///     .exclude("sessionId")
///     .with_datetime_format("date", "%Y%m%d");
/// assert_eq!(config.multi_group(), MultiGroupPolicy::First);
/// ```
#[derive(Debug, Clone)]
pub struct AggregationConfig {
    user_id_column: String,
    group_column: Option<String>,
    multi_group: MultiGroupPolicy,
    numeric_strategy: ColumnStrategy,
    date_strategy: ColumnStrategy,
    categorical_strategy: ColumnStrategy,
    custom_strategies: BTreeMap<String, ColumnStrategy>,
    exclude_columns: Vec<String>,
    datetime_formats: BTreeMap<String, String>,
}

impl AggregationConfig {
    /// Defaults: no group column, `exclude`, `sum` / `min` / `majority`
    pub fn new(user_id_column: impl Into<String>) -> Self {
        Self {
            user_id_column: user_id_column.into(),
            group_column: None,
            multi_group: MultiGroupPolicy::default(),
            numeric_strategy: NumericStrategy::default().into(),
            date_strategy: DateStrategy::default().into(),
            categorical_strategy: CategoricalStrategy::default().into(),
            custom_strategies: BTreeMap::new(),
            exclude_columns: Vec::new(),
            datetime_formats: BTreeMap::new(),
        }
    }

    /// Same as [`new`](Self::new) with the type-level strategies given by name
    pub fn with_named_strategies(
        user_id_column: impl Into<String>,
        numeric: &str,
        date: &str,
        categorical: &str,
    ) -> Result<Self> {
        Ok(Self::new(user_id_column)
            .with_numeric_strategy(numeric.parse::<NumericStrategy>()?)
            .with_date_strategy(date.parse::<DateStrategy>()?)
            .with_categorical_strategy(categorical.parse::<CategoricalStrategy>()?))
    }

    pub fn with_group_column(mut self, column: impl Into<String>) -> Self {
        self.group_column = Some(column.into());
        self
    }

    pub fn with_multi_group(mut self, policy: MultiGroupPolicy) -> Self {
        self.multi_group = policy;
        self
    }

    /// Default for numeric columns; a custom strategy is allowed
    pub fn with_numeric_strategy(mut self, strategy: impl Into<ColumnStrategy>) -> Self {
        self.numeric_strategy = strategy.into();
        self
    }

    pub fn with_date_strategy(mut self, strategy: impl Into<ColumnStrategy>) -> Self {
        self.date_strategy = strategy.into();
        self
    }

    pub fn with_categorical_strategy(mut self, strategy: impl Into<ColumnStrategy>) -> Self {
        self.categorical_strategy = strategy.into();
        self
    }

    /// Override the strategy of one column regardless of its type
    pub fn with_column_strategy(
        mut self,
        column: impl Into<String>,
        strategy: impl Into<ColumnStrategy>,
    ) -> Self {
        self.custom_strategies.insert(column.into(), strategy.into());
        self
    }

    /// Override one column with a closure
    pub fn with_custom_fn<F>(self, column: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        self.with_column_strategy(column, ColumnStrategy::custom(f))
    }

    /// Drop a column before aggregating; unknown names are ignored
    pub fn exclude(mut self, column: impl Into<String>) -> Self {
        self.exclude_columns.push(column.into());
        self
    }

    /// Parse a text column into timestamps with a chrono format string
    pub fn with_datetime_format(
        mut self,
        column: impl Into<String>,
        format: impl Into<String>,
    ) -> Self {
        self.datetime_formats.insert(column.into(), format.into());
        self
    }

    pub fn user_id_column(&self) -> &str {
        &self.user_id_column
    }

    pub fn group_column(&self) -> Option<&str> {
        self.group_column.as_deref()
    }

    pub fn multi_group(&self) -> MultiGroupPolicy {
        self.multi_group
    }

    pub fn exclude_columns(&self) -> &[String] {
        &self.exclude_columns
    }

    pub fn datetime_formats(&self) -> &BTreeMap<String, String> {
        &self.datetime_formats
    }

    /// Strategy for `column` of type `column_type`: override first, then
    /// the type-level default
    pub fn strategy_for(&self, column: &str, column_type: ColumnType) -> &ColumnStrategy {
        self.custom_strategies
            .get(column)
            .unwrap_or(match column_type {
                ColumnType::Numeric => &self.numeric_strategy,
                ColumnType::Datetime => &self.date_strategy,
                ColumnType::Categorical => &self.categorical_strategy,
            })
    }
}
