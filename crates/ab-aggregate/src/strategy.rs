//! Aggregation strategies and the reductions behind them

use ab_core::{Error, Result, Value, ValueKey};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// User-supplied reduction over the cells of one user (or user and group)
pub type CustomAggregator = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

macro_rules! named_strategy {
    ($kind:literal, $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }

            pub fn all() -> &'static [Self] {
                &[$(Self::$variant),+]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.name())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::all()
                    .iter()
                    .copied()
                    .find(|v| v.name() == s)
                    .ok_or_else(|| Error::UnknownStrategy {
                        kind: $kind,
                        name: s.to_string(),
                    })
            }
        }
    };
}

/// Reduction for numeric columns; missing cells are skipped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericStrategy {
    /// Sum, 0 when every cell is missing
    #[default]
    Sum,
    Mean,
    Max,
    Min,
    /// Number of non-missing cells
    Count,
}

named_strategy!("numeric", NumericStrategy {
    Sum => "sum",
    Mean => "mean",
    Max => "max",
    Min => "min",
    Count => "count",
});

/// Reduction for datetime columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateStrategy {
    /// Earliest timestamp
    #[default]
    Min,
    /// Latest timestamp
    Max,
}

named_strategy!("date", DateStrategy {
    Min => "min",
    Max => "max",
});

/// Reduction for categorical columns; results are always text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalStrategy {
    /// Most frequent value, ties going to the one seen first
    #[default]
    Majority,
    /// Distinct values in ascending order joined by `|`
    Unique,
    /// First non-missing value in row order
    First,
}

named_strategy!("categorical", CategoricalStrategy {
    Majority => "majority",
    Unique => "unique",
    First => "first",
});

/// How users appearing under more than one group are handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiGroupPolicy {
    /// Drop every row of such users
    #[default]
    Exclude,
    /// Keep only the rows matching the user's first group in row order
    First,
    /// Keep one output row per (user, group) pair
    All,
}

named_strategy!("multi-group", MultiGroupPolicy {
    Exclude => "exclude",
    First => "first",
    All => "all",
});

impl NumericStrategy {
    pub fn aggregate(&self, cells: &[Value]) -> Value {
        let values = cells.iter().filter_map(Value::as_f64);
        match self {
            Self::Sum => Value::Number(values.sum()),
            Self::Count => Value::Number(values.count() as f64),
            Self::Mean => {
                let (sum, n) = values.fold((0.0, 0usize), |(s, n), x| (s + x, n + 1));
                if n == 0 {
                    Value::Null
                } else {
                    Value::Number(sum / n as f64)
                }
            }
            Self::Max => values.reduce(f64::max).map_or(Value::Null, Value::Number),
            Self::Min => values.reduce(f64::min).map_or(Value::Null, Value::Number),
        }
    }
}

impl DateStrategy {
    /// Works on any comparable cells; timestamps in practice
    pub fn aggregate(&self, cells: &[Value]) -> Value {
        let keys = cells.iter().filter_map(Value::key);
        let picked = match self {
            Self::Min => keys.min(),
            Self::Max => keys.max(),
        };
        picked.map_or(Value::Null, Value::from)
    }
}

impl CategoricalStrategy {
    pub fn aggregate(&self, cells: &[Value]) -> Value {
        let present = cells.iter().filter(|v| !v.is_null());
        let text = match self {
            Self::First => present.map(|v| v.to_string()).next().unwrap_or_default(),
            Self::Unique => {
                let mut keys: Vec<ValueKey> = present.filter_map(Value::key).collect();
                keys.sort();
                keys.dedup();
                keys.into_iter()
                    .map(|k| Value::from(k).to_string())
                    .collect::<Vec<_>>()
                    .join("|")
            }
            Self::Majority => {
                // (count, first position) per distinct value; 1 and "1" are distinct
                let mut counts: HashMap<ValueKey, (usize, usize)> = HashMap::new();
                for (pos, key) in present.filter_map(Value::key).enumerate() {
                    counts.entry(key).or_insert((0, pos)).0 += 1;
                }
                counts
                    .into_iter()
                    .max_by(|(_, (ca, pa)), (_, (cb, pb))| ca.cmp(cb).then(pb.cmp(pa)))
                    .map(|(key, _)| Value::from(key).to_string())
                    .unwrap_or_default()
            }
        };
        Value::Text(text)
    }
}

/// Aggregator chosen for one column
#[derive(Clone)]
pub enum ColumnStrategy {
    Numeric(NumericStrategy),
    Date(DateStrategy),
    Categorical(CategoricalStrategy),
    Custom(CustomAggregator),
}

impl ColumnStrategy {
    /// Wrap a closure as a custom strategy
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Reduce the cells of one group to a single value
    pub fn aggregate(&self, cells: &[Value]) -> Value {
        match self {
            Self::Numeric(s) => s.aggregate(cells),
            Self::Date(s) => s.aggregate(cells),
            Self::Categorical(s) => s.aggregate(cells),
            Self::Custom(f) => f(cells),
        }
    }
}

impl fmt::Debug for ColumnStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(s) => write!(f, "Numeric({s})"),
            Self::Date(s) => write!(f, "Date({s})"),
            Self::Categorical(s) => write!(f, "Categorical({s})"),
            Self::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl From<NumericStrategy> for ColumnStrategy {
    fn from(s: NumericStrategy) -> Self {
        Self::Numeric(s)
    }
}

impl From<DateStrategy> for ColumnStrategy {
    fn from(s: DateStrategy) -> Self {
        Self::Date(s)
    }
}

impl From<CategoricalStrategy> for ColumnStrategy {
    fn from(s: CategoricalStrategy) -> Self {
        Self::Categorical(s)
    }
}
