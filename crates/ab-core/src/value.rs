//! Cell values and hashable grouping keys

use chrono::NaiveDateTime;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display format used for timestamps
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single cell of an observation table
///
/// `Number(NaN)` and `Null` are both treated as missing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Value {
    /// Missing value
    #[default]
    Null,
    /// Real number
    Number(f64),
    /// Boolean, numerically 0 or 1
    Bool(bool),
    /// Categorical or free text
    Text(String),
    /// Point in time without time zone
    Timestamp(NaiveDateTime),
}

impl Value {
    /// Whether this cell is missing
    pub fn is_null(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Number(x) => x.is_nan(),
            _ => false,
        }
    }

    /// Numeric view of the cell; booleans map to 0/1
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(x) if !x.is_nan() => Some(*x),
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Text view of the cell
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Timestamp view of the cell
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    /// Short name of the variant, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Number(_) => "number",
            Self::Bool(_) => "bool",
            Self::Text(_) => "text",
            Self::Timestamp(_) => "timestamp",
        }
    }

    /// Hashable, totally ordered key for grouping; `None` for missing cells
    pub fn key(&self) -> Option<ValueKey> {
        match self {
            Self::Null => None,
            Self::Number(x) if x.is_nan() => None,
            Self::Number(x) => Some(ValueKey::Number(OrderedFloat(*x))),
            Self::Bool(b) => Some(ValueKey::Bool(*b)),
            Self::Text(s) => Some(ValueKey::Text(s.clone())),
            Self::Timestamp(ts) => Some(ValueKey::Timestamp(*ts)),
        }
    }

    /// Equality used by row filters and indicator rules
    ///
    /// Numbers and booleans compare numerically (`true == 1`). Missing
    /// cells never match anything, including other missing cells.
    pub fn matches(&self, other: &Value) -> bool {
        if self.is_null() || other.is_null() {
            return false;
        }
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Timestamp(a), Self::Timestamp(b)) => a == b,
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Number(x) => write!(f, "{}", x),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Text(s) => write!(f, "{}", s),
            Self::Timestamp(ts) => write!(f, "{}", ts.format(TIMESTAMP_FORMAT)),
        }
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Number(x)
    }
}

impl From<i64> for Value {
    fn from(x: i64) -> Self {
        Self::Number(x as f64)
    }
}

impl From<i32> for Value {
    fn from(x: i32) -> Self {
        Self::Number(f64::from(x))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(ts: NaiveDateTime) -> Self {
        Self::Timestamp(ts)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Grouping key derived from a non-missing [`Value`]
///
/// The derived ordering sorts booleans first, then numbers, text and
/// timestamps; within a variant the natural order applies.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueKey {
    Bool(bool),
    Number(OrderedFloat<f64>),
    Text(String),
    Timestamp(NaiveDateTime),
}

impl From<ValueKey> for Value {
    fn from(key: ValueKey) -> Self {
        match key {
            ValueKey::Bool(b) => Value::Bool(b),
            ValueKey::Number(x) => Value::Number(x.into_inner()),
            ValueKey::Text(s) => Value::Text(s),
            ValueKey::Timestamp(ts) => Value::Timestamp(ts),
        }
    }
}
