//! Core types for user-level A/B testing
//!
//! This crate provides the foundation shared by the other ab-stats crates:
//!
//! - [`Table`], [`Column`] and [`Value`]: an in-memory observation table with
//!   stable row order, holding session-level or user-level data
//! - [`Error`] and [`Result`]: the unified error type
//! - [`numeric`]: small sample statistics (mean, std, percentiles)
//! - [`profile`]: missing-value counts, descriptive statistics and outliers
//!
//! # Example
//!
//! ```rust
//! use ab_core::{Column, Table, Value};
//!
//! let table = Table::new(vec![
//!     Column::from_values("fullVisitorId", ["A", "A", "B"]),
//!     Column::from_values("transactions", [Some(1.0), None, Some(2.0)]),
//! ])
//! .unwrap();
//!
//! let user_a = table
//!     .filter_eq(&[("fullVisitorId".to_string(), Value::from("A"))])
//!     .unwrap();
//! assert_eq!(user_a.n_rows(), 2);
//! ```

pub mod error;
pub mod numeric;
pub mod profile;
pub mod table;
pub mod value;

pub use error::{Error, Result};
pub use profile::{profile_table, TableProfile};
pub use table::{Column, ColumnType, Table};
pub use value::{Value, ValueKey};

use serde::{Deserialize, Serialize};
use std::fmt;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The two cohorts compared by a hypothesis test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupLabel {
    Control,
    Test,
}

impl GroupLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Control => "control",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for GroupLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<GroupLabel> for Value {
    fn from(label: GroupLabel) -> Self {
        Value::Text(label.as_str().to_string())
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{Column, ColumnType, Error, GroupLabel, Result, Table, Value};
}
