//! Session-to-user aggregation
//!
//! Collapses a session-level [`Table`](ab_core::Table) into one row per user
//! (or per user and group) before testing. Each remaining column is reduced
//! with a strategy picked from its type class:
//!
//! | class       | strategies                               | default    |
//! |-------------|------------------------------------------|------------|
//! | numeric     | `sum`, `mean`, `max`, `min`, `count`     | `sum`      |
//! | datetime    | `min`, `max`                             | `min`      |
//! | categorical | `majority`, `unique`, `first`            | `majority` |
//!
//! Per-column overrides, closures and a [`MultiGroupPolicy`] for users seen
//! under more than one group are set on [`AggregationConfig`].
//!
//! # Example
//!
//! ```rust
//! use ab_aggregate::{aggregate_users, AggregationConfig};
//! use ab_core::{Column, Table};
//!
//! let sessions = Table::new(vec![
//!     Column::from_values("fullVisitorId", ["A", "A", "B", "B"]),
//!     Column::from_values("group", ["control", "control", "test", "test"]),
//!     Column::from_values("revenue", [0.0, 0.0, 10.0, 20.0]),
//! ])
//! .unwrap();
//!
//! let config = AggregationConfig::new("fullVisitorId").with_group_column("group");
//! let users = aggregate_users(&sessions, &config).unwrap();
//! assert_eq!(users.n_rows(), 2);
//! assert_eq!(users.value(1, "revenue").unwrap().as_f64(), Some(30.0));
//! ```

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod strategy;

pub use aggregate::aggregate_users;
pub use classify::{classify_columns, parse_datetime_columns, parse_timestamp};
pub use config::AggregationConfig;
pub use strategy::{
    CategoricalStrategy, ColumnStrategy, CustomAggregator, DateStrategy, MultiGroupPolicy,
    NumericStrategy,
};
