//! Polars integration for user-level A/B testing
//!
//! This crate moves data between Polars DataFrames and the ab-stats
//! [`Table`](ab_core::Table) model, and exposes assignment, aggregation and
//! testing through a single extension trait.
//!
//! # Example
//!
//! ```rust
//! use ab_experiment::{PricingAssigner, TestConfig};
//! use ab_polars::AbFrameExt;
//! use polars::prelude::*;
//!
//! let df = df!["totalTransactionRevenue" => [50.0, 250.0, 199.0, 200.0, 10.0, 300.0]].unwrap();
//!
//! let assigned = df.assign_groups(&PricingAssigner::new(200.0)).unwrap();
//! let result = assigned
//!     .ab_test("price_group", "totalTransactionRevenue", &TestConfig::default())
//!     .unwrap();
//! assert_eq!(result.main_test.sample_sizes(), Some((3, 3)));
//! ```

mod convert;
mod error;
mod traits;

pub use convert::{table_from_dataframe, table_to_dataframe};
pub use error::{Error, Result};
pub use traits::AbFrameExt;
