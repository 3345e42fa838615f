//! User-level A/B testing toolkit
//!
//! `ab-stats` re-exports the workspace crates behind one dependency:
//!
//! - [`model`]: observation tables, values, errors and profiling
//! - [`transform`]: log, winsorize, trim and Box-Cox transforms
//! - [`inference`]: t-test, Mann-Whitney U, Bayesian summaries and the
//!   zero-inflation split
//! - [`experiment`]: group assignment, the [`AbTest`](experiment::AbTest)
//!   orchestrator and the per-hypothesis runners
//! - [`aggregate`]: session-to-user aggregation
//! - `polars` (feature `polars`): the DataFrame extension trait
//!
//! # Example
//!
//! ```rust
//! use ab_stats::prelude::*;
//!
//! let sessions = Table::new(vec![
//!     Column::from_values("fullVisitorId", ["a", "a", "b", "c", "d", "e", "f"]),
//!     Column::from_values("transactions", [1.0, 2.0, 0.0, 4.0, 1.0, 3.0, 0.0]),
//!     Column::from_values("totalTransactionRevenue", [10.0, 20.0, 0.0, 99.0, 5.0, 250.0, 0.0]),
//! ])
//! .unwrap();
//!
//! let users = aggregate_users(&sessions, &AggregationConfig::new("fullVisitorId")).unwrap();
//! assert_eq!(users.n_rows(), 6);
//!
//! let result = run_pricing_test(&users, 20.0).unwrap();
//! println!("{result}");
//! ```

pub use ab_aggregate as aggregate;
pub use ab_core as model;
pub use ab_experiment as experiment;
pub use ab_inference as inference;
#[cfg(feature = "polars")]
pub use ab_polars as polars;
pub use ab_transform as transform;

pub use ab_core::{Error, Result};

/// Commonly used types and entry points
pub mod prelude {
    pub use ab_aggregate::{
        aggregate_users, AggregationConfig, CategoricalStrategy, DateStrategy, MultiGroupPolicy,
        NumericStrategy,
    };
    pub use ab_core::{Column, ColumnType, Error, GroupLabel, Result, Table, Value};
    pub use ab_experiment::{
        run_cross_sell_test, run_pricing_test, run_recommendation_test, AbTest,
        CrossSellAssigner, GroupAssigner, PricingAssigner, RecommendationAssigner, TestConfig,
        TestResult,
    };
    pub use ab_inference::{MainTestResult, TTestVariance, TestType};
    pub use ab_transform::{TransformKind, TransformParams};

    #[cfg(feature = "polars")]
    pub use ab_polars::AbFrameExt;
}
