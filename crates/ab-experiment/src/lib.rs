//! A/B test orchestration
//!
//! Ties together group assignment, per-group transforms, the optional
//! zero-inflation split and the statistical test engine:
//!
//! 1. a [`GroupAssigner`] appends a `"control"` / `"test"` label column
//! 2. [`AbTest`] partitions the table by exact-match filters
//! 3. [`AbTest::run_test`] produces a [`TestResult`] for one metric column
//!
//! The [`hypothesis`] module bundles these steps for the recommendation,
//! pricing and cross-sell experiments.
//!
//! # Example
//!
//! ```rust
//! use ab_core::{Column, Table};
//! use ab_experiment::{AbTest, GroupAssigner, PricingAssigner, TestConfig};
//!
//! let users = Table::new(vec![
//!     Column::from_values("totalTransactionRevenue", [50.0, 250.0, 199.0, 200.0, 10.0, 300.0]),
//! ])
//! .unwrap();
//!
//! let assigner = PricingAssigner::new(200.0);
//! let assigned = assigner.assign(&users).unwrap();
//! let ab = AbTest::from_label_column(&assigned, assigner.label_column()).unwrap();
//! let result = ab
//!     .run_test("totalTransactionRevenue", &TestConfig::default())
//!     .unwrap();
//! assert_eq!(result.main_test.sample_sizes(), Some((3, 3)));
//! println!("{result}");
//! ```

pub mod ab_test;
pub mod assign;
pub mod config;
pub mod hypothesis;
pub mod result;

pub use ab_test::{AbTest, GroupFilter};
pub use assign::{CrossSellAssigner, GroupAssigner, PricingAssigner, RecommendationAssigner};
pub use config::TestConfig;
pub use hypothesis::{run_cross_sell_test, run_pricing_test, run_recommendation_test};
pub use result::TestResult;
