//! Statistical test engine for two-group experiments
//!
//! This crate compares a control and a test sample:
//!
//! - [`run_test`]: t-test, Mann-Whitney U, or the Bayesian point summaries,
//!   returning a [`MainTestResult`] that carries its own error record when the
//!   data is insufficient
//! - [`split_zero_inflated`]: chi-square comparison of zero proportions and
//!   extraction of the non-zero values for a two-part analysis
//!
//! # Example
//!
//! ```rust
//! use ab_inference::{run_test, TestType};
//!
//! let result = run_test(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], TestType::TTest);
//! let p = result.p_value().unwrap();
//! assert!((p - 0.0213).abs() < 1e-4);
//! ```

pub mod bayesian;
pub mod engine;
pub mod mann_whitney;
pub mod ttest;
pub mod types;
pub mod zero_inflation;

pub use engine::{run_named_test, run_test, run_test_with};
pub use mann_whitney::{mann_whitney_u, MannWhitneyOutcome, PValueMethod};
pub use ttest::{t_test, TTestOutcome};
pub use types::{MainTestResult, TTestVariance, TestType, INSUFFICIENT_DATA};
pub use zero_inflation::{
    chi_square_2x2, split_zero_inflated, ZeroSplit, ZeroTestResult, NOT_ENOUGH_NONZERO,
};
