//! Sample transforms for A/B test metrics
//!
//! Revenue-like metrics are heavily skewed; these transforms reduce the
//! influence of the upper tail before a two-sample test is run. Each group is
//! transformed independently.
//!
//! | Name     | Effect                                              |
//! |----------|-----------------------------------------------------|
//! | `none`   | identity                                            |
//! | `log`    | `ln(x + c)`                                         |
//! | `winsor` | clip into percentile bounds, length preserved       |
//! | `trim`   | drop values above a percentile                      |
//! | `boxcox` | Box-Cox with maximum-likelihood λ                   |
//!
//! # Example
//!
//! ```rust
//! use ab_transform::{SampleTransform, Transform, TransformKind, TransformParams};
//!
//! let params = TransformParams::default().with_trim_percentile(80.0);
//! let trim = Transform::from_kind(TransformKind::Trim, &params).unwrap();
//! let kept = trim.apply(&[1.0, 2.0, 3.0, 4.0, 50.0]).unwrap();
//! assert_eq!(kept, vec![1.0, 2.0, 3.0, 4.0]);
//! ```

pub mod boxcox;
pub mod optimize;
pub mod transform;

pub use boxcox::{box_cox, box_cox_llf, BoxCoxFit};
pub use transform::{
    BoxCox, Identity, LogTransform, SampleTransform, Transform, TransformKind, TransformParams,
    Trim, Winsorize,
};
