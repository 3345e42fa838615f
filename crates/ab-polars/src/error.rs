//! Error types for ab-polars

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("ab-stats error: {0}")]
    Core(#[from] ab_core::Error),

    #[error("Unsupported dtype {dtype} in column '{column}'")]
    UnsupportedType { column: String, dtype: String },
}

pub type Result<T> = std::result::Result<T, Error>;
