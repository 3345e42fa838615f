//! Error types for user-level A/B testing
//!
//! Provides a unified error type for all ab-stats crates. Errors returned
//! through `Result` are configuration failures that the caller must fix;
//! recoverable data shortfalls are reported in-band by the result records.

use thiserror::Error;

/// Core error type for A/B testing operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Insufficient data for the requested operation
    #[error("Insufficient data: expected at least {expected} samples, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// A column required by the operation is absent from the table
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// A column holds values of the wrong kind
    #[error("Type mismatch in column '{column}': expected {expected}, got {got}")]
    TypeMismatch {
        column: String,
        expected: String,
        got: String,
    },

    /// Test type name with no matching test
    #[error("Unsupported test_type: {0}")]
    UnknownTestType(String),

    /// Transform name with no matching transform
    #[error("Unsupported transform: {0}")]
    UnknownTransform(String),

    /// Aggregation strategy or policy name with no matching variant
    #[error("Unknown {kind} strategy: {name}")]
    UnknownStrategy { kind: &'static str, name: String },

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for a column that is not in the table
    pub fn missing_column(name: &str) -> Self {
        Self::MissingColumn(name.to_string())
    }

    /// Create an error for a sample below the minimum size
    pub fn insufficient(expected: usize, actual: usize) -> Self {
        Self::InsufficientData { expected, actual }
    }

    /// Create an error for an invalid percentile
    pub fn invalid_percentile(p: f64) -> Self {
        Self::InvalidParameter(format!("Percentile {p} must be in [0, 100]"))
    }

    /// Create an error for size mismatch
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::InvalidInput(format!(
            "Size mismatch in {context}: expected {expected}, got {actual}"
        ))
    }

    /// Create an error for NaN/Inf values
    pub fn non_finite(context: &str) -> Self {
        Self::Computation(format!("{context} contains NaN or infinite values"))
    }

    /// Whether the error came from configuration rather than from the data
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidParameter(_)
                | Self::MissingColumn(_)
                | Self::TypeMismatch { .. }
                | Self::UnknownTestType(_)
                | Self::UnknownTransform(_)
                | Self::UnknownStrategy { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidParameter("alpha must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid parameter: alpha must be positive");

        let err = Error::InsufficientData { expected: 2, actual: 1 };
        assert_eq!(
            err.to_string(),
            "Insufficient data: expected at least 2 samples, got 1"
        );

        let err = Error::missing_column("price_group");
        assert_eq!(err.to_string(), "Missing column: price_group");

        let err = Error::UnknownTestType("anova".to_string());
        assert_eq!(err.to_string(), "Unsupported test_type: anova");

        let err = Error::UnknownStrategy {
            kind: "numeric",
            name: "median".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown numeric strategy: median");

        let err = Error::TypeMismatch {
            column: "country".to_string(),
            expected: "numeric".to_string(),
            got: "text".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Type mismatch in column 'country': expected numeric, got text"
        );
    }

    #[test]
    fn test_error_helper_functions() {
        let err = Error::invalid_percentile(120.0);
        assert_eq!(
            err.to_string(),
            "Invalid parameter: Percentile 120 must be in [0, 100]"
        );

        let err = Error::size_mismatch(4, 3, "column 'transactions'");
        assert_eq!(
            err.to_string(),
            "Invalid input: Size mismatch in column 'transactions': expected 4, got 3"
        );

        let err = Error::non_finite("control sample");
        assert_eq!(
            err.to_string(),
            "Computation error: control sample contains NaN or infinite values"
        );
    }

    #[test]
    fn test_configuration_classification() {
        assert!(Error::missing_column("x").is_configuration());
        assert!(Error::UnknownTransform("sqrt".to_string()).is_configuration());
        assert!(!Error::insufficient(2, 0).is_configuration());
        assert!(!Error::Computation("overflow".to_string()).is_configuration());
    }

    #[test]
    fn test_error_from_anyhow() {
        let err: Error = anyhow::anyhow!("custom error message").into();
        match err {
            Error::Other(_) => assert!(err.to_string().contains("custom error message")),
            _ => panic!("Wrong error type"),
        }
    }
}
