//! Two-part handling of zero-inflated metrics
//!
//! Many users never convert, so revenue-like metrics carry a spike at zero.
//! The splitter compares the zero proportions of the groups with a 2×2
//! chi-square test and hands the non-zero values on to the main test.

use ab_core::{Error, Result};
use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF};
use tracing::{debug, warn};

/// Message reported when the non-zero part is too small for the main test
pub const NOT_ENOUGH_NONZERO: &str =
    "Not enough non-zero data to run the main test after zero inflation check.";

/// Largest shift Yates' correction applies to an observed count
const YATES_SHIFT: f64 = 0.5;

/// Outcome of the zero-proportion comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZeroTestResult {
    /// Zero count over group size, NaN for an empty group
    pub control_zero_rate: f64,
    pub test_zero_rate: f64,
    pub chi2_statistic: f64,
    pub p_value: f64,
    /// `[[control_zero, control_rest], [test_zero, test_rest]]`
    pub table: [[u64; 2]; 2],
}

/// Zero test plus the values left for the main test
#[derive(Debug, Clone, PartialEq)]
pub struct ZeroSplit {
    pub zero_test: ZeroTestResult,
    /// Non-missing, non-zero control values in row order
    pub control_nonzero: Vec<f64>,
    /// Non-missing, non-zero test values in row order
    pub test_nonzero: Vec<f64>,
}

/// Chi-square statistic and p-value of a 2×2 contingency table with Yates'
/// continuity correction
///
/// Fails if a row or column total is zero, since the expected counts are then
/// undefined.
pub fn chi_square_2x2(table: [[u64; 2]; 2]) -> Result<(f64, f64)> {
    let observed = table.map(|row| row.map(|c| c as f64));
    let rows = [
        observed[0][0] + observed[0][1],
        observed[1][0] + observed[1][1],
    ];
    let cols = [
        observed[0][0] + observed[1][0],
        observed[0][1] + observed[1][1],
    ];
    let total = rows[0] + rows[1];

    if rows.iter().chain(cols.iter()).any(|&m| m == 0.0) {
        return Err(Error::InvalidInput(
            "Contingency table has a zero marginal total".to_string(),
        ));
    }

    let mut statistic = 0.0;
    for (i, row) in observed.iter().enumerate() {
        for (j, &o) in row.iter().enumerate() {
            let e = rows[i] * cols[j] / total;
            let diff = (o - e).abs();
            let corrected = diff - diff.min(YATES_SHIFT);
            statistic += corrected * corrected / e;
        }
    }

    let dist = ChiSquared::new(1.0).map_err(|e| {
        Error::Computation(format!("Failed to create chi-squared distribution: {}", e))
    })?;
    Ok((statistic, dist.sf(statistic)))
}

/// Split both groups into their zero and non-zero parts and compare zero
/// proportions
///
/// Group sizes count every cell, missing ones included; a cell is a zero when
/// it equals 0 exactly. Only strictly positive values reach the non-zero
/// subsets, so negative and missing cells are in neither part. A degenerate
/// table (a zero row or column total) gives NaN for the statistic and p-value.
pub fn split_zero_inflated(control: &[Option<f64>], test: &[Option<f64>]) -> ZeroSplit {
    let zeros = |cells: &[Option<f64>]| cells.iter().filter(|c| **c == Some(0.0)).count() as u64;
    let nonzero = |cells: &[Option<f64>]| -> Vec<f64> {
        cells.iter().flatten().copied().filter(|&x| x > 0.0).collect()
    };
    let rate = |zero: u64, n: usize| {
        if n == 0 {
            f64::NAN
        } else {
            zero as f64 / n as f64
        }
    };

    let (control_zero, test_zero) = (zeros(control), zeros(test));
    let table = [
        [control_zero, control.len() as u64 - control_zero],
        [test_zero, test.len() as u64 - test_zero],
    ];

    let (chi2_statistic, p_value) = match chi_square_2x2(table) {
        Ok(result) => result,
        Err(e) => {
            warn!(?table, "zero-proportion test undefined: {}", e);
            (f64::NAN, f64::NAN)
        }
    };
    debug!(?table, chi2_statistic, p_value, "compared zero proportions");

    ZeroSplit {
        zero_test: ZeroTestResult {
            control_zero_rate: rate(control_zero, control.len()),
            test_zero_rate: rate(test_zero, test.len()),
            chi2_statistic,
            p_value,
            table,
        },
        control_nonzero: nonzero(control),
        test_nonzero: nonzero(test),
    }
}
