//! Box-Cox power transform with a maximum-likelihood power parameter

use crate::optimize::minimize_scalar;
use ab_core::numeric::{mean, population_variance};
use ab_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Offset added on top of `|min|` when shifting non-positive data
pub const SHIFT_EPSILON: f64 = 1e-9;

/// Initial points for the downhill search over λ
const LAMBDA_BRACKET: (f64, f64) = (-2.0, 2.0);

/// Output of [`box_cox`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxCoxFit {
    /// Transformed values, in input order
    pub values: Vec<f64>,
    /// Maximum-likelihood power parameter
    pub lambda: f64,
    /// Constant added to every value before transforming (0 when the data was
    /// already strictly positive)
    pub shift: f64,
}

/// Box-Cox transform of strictly positive data for a fixed λ
///
/// `ln(x)` when λ is zero, `(x^λ - 1) / λ` otherwise.
pub fn box_cox_with_lambda(data: &[f64], lambda: f64) -> Vec<f64> {
    if lambda == 0.0 {
        data.iter().map(|x| x.ln()).collect()
    } else {
        data.iter()
            .map(|x| (lambda * x.ln()).exp_m1() / lambda)
            .collect()
    }
}

/// Box-Cox log-likelihood of strictly positive `data` at `lambda`
///
/// `(λ - 1) Σ ln x - n/2 ln σ²(y_λ)` with σ² the population variance of the
/// transformed data.
pub fn box_cox_llf(data: &[f64], lambda: f64) -> f64 {
    let n = data.len() as f64;
    let log_sum: f64 = data.iter().map(|x| x.ln()).sum();
    let transformed = box_cox_with_lambda(data, lambda);
    (lambda - 1.0) * log_sum - n / 2.0 * population_variance(&transformed).ln()
}

/// Shift applied to make `data` strictly positive
pub fn positive_shift(data: &[f64]) -> f64 {
    let min = data.iter().copied().fold(f64::INFINITY, f64::min);
    if min <= 0.0 {
        min.abs() + SHIFT_EPSILON
    } else {
        0.0
    }
}

/// Fit λ by maximum likelihood and transform the data
///
/// Data with a non-positive minimum is first shifted by `|min| + 1e-9`.
/// An empty sample yields an empty fit with λ = 1.
///
/// # Errors
///
/// `InvalidInput` when fewer than 2 values are given, when all values are
/// identical, or when the sample contains NaN or infinite values.
pub fn box_cox(data: &[f64]) -> Result<BoxCoxFit> {
    if data.is_empty() {
        return Ok(BoxCoxFit {
            values: Vec::new(),
            lambda: 1.0,
            shift: 0.0,
        });
    }
    if data.len() < 2 {
        return Err(Error::InvalidInput(format!(
            "Box-Cox needs at least 2 values, got {}",
            data.len()
        )));
    }
    if data.iter().any(|x| !x.is_finite()) {
        return Err(Error::InvalidInput(
            "Box-Cox input contains NaN or infinite values".to_string(),
        ));
    }
    let first = data[0];
    if data.iter().all(|&x| x == first) {
        return Err(Error::InvalidInput(
            "Box-Cox input must not be constant".to_string(),
        ));
    }

    let shift = positive_shift(data);
    let shifted: Vec<f64> = if shift > 0.0 {
        data.iter().map(|x| x + shift).collect()
    } else {
        data.to_vec()
    };

    let lambda = minimize_scalar(
        |lambda| -box_cox_llf(&shifted, lambda),
        LAMBDA_BRACKET.0,
        LAMBDA_BRACKET.1,
    )?;
    debug!(
        n = shifted.len(),
        shift,
        lambda,
        mean = mean(&shifted),
        "fitted Box-Cox lambda"
    );

    Ok(BoxCoxFit {
        values: box_cox_with_lambda(&shifted, lambda),
        lambda,
        shift,
    })
}
