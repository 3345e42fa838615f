//! Two-sided Mann-Whitney U test

use crate::types::MIN_GROUP_SIZE;
use ab_core::{Error, Result};
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::debug;

/// Largest sample size for which the exact null distribution is used
pub const EXACT_MAX_SIZE: usize = 8;

/// How the p-value was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PValueMethod {
    Exact,
    Asymptotic,
}

/// Statistic and two-sided p-value of a Mann-Whitney test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MannWhitneyOutcome {
    /// U statistic of the control sample
    pub statistic: f64,
    pub p_value: f64,
    pub method: PValueMethod,
}

/// Average 1-based ranks of the pooled sample, plus `Σ t(t² - 1)` over tie
/// groups
fn pooled_ranks(control: &[f64], test: &[f64]) -> (Vec<f64>, f64) {
    let n = control.len() + test.len();
    let mut order: Vec<(f64, usize)> = control
        .iter()
        .chain(test.iter())
        .copied()
        .zip(0..n)
        .collect();
    order.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut ranks = vec![0.0; n];
    let mut ties = 0.0;
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && order[j].0 == order[i].0 {
            j += 1;
        }
        let rank = (i + 1 + j) as f64 / 2.0;
        for &(_, idx) in &order[i..j] {
            ranks[idx] = rank;
        }
        let t = (j - i) as f64;
        ties += t * (t * t - 1.0);
        i = j;
    }
    (ranks, ties)
}

/// `P(U >= u)` under the null hypothesis for samples of size `m` and `n`
/// without ties
///
/// The counts of each U value over all `C(m + n, m)` arrangements are the
/// coefficients of `Π_{i=1..m} (1 - q^(n+i)) / (1 - q^i)`.
fn exact_upper_tail(u: f64, m: usize, n: usize) -> f64 {
    let (m, n) = if m <= n { (m, n) } else { (n, m) };
    let max_u = m * n;
    let mut counts = vec![0.0f64; max_u + 1];
    counts[0] = 1.0;

    for i in 1..=m {
        let shift = n + i;
        for k in (shift..=max_u).rev() {
            counts[k] -= counts[k - shift];
        }
        for k in i..=max_u {
            counts[k] += counts[k - i];
        }
    }

    let total: f64 = counts.iter().sum();
    let start = u.ceil().max(0.0) as usize;
    if start > max_u {
        return 0.0;
    }
    counts[start..].iter().sum::<f64>() / total
}

/// Two-sided Mann-Whitney U test of `control` against `test`
///
/// Uses the exact distribution when either sample has at most
/// [`EXACT_MAX_SIZE`] values and there are no ties, and the normal
/// approximation with tie and continuity corrections otherwise.
pub fn mann_whitney_u(control: &[f64], test: &[f64]) -> Result<MannWhitneyOutcome> {
    let (n1, n2) = (control.len(), test.len());
    if n1 < MIN_GROUP_SIZE || n2 < MIN_GROUP_SIZE {
        return Err(Error::insufficient(MIN_GROUP_SIZE, n1.min(n2)));
    }
    if control.iter().chain(test).any(|x| x.is_nan()) {
        return Err(Error::non_finite("Mann-Whitney input"));
    }

    let (n1f, n2f) = (n1 as f64, n2 as f64);
    let (ranks, ties) = pooled_ranks(control, test);
    let rank_sum: f64 = ranks[..n1].iter().sum();
    let u1 = rank_sum - n1f * (n1f + 1.0) / 2.0;
    let u2 = n1f * n2f - u1;
    let u = u1.max(u2);

    let exact = n1.min(n2) <= EXACT_MAX_SIZE && ties == 0.0;
    let p_value = if exact {
        2.0 * exact_upper_tail(u, n1, n2)
    } else {
        let n = n1f + n2f;
        let mu = n1f * n2f / 2.0;
        let sigma = (n1f * n2f / 12.0 * ((n + 1.0) - ties / (n * (n - 1.0)))).sqrt();
        if sigma == 0.0 {
            1.0
        } else {
            let z = (u - mu - 0.5) / sigma;
            let normal = Normal::new(0.0, 1.0).map_err(|e| {
                Error::Computation(format!("Failed to create normal distribution: {}", e))
            })?;
            2.0 * normal.sf(z)
        }
    };
    debug!(n1, n2, u1, exact, "Mann-Whitney U");

    Ok(MannWhitneyOutcome {
        statistic: u1,
        p_value: p_value.clamp(0.0, 1.0),
        method: if exact {
            PValueMethod::Exact
        } else {
            PValueMethod::Asymptotic
        },
    })
}
