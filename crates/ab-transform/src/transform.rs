//! Per-sample transforms applied to each group before testing

use crate::boxcox::box_cox;
use ab_core::numeric::{percentile_sorted, sorted};
use ab_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A transform applied to one numeric sample
///
/// Implementations never reorder values; `Trim` is the only one that may
/// shorten the sample.
pub trait SampleTransform {
    /// Transform `data`, returning a new sample
    fn apply(&self, data: &[f64]) -> Result<Vec<f64>>;

    /// Configuration name of the transform
    fn name(&self) -> &'static str;
}

fn check_percentile(p: f64) -> Result<()> {
    if (0.0..=100.0).contains(&p) {
        Ok(())
    } else {
        Err(Error::invalid_percentile(p))
    }
}

/// Leaves the sample unchanged
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Identity;

impl SampleTransform for Identity {
    fn apply(&self, data: &[f64]) -> Result<Vec<f64>> {
        Ok(data.to_vec())
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

/// `ln(x + constant)`
///
/// The caller must ensure `x + constant > 0`; other values map to NaN or -inf.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogTransform {
    constant: f64,
}

impl LogTransform {
    pub fn new(constant: f64) -> Self {
        Self { constant }
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }
}

impl Default for LogTransform {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl SampleTransform for LogTransform {
    fn apply(&self, data: &[f64]) -> Result<Vec<f64>> {
        Ok(data.iter().map(|x| (x + self.constant).ln()).collect())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

/// Clips values into `[low, high]` where `high` is the `p`-th percentile
///
/// `low` is the `(100 - p)`-th percentile when `p < 50` and the minimum
/// otherwise. With `p < 50` the bounds cross (`low > high`) and every value
/// ends up at `high`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Winsorize {
    percentile: f64,
}

impl Winsorize {
    pub fn new(percentile: f64) -> Result<Self> {
        check_percentile(percentile)?;
        Ok(Self { percentile })
    }

    pub fn percentile(&self) -> f64 {
        self.percentile
    }

    /// Clip bounds `(low, high)` for `data`, `None` for an empty sample
    pub fn bounds(&self, data: &[f64]) -> Option<(f64, f64)> {
        if data.is_empty() {
            return None;
        }
        let ordered = sorted(data);
        let high = percentile_sorted(&ordered, self.percentile);
        let low = if self.percentile < 50.0 {
            percentile_sorted(&ordered, 100.0 - self.percentile)
        } else {
            percentile_sorted(&ordered, 0.0)
        };
        Some((low, high))
    }
}

impl SampleTransform for Winsorize {
    fn apply(&self, data: &[f64]) -> Result<Vec<f64>> {
        let Some((low, high)) = self.bounds(data) else {
            return Ok(Vec::new());
        };
        Ok(data.iter().map(|&x| x.max(low).min(high)).collect())
    }

    fn name(&self) -> &'static str {
        "winsor"
    }
}

/// Drops values strictly above the `p`-th percentile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trim {
    percentile: f64,
}

impl Trim {
    pub fn new(percentile: f64) -> Result<Self> {
        check_percentile(percentile)?;
        Ok(Self { percentile })
    }

    pub fn percentile(&self) -> f64 {
        self.percentile
    }

    /// Upper cap for `data`, NaN for an empty sample
    pub fn cap(&self, data: &[f64]) -> f64 {
        percentile_sorted(&sorted(data), self.percentile)
    }
}

impl SampleTransform for Trim {
    fn apply(&self, data: &[f64]) -> Result<Vec<f64>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }
        let cap = self.cap(data);
        Ok(data.iter().copied().filter(|&x| x <= cap).collect())
    }

    fn name(&self) -> &'static str {
        "trim"
    }
}

/// Box-Cox with the maximum-likelihood λ, see [`box_cox`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxCox;

impl SampleTransform for BoxCox {
    fn apply(&self, data: &[f64]) -> Result<Vec<f64>> {
        box_cox(data).map(|fit| fit.values)
    }

    fn name(&self) -> &'static str {
        "boxcox"
    }
}

/// Transform names accepted in configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransformKind {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "log")]
    Log,
    #[serde(rename = "winsor")]
    Winsor,
    #[serde(rename = "trim")]
    Trim,
    #[serde(rename = "boxcox")]
    BoxCox,
}

impl TransformKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Log => "log",
            Self::Winsor => "winsor",
            Self::Trim => "trim",
            Self::BoxCox => "boxcox",
        }
    }

    pub fn all() -> [Self; 5] {
        [Self::None, Self::Log, Self::Winsor, Self::Trim, Self::BoxCox]
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for TransformKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| Error::UnknownTransform(s.to_string()))
    }
}

/// Numeric parameters of the configurable transforms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformParams {
    /// Constant added before `ln` in the log transform
    pub add_constant: f64,
    /// Upper percentile for winsorizing
    pub winsor_percentile: f64,
    /// Upper percentile for trimming
    pub trim_percentile: f64,
}

impl Default for TransformParams {
    fn default() -> Self {
        Self {
            add_constant: 1.0,
            winsor_percentile: 95.0,
            trim_percentile: 95.0,
        }
    }
}

impl TransformParams {
    pub fn with_add_constant(mut self, constant: f64) -> Self {
        self.add_constant = constant;
        self
    }

    pub fn with_winsor_percentile(mut self, p: f64) -> Self {
        self.winsor_percentile = p;
        self
    }

    pub fn with_trim_percentile(mut self, p: f64) -> Self {
        self.trim_percentile = p;
        self
    }
}

/// A fully parameterised transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    None(Identity),
    Log(LogTransform),
    Winsorize(Winsorize),
    Trim(Trim),
    BoxCox(BoxCox),
}

impl Transform {
    /// Build the transform named by `kind` with the matching parameter
    ///
    /// Percentiles outside `[0, 100]` are rejected.
    pub fn from_kind(kind: TransformKind, params: &TransformParams) -> Result<Self> {
        Ok(match kind {
            TransformKind::None => Self::None(Identity),
            TransformKind::Log => Self::Log(LogTransform::new(params.add_constant)),
            TransformKind::Winsor => Self::Winsorize(Winsorize::new(params.winsor_percentile)?),
            TransformKind::Trim => Self::Trim(Trim::new(params.trim_percentile)?),
            TransformKind::BoxCox => Self::BoxCox(BoxCox),
        })
    }

    pub fn kind(&self) -> TransformKind {
        match self {
            Self::None(_) => TransformKind::None,
            Self::Log(_) => TransformKind::Log,
            Self::Winsorize(_) => TransformKind::Winsor,
            Self::Trim(_) => TransformKind::Trim,
            Self::BoxCox(_) => TransformKind::BoxCox,
        }
    }

    fn inner(&self) -> &dyn SampleTransform {
        match self {
            Self::None(t) => t,
            Self::Log(t) => t,
            Self::Winsorize(t) => t,
            Self::Trim(t) => t,
            Self::BoxCox(t) => t,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::None(Identity)
    }
}

impl SampleTransform for Transform {
    fn apply(&self, data: &[f64]) -> Result<Vec<f64>> {
        self.inner().apply(data)
    }

    fn name(&self) -> &'static str {
        self.inner().name()
    }
}
