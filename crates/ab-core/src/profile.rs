//! Table profiling: missing counts, descriptive statistics and IQR outliers

use crate::numeric::{mean, percentile_sorted, sorted, std_dev};
use crate::{ColumnType, Table};
use serde::Serialize;
use tracing::debug;

/// Number of outlier values kept as examples per column
const OUTLIER_SAMPLE_SIZE: usize = 5;

/// Fence multiplier for the IQR outlier rule
const IQR_FENCE: f64 = 1.5;

/// Outliers found with the 1.5 × IQR rule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierSummary {
    pub count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// First few outliers in row order
    pub sample_values: Vec<f64>,
}

/// Descriptive statistics of a numeric column, missing values excluded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
    pub outliers: OutlierSummary,
}

/// Profile of one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    pub column_type: ColumnType,
    pub missing: usize,
    /// Present for numeric columns only
    pub numeric: Option<NumericSummary>,
}

/// Profile of a whole table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableProfile {
    pub rows: usize,
    pub columns: Vec<ColumnProfile>,
}

impl TableProfile {
    /// Profile for a column by name
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Profile every column of `table`
pub fn profile_table(table: &Table) -> TableProfile {
    let columns: Vec<ColumnProfile> = table
        .columns()
        .iter()
        .map(|column| {
            let column_type = column.infer_type();
            let missing = column.values().iter().filter(|v| v.is_null()).count();
            let numeric = match column_type {
                ColumnType::Numeric => {
                    let values: Vec<f64> =
                        column.values().iter().filter_map(|v| v.as_f64()).collect();
                    Some(summarize(&values))
                }
                _ => None,
            };
            ColumnProfile {
                name: column.name().to_string(),
                column_type,
                missing,
                numeric,
            }
        })
        .collect();

    let flagged: usize = columns
        .iter()
        .filter_map(|c| c.numeric.as_ref())
        .map(|n| n.outliers.count)
        .sum();
    debug!(rows = table.n_rows(), columns = columns.len(), outliers = flagged, "profiled table");

    TableProfile {
        rows: table.n_rows(),
        columns,
    }
}

fn summarize(values: &[f64]) -> NumericSummary {
    let ordered = sorted(values);
    let q25 = percentile_sorted(&ordered, 25.0);
    let q75 = percentile_sorted(&ordered, 75.0);

    NumericSummary {
        count: values.len(),
        mean: mean(values),
        std: std_dev(values),
        min: ordered.first().copied().unwrap_or(f64::NAN),
        q25,
        median: percentile_sorted(&ordered, 50.0),
        q75,
        max: ordered.last().copied().unwrap_or(f64::NAN),
        outliers: find_outliers(values, q25, q75),
    }
}

fn find_outliers(values: &[f64], q25: f64, q75: f64) -> OutlierSummary {
    let iqr = q75 - q25;
    let lower = q25 - IQR_FENCE * iqr;
    let upper = q75 + IQR_FENCE * iqr;

    let outliers: Vec<f64> = values
        .iter()
        .copied()
        .filter(|&x| x < lower || x > upper)
        .collect();

    OutlierSummary {
        count: outliers.len(),
        min: outliers.iter().copied().reduce(f64::min),
        max: outliers.iter().copied().reduce(f64::max),
        sample_values: outliers.into_iter().take(OUTLIER_SAMPLE_SIZE).collect(),
    }
}
