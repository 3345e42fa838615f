//! Common test utilities for ab-polars tests

use polars::prelude::*;

/// Helper function to create a session-level DataFrame
///
/// Four users, one of whom (`u3`) switches groups between sessions.
pub fn create_session_df() -> DataFrame {
    df![
        "fullVisitorId" => ["u1", "u1", "u2", "u2", "u3", "u3", "u4"],
        "group" => ["control", "control", "test", "test", "control", "test", "test"],
        "totalTransactionRevenue" => [
            Some(0.0), None, Some(10.0), Some(20.0), Some(5.0), Some(7.0), Some(40.0),
        ],
        "deviceCategory" => [
            "desktop", "mobile", "mobile", "mobile", "tablet", "desktop", "desktop",
        ],
    ]
    .unwrap()
}

/// Helper function to create a user-level DataFrame with labels assigned
pub fn create_labelled_df(control: &[f64], test: &[f64]) -> DataFrame {
    let labels: Vec<&str> = std::iter::repeat("control")
        .take(control.len())
        .chain(std::iter::repeat("test").take(test.len()))
        .collect();
    let values: Vec<f64> = control.iter().chain(test).copied().collect();
    df!["group" => labels, "metric" => values].unwrap()
}

/// Helper function to collect a string column
pub fn strings(df: &DataFrame, column: &str) -> Vec<String> {
    df.column(column)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|s| s.unwrap_or_default().to_string())
        .collect()
}
