//! Property tests for the table model and numeric helpers

use ab_core::numeric::{percentile, sorted};
use ab_core::{profile_table, Column, Error, Table, Value};
use proptest::prelude::*;

fn labelled(labels: &[bool], metric: &[f64]) -> Table {
    Table::new(vec![
        Column::from_values(
            "group",
            labels.iter().map(|&t| if t { "test" } else { "control" }),
        ),
        Column::from_values("metric", metric.to_vec()),
    ])
    .unwrap()
}

proptest! {
    #[test]
    fn prop_percentile_is_within_range(
        data in prop::collection::vec(-1e6..1e6f64, 1..100),
        p in 0.0..=100.0f64,
    ) {
        let q = percentile(&data, p);
        let ordered = sorted(&data);
        prop_assert!(q >= ordered[0] - 1e-6 && q <= ordered[ordered.len() - 1] + 1e-6);
    }

    #[test]
    fn prop_label_filters_partition_rows(
        rows in prop::collection::vec((any::<bool>(), -100.0..100.0f64), 0..50),
    ) {
        let (labels, metric): (Vec<bool>, Vec<f64>) = rows.into_iter().unzip();
        let table = labelled(&labels, &metric);
        let pick = |label: &str| {
            table
                .filter_eq(&[("group".to_string(), Value::from(label))])
                .unwrap()
        };
        let control = pick("control");
        let test = pick("test");
        prop_assert_eq!(control.n_rows() + test.n_rows(), table.n_rows());
        prop_assert_eq!(test.n_rows(), labels.iter().filter(|&&t| t).count());
    }
}

#[test]
fn test_filter_on_absent_column_is_an_error() {
    let table = labelled(&[true, false], &[1.0, 2.0]);
    let err = table
        .filter_eq(&[("arm".to_string(), Value::from("test"))])
        .unwrap_err();
    assert!(matches!(err, Error::MissingColumn(ref c) if c == "arm"));
    assert!(err.is_configuration());
}

#[test]
fn test_profile_serializes_to_json() {
    let table = labelled(&[true, false, true], &[1.0, 2.0, 50.0]);
    let json = serde_json::to_value(profile_table(&table)).unwrap();
    assert_eq!(json["rows"], 3);
    assert_eq!(json["columns"][0]["column_type"], "categorical");
    assert_eq!(json["columns"][1]["numeric"]["count"], 3);
}
