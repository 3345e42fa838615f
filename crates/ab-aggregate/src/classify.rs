//! Column typing and timestamp parsing ahead of aggregation

use ab_core::{Column, ColumnType, Result, Table, Value};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use tracing::debug;

/// Parse `text` with a chrono format, accepting date-only formats as midnight
pub fn parse_timestamp(text: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, format)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, format)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Replace the cells of each listed column by parsed timestamps
///
/// Existing timestamps are kept. Text and numbers are parsed from their
/// rendered form, so `20170801` read as a number still parses with
/// `%Y%m%d`; anything that fails becomes missing. Columns absent from the
/// table are skipped.
pub fn parse_datetime_columns(table: &Table, formats: &BTreeMap<String, String>) -> Result<Table> {
    let mut parsed = table.clone();
    for (name, format) in formats {
        let Ok(column) = table.column(name) else {
            continue;
        };
        let values: Vec<Value> = column
            .values()
            .iter()
            .map(|v| match v {
                Value::Timestamp(_) => v.clone(),
                Value::Text(_) | Value::Number(_) if !v.is_null() => {
                    parse_timestamp(&v.to_string(), format).map_or(Value::Null, Value::from)
                }
                _ => Value::Null,
            })
            .collect();
        let failed = values
            .iter()
            .filter(|v| v.is_null())
            .count()
            .saturating_sub(column.values().iter().filter(|v| v.is_null()).count());
        debug!(column = %name, format = %format, failed, "parsed timestamps");
        parsed = parsed.with_column(Column::new(name.clone(), values))?;
    }
    Ok(parsed)
}

/// Type of every column except the id and group columns, in table order
///
/// Columns named in `forced_datetime` are datetime whatever their content.
pub fn classify_columns(
    table: &Table,
    user_id_column: &str,
    group_column: Option<&str>,
    forced_datetime: &[&str],
) -> Vec<(String, ColumnType)> {
    table
        .columns()
        .iter()
        .filter(|c| c.name() != user_id_column && Some(c.name()) != group_column)
        .map(|c| {
            let column_type = if forced_datetime.contains(&c.name()) {
                ColumnType::Datetime
            } else {
                c.infer_type()
            };
            (c.name().to_string(), column_type)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_formats() {
        let ts = parse_timestamp("2017-08-01 13:45:00", "%Y-%m-%d %H:%M:%S").unwrap();
        assert_eq!(ts.to_string(), "2017-08-01 13:45:00");
        let day = parse_timestamp("20170801", "%Y%m%d").unwrap();
        assert_eq!(day.to_string(), "2017-08-01 00:00:00");
        assert!(parse_timestamp("yesterday", "%Y%m%d").is_none());
    }

    #[test]
    fn test_unparseable_cells_become_missing() {
        let table = Table::new(vec![Column::new(
            "date",
            vec![
                Value::from("20170801"),
                Value::from(20170802.0),
                Value::from("bad"),
                Value::from(true),
                Value::Null,
            ],
        )])
        .unwrap();
        let formats = BTreeMap::from([("date".to_string(), "%Y%m%d".to_string())]);
        let parsed = parse_datetime_columns(&table, &formats).unwrap();
        let values = parsed.column("date").unwrap().values();
        assert!(values[0].as_timestamp().is_some());
        assert_eq!(values[1].to_string(), "2017-08-02 00:00:00");
        assert!(values[2..].iter().all(Value::is_null));
    }

    #[test]
    fn test_classification() {
        let table = Table::new(vec![
            Column::from_values("id", ["a", "b"]),
            Column::from_values("group", ["control", "test"]),
            Column::from_values("revenue", [1.0, 2.0]),
            Column::from_values("device", ["mobile", "desktop"]),
            Column::new("date", vec![Value::Null, Value::Null]),
            Column::new("empty", vec![Value::Null, Value::Null]),
        ])
        .unwrap();
        let types = classify_columns(&table, "id", Some("group"), &["date"]);
        assert_eq!(
            types,
            vec![
                ("revenue".to_string(), ColumnType::Numeric),
                ("device".to_string(), ColumnType::Categorical),
                ("date".to_string(), ColumnType::Datetime),
                ("empty".to_string(), ColumnType::Numeric),
            ]
        );
    }
}
