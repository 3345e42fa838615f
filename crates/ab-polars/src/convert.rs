//! Conversion between Polars DataFrames and observation tables

use crate::{Error, Result};
use ab_core::{Column as TableColumn, ColumnType, Table, Value};
use chrono::{DateTime, NaiveDateTime};
use polars::prelude::*;

const DATETIME_DTYPE: DataType = DataType::Datetime(TimeUnit::Milliseconds, None);

/// Copy a DataFrame into a [`Table`], keeping row and column order
///
/// Integer and float columns become numbers, booleans stay booleans, dates
/// and datetimes become naive timestamps (millisecond precision) and every
/// other scalar dtype is rendered as text. Polars nulls and float NaN are
/// both missing.
pub fn table_from_dataframe(df: &DataFrame) -> Result<Table> {
    let columns = df
        .get_columns()
        .iter()
        .map(column_values)
        .collect::<Result<Vec<_>>>()?;
    Ok(Table::new(columns)?)
}

fn column_values(column: &Column) -> Result<TableColumn> {
    let name = column.name().as_str();
    let values: Vec<Value> = match column.dtype() {
        DataType::Float64 => column.f64()?.into_iter().map(Value::from).collect(),
        DataType::Float32
        | DataType::Int64
        | DataType::Int32
        | DataType::Int16
        | DataType::Int8
        | DataType::UInt64
        | DataType::UInt32 => {
            let float_column = column.cast(&DataType::Float64)?;
            float_column.f64()?.into_iter().map(Value::from).collect()
        }
        DataType::Boolean => column.bool()?.into_iter().map(Value::from).collect(),
        DataType::String => column.str()?.into_iter().map(Value::from).collect(),
        DataType::Date | DataType::Datetime(_, _) => {
            let millis = column.cast(&DATETIME_DTYPE)?.cast(&DataType::Int64)?;
            millis
                .i64()?
                .into_iter()
                .map(|ms| Value::from(ms.and_then(timestamp_from_millis)))
                .collect()
        }
        DataType::Null => vec![Value::Null; column.len()],
        dtype @ (DataType::List(_) | DataType::Binary) => {
            return Err(Error::UnsupportedType {
                column: name.to_string(),
                dtype: dtype.to_string(),
            })
        }
        _ => {
            let text_column = column.cast(&DataType::String)?;
            text_column.str()?.into_iter().map(Value::from).collect()
        }
    };
    Ok(TableColumn::new(name, values))
}

fn timestamp_from_millis(ms: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(ms).map(|dt| dt.naive_utc())
}

/// Build a DataFrame from a [`Table`]
///
/// Each column's dtype follows its inferred [`ColumnType`]: numeric columns
/// are `Float64` (or `Boolean` when every present cell is a boolean),
/// datetime columns are millisecond `Datetime` and categorical columns are
/// `String`, with missing cells as nulls.
pub fn table_to_dataframe(table: &Table) -> Result<DataFrame> {
    let columns = table
        .columns()
        .iter()
        .map(series_from_column)
        .collect::<Result<Vec<Column>>>()?;
    Ok(DataFrame::new(columns)?)
}

fn series_from_column(column: &TableColumn) -> Result<Column> {
    let name = PlSmallStr::from(column.name());
    let values = column.values();
    let series = match column.infer_type() {
        ColumnType::Numeric if is_boolean(values) => {
            let bools: Vec<Option<bool>> = values
                .iter()
                .map(|v| match v {
                    Value::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect();
            Series::new(name, bools)
        }
        ColumnType::Numeric => {
            let numbers: Vec<Option<f64>> = values.iter().map(Value::as_f64).collect();
            Series::new(name, numbers)
        }
        ColumnType::Datetime => {
            let millis: Vec<Option<i64>> = values
                .iter()
                .map(|v| v.as_timestamp().map(|ts| ts.and_utc().timestamp_millis()))
                .collect();
            Series::new(name, millis).cast(&DATETIME_DTYPE)?
        }
        ColumnType::Categorical => {
            let texts: Vec<Option<String>> = values
                .iter()
                .map(|v| (!v.is_null()).then(|| v.to_string()))
                .collect();
            Series::new(name, texts)
        }
    };
    Ok(series.into())
}

fn is_boolean(values: &[Value]) -> bool {
    let mut present = values.iter().filter(|v| !v.is_null()).peekable();
    present.peek().is_some() && present.all(|v| matches!(v, Value::Bool(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_dataframe_round_trip() {
        let df = df![
            "fullVisitorId" => ["a", "b", "c"],
            "revenue" => [Some(1.5), None, Some(f64::NAN)],
            "visits" => [1i64, 2, 3],
            "is_new" => [true, false, true],
        ]
        .unwrap();

        let table = table_from_dataframe(&df).unwrap();
        assert_eq!(table.column_names(), vec!["fullVisitorId", "revenue", "visits", "is_new"]);
        assert_eq!(table.value(0, "revenue").unwrap(), &Value::Number(1.5));
        assert!(table.value(1, "revenue").unwrap().is_null());
        assert!(table.value(2, "revenue").unwrap().is_null());
        assert_eq!(table.value(2, "visits").unwrap(), &Value::Number(3.0));
        assert_eq!(table.value(1, "is_new").unwrap(), &Value::Bool(false));

        let back = table_to_dataframe(&table).unwrap();
        assert_eq!(back.shape(), (3, 4));
        assert_eq!(back.column("visits").unwrap().dtype(), &DataType::Float64);
        assert_eq!(back.column("is_new").unwrap().dtype(), &DataType::Boolean);
        assert_eq!(back.column("fullVisitorId").unwrap().dtype(), &DataType::String);
        assert_eq!(back.column("revenue").unwrap().null_count(), 2);
    }

    #[test]
    fn test_timestamps_survive_conversion() {
        let ts = NaiveDate::from_ymd_opt(2017, 8, 1)
            .unwrap()
            .and_hms_opt(13, 45, 0)
            .unwrap();
        let table = Table::new(vec![TableColumn::new(
            "visitStart",
            vec![Value::from(ts), Value::Null],
        )])
        .unwrap();

        let df = table_to_dataframe(&table).unwrap();
        assert!(matches!(
            df.column("visitStart").unwrap().dtype(),
            DataType::Datetime(TimeUnit::Milliseconds, None)
        ));
        let back = table_from_dataframe(&df).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn test_list_columns_are_rejected() {
        let list = Series::new("tags".into(), [Series::new("".into(), [1i64, 2])]);
        let df = DataFrame::new(vec![list.into()]).unwrap();
        assert!(matches!(
            table_from_dataframe(&df),
            Err(Error::UnsupportedType { column, .. }) if column == "tags"
        ));
    }
}
