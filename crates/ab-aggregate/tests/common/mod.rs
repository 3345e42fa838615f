//! Common test utilities for ab-aggregate tests

use ab_core::{Column, Table, Value};

/// Helper function to read an inline CSV document into a table
///
/// Empty cells are missing, cells that parse as `f64` are numbers and
/// everything else is text.
pub fn table_from_csv(data: &str) -> Table {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data.as_bytes());
    let headers: Vec<String> = reader
        .headers()
        .unwrap()
        .iter()
        .map(str::to_string)
        .collect();

    let mut columns: Vec<Vec<Value>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record.unwrap();
        for (cells, field) in columns.iter_mut().zip(record.iter()) {
            cells.push(if field.is_empty() {
                Value::Null
            } else if let Ok(x) = field.parse::<f64>() {
                Value::Number(x)
            } else {
                Value::from(field)
            });
        }
    }

    Table::new(
        headers
            .into_iter()
            .zip(columns)
            .map(|(name, values)| Column::new(name, values))
            .collect(),
    )
    .unwrap()
}

/// Helper function to render a column as strings
pub fn texts(table: &Table, column: &str) -> Vec<String> {
    table
        .column(column)
        .unwrap()
        .values()
        .iter()
        .map(|v| v.to_string())
        .collect()
}

/// Session log with one multi-group user (`carol`) and a missing id
pub const SESSIONS: &str = "\
fullVisitorId,group,date,totalTransactionRevenue,pageviews,deviceCategory
alice,control,20170801,0,3,desktop
alice,control,20170803,,5,mobile
alice,control,20170802,25.5,1,desktop
bob,test,20170805,10,2,mobile
bob,test,20170804,20,4,tablet
carol,control,20170801,5,1,desktop
carol,test,20170806,7,9,mobile
,test,20170807,100,1,desktop
dave,,20170808,3,2,tablet
";
