//! In-memory observation tables
//!
//! A [`Table`] is an ordered collection of rows sharing one column set. It is
//! stored column-major; row order is stable and significant, since
//! "first encountered" semantics downstream depend on it.
//!
//! Operations that filter or add columns never touch `self`: they return a
//! new table, so callers can keep using their source table afterwards.

use crate::{Error, Result, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Type class of a column, inferred from its non-missing cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Numbers and booleans
    Numeric,
    /// Timestamps
    Datetime,
    /// Text or mixed content
    Categorical,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Numeric => "numeric",
            Self::Datetime => "datetime",
            Self::Categorical => "categorical",
        };
        write!(f, "{}", s)
    }
}

/// A named column of cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    values: Vec<Value>,
}

impl Column {
    /// Create a column from owned cells
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Create a column from anything convertible into cells
    pub fn from_values<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::new(name, values.into_iter().map(Into::into).collect())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Infer the type class of this column
    ///
    /// Numbers and booleans are numeric, timestamps are datetime, anything
    /// else (or a mix) is categorical. A column with no non-missing cell is
    /// numeric, matching how an empty numeric field reads back as NaN.
    pub fn infer_type(&self) -> ColumnType {
        let mut numeric = true;
        let mut datetime = true;
        let mut seen = false;

        for value in self.values.iter().filter(|v| !v.is_null()) {
            seen = true;
            match value {
                Value::Number(_) | Value::Bool(_) => datetime = false,
                Value::Timestamp(_) => numeric = false,
                _ => return ColumnType::Categorical,
            }
        }

        match (seen, numeric, datetime) {
            (false, _, _) => ColumnType::Numeric,
            (true, true, _) => ColumnType::Numeric,
            (true, false, true) => ColumnType::Datetime,
            _ => ColumnType::Categorical,
        }
    }

    /// Numeric view of every cell, `None` where missing
    ///
    /// Fails with [`Error::TypeMismatch`] if a non-missing cell is neither a
    /// number nor a boolean.
    pub fn numeric_values(&self) -> Result<Vec<Option<f64>>> {
        self.values
            .iter()
            .map(|value| {
                if value.is_null() {
                    return Ok(None);
                }
                value.as_f64().map(Some).ok_or_else(|| Error::TypeMismatch {
                    column: self.name.clone(),
                    expected: "numeric".to_string(),
                    got: value.type_name().to_string(),
                })
            })
            .collect()
    }
}

/// Ordered rows over a fixed set of named columns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// Create a table, checking that columns are equally long and uniquely named
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let n_rows = columns.first().map_or(0, Column::len);
        let mut names = HashSet::with_capacity(columns.len());

        for column in &columns {
            if column.len() != n_rows {
                return Err(Error::size_mismatch(
                    n_rows,
                    column.len(),
                    &format!("column '{}'", column.name()),
                ));
            }
            if !names.insert(column.name()) {
                return Err(Error::InvalidInput(format!(
                    "Duplicate column name '{}'",
                    column.name()
                )));
            }
        }

        Ok(Self { columns, n_rows })
    }

    /// Create a table from row-major data
    pub fn from_rows(names: &[&str], rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut columns: Vec<Vec<Value>> = vec![Vec::with_capacity(rows.len()); names.len()];

        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != names.len() {
                return Err(Error::size_mismatch(
                    names.len(),
                    row.len(),
                    &format!("row {i}"),
                ));
            }
            for (column, value) in columns.iter_mut().zip(row) {
                column.push(value);
            }
        }

        Self::new(
            names
                .iter()
                .zip(columns)
                .map(|(name, values)| Column::new(*name, values))
                .collect(),
        )
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name() == name)
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| Error::missing_column(name))
    }

    /// Cell at `row` in column `name`
    pub fn value(&self, row: usize, name: &str) -> Result<&Value> {
        let column = self.column(name)?;
        column.values().get(row).ok_or_else(|| {
            Error::InvalidParameter(format!(
                "Row {row} out of bounds for table with {} rows",
                self.n_rows
            ))
        })
    }

    /// Numeric view of a column, see [`Column::numeric_values`]
    pub fn numeric_values(&self, name: &str) -> Result<Vec<Option<f64>>> {
        self.column(name)?.numeric_values()
    }

    /// New table holding the given rows, in the given order
    pub fn take_rows(&self, indices: &[usize]) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|c| {
                Column::new(
                    c.name(),
                    indices.iter().map(|&i| c.values()[i].clone()).collect(),
                )
            })
            .collect();

        Self {
            columns,
            n_rows: indices.len(),
        }
    }

    /// New table holding the rows for which `keep(row_index)` is true
    pub fn filter_rows<F>(&self, keep: F) -> Self
    where
        F: Fn(usize) -> bool,
    {
        let indices: Vec<usize> = (0..self.n_rows).filter(|&i| keep(i)).collect();
        self.take_rows(&indices)
    }

    /// New table holding the rows where every `column == value` predicate holds
    ///
    /// Equality follows [`Value::matches`]. A predicate on an absent column
    /// is an error.
    pub fn filter_eq(&self, predicates: &[(String, Value)]) -> Result<Self> {
        let checks = predicates
            .iter()
            .map(|(name, value)| Ok((self.column(name)?, value)))
            .collect::<Result<Vec<_>>>()?;

        Ok(self.filter_rows(|i| {
            checks
                .iter()
                .all(|(column, value)| column.values()[i].matches(value))
        }))
    }

    /// New table with `column` appended, or replacing a column of the same name
    pub fn with_column(&self, column: Column) -> Result<Self> {
        if !self.columns.is_empty() && column.len() != self.n_rows {
            return Err(Error::size_mismatch(
                self.n_rows,
                column.len(),
                &format!("column '{}'", column.name()),
            ));
        }

        let mut columns = self.columns.clone();
        match columns.iter().position(|c| c.name() == column.name()) {
            Some(i) => columns[i] = column,
            None => columns.push(column),
        }

        let n_rows = columns.first().map_or(0, Column::len);
        Ok(Self { columns, n_rows })
    }

    /// New table without the named columns; unknown names are ignored
    pub fn without_columns<S: AsRef<str>>(&self, names: &[S]) -> Self {
        let columns = self
            .columns
            .iter()
            .filter(|c| !names.iter().any(|n| n.as_ref() == c.name()))
            .cloned()
            .collect();

        Self {
            columns,
            n_rows: self.n_rows,
        }
    }

    /// Consume the table, returning its columns
    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sessions() -> Table {
        Table::new(vec![
            Column::from_values("user", ["A", "A", "B", "C"]),
            Column::from_values("source", ["google", "direct", "google", "google"]),
            Column::from_values("revenue", [Some(0.0), Some(10.0), None, Some(5.0)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_construction_checks_lengths() {
        let result = Table::new(vec![
            Column::from_values("a", [1.0, 2.0]),
            Column::from_values("b", [1.0]),
        ]);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_construction_rejects_duplicate_names() {
        let result = Table::new(vec![
            Column::from_values("a", [1.0]),
            Column::from_values("a", [2.0]),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_rows() {
        let table = Table::from_rows(
            &["user", "revenue"],
            vec![
                vec!["A".into(), 1.0.into()],
                vec!["B".into(), Value::Null],
            ],
        )
        .unwrap();
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.value(1, "user").unwrap(), &Value::from("B"));
        assert!(table.value(1, "revenue").unwrap().is_null());
    }

    #[test]
    fn test_filter_eq_keeps_order() {
        let table = sessions();
        let google = table
            .filter_eq(&[("source".to_string(), Value::from("google"))])
            .unwrap();
        assert_eq!(google.n_rows(), 3);
        let users: Vec<String> = google
            .column("user")
            .unwrap()
            .values()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(users, vec!["A", "B", "C"]);
        // source table untouched
        assert_eq!(table.n_rows(), 4);
    }

    #[test]
    fn test_filter_eq_missing_column() {
        let table = sessions();
        let result = table.filter_eq(&[("medium".to_string(), Value::from("cpc"))]);
        assert!(matches!(result, Err(Error::MissingColumn(name)) if name == "medium"));
    }

    #[test]
    fn test_with_column_appends_and_replaces() {
        let table = sessions();
        let labelled = table
            .with_column(Column::from_values("group", ["control"; 4]))
            .unwrap();
        assert_eq!(labelled.n_columns(), 4);
        assert_eq!(table.n_columns(), 3);

        let replaced = labelled
            .with_column(Column::from_values("group", ["test"; 4]))
            .unwrap();
        assert_eq!(replaced.n_columns(), 4);
        assert_eq!(replaced.value(0, "group").unwrap(), &Value::from("test"));

        assert!(table
            .with_column(Column::from_values("short", ["x"]))
            .is_err());
    }

    #[test]
    fn test_numeric_values() {
        let table = sessions();
        assert_eq!(
            table.numeric_values("revenue").unwrap(),
            vec![Some(0.0), Some(10.0), None, Some(5.0)]
        );
        assert!(matches!(
            table.numeric_values("source"),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_infer_type() {
        let table = sessions();
        assert_eq!(table.column("revenue").unwrap().infer_type(), ColumnType::Numeric);
        assert_eq!(table.column("source").unwrap().infer_type(), ColumnType::Categorical);
        let empty = Column::new("empty", vec![Value::Null, Value::Null]);
        assert_eq!(empty.infer_type(), ColumnType::Numeric);
        let flags = Column::from_values("flag", [true, false]);
        assert_eq!(flags.infer_type(), ColumnType::Numeric);
    }

    #[test]
    fn test_without_columns() {
        let table = sessions().without_columns(&["source", "visitId"]);
        assert_eq!(table.column_names(), vec!["user", "revenue"]);
        assert_eq!(table.n_rows(), 4);
    }
}
