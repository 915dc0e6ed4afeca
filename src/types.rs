//! Core tabular data model.
//!
//! Tables are held in an in-memory [`DataSet`]: a [`Schema`] (ordered, typed [`ColumnDef`]s)
//! plus row-major [`Value`] storage. Transformers read and write whole columns, so alongside
//! the row accessors this module provides column-level helpers (select, replace, drop,
//! reorder).

use std::fmt;

use chrono::NaiveDateTime;

/// Storage representation of a column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    Utf8,
    /// Naive (timezone-less) date and time.
    Datetime,
}

/// A single named, typed column in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    /// Column name.
    pub name: String,
    /// Column storage type.
    pub data_type: DataType,
}

impl ColumnDef {
    /// Create a new column definition.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered list of columns describing the shape of a [`DataSet`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    /// Ordered list of columns.
    pub columns: Vec<ColumnDef>,
}

impl Schema {
    /// Create a new schema from column definitions.
    pub fn new(columns: Vec<ColumnDef>) -> Self {
        Self { columns }
    }

    /// Iterate column names in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Returns the index of a column by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Returns the column definition for `name`, if present.
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// `true` if the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// A single typed value in a [`DataSet`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
    /// Naive date and time.
    Datetime(NaiveDateTime),
}

impl Value {
    /// `true` for [`Value::Null`] and for a NaN float.
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float64(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Numeric view of the value. Booleans map to `0.0`/`1.0`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int64(v) => Some(*v as f64),
            Value::Float64(v) if !v.is_nan() => Some(*v),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Storage type of the value, `None` for nulls.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Null => None,
            Value::Int64(_) => Some(DataType::Int64),
            Value::Float64(_) => Some(DataType::Float64),
            Value::Bool(_) => Some(DataType::Bool),
            Value::Utf8(_) => Some(DataType::Utf8),
            Value::Datetime(_) => Some(DataType::Datetime),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Utf8(v) => f.write_str(v),
            Value::Datetime(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S%.f")),
        }
    }
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataSet {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl DataSet {
    /// Create a dataset from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// Build a dataset from whole columns.
    ///
    /// # Panics
    ///
    /// Panics if the columns have different lengths.
    pub fn from_columns(columns: Vec<(ColumnDef, Vec<Value>)>) -> Self {
        let row_count = columns.first().map_or(0, |(_, values)| values.len());
        let mut rows: Vec<Vec<Value>> = (0..row_count)
            .map(|_| Vec::with_capacity(columns.len()))
            .collect();
        let mut defs = Vec::with_capacity(columns.len());
        for (def, values) in columns {
            assert!(
                values.len() == row_count,
                "column '{}' has {} values, expected {}",
                def.name,
                values.len(),
                row_count
            );
            for (row, value) in rows.iter_mut().zip(values) {
                row.push(value);
            }
            defs.push(def);
        }
        Self {
            schema: Schema::new(defs),
            rows,
        }
    }

    /// Split the dataset into whole columns.
    pub fn into_columns(self) -> Vec<(ColumnDef, Vec<Value>)> {
        let width = self.schema.len();
        let mut values: Vec<Vec<Value>> = (0..width)
            .map(|_| Vec::with_capacity(self.rows.len()))
            .collect();
        for row in self.rows {
            for (column, value) in values.iter_mut().zip(row) {
                column.push(value);
            }
        }
        self.schema.columns.into_iter().zip(values).collect()
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Column names in order.
    pub fn column_names(&self) -> Vec<String> {
        self.schema.column_names().map(str::to_owned).collect()
    }

    /// `true` if a column named `name` exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.schema.index_of(name).is_some()
    }

    /// `true` if every column in `names` exists.
    pub fn has_columns<S: AsRef<str>>(&self, names: &[S]) -> bool {
        names.iter().all(|n| self.has_column(n.as_ref()))
    }

    /// Cloned values of a single column.
    pub fn column(&self, name: &str) -> Option<Vec<Value>> {
        let idx = self.schema.index_of(name)?;
        Some(self.rows.iter().map(|row| row[idx].clone()).collect())
    }

    /// A new dataset holding only `names`, in the given order.
    ///
    /// Returns `None` if any of the columns is missing.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Option<DataSet> {
        let idxs = names
            .iter()
            .map(|n| self.schema.index_of(n.as_ref()))
            .collect::<Option<Vec<_>>>()?;
        Some(self.project(&idxs))
    }

    /// Like [`DataSet::select`], but silently skips missing columns.
    pub fn select_present<S: AsRef<str>>(&self, names: &[S]) -> DataSet {
        let idxs: Vec<usize> = names
            .iter()
            .filter_map(|n| self.schema.index_of(n.as_ref()))
            .collect();
        self.project(&idxs)
    }

    fn project(&self, idxs: &[usize]) -> DataSet {
        let schema = Schema::new(idxs.iter().map(|&i| self.schema.columns[i].clone()).collect());
        let rows = self
            .rows
            .iter()
            .map(|row| idxs.iter().map(|&i| row[i].clone()).collect())
            .collect();
        DataSet { schema, rows }
    }

    /// Replace the column named `def.name` (keeping its position) or append it.
    ///
    /// # Panics
    ///
    /// Panics if `values` does not have one entry per row. An empty dataset with no columns
    /// adopts the length of `values`.
    pub fn set_column(&mut self, def: ColumnDef, values: Vec<Value>) {
        if self.schema.is_empty() && self.rows.is_empty() {
            self.rows = (0..values.len()).map(|_| Vec::new()).collect();
        }
        assert!(
            values.len() == self.rows.len(),
            "column '{}' has {} values, expected {}",
            def.name,
            values.len(),
            self.rows.len()
        );
        match self.schema.index_of(&def.name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
                self.schema.columns[idx] = def;
            }
            None => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
                self.schema.columns.push(def);
            }
        }
    }

    /// Insert (or replace) a column at `position`.
    pub fn insert_column(&mut self, position: usize, def: ColumnDef, values: Vec<Value>) {
        self.drop_columns(&[def.name.as_str()]);
        let name = def.name.clone();
        self.set_column(def, values);
        let Some(from) = self.schema.index_of(&name) else {
            return;
        };
        let to = position.min(self.schema.len() - 1);
        if from != to {
            let col = self.schema.columns.remove(from);
            self.schema.columns.insert(to, col);
            for row in &mut self.rows {
                let v = row.remove(from);
                row.insert(to, v);
            }
        }
    }

    /// Remove the named columns. Missing names are ignored.
    pub fn drop_columns<S: AsRef<str>>(&mut self, names: &[S]) {
        let mut idxs: Vec<usize> = names
            .iter()
            .filter_map(|n| self.schema.index_of(n.as_ref()))
            .collect();
        idxs.sort_unstable();
        idxs.dedup();
        for &idx in idxs.iter().rev() {
            self.schema.columns.remove(idx);
            for row in &mut self.rows {
                row.remove(idx);
            }
        }
    }
}
