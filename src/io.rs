//! CSV reading and writing for [`DataSet`]s.

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{TransformError, TransformResult};
use crate::types::{DataSet, DataType, Schema, Value};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Read a CSV file into a [`DataSet`].
///
/// Rules:
///
/// - CSV must have headers.
/// - Headers must contain all schema columns (order can differ).
/// - Each value is parsed according to the schema column type; empty cells become
///   [`Value::Null`].
pub fn read_csv_from_path(path: impl AsRef<Path>, schema: &Schema) -> TransformResult<DataSet> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    read_csv_from_reader(&mut rdr, schema)
}

/// Read CSV data from an existing CSV reader.
pub fn read_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    schema: &Schema,
) -> TransformResult<DataSet> {
    let headers = rdr.headers()?.clone();

    let mut col_idxs = Vec::with_capacity(schema.len());
    for column in &schema.columns {
        match headers.iter().position(|h| h == column.name) {
            Some(idx) => col_idxs.push(idx),
            None => {
                return Err(TransformError::MissingColumn {
                    column: column.name.clone(),
                });
            }
        }
    }

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // 1-based, and the header is row 1
        let user_row = row_idx0 + 2;
        let record = result?;

        let mut row: Vec<Value> = Vec::with_capacity(schema.len());
        for (column, &csv_idx) in schema.columns.iter().zip(col_idxs.iter()) {
            let raw = record.get(csv_idx).unwrap_or("");
            row.push(parse_typed_value(user_row, &column.name, &column.data_type, raw)?);
        }
        rows.push(row);
    }

    Ok(DataSet::new(schema.clone(), rows))
}

/// Write `data` as CSV with a header row. Nulls are written as empty cells.
pub fn write_csv<W: std::io::Write>(writer: W, data: &DataSet) -> TransformResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(data.schema.column_names())?;
    for row in &data.rows {
        wtr.write_record(row.iter().map(ToString::to_string))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write `data` to a CSV file at `path`.
pub fn write_csv_to_path(path: impl AsRef<Path>, data: &DataSet) -> TransformResult<()> {
    let file = std::fs::File::create(path)?;
    write_csv(file, data)
}

fn parse_typed_value(row: usize, column: &str, data_type: &DataType, raw: &str) -> TransformResult<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }

    let parse_error = |message: String| TransformError::ParseError {
        row,
        column: column.to_owned(),
        raw: raw.to_owned(),
        message,
    };
    match data_type {
        DataType::Utf8 => Ok(Value::Utf8(trimmed.to_owned())),
        DataType::Int64 => trimmed
            .parse::<i64>()
            .map(Value::Int64)
            .map_err(|e| parse_error(e.to_string())),
        DataType::Float64 => trimmed
            .parse::<f64>()
            .map(Value::Float64)
            .map_err(|e| parse_error(e.to_string())),
        DataType::Bool => parse_bool(trimmed).map(Value::Bool).map_err(parse_error),
        DataType::Datetime => parse_datetime(trimmed).map(Value::Datetime).map_err(parse_error),
    }
}

fn parse_bool(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Ok(true),
        "false" | "f" | "0" | "no" | "n" => Ok(false),
        _ => Err("expected bool (true/false/1/0/yes/no)".to_string()),
    }
}

fn parse_datetime(s: &str) -> Result<NaiveDateTime, String> {
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| "expected a datetime like 2021-06-26 13:45:00 or a date like 2021-06-26".to_string())
}
