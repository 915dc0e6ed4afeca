use std::sync::Arc;

use reversible_data_transforms::hyper::{HyperTransformer, RecordingObserver};
use reversible_data_transforms::io::{read_csv_from_path, read_csv_from_reader, write_csv};
use reversible_data_transforms::types::{ColumnDef, DataType, Schema, Value};
use reversible_data_transforms::TransformError;

const FIXTURE: &str = "tests/fixtures/customers.csv";

fn customers_schema() -> Schema {
    Schema::new(vec![
        ColumnDef::new("id", DataType::Int64),
        ColumnDef::new("signup", DataType::Datetime),
        ColumnDef::new("plan", DataType::Utf8),
        ColumnDef::new("monthly_spend", DataType::Float64),
        ColumnDef::new("newsletter", DataType::Bool),
    ])
}

#[test]
fn reads_fixture_with_nulls() {
    let ds = read_csv_from_path(FIXTURE, &customers_schema()).unwrap();
    assert_eq!(ds.row_count(), 5);
    assert_eq!(ds.rows[2][1], Value::Null);
    assert_eq!(ds.rows[2][4], Value::Null);
    assert_eq!(ds.rows[1][3], Value::Null);
    assert_eq!(ds.rows[0][2], Value::Utf8("pro".to_string()));
}

#[test]
fn writing_the_fixture_back_is_lossless() {
    let ds = read_csv_from_path(FIXTURE, &customers_schema()).unwrap();
    let mut buf = Vec::new();
    write_csv(&mut buf, &ds).unwrap();
    assert_eq!(
        String::from_utf8(buf).unwrap(),
        std::fs::read_to_string(FIXTURE).unwrap()
    );
}

#[test]
fn transformed_csv_reverses_to_the_original() {
    let original = read_csv_from_path(FIXTURE, &customers_schema()).unwrap();
    let mut ht = HyperTransformer::builder()
        .observer(Arc::new(RecordingObserver::new()))
        .build();
    let transformed = ht.fit_transform(&original).unwrap();

    let mut buf = Vec::new();
    write_csv(&mut buf, &transformed).unwrap();

    let numeric = Schema::new(
        ht.output_columns()
            .unwrap()
            .iter()
            .map(|c| ColumnDef::new(c.clone(), DataType::Float64))
            .collect(),
    );
    let mut rdr = csv::Reader::from_reader(buf.as_slice());
    let reloaded = read_csv_from_reader(&mut rdr, &numeric).unwrap();
    assert_eq!(reloaded, transformed);
    assert_eq!(ht.reverse_transform(&reloaded).unwrap(), original);
}

#[test]
fn missing_header_is_reported() {
    let input = "id,plan\n1,pro\n";
    let mut rdr = csv::Reader::from_reader(input.as_bytes());
    let err = read_csv_from_reader(&mut rdr, &customers_schema()).unwrap_err();
    assert!(matches!(err, TransformError::MissingColumn { ref column } if column == "signup"));
    assert_eq!(err.to_string(), "missing required column 'signup'");
}
