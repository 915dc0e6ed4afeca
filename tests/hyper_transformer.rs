use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use reversible_data_transforms::hyper::{Diagnostic, HyperTransformer, RecordingObserver};
use reversible_data_transforms::transformers::{
    FloatFormatter, FrequencyEncoder, LabelEncoder, OneHotEncoder, Transformer,
};
use reversible_data_transforms::types::{ColumnDef, DataSet, DataType, Value};
use reversible_data_transforms::{Field, Sdtype, TransformError, TransformResult};

fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
}

fn floats(values: &[f64]) -> Vec<Value> {
    values.iter().map(|v| Value::Float64(*v)).collect()
}

fn strings(values: &[&str]) -> Vec<Value> {
    values.iter().map(|v| Value::Utf8((*v).to_string())).collect()
}

fn scenario() -> DataSet {
    DataSet::from_columns(vec![
        (
            ColumnDef::new("integer", DataType::Int64),
            vec![Value::Int64(1), Value::Int64(2), Value::Int64(1), Value::Int64(3)],
        ),
        (ColumnDef::new("float", DataType::Float64), floats(&[0.1, 0.2, 0.1, 0.1])),
        (ColumnDef::new("categorical", DataType::Utf8), strings(&["a", "a", "b", "a"])),
        (
            ColumnDef::new("bool", DataType::Bool),
            vec![Value::Bool(false), Value::Bool(false), Value::Bool(true), Value::Bool(false)],
        ),
        (
            ColumnDef::new("datetime", DataType::Datetime),
            [date(2010, 2, 1), date(2010, 1, 1), date(2010, 2, 1), date(2010, 1, 1)]
                .into_iter()
                .map(Value::Datetime)
                .collect(),
        ),
    ])
}

fn with_nulls() -> DataSet {
    DataSet::from_columns(vec![
        (
            ColumnDef::new("integer", DataType::Int64),
            [1, 2, 1, 3, 1, 4, 2, 3].into_iter().map(Value::Int64).collect(),
        ),
        (
            ColumnDef::new("float", DataType::Float64),
            vec![
                Value::Float64(0.1),
                Value::Float64(0.2),
                Value::Float64(0.1),
                Value::Null,
                Value::Float64(0.1),
                Value::Float64(0.4),
                Value::Null,
                Value::Float64(0.3),
            ],
        ),
        (
            ColumnDef::new("categorical", DataType::Utf8),
            vec![
                Value::Utf8("a".into()),
                Value::Utf8("a".into()),
                Value::Null,
                Value::Utf8("b".into()),
                Value::Utf8("a".into()),
                Value::Utf8("b".into()),
                Value::Utf8("a".into()),
                Value::Utf8("a".into()),
            ],
        ),
        (
            ColumnDef::new("bool", DataType::Bool),
            vec![
                Value::Bool(false),
                Value::Null,
                Value::Bool(false),
                Value::Bool(true),
                Value::Bool(false),
                Value::Bool(true),
                Value::Bool(true),
                Value::Bool(false),
            ],
        ),
        (
            ColumnDef::new("datetime", DataType::Datetime),
            vec![
                Value::Null,
                Value::Datetime(date(2010, 2, 1)),
                Value::Datetime(date(2010, 1, 1)),
                Value::Datetime(date(2010, 1, 1)),
                Value::Datetime(date(2010, 1, 1)),
                Value::Datetime(date(2010, 2, 1)),
                Value::Datetime(date(2010, 1, 1)),
                Value::Datetime(date(2010, 1, 1)),
            ],
        ),
    ])
}

fn quiet() -> (HyperTransformer, Arc<RecordingObserver>) {
    let recorder = Arc::new(RecordingObserver::new());
    let ht = HyperTransformer::builder().observer(recorder.clone()).build();
    (ht, recorder)
}

/// Datetime to text, leaving a categorical output for the engine to chain on.
#[derive(Debug, Clone, Default)]
struct DatetimeToText {
    suggest_label_encoder: bool,
}

const TEXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

impl Transformer for DatetimeToText {
    fn name(&self) -> &'static str {
        "DatetimeToText"
    }

    fn input_sdtype(&self) -> Sdtype {
        Sdtype::Datetime
    }

    fn output_sdtypes(&self) -> Vec<(String, Sdtype)> {
        vec![("value".to_string(), Sdtype::Categorical)]
    }

    fn next_transformers(&self) -> Vec<(String, Box<dyn Transformer>)> {
        if self.suggest_label_encoder {
            vec![("value".to_string(), Box::new(LabelEncoder::new()) as Box<dyn Transformer>)]
        } else {
            Vec::new()
        }
    }

    fn fit(&mut self, _data: &DataSet) -> TransformResult<()> {
        Ok(())
    }

    fn transform(&self, data: &DataSet) -> TransformResult<DataSet> {
        let values = data
            .rows
            .iter()
            .map(|row| match &row[0] {
                Value::Datetime(dt) => Value::Utf8(dt.format(TEXT_FORMAT).to_string()),
                _ => Value::Null,
            })
            .collect();
        Ok(DataSet::from_columns(vec![(ColumnDef::new("value", DataType::Utf8), values)]))
    }

    fn reverse_transform(&self, data: &DataSet) -> TransformResult<DataSet> {
        let values = data
            .rows
            .iter()
            .map(|row| match &row[0] {
                Value::Utf8(s) => NaiveDateTime::parse_from_str(s, TEXT_FORMAT)
                    .map(Value::Datetime)
                    .unwrap_or(Value::Null),
                _ => Value::Null,
            })
            .collect();
        Ok(DataSet::from_columns(vec![(ColumnDef::new("value", DataType::Datetime), values)]))
    }
}

/// Splits `YYYY-MM-DD` text into integer parts that are not ML-ready on their own.
#[derive(Debug, Clone, Default)]
struct SplitDate;

impl Transformer for SplitDate {
    fn name(&self) -> &'static str {
        "SplitDate"
    }

    fn input_sdtype(&self) -> Sdtype {
        Sdtype::Other("date_text".to_string())
    }

    fn output_sdtypes(&self) -> Vec<(String, Sdtype)> {
        ["year", "month", "day"]
            .into_iter()
            .map(|s| (s.to_string(), Sdtype::Other("date_part".to_string())))
            .collect()
    }

    fn fit(&mut self, _data: &DataSet) -> TransformResult<()> {
        Ok(())
    }

    fn transform(&self, data: &DataSet) -> TransformResult<DataSet> {
        let mut parts: [Vec<Value>; 3] = Default::default();
        for row in &data.rows {
            let text = row[0].to_string();
            for (slot, piece) in parts.iter_mut().zip(text.split('-')) {
                slot.push(Value::Int64(piece.parse().unwrap_or_default()));
            }
        }
        let [year, month, day] = parts;
        Ok(DataSet::from_columns(vec![
            (ColumnDef::new("year", DataType::Int64), year),
            (ColumnDef::new("month", DataType::Int64), month),
            (ColumnDef::new("day", DataType::Int64), day),
        ]))
    }

    fn reverse_transform(&self, data: &DataSet) -> TransformResult<DataSet> {
        let values = data
            .rows
            .iter()
            .map(|row| {
                let part = |i: usize| row[i].as_f64().unwrap_or_default() as i64;
                Value::Utf8(format!("{:04}-{:02}-{:02}", part(0), part(1), part(2)))
            })
            .collect();
        Ok(DataSet::from_columns(vec![(ColumnDef::new("value", DataType::Utf8), values)]))
    }
}

/// Packs three integer columns into `y * 10000 + m * 100 + d`.
#[derive(Debug, Clone, Default)]
struct JoinParts {
    inputs: Vec<ColumnDef>,
}

impl Transformer for JoinParts {
    fn name(&self) -> &'static str {
        "JoinParts"
    }

    fn input_sdtype(&self) -> Sdtype {
        Sdtype::Other("date_part".to_string())
    }

    fn output_sdtypes(&self) -> Vec<(String, Sdtype)> {
        vec![("value".to_string(), Sdtype::Float)]
    }

    fn fit(&mut self, data: &DataSet) -> TransformResult<()> {
        if data.schema.len() != 3 {
            return Err(TransformError::DataShape {
                transformer: self.name().to_string(),
                expected: 3,
                found: data.schema.len(),
            });
        }
        self.inputs = data.schema.columns.clone();
        Ok(())
    }

    fn transform(&self, data: &DataSet) -> TransformResult<DataSet> {
        let values = data
            .rows
            .iter()
            .map(|row| {
                let part = |i: usize| row[i].as_f64().unwrap_or_default();
                Value::Float64(part(0) * 10_000.0 + part(1) * 100.0 + part(2))
            })
            .collect();
        Ok(DataSet::from_columns(vec![(ColumnDef::new("value", DataType::Float64), values)]))
    }

    fn reverse_transform(&self, data: &DataSet) -> TransformResult<DataSet> {
        let packed: Vec<i64> = data
            .rows
            .iter()
            .map(|row| row[0].as_f64().unwrap_or_default() as i64)
            .collect();
        let columns = self
            .inputs
            .iter()
            .enumerate()
            .map(|(i, def)| {
                let values = packed
                    .iter()
                    .map(|p| Value::Int64(match i {
                        0 => p / 10_000,
                        1 => p / 100 % 100,
                        _ => p % 100,
                    }))
                    .collect();
                (def.clone(), values)
            })
            .collect();
        Ok(DataSet::from_columns(columns))
    }
}

#[test]
fn concrete_scenario_produces_one_numeric_column_per_field() {
    let data = scenario();
    let (mut ht, _) = quiet();
    ht.detect_initial_config(&data).unwrap();
    ht.fit(&data).unwrap();

    let transformed = ht.transform(&data).unwrap();
    assert_eq!(
        transformed.column_names(),
        vec!["integer.value", "float.value", "categorical.value", "bool.value", "datetime.value"]
    );
    assert!(transformed.rows.iter().flatten().all(|v| matches!(v, Value::Float64(_))));
    assert_eq!(transformed.column("integer.value").unwrap(), floats(&[1.0, 2.0, 1.0, 3.0]));
    assert_eq!(transformed.column("categorical.value").unwrap(), floats(&[0.375, 0.375, 0.875, 0.375]));
    assert_eq!(transformed.column("bool.value").unwrap(), floats(&[0.0, 0.0, 1.0, 0.0]));
    assert_eq!(
        transformed.column("datetime.value").unwrap(),
        floats(&[1.2649824e18, 1.262304e18, 1.2649824e18, 1.262304e18])
    );

    assert_eq!(ht.reverse_transform(&transformed).unwrap(), data);
}

#[test]
fn fits_without_a_detected_config() {
    let data = with_nulls();
    let (mut ht, recorder) = quiet();
    let transformed = ht.fit_transform(&data).unwrap();

    assert_eq!(
        transformed.column_names(),
        vec![
            "integer.value",
            "float.value",
            "float.is_null",
            "categorical.value",
            "bool.value",
            "bool.is_null",
            "datetime.value",
            "datetime.is_null",
        ]
    );
    assert_eq!(
        transformed.column("categorical.value").unwrap(),
        floats(&[0.3125, 0.3125, 0.9375, 0.75, 0.3125, 0.75, 0.3125, 0.3125])
    );
    assert_eq!(transformed.column("bool.value").unwrap(), floats(&[0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0]));
    assert_eq!(ht.reverse_transform(&transformed).unwrap(), data);
    assert!(recorder.diagnostics().is_empty());
}

#[test]
fn transforms_a_subset_of_the_fitted_columns() {
    let data = with_nulls();
    let (mut ht, _) = quiet();
    ht.fit(&data).unwrap();

    let subset = data.select(&["float"]).unwrap();
    let transformed = ht.transform(&subset).unwrap();
    assert_eq!(transformed.column_names(), vec!["float.value", "float.is_null"]);
    assert_eq!(ht.reverse_transform(&transformed).unwrap(), subset);
}

#[test]
fn unseen_columns_pass_through_first() {
    let data = with_nulls();
    let (mut ht, _) = quiet();
    ht.fit(&data).unwrap();

    let mut extended = data.clone();
    extended.set_column(
        ColumnDef::new("z", DataType::Int64),
        (4..12).map(Value::Int64).collect(),
    );
    let transformed = ht.transform(&extended).unwrap();
    assert_eq!(transformed.column_names()[0], "z");

    let reversed = ht.reverse_transform(&transformed).unwrap();
    assert_eq!(
        reversed.column_names(),
        vec!["z", "integer", "float", "categorical", "bool", "datetime"]
    );
    assert_eq!(reversed.column("z"), extended.column("z"));
    assert_eq!(reversed.select(&data.column_names()).unwrap(), data);
}

#[test]
fn in_place_variants_match() {
    let data = scenario();
    let (mut ht, _) = quiet();
    ht.fit(&data).unwrap();

    let mut buffer = data.clone();
    ht.transform_in_place(&mut buffer).unwrap();
    assert_eq!(buffer, ht.transform(&data).unwrap());
    ht.reverse_transform_in_place(&mut buffer).unwrap();
    assert_eq!(buffer, data);
}

#[test]
fn guards_everything_before_fit() {
    let data = scenario();
    let (ht, _) = quiet();
    assert!(!ht.is_fitted());
    assert!(matches!(ht.transform(&data), Err(TransformError::NotFitted)));
    assert!(matches!(ht.reverse_transform(&data), Err(TransformError::NotFitted)));
    assert!(matches!(ht.get_transformer(&Field::column("integer")), Err(TransformError::NotFitted)));
    assert!(matches!(
        ht.get_output_transformers(&Field::column("integer")),
        Err(TransformError::NotFitted)
    ));
    assert!(matches!(
        ht.get_final_output_columns(&Field::column("integer")),
        Err(TransformError::NotFitted)
    ));
    assert!(matches!(ht.get_transformer_tree_yaml(), Err(TransformError::NotFitted)));
    assert!(matches!(ht.output_columns(), Err(TransformError::NotFitted)));
}

#[test]
fn rejects_a_column_configured_twice() {
    let transformers: Vec<(Field, Box<dyn Transformer>)> = vec![
        (Field::column("integer"), Box::new(FloatFormatter::new())),
        (Field::columns(["integer"]), Box::new(FloatFormatter::new())),
    ];
    let recorder = Arc::new(RecordingObserver::new());
    let mut ht = HyperTransformer::builder()
        .field_transformers(transformers)
        .observer(recorder)
        .build();

    let err = ht.fit(&scenario()).unwrap_err();
    assert!(matches!(err, TransformError::DuplicateField { .. }));
    assert_eq!(
        err.to_string(),
        "Multiple transformers specified for the field (integer,). Each field can have at most \
         one transformer defined in field_transformers."
    );
    assert!(!ht.is_fitted());
}

#[test]
fn refitting_is_idempotent() {
    let data = with_nulls();
    let (mut ht, _) = quiet();
    ht.detect_initial_config(&data).unwrap();

    ht.fit(&data).unwrap();
    let first_sequence: Vec<String> = ht
        .get_transformer_sequence()
        .unwrap()
        .iter()
        .map(|t| t.repr())
        .collect();
    let first_outputs = ht.output_columns().unwrap().to_vec();

    ht.fit(&data).unwrap();
    let second_sequence: Vec<String> = ht
        .get_transformer_sequence()
        .unwrap()
        .iter()
        .map(|t| t.repr())
        .collect();
    assert_eq!(first_sequence, second_sequence);
    assert_eq!(first_outputs, ht.output_columns().unwrap());
}

#[test]
fn chains_a_default_transformer_on_non_ml_ready_outputs() {
    let data = scenario();
    let transformers: Vec<(Field, Box<dyn Transformer>)> =
        vec![(Field::column("datetime"), Box::new(DatetimeToText::default()))];
    let recorder = Arc::new(RecordingObserver::new());
    let mut ht = HyperTransformer::builder()
        .field_transformers(transformers)
        .observer(recorder)
        .build();

    let transformed = ht.fit_transform(&data).unwrap();
    assert_eq!(
        transformed.column("datetime.value.value").unwrap(),
        floats(&[0.25, 0.75, 0.25, 0.75])
    );
    let chained = ht.get_transformer(&Field::column("datetime.value")).unwrap();
    assert_eq!(chained.repr(), "FrequencyEncoder()");
    assert_eq!(ht.reverse_transform(&transformed).unwrap(), data);
}

#[test]
fn follows_next_transformer_hints_unless_overridden() {
    let data = scenario();

    let hinted: Vec<(Field, Box<dyn Transformer>)> = vec![(
        Field::column("datetime"),
        Box::new(DatetimeToText { suggest_label_encoder: true }),
    )];
    let mut ht = HyperTransformer::builder()
        .field_transformers(hinted)
        .observer(Arc::new(RecordingObserver::new()))
        .build();
    let transformed = ht.fit_transform(&data).unwrap();
    assert_eq!(
        transformed.column("datetime.value.value").unwrap(),
        vec![Value::Int64(0), Value::Int64(1), Value::Int64(0), Value::Int64(1)]
    );
    assert_eq!(ht.reverse_transform(&transformed).unwrap(), data);

    ht.set_first_transformers_for_fields(vec![(
        Field::column("datetime.value"),
        Box::new(OneHotEncoder::new()) as Box<dyn Transformer>,
    )]);
    let transformed = ht.fit_transform(&data).unwrap();
    let datetime_outputs: Vec<String> = transformed
        .column_names()
        .into_iter()
        .filter(|c| c.starts_with("datetime"))
        .collect();
    assert_eq!(datetime_outputs, vec!["datetime.value.value0", "datetime.value.value1"]);
    assert_eq!(ht.reverse_transform(&transformed).unwrap(), data);
}

#[test]
fn explicit_transformer_applies_to_ml_ready_outputs() {
    let data = scenario();
    let transformers: Vec<(Field, Box<dyn Transformer>)> = vec![
        (Field::column("categorical"), Box::new(OneHotEncoder::new())),
        (Field::column("categorical.value0"), Box::new(FloatFormatter::new())),
    ];
    let mut ht = HyperTransformer::builder()
        .field_transformers(transformers)
        .observer(Arc::new(RecordingObserver::new()))
        .build();
    ht.fit(&data).unwrap();

    assert_eq!(
        ht.get_final_output_columns(&Field::column("categorical")).unwrap(),
        vec!["categorical.value0.value", "categorical.value1"]
    );
    let outputs = ht.get_output_transformers(&Field::column("categorical")).unwrap();
    assert_eq!(outputs.len(), 2);
    assert_eq!(outputs[0].1.map(|t| t.name()), Some("FloatFormatter"));
    assert!(outputs[1].1.is_none());

    let transformed = ht.transform(&data).unwrap();
    assert_eq!(ht.reverse_transform(&transformed).unwrap(), data);
}

#[test]
fn fits_composite_fields_from_input_columns() {
    let data = DataSet::from_columns(vec![
        (ColumnDef::new("year", DataType::Int64), vec![Value::Int64(2020), Value::Int64(2021)]),
        (ColumnDef::new("month", DataType::Int64), vec![Value::Int64(1), Value::Int64(12)]),
        (ColumnDef::new("amount", DataType::Float64), floats(&[9.5, 3.25])),
        (ColumnDef::new("day", DataType::Int64), vec![Value::Int64(2), Value::Int64(31)]),
    ]);
    let transformers: Vec<(Field, Box<dyn Transformer>)> =
        vec![(Field::columns(["year", "month", "day"]), Box::new(JoinParts::default()))];
    let mut ht = HyperTransformer::builder()
        .field_transformers(transformers)
        .observer(Arc::new(RecordingObserver::new()))
        .build();

    let transformed = ht.fit_transform(&data).unwrap();
    assert_eq!(transformed.column_names(), vec!["year#month#day.value", "amount.value"]);
    assert_eq!(transformed.column("year#month#day.value").unwrap(), floats(&[20_200_102.0, 20_211_231.0]));
    assert_eq!(ht.reverse_transform(&transformed).unwrap(), data);
}

#[test]
fn fits_composite_fields_once_all_outputs_exist() {
    let data = DataSet::from_columns(vec![(
        ColumnDef::new("date", DataType::Utf8),
        strings(&["2021-06-26", "1999-12-31", "2021-06-26"]),
    )]);
    let parts = Field::columns(["date.year", "date.month", "date.day"]);
    let transformers: Vec<(Field, Box<dyn Transformer>)> = vec![
        (Field::column("date"), Box::new(SplitDate)),
        (parts.clone(), Box::new(JoinParts::default())),
    ];
    let mut ht = HyperTransformer::builder()
        .field_transformers(transformers)
        .observer(Arc::new(RecordingObserver::new()))
        .build();

    let transformed = ht.fit_transform(&data).unwrap();
    assert_eq!(transformed.column_names(), vec!["date.year#date.month#date.day.value"]);
    assert_eq!(
        ht.get_final_output_columns(&Field::column("date")).unwrap(),
        vec!["date.year#date.month#date.day.value"]
    );
    let outputs = ht.get_output_transformers(&Field::column("date")).unwrap();
    assert!(outputs.iter().all(|(_, t)| t.map(|t| t.name()) == Some("JoinParts")));
    assert_eq!(ht.get_transformer(&parts).unwrap().name(), "JoinParts");

    assert_eq!(ht.reverse_transform(&transformed).unwrap(), data);
}

#[test]
fn single_category_round_trips() {
    let data = DataSet::from_columns(vec![(ColumnDef::new("a", DataType::Utf8), strings(&["a", "a", "a"]))]);
    let transformers: Vec<(Field, Box<dyn Transformer>)> =
        vec![(Field::column("a"), Box::new(OneHotEncoder::new()))];
    let mut ht = HyperTransformer::builder()
        .field_transformers(transformers)
        .observer(Arc::new(RecordingObserver::new()))
        .build();

    let transformed = ht.fit_transform(&data).unwrap();
    assert_eq!(transformed.column_names(), vec!["a.value0"]);
    assert_eq!(ht.reverse_transform(&transformed).unwrap(), data);
}

#[test]
fn pii_columns_pass_through() {
    let data = scenario();
    let (mut ht, _) = quiet();
    ht.detect_initial_config(&data).unwrap();
    ht.update_field_sdtypes([("categorical", Sdtype::Pii)]);
    assert!(!ht.get_config().transformers.contains_key(&Field::column("categorical")));

    let transformed = ht.fit_transform(&data).unwrap();
    assert_eq!(transformed.column("categorical"), data.column("categorical"));
    assert_eq!(ht.output_columns().unwrap()[2], "categorical");
    assert_eq!(ht.reverse_transform(&transformed).unwrap(), data);
}

#[test]
fn warns_about_configured_fields_missing_from_data() {
    let transformers: Vec<(Field, Box<dyn Transformer>)> = vec![
        (Field::column("integer"), Box::new(FloatFormatter::new())),
        (Field::column("intege"), Box::new(FloatFormatter::new())),
    ];
    let recorder = Arc::new(RecordingObserver::new());
    let mut ht = HyperTransformer::builder()
        .field_transformers(transformers)
        .observer(recorder.clone())
        .build();

    ht.fit(&scenario()).unwrap();
    assert_eq!(
        recorder.warnings(),
        vec![Diagnostic::UnfittedFields { fields: vec![Field::column("intege")] }]
    );
}

#[test]
fn unknown_fields_are_reported() {
    let (mut ht, _) = quiet();
    ht.fit(&scenario()).unwrap();
    assert!(matches!(
        ht.get_transformer(&Field::column("nope")),
        Err(TransformError::UnknownField { .. })
    ));
}

#[test]
fn exports_the_tree_as_yaml() {
    let data = scenario();
    let (mut ht, _) = quiet();
    ht.fit(&data).unwrap();

    let yaml = ht.get_transformer_tree_yaml().unwrap();
    assert!(yaml.starts_with("integer:\n"));
    assert!(yaml.contains("transformer: FrequencyEncoder"));
    assert!(yaml.contains("- datetime.value"));
    assert_eq!(ht.get_transformer_tree().unwrap().len(), 5);
}

#[test]
fn per_instance_defaults_beat_the_registry() {
    let data = scenario();
    let recorder = Arc::new(RecordingObserver::new());
    let mut ht = HyperTransformer::builder()
        .default_sdtype_transformers([(
            Sdtype::Categorical,
            Box::new(FrequencyEncoder::new().with_add_noise(true).with_seed(3)) as Box<dyn Transformer>,
        )])
        .observer(recorder)
        .build();
    ht.update_default_sdtype_transformers([(
        Sdtype::Categorical,
        Box::new(OneHotEncoder::new()) as Box<dyn Transformer>,
    )]);

    let transformed = ht.fit_transform(&data).unwrap();
    assert!(transformed.has_column("categorical.value0"));
    assert_eq!(
        ht.get_default_sdtype_transformers()[&Sdtype::Categorical].name(),
        "OneHotEncoder"
    );
    assert_eq!(ht.reverse_transform(&transformed).unwrap(), data);
}
