use chrono::{DateTime, NaiveDateTime};

use crate::error::{TransformError, TransformResult};
use crate::sdtype::Sdtype;
use crate::types::{ColumnDef, DataSet, DataType, Value};

use super::null::{parse_replacement, MissingValueReplacement, NullTransformer};
use super::{expect_width, float_column, numeric_values, parse_bool_param, single_column, unknown_parameter, Transformer};

const NAME: &str = "UnixTimestampEncoder";
const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Converts datetimes to nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Default)]
pub struct UnixTimestampEncoder {
    missing_value_replacement: Option<MissingValueReplacement>,
    model_missing_values: bool,
    null_transformer: NullTransformer,
    input: Option<ColumnDef>,
}

impl UnixTimestampEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_missing_value_replacement(mut self, replacement: MissingValueReplacement) -> Self {
        self.missing_value_replacement = Some(replacement);
        self
    }

    pub fn with_model_missing_values(mut self, model: bool) -> Self {
        self.model_missing_values = model;
        self
    }
}

fn to_nanos(column: &str, value: &Value) -> TransformResult<Option<f64>> {
    match value {
        v if v.is_null() => Ok(None),
        Value::Datetime(dt) => dt
            .and_utc()
            .timestamp_nanos_opt()
            .map(|n| Some(n as f64))
            .ok_or_else(|| TransformError::InvalidValue {
                column: column.to_owned(),
                message: format!("datetime {dt} is outside the nanosecond timestamp range"),
            }),
        other => Err(TransformError::InvalidValue {
            column: column.to_owned(),
            message: format!("expected a datetime, got '{other}'"),
        }),
    }
}

fn from_nanos(column: &str, nanos: f64) -> TransformResult<NaiveDateTime> {
    let nanos = nanos.round() as i64;
    let secs = nanos.div_euclid(NANOS_PER_SECOND);
    let subsec = nanos.rem_euclid(NANOS_PER_SECOND) as u32;
    DateTime::from_timestamp(secs, subsec)
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| TransformError::InvalidValue {
            column: column.to_owned(),
            message: format!("{nanos} is not a valid timestamp"),
        })
}

impl Transformer for UnixTimestampEncoder {
    fn name(&self) -> &'static str {
        NAME
    }

    fn input_sdtype(&self) -> Sdtype {
        Sdtype::Datetime
    }

    fn output_sdtypes(&self) -> Vec<(String, Sdtype)> {
        let mut outputs = vec![("value".to_string(), Sdtype::Float)];
        if self.null_transformer.models_missing_values() {
            outputs.push(("is_null".to_string(), Sdtype::Float));
        }
        outputs
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(replacement) = &self.missing_value_replacement {
            params.push(("missing_value_replacement", replacement.to_string()));
        }
        if self.model_missing_values {
            params.push(("model_missing_values", "true".to_string()));
        }
        params
    }

    fn set_param(&mut self, name: &str, value: &str) -> TransformResult<()> {
        match name {
            "missing_value_replacement" => self.missing_value_replacement = parse_replacement(value)?,
            "model_missing_values" => self.model_missing_values = parse_bool_param(NAME, name, value)?,
            _ => return Err(unknown_parameter(NAME, name)),
        }
        Ok(())
    }

    fn fit(&mut self, data: &DataSet) -> TransformResult<()> {
        let (def, values) = single_column(NAME, data)?;
        let nanos = values
            .iter()
            .map(|v| to_nanos(&def.name, v))
            .collect::<TransformResult<Vec<_>>>()?;
        self.null_transformer =
            NullTransformer::new(self.missing_value_replacement.clone(), self.model_missing_values);
        self.null_transformer.fit(&nanos);
        self.input = Some(def);
        Ok(())
    }

    fn transform(&self, data: &DataSet) -> TransformResult<DataSet> {
        let (def, values) = single_column(NAME, data)?;
        let nanos = values
            .iter()
            .map(|v| to_nanos(&def.name, v))
            .collect::<TransformResult<Vec<_>>>()?;
        let (filled, indicator) = self.null_transformer.transform(&nanos);

        let mut columns = vec![(ColumnDef::new("value", DataType::Float64), float_column(filled))];
        if let Some(indicator) = indicator {
            columns.push((ColumnDef::new("is_null", DataType::Float64), indicator));
        }
        Ok(DataSet::from_columns(columns))
    }

    fn reverse_transform(&self, data: &DataSet) -> TransformResult<DataSet> {
        let modeled = self.null_transformer.models_missing_values();
        expect_width(NAME, data, if modeled { 2 } else { 1 })?;
        let column: Vec<Value> = data.rows.iter().map(|r| r[0].clone()).collect();
        let numbers = numeric_values(&data.schema.columns[0].name, &column)?;
        let indicator: Option<Vec<Value>> = modeled.then(|| data.rows.iter().map(|r| r[1].clone()).collect());
        let restored = self.null_transformer.reverse_transform(&numbers, indicator.as_deref());

        let def = self
            .input
            .clone()
            .unwrap_or_else(|| ColumnDef::new("value", DataType::Datetime));
        let values = restored
            .into_iter()
            .map(|v| match v {
                None => Ok(Value::Null),
                Some(n) => from_nanos(&def.name, n).map(Value::Datetime),
            })
            .collect::<TransformResult<Vec<_>>>()?;
        Ok(DataSet::from_columns(vec![(def, values)]))
    }
}
