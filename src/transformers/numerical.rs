use crate::error::TransformResult;
use crate::sdtype::Sdtype;
use crate::types::{ColumnDef, DataSet, DataType, Value};

use super::null::{parse_replacement, MissingValueReplacement, NullTransformer};
use super::{expect_width, float_column, numeric_values, parse_bool_param, single_column, unknown_parameter, Transformer};

const NAME: &str = "FloatFormatter";

/// Passes numbers through as floats, handling missing values.
///
/// Outputs `value` (float) and, when missing values are modeled and were seen during fit,
/// `is_null` (float). Integer columns come back as integers on reverse.
#[derive(Debug, Clone, Default)]
pub struct FloatFormatter {
    missing_value_replacement: Option<MissingValueReplacement>,
    model_missing_values: bool,
    enforce_min_max_values: bool,
    null_transformer: NullTransformer,
    input: Option<ColumnDef>,
    min_value: Option<f64>,
    max_value: Option<f64>,
}

impl FloatFormatter {
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

    /// Clip reversed values to the range seen during fit.
    pub fn with_enforce_min_max_values(mut self, enforce: bool) -> Self {
        self.enforce_min_max_values = enforce;
        self
    }
}

impl Transformer for FloatFormatter {
    fn name(&self) -> &'static str {
        NAME
    }

    fn input_sdtype(&self) -> Sdtype {
        Sdtype::Numerical
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
        if self.enforce_min_max_values {
            params.push(("enforce_min_max_values", "true".to_string()));
        }
        params
    }

    fn set_param(&mut self, name: &str, value: &str) -> TransformResult<()> {
        match name {
            "missing_value_replacement" => self.missing_value_replacement = parse_replacement(value)?,
            "model_missing_values" => self.model_missing_values = parse_bool_param(NAME, name, value)?,
            "enforce_min_max_values" => self.enforce_min_max_values = parse_bool_param(NAME, name, value)?,
            _ => return Err(unknown_parameter(NAME, name)),
        }
        Ok(())
    }

    fn fit(&mut self, data: &DataSet) -> TransformResult<()> {
        let (def, values) = single_column(NAME, data)?;
        let numbers = numeric_values(&def.name, &values)?;

        let observed = numbers.iter().flatten();
        self.min_value = observed.clone().copied().reduce(f64::min);
        self.max_value = observed.copied().reduce(f64::max);

        self.null_transformer =
            NullTransformer::new(self.missing_value_replacement.clone(), self.model_missing_values);
        self.null_transformer.fit(&numbers);
        self.input = Some(def);
        Ok(())
    }

    fn transform(&self, data: &DataSet) -> TransformResult<DataSet> {
        let (def, values) = single_column(NAME, data)?;
        let numbers = numeric_values(&def.name, &values)?;
        let (filled, indicator) = self.null_transformer.transform(&numbers);

        let mut columns = vec![(ColumnDef::new("value", DataType::Float64), float_column(filled))];
        if let Some(indicator) = indicator {
            columns.push((ColumnDef::new("is_null", DataType::Float64), indicator));
        }
        Ok(DataSet::from_columns(columns))
    }

    fn reverse_transform(&self, data: &DataSet) -> TransformResult<DataSet> {
        let modeled = self.null_transformer.models_missing_values();
        expect_width(NAME, data, if modeled { 2 } else { 1 })?;
        let value_name = &data.schema.columns[0].name;
        let numbers = numeric_values(value_name, &data.rows.iter().map(|r| r[0].clone()).collect::<Vec<_>>())?;
        let indicator: Option<Vec<Value>> = modeled.then(|| data.rows.iter().map(|r| r[1].clone()).collect());
        let restored = self.null_transformer.reverse_transform(&numbers, indicator.as_deref());

        let def = self
            .input
            .clone()
            .unwrap_or_else(|| ColumnDef::new("value", DataType::Float64));
        let values = restored
            .into_iter()
            .map(|v| match v {
                None => Value::Null,
                Some(v) => {
                    let v = if self.enforce_min_max_values { self.clip(v) } else { v };
                    restore_storage(&def.data_type, v)
                }
            })
            .collect();
        Ok(DataSet::from_columns(vec![(def, values)]))
    }
}

impl FloatFormatter {
    fn clip(&self, v: f64) -> f64 {
        let v = self.min_value.map_or(v, |min| v.max(min));
        self.max_value.map_or(v, |max| v.min(max))
    }
}

fn restore_storage(data_type: &DataType, v: f64) -> Value {
    match data_type {
        DataType::Int64 => Value::Int64(v.round() as i64),
        DataType::Bool => Value::Bool(v.round() != 0.0),
        _ => Value::Float64(v),
    }
}
