use crate::error::{TransformError, TransformResult};
use crate::sdtype::Sdtype;
use crate::types::{ColumnDef, DataSet, DataType, Value};

use super::null::{parse_replacement, MissingValueReplacement, NullTransformer};
use super::{expect_width, float_column, numeric_values, parse_bool_param, single_column, unknown_parameter, Transformer};

const NAME: &str = "BinaryEncoder";

/// Maps booleans to `1.0`/`0.0`.
#[derive(Debug, Clone, Default)]
pub struct BinaryEncoder {
    missing_value_replacement: Option<MissingValueReplacement>,
    model_missing_values: bool,
    null_transformer: NullTransformer,
    input: Option<ColumnDef>,
}

impl BinaryEncoder {
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

    fn encode(column: &str, values: &[Value]) -> TransformResult<Vec<Option<f64>>> {
        values
            .iter()
            .map(|value| match value {
                v if v.is_null() => Ok(None),
                Value::Bool(b) => Ok(Some(if *b { 1.0 } else { 0.0 })),
                other => Err(TransformError::InvalidValue {
                    column: column.to_owned(),
                    message: format!("expected a boolean, got '{other}'"),
                }),
            })
            .collect()
    }
}

impl Transformer for BinaryEncoder {
    fn name(&self) -> &'static str {
        NAME
    }

    fn input_sdtype(&self) -> Sdtype {
        Sdtype::Boolean
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
        let encoded = Self::encode(&def.name, &values)?;
        self.null_transformer =
            NullTransformer::new(self.missing_value_replacement.clone(), self.model_missing_values);
        self.null_transformer.fit(&encoded);
        self.input = Some(def);
        Ok(())
    }

    fn transform(&self, data: &DataSet) -> TransformResult<DataSet> {
        let (def, values) = single_column(NAME, data)?;
        let encoded = Self::encode(&def.name, &values)?;
        let (filled, indicator) = self.null_transformer.transform(&encoded);

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
            .unwrap_or_else(|| ColumnDef::new("value", DataType::Bool));
        let values = restored
            .into_iter()
            .map(|v| v.map_or(Value::Null, |v| Value::Bool(v > 0.5)))
            .collect();
        Ok(DataSet::from_columns(vec![(def, values)]))
    }
}
