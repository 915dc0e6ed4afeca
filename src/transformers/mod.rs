//! The transformer contract and the built-in transformer family.
//!
//! A [`Transformer`] encodes the columns of one field into numeric outputs and decodes them
//! back. Transformers work positionally: `transform` receives the field's columns in order and
//! returns its outputs in the order of [`Transformer::output_sdtypes`]; `reverse_transform` does
//! the opposite. Naming the outputs `<prefix>.<suffix>` and splicing them into a table is the
//! job of [`ColumnBinding`].

mod binding;
mod boolean;
mod categorical;
mod datetime;
mod null;
mod numerical;
mod registry;

use std::fmt;

pub use binding::ColumnBinding;
pub use boolean::BinaryEncoder;
pub use categorical::{FrequencyEncoder, LabelEncoder, OneHotEncoder};
pub use datetime::UnixTimestampEncoder;
pub use null::{MissingValueReplacement, NullTransformer};
pub use numerical::FloatFormatter;
pub use registry::TransformerRegistry;

use crate::error::{TransformError, TransformResult};
use crate::sdtype::Sdtype;
use crate::types::{ColumnDef, DataSet, Value};

/// Encoder/decoder for one semantic type.
pub trait Transformer: TransformerClone + fmt::Debug + Send + Sync {
    /// Registry name of the transformer, e.g. `"FloatFormatter"`.
    fn name(&self) -> &'static str;

    /// The sdtype this transformer is built for.
    fn input_sdtype(&self) -> Sdtype;

    /// Output suffixes and their sdtypes, in output order.
    ///
    /// Only meaningful after [`Transformer::fit`]; some outputs depend on the fitted data.
    fn output_sdtypes(&self) -> Vec<(String, Sdtype)>;

    /// Transformers to chain on specific outputs, keyed by suffix.
    fn next_transformers(&self) -> Vec<(String, Box<dyn Transformer>)> {
        Vec::new()
    }

    /// Parameters that differ from their defaults, already formatted for [`Transformer::repr`].
    fn params(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    /// Set a parameter from its textual form.
    fn set_param(&mut self, name: &str, _value: &str) -> TransformResult<()> {
        Err(unknown_parameter(self.name(), name))
    }

    /// Turn off any randomness. Used for transformers picked automatically for
    /// intermediate outputs.
    fn disable_noise(&mut self) {}

    /// Learn whatever is needed to transform `data` (the field's columns, in order).
    fn fit(&mut self, data: &DataSet) -> TransformResult<()>;

    /// Encode the field's columns into the declared outputs.
    fn transform(&self, data: &DataSet) -> TransformResult<DataSet>;

    /// Decode the outputs back into the field's columns.
    fn reverse_transform(&self, data: &DataSet) -> TransformResult<DataSet>;

    /// `Name(param=value, ...)`; parseable by [`TransformerRegistry::create`].
    fn repr(&self) -> String {
        let params: Vec<String> = self
            .params()
            .into_iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        format!("{}({})", self.name(), params.join(", "))
    }
}

/// Object-safe cloning for boxed transformers.
pub trait TransformerClone {
    fn clone_box(&self) -> Box<dyn Transformer>;
}

impl<T> TransformerClone for T
where
    T: Transformer + Clone + 'static,
{
    fn clone_box(&self) -> Box<dyn Transformer> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn Transformer> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

impl fmt::Display for dyn Transformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr())
    }
}

pub(crate) fn unknown_parameter(transformer: &str, parameter: &str) -> TransformError {
    TransformError::InvalidParameter {
        transformer: transformer.to_owned(),
        parameter: parameter.to_owned(),
        message: "unknown parameter".to_string(),
    }
}

pub(crate) fn invalid_parameter(
    transformer: &str,
    parameter: &str,
    message: impl Into<String>,
) -> TransformError {
    TransformError::InvalidParameter {
        transformer: transformer.to_owned(),
        parameter: parameter.to_owned(),
        message: message.into(),
    }
}

pub(crate) fn parse_bool_param(transformer: &str, parameter: &str, raw: &str) -> TransformResult<bool> {
    match raw.trim() {
        "true" | "True" => Ok(true),
        "false" | "False" => Ok(false),
        _ => Err(invalid_parameter(transformer, parameter, format!("expected a bool, got {raw}"))),
    }
}

/// Strip one level of single or double quotes.
pub(crate) fn unquote(raw: &str) -> &str {
    let raw = raw.trim();
    for quote in ['\'', '"'] {
        if let Some(inner) = raw.strip_prefix(quote).and_then(|r| r.strip_suffix(quote)) {
            return inner;
        }
    }
    raw
}

/// Ensure `data` has exactly `expected` columns.
pub(crate) fn expect_width(transformer: &str, data: &DataSet, expected: usize) -> TransformResult<()> {
    if data.schema.len() != expected {
        return Err(TransformError::DataShape {
            transformer: transformer.to_owned(),
            expected,
            found: data.schema.len(),
        });
    }
    Ok(())
}

/// The single column of a one-column field.
pub(crate) fn single_column(transformer: &str, data: &DataSet) -> TransformResult<(ColumnDef, Vec<Value>)> {
    expect_width(transformer, data, 1)?;
    let mut columns = data.clone().into_columns();
    columns.pop().ok_or_else(|| TransformError::DataShape {
        transformer: transformer.to_owned(),
        expected: 1,
        found: 0,
    })
}

/// Numeric view of a column; nulls become `None`.
pub(crate) fn numeric_values(column: &str, values: &[Value]) -> TransformResult<Vec<Option<f64>>> {
    values
        .iter()
        .map(|value| {
            if value.is_null() {
                return Ok(None);
            }
            value.as_f64().map(Some).ok_or_else(|| TransformError::InvalidValue {
                column: column.to_owned(),
                message: format!("expected a numeric value, got '{value}'"),
            })
        })
        .collect()
}

pub(crate) fn float_column(values: impl IntoIterator<Item = Option<f64>>) -> Vec<Value> {
    values
        .into_iter()
        .map(|v| v.map_or(Value::Null, Value::Float64))
        .collect()
}


#[cfg(test)]
mod tests {
    use super::{unquote, FloatFormatter, FrequencyEncoder, Transformer};

    #[test]
    fn repr_lists_only_non_default_params() {
        assert_eq!(FrequencyEncoder::new().repr(), "FrequencyEncoder()");
        let t: Box<dyn Transformer> = Box::new(FloatFormatter::new().with_model_missing_values(true));
        assert_eq!(t.repr(), "FloatFormatter(model_missing_values=true)");
        assert_eq!(t.to_string(), t.repr());
    }

    #[test]
    fn boxed_transformers_clone() {
        let t: Box<dyn Transformer> = Box::new(FrequencyEncoder::new().with_add_noise(true));
        let copy = t.clone();
        assert_eq!(copy.repr(), t.repr());
    }

    #[test]
    fn unquote_strips_one_level() {
        assert_eq!(unquote("'mean'"), "mean");
        assert_eq!(unquote("\"mode\""), "mode");
        assert_eq!(unquote(" 3.5 "), "3.5");
    }
}
