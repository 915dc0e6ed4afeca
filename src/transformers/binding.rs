use crate::error::{TransformError, TransformResult};
use crate::field::Field;
use crate::types::DataSet;

use super::Transformer;

/// Binds a fitted transformer to the table columns it reads and writes.
///
/// Outputs are named `<prefix>.<suffix>`, where the prefix is the field's columns joined by
/// `#`. Applying a binding replaces the consumed columns with the produced ones, at the
/// position of the first consumed column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnBinding {
    columns: Vec<String>,
    prefix: String,
    output_columns: Vec<String>,
}

impl ColumnBinding {
    /// Binding for `field` with the given output suffixes.
    pub fn new<I, S>(field: &Field, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let prefix = field.prefix();
        let output_columns = suffixes
            .into_iter()
            .map(|suffix| format!("{prefix}.{}", suffix.as_ref()))
            .collect();
        Self {
            columns: field.names().to_vec(),
            prefix,
            output_columns,
        }
    }

    /// Binding for `field` using the outputs a fitted transformer declares.
    pub fn for_transformer(field: &Field, transformer: &dyn Transformer) -> Self {
        let suffixes: Vec<String> = transformer
            .output_sdtypes()
            .into_iter()
            .map(|(suffix, _)| suffix)
            .collect();
        Self::new(field, suffixes)
    }

    /// Input column names, in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Output column names, in order.
    pub fn output_columns(&self) -> &[String] {
        &self.output_columns
    }

    /// Full output column name for `suffix`.
    pub fn output_name(&self, suffix: &str) -> String {
        format!("{}.{suffix}", self.prefix)
    }

    /// Replace the input columns of `data` with the transformer's outputs.
    ///
    /// Returns `Ok(false)` and leaves `data` untouched when an input column is missing.
    pub fn transform(&self, transformer: &dyn Transformer, data: &mut DataSet) -> TransformResult<bool> {
        let Some(input) = data.select(&self.columns) else {
            return Ok(false);
        };
        let output = transformer.transform(&input)?;
        splice(transformer.name(), data, &self.columns, output, &self.output_columns)?;
        Ok(true)
    }

    /// Replace the output columns of `data` with the reconstructed inputs.
    ///
    /// Returns `Ok(false)` and leaves `data` untouched when an output column is missing.
    pub fn reverse_transform(
        &self,
        transformer: &dyn Transformer,
        data: &mut DataSet,
    ) -> TransformResult<bool> {
        let Some(output) = data.select(&self.output_columns) else {
            return Ok(false);
        };
        let input = transformer.reverse_transform(&output)?;
        splice(transformer.name(), data, &self.output_columns, input, &self.columns)?;
        Ok(true)
    }
}

fn splice(
    transformer: &str,
    data: &mut DataSet,
    consumed: &[String],
    produced: DataSet,
    names: &[String],
) -> TransformResult<()> {
    if produced.schema.len() != names.len() {
        return Err(TransformError::DataShape {
            transformer: transformer.to_owned(),
            expected: names.len(),
            found: produced.schema.len(),
        });
    }
    if !names.is_empty() && produced.row_count() != data.row_count() {
        return Err(TransformError::InvalidValue {
            column: names[0].clone(),
            message: format!(
                "{transformer} produced {} rows, expected {}",
                produced.row_count(),
                data.row_count()
            ),
        });
    }

    let position = match consumed.first().and_then(|c| data.schema.index_of(c)) {
        Some(anchor) => data.schema.columns[..anchor]
            .iter()
            .filter(|c| !consumed.contains(&c.name))
            .count(),
        None => data.schema.len(),
    };
    data.drop_columns(consumed);
    for (offset, ((mut def, values), name)) in produced.into_columns().into_iter().zip(names).enumerate() {
        def.name = name.clone();
        data.insert_column(position + offset, def, values);
    }
    Ok(())
}
