use std::collections::HashSet;

use indexmap::IndexMap;

use crate::error::{TransformError, TransformResult};
use crate::field::Field;
use crate::sdtype::Sdtype;
use crate::transformers::{ColumnBinding, Transformer};
use crate::types::DataSet;

use super::multi_column::{multi_column_fields, validate_field_transformers};
use super::tree::TransformerTree;
use super::{Diagnostic, Fitted, HyperTransformer};

/// Working state of a single `fit` call.
struct FitState {
    data: DataSet,
    tree: TransformerTree,
    /// Columns already consumed by a transformer or passed through.
    handled: HashSet<String>,
    /// Input columns left untouched because no transformer applies.
    passthrough: HashSet<String>,
}

impl FitState {
    fn is_ready(&self, field: &Field) -> bool {
        self.data.has_columns(field.names()) && !field.names().iter().any(|c| self.handled.contains(c))
    }
}

impl HyperTransformer {
    /// Fit a transformer tree on `data`.
    ///
    /// Explicitly configured fields go first, in configuration order. The remaining columns are
    /// grouped by sdtype (groups in order of first appearance) and given their default
    /// transformer. Columns without any applicable transformer pass through unchanged.
    pub fn fit(&mut self, data: &DataSet) -> TransformResult<()> {
        self.fitted = None;
        validate_field_transformers(&self.config)?;
        self.multi_column_fields = multi_column_fields(&self.config);

        let input_columns = data.column_names();
        let mut state = FitState {
            data: data.clone(),
            tree: TransformerTree::new(),
            handled: HashSet::new(),
            passthrough: HashSet::new(),
        };
        tracing::debug!(rows = data.row_count(), columns = input_columns.len(), "fitting");

        let explicit: Vec<(Field, Box<dyn Transformer>)> = self
            .config
            .transformers
            .iter()
            .map(|(f, t)| (f.clone(), t.clone()))
            .collect();
        for (field, transformer) in explicit {
            if state.is_ready(&field) {
                self.fit_field(&mut state, field, transformer)?;
            }
        }

        for (sdtype, fields) in self.group_remaining_by_sdtype(data, &state) {
            for field in fields {
                if !state.is_ready(&field) {
                    continue;
                }
                match self.default_transformer(&sdtype) {
                    Some(transformer) => self.fit_field(&mut state, field, transformer)?,
                    None => {
                        tracing::debug!(%field, %sdtype, "no transformer, passing through");
                        for column in field.names() {
                            state.handled.insert(column.clone());
                            state.passthrough.insert(column.clone());
                        }
                    }
                }
            }
        }

        self.warn_unfitted_fields(&state);

        let output_columns = output_columns(&state, &input_columns);
        self.fitted = Some(Fitted {
            tree: state.tree,
            input_columns,
            output_columns,
        });
        Ok(())
    }

    /// Fit on `data`, then transform it.
    pub fn fit_transform(&mut self, data: &DataSet) -> TransformResult<DataSet> {
        self.fit(data)?;
        self.transform(data)
    }

    /// Unconfigured input columns, grouped by sdtype in order of first appearance.
    fn group_remaining_by_sdtype(&self, data: &DataSet, state: &FitState) -> IndexMap<Sdtype, Vec<Field>> {
        let mut groups: IndexMap<Sdtype, Vec<Field>> = IndexMap::new();
        let mut queued: HashSet<Field> = HashSet::new();
        for column in &data.schema.columns {
            if state.handled.contains(&column.name) {
                continue;
            }
            let field = self
                .multi_column_fields
                .get(&column.name)
                .cloned()
                .unwrap_or_else(|| Field::column(column.name.clone()));
            if !queued.insert(field.clone()) {
                continue;
            }
            let sdtype = self
                .config
                .sdtypes
                .get(&field)
                .cloned()
                .unwrap_or_else(|| Sdtype::infer(&column.data_type));
            groups.entry(sdtype).or_default().push(field);
        }
        groups
    }

    /// Fit `transformer` on `field`, then chain transformers on its outputs.
    fn fit_field(
        &self,
        state: &mut FitState,
        field: Field,
        mut transformer: Box<dyn Transformer>,
    ) -> TransformResult<()> {
        let input = state
            .data
            .select(field.names())
            .ok_or_else(|| TransformError::MissingColumn {
                column: field.names().join(", "),
            })?;
        transformer.fit(&input)?;
        let binding = ColumnBinding::for_transformer(&field, transformer.as_ref());
        binding.transform(transformer.as_ref(), &mut state.data)?;
        state.handled.extend(field.names().iter().cloned());
        tracing::debug!(%field, transformer = %transformer.repr(), outputs = ?binding.output_columns(), "fitted field");

        let output_sdtypes = transformer.output_sdtypes();
        let mut hints = transformer.next_transformers();
        let outputs = binding.output_columns().to_vec();
        state.tree.push(field, transformer, binding);

        for ((suffix, sdtype), output) in output_sdtypes.into_iter().zip(outputs) {
            let output_field = self
                .multi_column_fields
                .get(&output)
                .cloned()
                .unwrap_or_else(|| Field::column(output.clone()));
            let hint = hints
                .iter()
                .position(|(s, _)| *s == suffix)
                .map(|idx| hints.swap_remove(idx).1);
            let Some(next) = self.next_transformer(&output_field, &sdtype, hint) else {
                continue;
            };
            // A tuple field is fitted once its last column has been produced.
            if state.is_ready(&output_field) {
                self.fit_field(state, output_field, next)?;
            }
        }
        Ok(())
    }

    /// Pick the transformer for an intermediate output.
    ///
    /// An explicit transformer for the output wins, even on ML-ready outputs. Otherwise
    /// ML-ready outputs stop the chain; other outputs take the transformer's own hint, then the
    /// per-instance sdtype default, then the registry default with noise disabled.
    fn next_transformer(
        &self,
        output: &Field,
        sdtype: &Sdtype,
        hint: Option<Box<dyn Transformer>>,
    ) -> Option<Box<dyn Transformer>> {
        if let Some(explicit) = self.config.transformers.get(output) {
            return Some(explicit.clone());
        }
        if sdtype.is_ml_ready() {
            return None;
        }
        if hint.is_some() {
            return hint;
        }
        if let Some(default) = self.default_sdtype_transformers.get(sdtype) {
            return Some(default.clone());
        }
        let mut fallback = self.registry.default_for(sdtype)?;
        fallback.disable_noise();
        Some(fallback)
    }

    fn warn_unfitted_fields(&self, state: &FitState) {
        let mut unfitted: Vec<Field> = Vec::new();
        for field in self.config.transformers.keys().chain(self.config.sdtypes.keys()) {
            let fitted = field.names().iter().all(|c| state.handled.contains(c));
            if !fitted && !unfitted.contains(field) {
                unfitted.push(field.clone());
            }
        }
        if !unfitted.is_empty() {
            self.notify(Diagnostic::UnfittedFields { fields: unfitted });
        }
    }
}

/// Final outputs of every input column, in input order, without repeats.
fn output_columns(state: &FitState, input_columns: &[String]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for input in input_columns {
        let produced = match state.tree.consumer_of(input) {
            Some(id) => state.tree.final_output_columns(id),
            None if state.passthrough.contains(input) || !state.handled.contains(input) => {
                vec![input.clone()]
            }
            None => Vec::new(),
        };
        for column in produced {
            if seen.insert(column.clone()) {
                columns.push(column);
            }
        }
    }
    columns
}
