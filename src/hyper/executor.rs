use std::collections::HashSet;

use crate::error::TransformResult;
use crate::types::DataSet;

use super::HyperTransformer;

impl HyperTransformer {
    /// Encode `data` with the fitted tree.
    ///
    /// Columns not seen during fit are kept, ahead of the transformed columns. Fields whose
    /// columns are missing from `data` are skipped.
    pub fn transform(&self, data: &DataSet) -> TransformResult<DataSet> {
        let mut out = data.clone();
        self.transform_in_place(&mut out)?;
        Ok(out)
    }

    /// [`HyperTransformer::transform`], reusing the caller's table.
    pub fn transform_in_place(&self, data: &mut DataSet) -> TransformResult<()> {
        let fitted = self.fitted()?;
        let known: HashSet<&str> = fitted.input_columns.iter().map(String::as_str).collect();
        let mut order: Vec<String> = data
            .schema
            .column_names()
            .filter(|c| !known.contains(c))
            .map(str::to_owned)
            .collect();

        let mut applied = 0usize;
        for node in fitted.tree.sequence() {
            if node.binding.transform(node.transformer.as_ref(), data)? {
                applied += 1;
            }
        }
        tracing::debug!(applied, total = fitted.tree.len(), rows = data.row_count(), "transformed");

        order.extend(fitted.output_columns.iter().filter(|c| data.has_column(c)).cloned());
        *data = data.select_present(&order);
        Ok(())
    }

    /// Decode data produced by [`HyperTransformer::transform`] back to the original columns.
    ///
    /// Columns that are not transformer outputs are kept, ahead of the restored columns.
    pub fn reverse_transform(&self, data: &DataSet) -> TransformResult<DataSet> {
        let mut out = data.clone();
        self.reverse_transform_in_place(&mut out)?;
        Ok(out)
    }

    /// [`HyperTransformer::reverse_transform`], reusing the caller's table.
    pub fn reverse_transform_in_place(&self, data: &mut DataSet) -> TransformResult<()> {
        let fitted = self.fitted()?;
        let known: HashSet<&str> = fitted.output_columns.iter().map(String::as_str).collect();
        let mut order: Vec<String> = data
            .schema
            .column_names()
            .filter(|c| !known.contains(c))
            .map(str::to_owned)
            .collect();

        let mut applied = 0usize;
        for node in fitted.tree.sequence().rev() {
            if node.binding.reverse_transform(node.transformer.as_ref(), data)? {
                applied += 1;
            }
        }
        tracing::debug!(applied, total = fitted.tree.len(), rows = data.row_count(), "reverse transformed");

        order.extend(fitted.input_columns.iter().filter(|c| data.has_column(c)).cloned());
        *data = data.select_present(&order);
        Ok(())
    }
}
