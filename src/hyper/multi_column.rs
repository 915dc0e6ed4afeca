use std::collections::{HashMap, HashSet};

use crate::error::{TransformError, TransformResult};
use crate::field::Field;

use super::config::Config;

/// Map every column of a multi-column key to that key.
///
/// Sdtype keys are visited before transformer keys; when two keys share a column the later one
/// wins. Single-column keys are ignored.
pub(crate) fn multi_column_fields(config: &Config) -> HashMap<String, Field> {
    let mut fields = HashMap::new();
    for field in config.sdtypes.keys().chain(config.transformers.keys()) {
        if !field.is_multi_column() {
            continue;
        }
        for column in field.names() {
            fields.insert(column.clone(), field.clone());
        }
    }
    fields
}

/// Reject transformer assignments that claim the same column under two keys.
pub(crate) fn validate_field_transformers(config: &Config) -> TransformResult<()> {
    let mut seen: HashSet<&str> = HashSet::new();
    for field in config.transformers.keys() {
        if field.names().iter().any(|c| seen.contains(c.as_str())) {
            return Err(TransformError::DuplicateField { field: field.clone() });
        }
        seen.extend(field.names().iter().map(String::as_str));
    }
    Ok(())
}
