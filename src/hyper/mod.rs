//! The transformation orchestration engine.
//!
//! [`HyperTransformer`] decides which transformer encodes each field, chains follow-up
//! transformers until every output is ML-ready, and replays the fitted chain forwards and
//! backwards.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use reversible_data_transforms::hyper::{HyperTransformer, RecordingObserver};
//! use reversible_data_transforms::types::{ColumnDef, DataSet, DataType, Value};
//!
//! # fn main() -> Result<(), reversible_data_transforms::TransformError> {
//! let data = DataSet::from_columns(vec![
//!     (ColumnDef::new("age", DataType::Int64), vec![Value::Int64(31), Value::Int64(45)]),
//!     (ColumnDef::new("plan", DataType::Utf8), vec![Value::Utf8("pro".into()), Value::Utf8("free".into())]),
//! ]);
//!
//! let mut ht = HyperTransformer::builder()
//!     .observer(Arc::new(RecordingObserver::new()))
//!     .build();
//! ht.detect_initial_config(&data)?;
//! let transformed = ht.fit_transform(&data)?;
//! assert_eq!(transformed.column_names(), vec!["age.value", "plan.value"]);
//! assert_eq!(ht.reverse_transform(&transformed)?, data);
//! # Ok(())
//! # }
//! ```

mod config;
mod executor;
mod fit;
mod multi_column;
mod observer;
mod tree;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

pub use config::Config;
pub use observer::{
    CompositeObserver, ConsoleObserver, Diagnostic, HyperObserver, RecordingObserver, Severity,
    TracingObserver,
};
pub use tree::{NodeId, TransformerTree, TreeNode};

use crate::error::{TransformError, TransformResult};
use crate::field::Field;
use crate::sdtype::Sdtype;
use crate::transformers::{Transformer, TransformerRegistry};
use crate::types::DataSet;

/// State produced by a successful fit.
#[derive(Debug, Clone, Default)]
struct Fitted {
    tree: TransformerTree,
    input_columns: Vec<String>,
    output_columns: Vec<String>,
}

/// Fits, applies and inverts a tree of transformers over a whole table.
#[derive(Clone)]
pub struct HyperTransformer {
    config: Config,
    default_sdtype_transformers: IndexMap<Sdtype, Box<dyn Transformer>>,
    registry: TransformerRegistry,
    observer: Arc<dyn HyperObserver>,
    multi_column_fields: HashMap<String, Field>,
    fitted: Option<Fitted>,
}

impl fmt::Debug for HyperTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HyperTransformer")
            .field("config", &self.config)
            .field("default_sdtype_transformers", &self.default_sdtype_transformers)
            .field("fitted", &self.fitted.is_some())
            .finish()
    }
}

impl Default for HyperTransformer {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`HyperTransformer`].
pub struct HyperTransformerBuilder {
    config: Config,
    default_sdtype_transformers: IndexMap<Sdtype, Box<dyn Transformer>>,
    registry: Option<TransformerRegistry>,
    observer: Option<Arc<dyn HyperObserver>>,
}

impl HyperTransformerBuilder {
    /// Initial sdtype per field.
    pub fn field_sdtypes<I, F>(mut self, sdtypes: I) -> Self
    where
        I: IntoIterator<Item = (F, Sdtype)>,
        F: Into<Field>,
    {
        self.config
            .sdtypes
            .extend(sdtypes.into_iter().map(|(f, s)| (f.into(), s)));
        self
    }

    /// Initial explicit transformer per field.
    pub fn field_transformers<I, F>(mut self, transformers: I) -> Self
    where
        I: IntoIterator<Item = (F, Box<dyn Transformer>)>,
        F: Into<Field>,
    {
        self.config
            .transformers
            .extend(transformers.into_iter().map(|(f, t)| (f.into(), t)));
        self
    }

    /// Sdtype defaults consulted before the registry.
    pub fn default_sdtype_transformers<I>(mut self, defaults: I) -> Self
    where
        I: IntoIterator<Item = (Sdtype, Box<dyn Transformer>)>,
    {
        self.default_sdtype_transformers.extend(defaults);
        self
    }

    /// Registry used for default lookups and for creating transformers by name.
    /// Defaults to [`TransformerRegistry::builtin`].
    pub fn registry(mut self, registry: TransformerRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Receiver for diagnostics. Defaults to [`ConsoleObserver`].
    pub fn observer(mut self, observer: Arc<dyn HyperObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn build(self) -> HyperTransformer {
        let multi_column_fields = multi_column::multi_column_fields(&self.config);
        HyperTransformer {
            config: self.config,
            default_sdtype_transformers: self.default_sdtype_transformers,
            registry: self.registry.unwrap_or_else(TransformerRegistry::builtin),
            observer: self.observer.unwrap_or_else(|| Arc::new(ConsoleObserver)),
            multi_column_fields,
            fitted: None,
        }
    }
}

impl HyperTransformer {
    /// An engine with the built-in registry and no configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> HyperTransformerBuilder {
        HyperTransformerBuilder {
            config: Config::new(),
            default_sdtype_transformers: IndexMap::new(),
            registry: None,
            observer: None,
        }
    }

    pub fn registry(&self) -> &TransformerRegistry {
        &self.registry
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    fn notify(&self, diagnostic: Diagnostic) {
        self.observer.on_diagnostic(&diagnostic);
    }

    fn fitted(&self) -> TransformResult<&Fitted> {
        self.fitted.as_ref().ok_or(TransformError::NotFitted)
    }

    /// Recompute derived state after a configuration change and drop any fit.
    fn config_changed(&mut self) {
        self.multi_column_fields = multi_column::multi_column_fields(&self.config);
        if self.fitted.take().is_some() {
            self.notify(Diagnostic::RefitRequired);
        }
    }

    fn warn_mismatch(&self, field: &Field, transformer: &dyn Transformer) {
        let Some(sdtype) = self.config.sdtypes.get(field) else {
            return;
        };
        let transformer_sdtype = transformer.input_sdtype();
        if !transformer_sdtype.accepts(sdtype) {
            self.notify(Diagnostic::SdtypeMismatch {
                field: field.clone(),
                field_sdtype: sdtype.clone(),
                transformer_sdtype,
            });
        }
    }

    /// Default transformer for `sdtype`: the per-instance override, else the registry's.
    fn default_transformer(&self, sdtype: &Sdtype) -> Option<Box<dyn Transformer>> {
        self.default_sdtype_transformers
            .get(sdtype)
            .cloned()
            .or_else(|| self.registry.default_for(sdtype))
    }

    // ---- configuration -------------------------------------------------------------------

    /// Infer an sdtype and default transformer for every column of `data`, replacing the
    /// current configuration.
    pub fn detect_initial_config(&mut self, data: &DataSet) -> TransformResult<()> {
        let mut config = Config::new();
        for column in &data.schema.columns {
            let field = Field::column(column.name.clone());
            let sdtype = Sdtype::infer(&column.data_type);
            if let Some(transformer) = self.default_transformer(&sdtype) {
                config.transformers.insert(field.clone(), transformer);
            }
            config.sdtypes.insert(field, sdtype);
        }
        let rendered = config.to_json()?;
        self.config = config;
        self.config_changed();
        tracing::debug!(columns = data.schema.len(), "detected initial config");
        self.notify(Diagnostic::ConfigDetected { config: rendered });
        Ok(())
    }

    pub fn get_config(&self) -> &Config {
        &self.config
    }

    /// Replace the configuration, warning about transformers that do not match their field's
    /// sdtype.
    pub fn set_config(&mut self, config: Config) {
        self.config = config;
        for (field, transformer) in &self.config.transformers {
            self.warn_mismatch(field, transformer.as_ref());
        }
        self.config_changed();
    }

    /// Merge new sdtypes into the configuration.
    ///
    /// A configured transformer that cannot handle the new sdtype is swapped for the default
    /// transformer of that sdtype, or removed if there is none.
    pub fn update_field_sdtypes<I, F>(&mut self, sdtypes: I)
    where
        I: IntoIterator<Item = (F, Sdtype)>,
        F: Into<Field>,
    {
        for (field, sdtype) in sdtypes {
            let field = field.into();
            let stale = self
                .config
                .transformers
                .get(&field)
                .is_some_and(|t| !t.input_sdtype().accepts(&sdtype));
            if stale {
                match self.default_transformer(&sdtype) {
                    Some(t) => {
                        self.config.transformers.insert(field.clone(), t);
                    }
                    None => {
                        self.config.transformers.shift_remove(&field);
                    }
                }
            }
            self.config.sdtypes.insert(field, sdtype);
        }
        self.config_changed();
    }

    /// Assign `transformer` to every field configured with `sdtype`.
    pub fn update_transformers_by_sdtype(
        &mut self,
        sdtype: &Sdtype,
        transformer: Box<dyn Transformer>,
    ) -> TransformResult<()> {
        if self.config.sdtypes.is_empty() {
            return Err(TransformError::NothingToUpdate);
        }
        let fields: Vec<Field> = self
            .config
            .sdtypes
            .iter()
            .filter(|(_, s)| *s == sdtype)
            .map(|(f, _)| f.clone())
            .collect();
        for field in fields {
            self.config.transformers.insert(field, transformer.clone());
        }
        self.config_changed();
        Ok(())
    }

    /// Merge explicit transformers into the configuration, warning about sdtype mismatches.
    pub fn update_transformers<I, F>(&mut self, transformers: I) -> TransformResult<()>
    where
        I: IntoIterator<Item = (F, Box<dyn Transformer>)>,
        F: Into<Field>,
    {
        if self.config.transformers.is_empty() {
            return Err(TransformError::NothingToUpdate);
        }
        for (field, transformer) in transformers {
            let field = field.into();
            self.warn_mismatch(&field, transformer.as_ref());
            self.config.transformers.insert(field, transformer);
        }
        self.config_changed();
        Ok(())
    }

    /// Set the first transformer of fields, without any validation. Useful to chain on
    /// intermediate outputs such as `datetime.value`.
    pub fn set_first_transformers_for_fields<I, F>(&mut self, transformers: I)
    where
        I: IntoIterator<Item = (F, Box<dyn Transformer>)>,
        F: Into<Field>,
    {
        self.config
            .transformers
            .extend(transformers.into_iter().map(|(f, t)| (f.into(), t)));
        self.config_changed();
    }

    pub fn get_default_sdtype_transformers(&self) -> &IndexMap<Sdtype, Box<dyn Transformer>> {
        &self.default_sdtype_transformers
    }

    /// Merge per-instance sdtype defaults.
    pub fn update_default_sdtype_transformers<I>(&mut self, defaults: I)
    where
        I: IntoIterator<Item = (Sdtype, Box<dyn Transformer>)>,
    {
        self.default_sdtype_transformers.extend(defaults);
        self.config_changed();
    }

    // ---- introspection -------------------------------------------------------------------

    /// Column names seen at fit time, in order.
    pub fn input_columns(&self) -> TransformResult<&[String]> {
        Ok(&self.fitted()?.input_columns)
    }

    /// Final ML-ready columns, in output order.
    pub fn output_columns(&self) -> TransformResult<&[String]> {
        Ok(&self.fitted()?.output_columns)
    }

    pub fn get_transformer_tree(&self) -> TransformResult<&TransformerTree> {
        Ok(&self.fitted()?.tree)
    }

    /// Fitted transformers in transform order.
    pub fn get_transformer_sequence(&self) -> TransformResult<Vec<&dyn Transformer>> {
        Ok(self
            .fitted()?
            .tree
            .sequence()
            .map(|n| n.transformer.as_ref())
            .collect())
    }

    fn node_for(&self, field: &Field) -> TransformResult<(&TransformerTree, NodeId)> {
        let tree = &self.fitted()?.tree;
        let id = tree
            .find(field)
            .ok_or_else(|| TransformError::UnknownField { field: field.clone() })?;
        Ok((tree, id))
    }

    /// The fitted transformer of `field`.
    pub fn get_transformer(&self, field: &Field) -> TransformResult<&dyn Transformer> {
        let (tree, id) = self.node_for(field)?;
        tree.node(id)
            .map(|n| n.transformer.as_ref())
            .ok_or_else(|| TransformError::UnknownField { field: field.clone() })
    }

    /// Each output of `field`'s transformer with the transformer chained on it, if any.
    pub fn get_output_transformers(
        &self,
        field: &Field,
    ) -> TransformResult<Vec<(String, Option<&dyn Transformer>)>> {
        let (tree, id) = self.node_for(field)?;
        Ok(tree
            .output_consumers(id)
            .into_iter()
            .map(|(column, consumer)| {
                let transformer = consumer
                    .and_then(|c| tree.node(c))
                    .map(|n| n.transformer.as_ref());
                (column, transformer)
            })
            .collect())
    }

    /// The ML-ready columns that `field` ends up as.
    pub fn get_final_output_columns(&self, field: &Field) -> TransformResult<Vec<String>> {
        let (tree, id) = self.node_for(field)?;
        Ok(tree.final_output_columns(id))
    }

    /// The fitted tree as YAML: field → `outputs`, `transformer`.
    pub fn get_transformer_tree_yaml(&self) -> TransformResult<String> {
        self.fitted()?.tree.to_yaml()
    }
}
