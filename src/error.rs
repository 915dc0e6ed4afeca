use thiserror::Error;

use crate::field::Field;

/// Convenience result type for transformation operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Error type returned by the engine, the transformers and table I/O.
///
/// Structural problems (an unfitted engine, a field configured twice) surface here and abort
/// the call. Modeling-quality concerns such as sdtype mismatches are reported as
/// [`crate::hyper::Diagnostic`]s instead.
#[derive(Debug, Error)]
pub enum TransformError {
    /// `transform`, `reverse_transform` or tree introspection was called before `fit`.
    #[error(
        "this HyperTransformer is not fitted. Please call 'fit' or 'fit_transform' before \
         transforming or inspecting the transformer tree"
    )]
    NotFitted,

    /// The same column is claimed by more than one key of the transformer assignment.
    #[error(
        "Multiple transformers specified for the field {field}. Each field can have at most \
         one transformer defined in field_transformers."
    )]
    DuplicateField { field: Field },

    /// An update was requested on an empty configuration.
    #[error(
        "Nothing to update. Use the `detect_initial_config` method to pre-populate all the \
         sdtypes and transformers from your dataset."
    )]
    NothingToUpdate,

    /// The field has no node in the fitted transformer tree.
    #[error("the field {field} is not part of the fitted transformer tree")]
    UnknownField { field: Field },

    /// A column required by a transformer is absent.
    #[error("missing required column '{column}'")]
    MissingColumn { column: String },

    /// A transformer received or produced the wrong number of columns.
    #[error("{transformer} expected {expected} column(s) but got {found}")]
    DataShape {
        transformer: String,
        expected: usize,
        found: usize,
    },

    /// A value could not be handled by a transformer.
    #[error("invalid value in column '{column}': {message}")]
    InvalidValue { column: String, message: String },

    /// No transformer with this name is registered.
    #[error("unknown transformer '{name}'")]
    UnknownTransformer { name: String },

    /// A transformer parameter was unknown or could not be parsed.
    #[error("invalid parameter '{parameter}' for {transformer}: {message}")]
    InvalidParameter {
        transformer: String,
        parameter: String,
        message: String,
    },

    /// A field key could not be parsed.
    #[error("invalid field '{raw}': {message}")]
    InvalidField { raw: String, message: String },

    /// Underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading/writing error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Config (de)serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Tree export error.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A CSV value could not be parsed into the required [`crate::types::DataType`].
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },
}
