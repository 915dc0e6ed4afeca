//! `reversible-data-transforms` turns heterogeneous tabular data into ML-ready numeric columns
//! and back.
//!
//! The entrypoint is [`HyperTransformer`]. It takes a [`types::DataSet`], decides which
//! [`transformers::Transformer`] encodes each field (from an explicit configuration, or from the
//! column's semantic type), chains further transformers on every output that is not yet
//! numeric, and records enough to invert the whole pipeline.
//!
//! ## Quick example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use reversible_data_transforms::demo::get_demo;
//! use reversible_data_transforms::hyper::RecordingObserver;
//! use reversible_data_transforms::HyperTransformer;
//!
//! # fn main() -> Result<(), reversible_data_transforms::TransformError> {
//! let data = get_demo(100);
//!
//! let mut ht = HyperTransformer::builder()
//!     .observer(Arc::new(RecordingObserver::new()))
//!     .build();
//! ht.detect_initial_config(&data)?;
//! let transformed = ht.fit_transform(&data)?;
//! assert!(transformed.column_names().contains(&"age.value".to_string()));
//!
//! let reversed = ht.reverse_transform(&transformed)?;
//! assert_eq!(reversed, data);
//! # Ok(())
//! # }
//! ```
//!
//! ## Semantic types and defaults
//!
//! Without configuration every column gets an [`Sdtype`] inferred from its storage type and
//! the default transformer for that sdtype:
//!
//! | storage     | sdtype        | default transformer                                       |
//! |-------------|---------------|-----------------------------------------------------------|
//! | `Int64`     | `integer`     | `FloatFormatter(missing_value_replacement='mean', model_missing_values=true)` |
//! | `Float64`   | `float`       | same as `integer`                                         |
//! | `Utf8`      | `categorical` | `FrequencyEncoder()`                                      |
//! | `Bool`      | `boolean`     | `BinaryEncoder(missing_value_replacement='mode', model_missing_values=true)` |
//! | `Datetime`  | `datetime`    | `UnixTimestampEncoder(missing_value_replacement='mean', model_missing_values=true)` |
//!
//! `pii` has no default, so such columns pass through untouched.
//!
//! ## Modules
//!
//! - [`hyper`]: the engine, its configuration and diagnostics
//! - [`transformers`]: the transformer contract, built-in transformers and the registry
//! - [`types`]: schema + in-memory dataset types
//! - [`io`]: CSV reading and writing
//! - [`demo`]: a synthetic demo table
//! - [`error`]: the crate error type

pub mod demo;
pub mod error;
pub mod field;
pub mod hyper;
pub mod io;
pub mod sdtype;
pub mod transformers;
pub mod types;

pub use error::{TransformError, TransformResult};
pub use field::Field;
pub use hyper::{Config, HyperTransformer};
pub use sdtype::Sdtype;
