use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::TransformResult;
use crate::field::Field;
use crate::sdtype::Sdtype;
use crate::transformers::{Transformer, TransformerRegistry};

/// Which sdtype each field has and which transformer encodes it.
///
/// Serializes as `{"sdtypes": {field: sdtype}, "transformers": {field: repr}}`, preserving
/// insertion order. Transformers are written as their [`Transformer::repr`] and resolved back
/// through a [`TransformerRegistry`] by [`Config::from_json`].
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub sdtypes: IndexMap<Field, Sdtype>,
    pub transformers: IndexMap<Field, Box<dyn Transformer>>,
}

#[derive(Serialize, Deserialize)]
struct RawConfig {
    #[serde(default)]
    sdtypes: IndexMap<Field, Sdtype>,
    #[serde(default)]
    transformers: IndexMap<Field, String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.sdtypes.is_empty() && self.transformers.is_empty()
    }

    fn raw(&self) -> RawConfig {
        RawConfig {
            sdtypes: self.sdtypes.clone(),
            transformers: self
                .transformers
                .iter()
                .map(|(field, t)| (field.clone(), t.repr()))
                .collect(),
        }
    }

    /// Pretty JSON with 4-space indentation.
    pub fn to_json(&self) -> TransformResult<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.raw().serialize(&mut ser)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Parse a config, creating each transformer from its representation.
    pub fn from_json(json: &str, registry: &TransformerRegistry) -> TransformResult<Self> {
        let raw: RawConfig = serde_json::from_str(json)?;
        let transformers = raw
            .transformers
            .into_iter()
            .map(|(field, repr)| Ok((field, registry.create(&repr)?)))
            .collect::<TransformResult<IndexMap<_, _>>>()?;
        Ok(Self {
            sdtypes: raw.sdtypes,
            transformers,
        })
    }
}

impl Serialize for Config {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw().serialize(serializer)
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = self.to_json().map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
