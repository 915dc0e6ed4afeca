//! Semantic data types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::DataType;

/// Domain meaning of a column, independent of how it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Sdtype {
    Numerical,
    Integer,
    Float,
    Categorical,
    Boolean,
    Datetime,
    Pii,
    /// Any other user-defined label.
    Other(String),
}

impl Sdtype {
    /// Infer a semantic type from a storage type.
    pub fn infer(data_type: &DataType) -> Self {
        match data_type {
            DataType::Int64 => Sdtype::Integer,
            DataType::Float64 => Sdtype::Float,
            DataType::Bool => Sdtype::Boolean,
            DataType::Datetime => Sdtype::Datetime,
            DataType::Utf8 => Sdtype::Categorical,
        }
    }

    /// ML-ready types need no further transformation.
    pub fn is_ml_ready(&self) -> bool {
        matches!(self, Sdtype::Numerical | Sdtype::Integer | Sdtype::Float)
    }

    /// `true` if a transformer declaring `self` as its input type can handle `column`.
    ///
    /// `integer` and `float` columns are accepted by `numerical` transformers.
    pub fn accepts(&self, column: &Sdtype) -> bool {
        self == column || (*self == Sdtype::Numerical && column.is_ml_ready())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Sdtype::Numerical => "numerical",
            Sdtype::Integer => "integer",
            Sdtype::Float => "float",
            Sdtype::Categorical => "categorical",
            Sdtype::Boolean => "boolean",
            Sdtype::Datetime => "datetime",
            Sdtype::Pii => "pii",
            Sdtype::Other(label) => label,
        }
    }
}

impl fmt::Display for Sdtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sdtype {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "numerical" => Sdtype::Numerical,
            "integer" => Sdtype::Integer,
            "float" => Sdtype::Float,
            "categorical" => Sdtype::Categorical,
            "boolean" => Sdtype::Boolean,
            "datetime" => Sdtype::Datetime,
            "pii" => Sdtype::Pii,
            other => Sdtype::Other(other.to_owned()),
        })
    }
}

impl From<&str> for Sdtype {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(sdtype) => sdtype,
            Err(never) => match never {},
        }
    }
}

impl Serialize for Sdtype {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Sdtype {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Sdtype::from(raw.as_str()))
    }
}
