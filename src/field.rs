//! Field keys: a single column or an ordered group of columns transformed together.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TransformError;

/// A transformable unit of a table.
///
/// `Field::Column("a")` and `Field::Columns(vec!["a"])` are different keys that name the
/// same underlying column; configuring both is rejected before fitting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    /// A single column name.
    Column(String),
    /// An ordered tuple of column names (a composite field).
    Columns(Vec<String>),
}

impl Field {
    /// A single-column field.
    pub fn column(name: impl Into<String>) -> Self {
        Self::Column(name.into())
    }

    /// A tuple field from the given column names.
    pub fn columns<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Columns(names.into_iter().map(Into::into).collect())
    }

    /// The column names making up this field, in order.
    pub fn names(&self) -> &[String] {
        match self {
            Field::Column(name) => std::slice::from_ref(name),
            Field::Columns(names) => names,
        }
    }

    /// `true` for tuple keys spanning more than one column.
    pub fn is_multi_column(&self) -> bool {
        matches!(self, Field::Columns(names) if names.len() > 1)
    }

    /// Prefix used to name the outputs of a transformer fitted on this field.
    pub fn prefix(&self) -> String {
        self.names().join("#")
    }

    /// `true` if this field and `other` share at least one column.
    pub fn overlaps(&self, other: &Field) -> bool {
        self.names().iter().any(|n| other.names().contains(n))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Column(name) => f.write_str(name),
            Field::Columns(names) if names.len() == 1 => write!(f, "({},)", names[0]),
            Field::Columns(names) => write!(f, "({})", names.join(", ")),
        }
    }
}

impl FromStr for Field {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some(inner) = s.strip_prefix('(').and_then(|rest| rest.strip_suffix(')')) else {
            return Ok(Field::Column(s.to_owned()));
        };
        let names: Vec<String> = inner
            .split(',')
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_owned)
            .collect();
        if names.is_empty() {
            return Err(TransformError::InvalidField {
                raw: s.to_owned(),
                message: "a tuple field needs at least one column".to_string(),
            });
        }
        Ok(Field::Columns(names))
    }
}

impl From<&str> for Field {
    fn from(name: &str) -> Self {
        Field::Column(name.to_owned())
    }
}

impl From<String> for Field {
    fn from(name: String) -> Self {
        Field::Column(name)
    }
}

impl<const N: usize> From<[&str; N]> for Field {
    fn from(names: [&str; N]) -> Self {
        Field::columns(names)
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
