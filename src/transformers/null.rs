//! Missing-value handling shared by the numeric-output transformers.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::TransformError;
use crate::types::Value;

/// What to put in place of a missing value.
#[derive(Debug, Clone, PartialEq)]
pub enum MissingValueReplacement {
    /// Mean of the observed values.
    Mean,
    /// Most frequent observed value.
    Mode,
    /// A fixed value.
    Constant(f64),
}

impl fmt::Display for MissingValueReplacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingValueReplacement::Mean => f.write_str("'mean'"),
            MissingValueReplacement::Mode => f.write_str("'mode'"),
            MissingValueReplacement::Constant(v) => write!(f, "{v}"),
        }
    }
}

impl FromStr for MissingValueReplacement {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match super::unquote(s) {
            "mean" => Ok(Self::Mean),
            "mode" => Ok(Self::Mode),
            other => other.parse::<f64>().map(Self::Constant).map_err(|_| {
                super::invalid_parameter(
                    "NullTransformer",
                    "missing_value_replacement",
                    format!("expected 'mean', 'mode', None or a number, got {s}"),
                )
            }),
        }
    }
}

/// Parse an optional replacement, where `None` keeps nulls.
pub(crate) fn parse_replacement(raw: &str) -> Result<Option<MissingValueReplacement>, TransformError> {
    match super::unquote(raw) {
        "None" | "none" | "null" => Ok(None),
        _ => raw.parse().map(Some),
    }
}

/// Fills missing values and optionally models where they were.
///
/// With no replacement configured nulls pass through untouched. When `model_missing_values`
/// is set and nulls were seen during fit, [`NullTransformer::transform`] also returns a
/// `1.0`/`0.0` indicator column so the nulls can be restored exactly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NullTransformer {
    missing_value_replacement: Option<MissingValueReplacement>,
    model_missing_values: bool,
    fill_value: Option<f64>,
    nulls_seen: bool,
}

impl NullTransformer {
    pub fn new(
        missing_value_replacement: Option<MissingValueReplacement>,
        model_missing_values: bool,
    ) -> Self {
        Self {
            missing_value_replacement,
            model_missing_values,
            ..Self::default()
        }
    }

    pub fn fit(&mut self, values: &[Option<f64>]) {
        let observed: Vec<f64> = values.iter().flatten().copied().collect();
        self.nulls_seen = observed.len() < values.len();
        self.fill_value = match &self.missing_value_replacement {
            None => None,
            Some(MissingValueReplacement::Mean) => Some(mean(&observed)),
            Some(MissingValueReplacement::Mode) => Some(mode(&observed)),
            Some(MissingValueReplacement::Constant(v)) => Some(*v),
        };
    }

    /// `true` when transform produces an indicator column.
    pub fn models_missing_values(&self) -> bool {
        self.model_missing_values && self.nulls_seen
    }

    /// Value used in place of nulls, if any.
    pub fn fill_value(&self) -> Option<f64> {
        self.fill_value
    }

    /// Filled values plus the optional null indicator.
    pub fn transform(&self, values: &[Option<f64>]) -> (Vec<Option<f64>>, Option<Vec<Value>>) {
        let filled = values.iter().map(|v| v.or(self.fill_value)).collect();
        let indicator = self.models_missing_values().then(|| {
            values
                .iter()
                .map(|v| Value::Float64(if v.is_none() { 1.0 } else { 0.0 }))
                .collect()
        });
        (filled, indicator)
    }

    /// Undo [`NullTransformer::transform`]: rows flagged by the indicator become null again.
    pub fn reverse_transform(&self, values: &[Option<f64>], indicator: Option<&[Value]>) -> Vec<Option<f64>> {
        match indicator {
            Some(flags) => values
                .iter()
                .zip(flags)
                .map(|(v, flag)| match flag.as_f64() {
                    Some(f) if f > 0.5 => None,
                    _ => *v,
                })
                .collect(),
            None => values.to_vec(),
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn mode(values: &[f64]) -> f64 {
    // bits -> (count, first position)
    let mut counts: HashMap<u64, (usize, usize)> = HashMap::new();
    for (idx, v) in values.iter().enumerate() {
        counts.entry(v.to_bits()).or_insert((0, idx)).0 += 1;
    }
    counts
        .into_iter()
        .max_by(|(_, (ca, ia)), (_, (cb, ib))| ca.cmp(cb).then(ib.cmp(ia)))
        .map_or(0.0, |(bits, _)| f64::from_bits(bits))
}
