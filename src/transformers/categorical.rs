//! Encoders for categorical fields.
//!
//! Categories are compared by value, with every null (including NaN) collapsed into a single
//! null category.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{TransformError, TransformResult};
use crate::sdtype::Sdtype;
use crate::types::{ColumnDef, DataSet, DataType, Value};

use super::{expect_width, invalid_parameter, parse_bool_param, single_column, unknown_parameter, Transformer};

fn same_category(a: &Value, b: &Value) -> bool {
    (a.is_null() && b.is_null()) || a == b
}

fn normalize(value: &Value) -> Value {
    if value.is_null() { Value::Null } else { value.clone() }
}

/// Distinct categories in order of first appearance, with their counts.
fn count_categories(values: &[Value]) -> Vec<(Value, usize)> {
    let mut counts: Vec<(Value, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(c, _)| same_category(c, value)) {
            Some((_, count)) => *count += 1,
            None => counts.push((normalize(value), 1)),
        }
    }
    counts
}

fn position_of(categories: &[Value], value: &Value) -> Option<usize> {
    categories.iter().position(|c| same_category(c, value))
}

fn fitted_def(input: &Option<ColumnDef>) -> ColumnDef {
    input
        .clone()
        .unwrap_or_else(|| ColumnDef::new("value", DataType::Utf8))
}

#[derive(Debug, Clone, PartialEq)]
struct Interval {
    category: Value,
    start: f64,
    end: f64,
    mean: f64,
}

/// Maps each category to a float inside `[0, 1]`.
///
/// Categories are sorted by descending frequency (ties keep first-appearance order) and given
/// consecutive sub-intervals of `[0, 1]` sized by their frequency. A category encodes to the
/// midpoint of its interval, or to a uniform sample inside it when `add_noise` is set. Values
/// never seen during fit encode as the most frequent category.
#[derive(Debug, Clone, Default)]
pub struct FrequencyEncoder {
    add_noise: bool,
    seed: Option<u64>,
    intervals: Vec<Interval>,
    input: Option<ColumnDef>,
}

impl FrequencyEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_add_noise(mut self, add_noise: bool) -> Self {
        self.add_noise = add_noise;
        self
    }

    /// Seed for the noise generator. Without one, every transform draws fresh entropy.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Fitted categories, most frequent first.
    pub fn categories(&self) -> Vec<Value> {
        self.intervals.iter().map(|i| i.category.clone()).collect()
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn decode(&self, encoded: f64) -> Value {
        let encoded = encoded.clamp(0.0, 1.0);
        self.intervals
            .iter()
            .find(|i| encoded < i.end)
            .or_else(|| self.intervals.last())
            .map_or(Value::Null, |i| i.category.clone())
    }
}

impl Transformer for FrequencyEncoder {
    fn name(&self) -> &'static str {
        "FrequencyEncoder"
    }

    fn input_sdtype(&self) -> Sdtype {
        Sdtype::Categorical
    }

    fn output_sdtypes(&self) -> Vec<(String, Sdtype)> {
        vec![("value".to_string(), Sdtype::Float)]
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if self.add_noise {
            params.push(("add_noise", "true".to_string()));
        }
        if let Some(seed) = self.seed {
            params.push(("seed", seed.to_string()));
        }
        params
    }

    fn set_param(&mut self, name: &str, value: &str) -> TransformResult<()> {
        match name {
            "add_noise" => self.add_noise = parse_bool_param(self.name(), name, value)?,
            "seed" => {
                let seed = super::unquote(value)
                    .parse::<u64>()
                    .map_err(|e| invalid_parameter(self.name(), name, e.to_string()))?;
                self.seed = Some(seed);
            }
            _ => return Err(unknown_parameter(self.name(), name)),
        }
        Ok(())
    }

    fn disable_noise(&mut self) {
        self.add_noise = false;
    }

    fn fit(&mut self, data: &DataSet) -> TransformResult<()> {
        let (def, values) = single_column(self.name(), data)?;
        let mut counts = count_categories(&values);
        // stable sort keeps first-appearance order among ties
        counts.sort_by(|a, b| b.1.cmp(&a.1));

        let total = values.len() as f64;
        let mut start = 0.0;
        self.intervals = counts
            .into_iter()
            .map(|(category, count)| {
                let width = count as f64 / total;
                let interval = Interval {
                    category,
                    start,
                    end: start + width,
                    mean: start + width / 2.0,
                };
                start += width;
                interval
            })
            .collect();
        self.input = Some(def);
        Ok(())
    }

    fn transform(&self, data: &DataSet) -> TransformResult<DataSet> {
        let (_, values) = single_column(self.name(), data)?;
        let categories = self.categories();
        let mut rng = self.add_noise.then(|| self.rng());
        let encoded = values
            .iter()
            .map(|value| {
                let Some(interval) = position_of(&categories, value)
                    .or((!categories.is_empty()).then_some(0))
                    .map(|idx| &self.intervals[idx])
                else {
                    return Value::Null;
                };
                match rng.as_mut() {
                    Some(rng) if interval.end > interval.start => {
                        Value::Float64(rng.gen_range(interval.start..interval.end))
                    }
                    _ => Value::Float64(interval.mean),
                }
            })
            .collect();
        Ok(DataSet::from_columns(vec![(ColumnDef::new("value", DataType::Float64), encoded)]))
    }

    fn reverse_transform(&self, data: &DataSet) -> TransformResult<DataSet> {
        expect_width(self.name(), data, 1)?;
        let values = data
            .rows
            .iter()
            .map(|row| row[0].as_f64().map_or(Value::Null, |v| self.decode(v)))
            .collect();
        Ok(DataSet::from_columns(vec![(fitted_def(&self.input), values)]))
    }
}

/// One float indicator column per category seen during fit.
///
/// Outputs are named `value0`, `value1`, ... in first-appearance order. Unseen values encode as
/// all zeros; reverse picks the category with the largest indicator.
#[derive(Debug, Clone, Default)]
pub struct OneHotEncoder {
    categories: Vec<Value>,
    input: Option<ColumnDef>,
}

impl OneHotEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn categories(&self) -> &[Value] {
        &self.categories
    }
}

impl Transformer for OneHotEncoder {
    fn name(&self) -> &'static str {
        "OneHotEncoder"
    }

    fn input_sdtype(&self) -> Sdtype {
        Sdtype::Categorical
    }

    fn output_sdtypes(&self) -> Vec<(String, Sdtype)> {
        (0..self.categories.len())
            .map(|i| (format!("value{i}"), Sdtype::Float))
            .collect()
    }

    fn fit(&mut self, data: &DataSet) -> TransformResult<()> {
        let (def, values) = single_column(self.name(), data)?;
        self.categories = count_categories(&values).into_iter().map(|(c, _)| c).collect();
        self.input = Some(def);
        Ok(())
    }

    fn transform(&self, data: &DataSet) -> TransformResult<DataSet> {
        let (_, values) = single_column(self.name(), data)?;
        let hits: Vec<Option<usize>> = values.iter().map(|v| position_of(&self.categories, v)).collect();
        let columns = (0..self.categories.len())
            .map(|i| {
                let indicator = hits
                    .iter()
                    .map(|hit| Value::Float64(if *hit == Some(i) { 1.0 } else { 0.0 }))
                    .collect();
                (ColumnDef::new(format!("value{i}"), DataType::Float64), indicator)
            })
            .collect();
        Ok(DataSet::from_columns(columns))
    }

    fn reverse_transform(&self, data: &DataSet) -> TransformResult<DataSet> {
        expect_width(self.name(), data, self.categories.len())?;
        let values = data
            .rows
            .iter()
            .map(|row| {
                let mut best: Option<(usize, f64)> = None;
                for (idx, value) in row.iter().enumerate() {
                    let score = value.as_f64().unwrap_or(f64::NEG_INFINITY);
                    if best.is_none_or(|(_, top)| score > top) {
                        best = Some((idx, score));
                    }
                }
                best.map_or(Value::Null, |(idx, _)| self.categories[idx].clone())
            })
            .collect();
        Ok(DataSet::from_columns(vec![(fitted_def(&self.input), values)]))
    }
}

/// Maps each category to its integer index in first-appearance order.
#[derive(Debug, Clone, Default)]
pub struct LabelEncoder {
    categories: Vec<Value>,
    input: Option<ColumnDef>,
}

impl LabelEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn categories(&self) -> &[Value] {
        &self.categories
    }
}

impl Transformer for LabelEncoder {
    fn name(&self) -> &'static str {
        "LabelEncoder"
    }

    fn input_sdtype(&self) -> Sdtype {
        Sdtype::Categorical
    }

    fn output_sdtypes(&self) -> Vec<(String, Sdtype)> {
        vec![("value".to_string(), Sdtype::Integer)]
    }

    fn fit(&mut self, data: &DataSet) -> TransformResult<()> {
        let (def, values) = single_column(self.name(), data)?;
        self.categories = count_categories(&values).into_iter().map(|(c, _)| c).collect();
        self.input = Some(def);
        Ok(())
    }

    fn transform(&self, data: &DataSet) -> TransformResult<DataSet> {
        let (def, values) = single_column(self.name(), data)?;
        let labels = values
            .iter()
            .map(|v| {
                position_of(&self.categories, v)
                    .map(|idx| Value::Int64(idx as i64))
                    .ok_or_else(|| TransformError::InvalidValue {
                        column: def.name.clone(),
                        message: format!("category '{v}' was not seen during fit"),
                    })
            })
            .collect::<TransformResult<Vec<_>>>()?;
        Ok(DataSet::from_columns(vec![(ColumnDef::new("value", DataType::Int64), labels)]))
    }

    fn reverse_transform(&self, data: &DataSet) -> TransformResult<DataSet> {
        expect_width(self.name(), data, 1)?;
        let last = self.categories.len().saturating_sub(1) as f64;
        let values = data
            .rows
            .iter()
            .map(|row| match row[0].as_f64() {
                Some(v) if !self.categories.is_empty() => {
                    self.categories[v.round().clamp(0.0, last) as usize].clone()
                }
                _ => Value::Null,
            })
            .collect();
        Ok(DataSet::from_columns(vec![(fitted_def(&self.input), values)]))
    }
}
