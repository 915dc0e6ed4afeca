use std::collections::{BTreeMap, HashMap};

use crate::error::{TransformError, TransformResult};
use crate::sdtype::Sdtype;

use super::{
    BinaryEncoder, FloatFormatter, FrequencyEncoder, LabelEncoder, MissingValueReplacement,
    OneHotEncoder, Transformer, UnixTimestampEncoder,
};

/// Known transformers, and the default transformer for each sdtype.
///
/// Entries are prototypes: every lookup hands out a fresh clone.
#[derive(Debug, Clone, Default)]
pub struct TransformerRegistry {
    named: BTreeMap<String, Box<dyn Transformer>>,
    defaults: HashMap<Sdtype, Box<dyn Transformer>>,
}

impl TransformerRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in transformers with their default sdtype assignments.
    pub fn builtin() -> Self {
        let numerical = FloatFormatter::new()
            .with_missing_value_replacement(MissingValueReplacement::Mean)
            .with_model_missing_values(true);
        let boolean = BinaryEncoder::new()
            .with_missing_value_replacement(MissingValueReplacement::Mode)
            .with_model_missing_values(true);
        let datetime = UnixTimestampEncoder::new()
            .with_missing_value_replacement(MissingValueReplacement::Mean)
            .with_model_missing_values(true);

        Self::new()
            .with_transformer(Box::new(FloatFormatter::new()))
            .with_transformer(Box::new(BinaryEncoder::new()))
            .with_transformer(Box::new(FrequencyEncoder::new()))
            .with_transformer(Box::new(OneHotEncoder::new()))
            .with_transformer(Box::new(LabelEncoder::new()))
            .with_transformer(Box::new(UnixTimestampEncoder::new()))
            .with_default(Sdtype::Numerical, Box::new(numerical.clone()))
            .with_default(Sdtype::Integer, Box::new(numerical.clone()))
            .with_default(Sdtype::Float, Box::new(numerical))
            .with_default(Sdtype::Categorical, Box::new(FrequencyEncoder::new()))
            .with_default(Sdtype::Boolean, Box::new(boolean))
            .with_default(Sdtype::Datetime, Box::new(datetime))
    }

    /// Make `prototype` creatable by its name.
    pub fn register(&mut self, prototype: Box<dyn Transformer>) -> &mut Self {
        self.named.insert(prototype.name().to_string(), prototype);
        self
    }

    pub fn with_transformer(mut self, prototype: Box<dyn Transformer>) -> Self {
        self.register(prototype);
        self
    }

    /// Use `prototype` for fields of `sdtype` with no explicit transformer. Also registers it by
    /// name if that name is not known yet.
    pub fn set_default(&mut self, sdtype: Sdtype, prototype: Box<dyn Transformer>) -> &mut Self {
        if !self.named.contains_key(prototype.name()) {
            self.named.insert(prototype.name().to_string(), prototype.clone());
        }
        self.defaults.insert(sdtype, prototype);
        self
    }

    pub fn with_default(mut self, sdtype: Sdtype, prototype: Box<dyn Transformer>) -> Self {
        self.set_default(sdtype, prototype);
        self
    }

    /// A fresh default transformer for `sdtype`, if one is registered.
    pub fn default_for(&self, sdtype: &Sdtype) -> Option<Box<dyn Transformer>> {
        self.defaults.get(sdtype).cloned()
    }

    /// Registered transformer names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.named.keys().map(String::as_str)
    }

    /// Build a transformer from its representation, e.g.
    /// `FloatFormatter(missing_value_replacement='mean')` or plain `OneHotEncoder`.
    pub fn create(&self, repr: &str) -> TransformResult<Box<dyn Transformer>> {
        let (name, params) = parse_repr(repr)?;
        let mut transformer = self
            .named
            .get(name)
            .cloned()
            .ok_or_else(|| TransformError::UnknownTransformer { name: name.to_string() })?;
        for (key, value) in params {
            transformer.set_param(key, value)?;
        }
        Ok(transformer)
    }
}

fn parse_repr(repr: &str) -> TransformResult<(&str, Vec<(&str, &str)>)> {
    let repr = repr.trim();
    let Some(open) = repr.find('(') else {
        return Ok((repr, Vec::new()));
    };
    let name = repr[..open].trim();
    let Some(inner) = repr[open + 1..].strip_suffix(')') else {
        return Err(TransformError::UnknownTransformer { name: repr.to_string() });
    };

    let mut params = Vec::new();
    for pair in inner.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let Some((key, value)) = pair.split_once('=') else {
            return Err(TransformError::InvalidParameter {
                transformer: name.to_string(),
                parameter: pair.to_string(),
                message: "expected key=value".to_string(),
            });
        };
        params.push((key.trim(), value.trim()));
    }
    Ok((name, params))
}
