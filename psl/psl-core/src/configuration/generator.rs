use crate::{PreviewFeatures, configuration::StringFromEnvVar};
use diagnostics::Span;
use schema_graph::Expression;
use std::collections::HashMap;

/// A generator property without a dedicated field, kept as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratorConfigValue {
    String(String),
    Array(Vec<GeneratorConfigValue>),
}

impl From<String> for GeneratorConfigValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&Expression> for GeneratorConfigValue {
    fn from(expr: &Expression) -> Self {
        match expr {
            Expression::NumericValue(val, _) => val.clone().into(),
            Expression::StringValue(val, _) => val.clone().into(),
            Expression::ConstantValue(val, _) => val.clone().into(),
            Expression::Function(_, _, _) => "(function)".to_owned().into(),
            Expression::Array(elements, _) => Self::Array(elements.iter().map(From::from).collect()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Generator {
    pub name: String,
    pub provider: StringFromEnvVar,
    pub output: Option<StringFromEnvVar>,
    pub config: HashMap<String, GeneratorConfigValue>,
    pub binary_targets: Vec<StringFromEnvVar>,
    pub preview_features: Option<PreviewFeatures>,
    pub documentation: Option<String>,
    pub span: Span,
}
