// ABOUTME: Checkpoint metadata values and their JSON normalization.
// ABOUTME: Non-JSON-safe values are coerced to strings before persistence.

use std::collections::BTreeMap;

use serde_json::Value;

/// A metadata value attached to a deployment checkpoint.
///
/// Mappings and sequences nest; anything that is not JSON-safe is carried as
/// `Opaque` and persisted as its string form. The coercion is lossy on
/// purpose: a checkpoint record that can always be written beats one that
/// faithfully round-trips exotic values.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Map(BTreeMap<String, MetaValue>),
    Seq(Vec<MetaValue>),
    /// String fallback for values with no JSON representation.
    Opaque(String),
}

impl MetaValue {
    /// Wrap an arbitrary displayable value in its string form.
    pub fn opaque(value: impl std::fmt::Display) -> Self {
        MetaValue::Opaque(value.to_string())
    }

    /// Normalize to a JSON value. Opaque values become plain strings.
    pub fn into_json(self) -> Value {
        match self {
            MetaValue::Bool(b) => Value::Bool(b),
            MetaValue::Int(i) => Value::from(i),
            MetaValue::Float(f) => {
                // JSON has no NaN/Infinity; fall back to the string form.
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .unwrap_or_else(|| Value::String(f.to_string()))
            }
            MetaValue::Str(s) | MetaValue::Opaque(s) => Value::String(s),
            MetaValue::Map(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, v.into_json()))
                    .collect(),
            ),
            MetaValue::Seq(seq) => {
                Value::Array(seq.into_iter().map(MetaValue::into_json).collect())
            }
        }
    }

    /// Build a MetaValue from already-JSON data (e.g. a config snapshot).
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => MetaValue::Opaque("null".to_string()),
            Value::Bool(b) => MetaValue::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    MetaValue::Int(i)
                } else {
                    MetaValue::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            Value::String(s) => MetaValue::Str(s),
            Value::Array(items) => {
                MetaValue::Seq(items.into_iter().map(MetaValue::from_json).collect())
            }
            Value::Object(map) => MetaValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, MetaValue::from_json(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for MetaValue {
    fn from(value: bool) -> Self {
        MetaValue::Bool(value)
    }
}

impl From<i64> for MetaValue {
    fn from(value: i64) -> Self {
        MetaValue::Int(value)
    }
}

impl From<f64> for MetaValue {
    fn from(value: f64) -> Self {
        MetaValue::Float(value)
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        MetaValue::Str(value.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        MetaValue::Str(value)
    }
}

impl From<Vec<MetaValue>> for MetaValue {
    fn from(value: Vec<MetaValue>) -> Self {
        MetaValue::Seq(value)
    }
}
