//! Values flowing between extraction, restructuring and export.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar field value.
///
/// Equality compares the typed value only, so a value read from a document
/// equals the same value built in code regardless of how it was spelled.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Number(f64),
    Text(String),
    /// A value converted from document text. Serializes as the converted
    /// value and writes back the text it was read from.
    #[serde(skip_deserializing)]
    Sourced(Sourced),
}

/// A typed value paired with the text it was converted from.
#[derive(Clone, Debug)]
pub struct Sourced {
    value: Box<Value>,
    text: String,
}

impl Sourced {
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Serialize for Sourced {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl Value {
    /// Pair `value` with the document text it came from.
    pub fn sourced(text: impl Into<String>, value: Value) -> Self {
        Value::Sourced(Sourced {
            value: Box::new(value.typed().clone()),
            text: text.into(),
        })
    }

    /// The typed value, without any source text.
    pub fn typed(&self) -> &Value {
        match self {
            Value::Sourced(sourced) => sourced.value(),
            other => other,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.typed() {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self.typed() {
            Value::Number(n) => Some(*n),
            Value::Integer(i) => Some(*i as f64),
            Value::Text(text) => text.trim().parse().ok(),
            Value::Boolean(_) | Value::Sourced(_) => None,
        }
    }

    /// Text that would be written into an element or attribute.
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(text) => f.write_str(text),
            Value::Sourced(sourced) => f.write_str(sourced.text()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self.typed(), other.typed()) {
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

/// Per-instance record produced by the extractor.
pub type RawRecord = IndexMap<String, RawValue>;

/// Raw extraction output: scalars, single nested records, or repeated groups.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    Scalar(Value),
    Record(RawRecord),
    List(Vec<RawRecord>),
}

impl RawValue {
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            RawValue::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[RawRecord]> {
        match self {
            RawValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RawRecord> {
        match self {
            RawValue::Record(record) => Some(record),
            _ => None,
        }
    }
}

/// A value to be written on export.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExportValue {
    /// A number carrying its unit; only the magnitude is written.
    Quantity { magnitude: f64, unit: String },
    Value(Value),
}

impl ExportValue {
    /// Text written to the document.
    pub fn to_text(&self) -> String {
        match self {
            ExportValue::Quantity { magnitude, .. } => magnitude.to_string(),
            ExportValue::Value(value) => value.to_text(),
        }
    }
}

impl From<Value> for ExportValue {
    fn from(value: Value) -> Self {
        ExportValue::Value(value)
    }
}

impl From<&str> for ExportValue {
    fn from(value: &str) -> Self {
        ExportValue::Value(value.into())
    }
}

impl From<f64> for ExportValue {
    fn from(value: f64) -> Self {
        ExportValue::Value(value.into())
    }
}
