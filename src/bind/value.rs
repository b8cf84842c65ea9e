//! Typed option values and the closed string → value conversion.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::commands::{CommandRegistry, OptionMetadata, ValueKind};
use crate::error::BindErrorKind;

/// Opaque host-defined value produced by a registered value parser.
#[derive(Clone)]
pub struct StructuredValue {
    kind: String,
    value: Arc<dyn Any + Send + Sync>,
}

impl StructuredValue {
    pub fn new<T: Any + Send + Sync>(kind: impl Into<String>, value: T) -> Self {
        Self {
            kind: kind.into(),
            value: Arc::new(value),
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }
}

impl fmt::Debug for StructuredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructuredValue")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl PartialEq for StructuredValue {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && Arc::ptr_eq(&self.value, &other.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Canonical member spelling from the schema.
    Enum(&'static str),
    Structured(StructuredValue),
    List(Vec<Value>),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Floats, and integers widened to floats.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Text of string and enum values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            Value::Enum(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_structured<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Structured(v) => v.downcast_ref::<T>(),
            _ => None,
        }
    }
}

/// Bound option values of one command, keyed by declared long name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionValues {
    values: BTreeMap<&'static str, Value>,
}

impl OptionValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, long_name: &str) -> Option<&Value> {
        self.values.get(long_name)
    }

    pub fn contains(&self, long_name: &str) -> bool {
        self.values.contains_key(long_name)
    }

    /// True when a boolean switch was given.
    pub fn flag(&self, long_name: &str) -> bool {
        self.get(long_name).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn int(&self, long_name: &str) -> Option<i64> {
        self.get(long_name).and_then(Value::as_int)
    }

    pub fn float(&self, long_name: &str) -> Option<f64> {
        self.get(long_name).and_then(Value::as_float)
    }

    pub fn string(&self, long_name: &str) -> Option<&str> {
        self.get(long_name).and_then(Value::as_str)
    }

    /// Elements of a list option; empty when it never occurred.
    pub fn list(&self, long_name: &str) -> &[Value] {
        self.get(long_name).and_then(Value::as_list).unwrap_or(&[])
    }

    pub fn structured<T: Any>(&self, long_name: &str) -> Option<&T> {
        self.get(long_name).and_then(|v| v.as_structured::<T>())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Store a value, replacing a scalar or appending to a list option.
    pub(crate) fn record(&mut self, option: &OptionMetadata, value: Value) {
        if !option.list {
            self.values.insert(option.long_name, value);
            return;
        }
        match self
            .values
            .entry(option.long_name)
            .or_insert_with(|| Value::List(Vec::new()))
        {
            Value::List(items) => items.push(value),
            other => *other = Value::List(vec![value]),
        }
    }
}

/// Convert a raw option value to its declared kind.
pub(crate) fn convert(
    option: &OptionMetadata,
    flag: &str,
    raw: &str,
    registry: &CommandRegistry,
) -> Result<Value, BindErrorKind> {
    let invalid = |reason: String| BindErrorKind::InvalidValue {
        option: flag.to_string(),
        value: raw.to_string(),
        reason,
    };

    match option.kind {
        ValueKind::Bool => Err(BindErrorKind::UnexpectedValue(flag.to_string())),
        ValueKind::Int => raw
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|e| invalid(format!("expected an integer ({e})"))),
        ValueKind::Float => raw
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|e| invalid(format!("expected a number ({e})"))),
        ValueKind::String => Ok(Value::String(raw.to_string())),
        ValueKind::Enum(members) => members
            .iter()
            .find(|m| m.eq_ignore_ascii_case(raw))
            .map(|m| Value::Enum(*m))
            .ok_or_else(|| invalid(format!("expected one of: {}", members.join(", ")))),
        ValueKind::Structured(name) => {
            let parser = registry
                .value_parser(name)
                .ok_or_else(|| BindErrorKind::UnknownValueParser(name.to_string()))?;
            parser(raw).map(Value::Structured).map_err(invalid)
        }
    }
}
