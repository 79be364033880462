// src/internal/logger/field.rs

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Reserved field name for the trace identifier
pub const TRACE_ID: &str = "trace_id";

/// A structured key/value pair attached to a logger or a single entry
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    key: Cow<'static, str>,
    value: Value,
}

impl Field {
    pub fn new(key: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn string(key: impl Into<Cow<'static, str>>, value: impl Into<String>) -> Self {
        Self::new(key, Value::String(value.into()))
    }

    pub fn int(key: impl Into<Cow<'static, str>>, value: i64) -> Self {
        Self::new(key, value)
    }

    pub fn uint(key: impl Into<Cow<'static, str>>, value: u64) -> Self {
        Self::new(key, value)
    }

    /// Non-finite floats have no JSON form and are kept as their string
    /// rendering (`NaN`, `inf`).
    pub fn float(key: impl Into<Cow<'static, str>>, value: f64) -> Self {
        match serde_json::Number::from_f64(value) {
            Some(number) => Self::new(key, Value::Number(number)),
            None => Self::new(key, Value::String(value.to_string())),
        }
    }

    pub fn bool(key: impl Into<Cow<'static, str>>, value: bool) -> Self {
        Self::new(key, value)
    }

    pub fn display(key: impl Into<Cow<'static, str>>, value: &dyn fmt::Display) -> Self {
        Self::string(key, value.to_string())
    }

    /// Serializes any value; a serialization failure is recorded as the
    /// error text instead of dropping the field.
    pub fn any<T>(key: impl Into<Cow<'static, str>>, value: &T) -> Self
    where
        T: Serialize + ?Sized,
    {
        match serde_json::to_value(value) {
            Ok(value) => Self::new(key, value),
            Err(err) => Self::string(key, format!("serialization failed: {}", err)),
        }
    }

    pub fn trace_id(id: impl Into<String>) -> Self {
        Self::string(TRACE_ID, id)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}
