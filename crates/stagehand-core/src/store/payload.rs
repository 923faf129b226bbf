// Coercion of raw JSON payloads into typed snapshot fields.
//
// A payload whose shape doesn't match the field (including `null`, which
// is what "no data" turns into) yields the field's default, so every
// field always holds a value of its declared type.

use serde_json::{Map, Value};
use tracing::debug;

/// A snapshot field type that can be filled from a JSON payload.
pub trait FromPayload: Sized + Default {
    /// Convert a payload of the expected shape.
    fn try_from_payload(value: Value) -> Option<Self>;

    /// Convert any payload, falling back to the default on a shape mismatch.
    fn from_payload(field: &'static str, value: Value) -> Self {
        if value.is_null() {
            return Self::default();
        }
        let kind = kind_of(&value);
        Self::try_from_payload(value).unwrap_or_else(|| {
            debug!(field, payload = kind, "unexpected payload shape, using default");
            Self::default()
        })
    }
}

impl FromPayload for Vec<Value> {
    fn try_from_payload(value: Value) -> Option<Self> {
        match value {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl FromPayload for Map<String, Value> {
    fn try_from_payload(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }
}

impl FromPayload for bool {
    fn try_from_payload(value: Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromPayload for f64 {
    fn try_from_payload(value: Value) -> Option<Self> {
        value.as_f64()
    }
}

impl FromPayload for String {
    fn try_from_payload(value: Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
