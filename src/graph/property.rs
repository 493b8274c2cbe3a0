//! Attribute values carried by graph nodes and edges
//!
//! Attributes arrive as arbitrary JSON; only `id` on nodes and `amount` on
//! edges are interpreted, everything else is carried through.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute value type
///
/// Supports:
/// - String
/// - Integer (i64)
/// - Float (f64)
/// - Boolean
/// - Array (Vec<PropertyValue>)
/// - Map (BTreeMap<String, PropertyValue>)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum PropertyValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Array(Vec<PropertyValue>),
    Map(BTreeMap<String, PropertyValue>),
    Null,
}

impl PropertyValue {
    /// Numeric value of an integer or float
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Integer(i) => Some(*i as f64),
            PropertyValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get type name as string
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::String(_) => "String",
            PropertyValue::Integer(_) => "Integer",
            PropertyValue::Float(_) => "Float",
            PropertyValue::Boolean(_) => "Boolean",
            PropertyValue::Array(_) => "Array",
            PropertyValue::Map(_) => "Map",
            PropertyValue::Null => "Null",
        }
    }
}

impl From<serde_json::Value> for PropertyValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => PropertyValue::Null,
            Value::Bool(b) => PropertyValue::Boolean(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => PropertyValue::Integer(i),
                None => PropertyValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => PropertyValue::String(s),
            Value::Array(arr) => PropertyValue::Array(arr.into_iter().map(Into::into).collect()),
            Value::Object(map) => {
                PropertyValue::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<PropertyValue> for serde_json::Value {
    fn from(value: PropertyValue) -> Self {
        use serde_json::Value;
        match value {
            PropertyValue::Null => Value::Null,
            PropertyValue::Boolean(b) => Value::Bool(b),
            PropertyValue::Integer(i) => Value::from(i),
            // Non-finite floats have no JSON form
            PropertyValue::Float(f) => serde_json::Number::from_f64(f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            PropertyValue::String(s) => Value::String(s),
            PropertyValue::Array(arr) => Value::Array(arr.into_iter().map(Into::into).collect()),
            PropertyValue::Map(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

// Convenience conversions
impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        PropertyValue::Integer(i)
    }
}

impl From<f64> for PropertyValue {
    fn from(f: f64) -> Self {
        PropertyValue::Float(f)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Boolean(b)
    }
}

/// Property map for storing node and edge attributes
pub type PropertyMap = BTreeMap<String, PropertyValue>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(PropertyValue::from(json!(42)), PropertyValue::Integer(42));
        assert_eq!(PropertyValue::from(json!(99.5)), PropertyValue::Float(99.5));
        assert_eq!(PropertyValue::from(json!("x")), PropertyValue::String("x".into()));
        assert_eq!(PropertyValue::from(json!(null)), PropertyValue::Null);
        assert_eq!(PropertyValue::from(json!(true)).type_name(), "Boolean");
    }

    #[test]
    fn test_as_number_accepts_integers_and_floats() {
        assert_eq!(PropertyValue::Integer(10).as_number(), Some(10.0));
        assert_eq!(PropertyValue::Float(5.5).as_number(), Some(5.5));
        assert_eq!(PropertyValue::String("5".into()).as_number(), None);
    }

    #[test]
    fn test_nested_round_trip() {
        let value = json!({"name": "Committee", "tags": [1, "two", null]});
        let prop: PropertyValue = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(prop.type_name(), "Map");
        assert_eq!(serde_json::to_value(&prop).unwrap(), value);
    }
}
