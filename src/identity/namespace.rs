//! Identifier namespaces and values

use crate::graph::NativeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The identifier systems a legislator record can be known by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    /// Roll-call voting dataset; the seed key
    Icpsr,
    /// Congressional biographical directory
    Bioguide,
    /// Legislator-tracking registry
    Govtrack,
    /// Relationship/donation graph
    Littlesis,
}

impl Namespace {
    pub const ALL: [Namespace; 4] = [
        Namespace::Icpsr,
        Namespace::Bioguide,
        Namespace::Govtrack,
        Namespace::Littlesis,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Icpsr => "icpsr",
            Namespace::Bioguide => "bioguide",
            Namespace::Govtrack => "govtrack",
            Namespace::Littlesis => "littlesis",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An identifier value; sources disagree on whether ids are numbers or text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdValue {
    Integer(i64),
    Text(String),
}

impl IdValue {
    /// Text form used for every cross-source comparison
    pub fn canonical(&self) -> String {
        match self {
            IdValue::Integer(i) => i.to_string(),
            IdValue::Text(s) => s.clone(),
        }
    }

    /// Same identifier regardless of encoding
    pub fn same_as(&self, other: &IdValue) -> bool {
        self.canonical() == other.canonical()
    }

    /// Interpret a JSON scalar as an identifier.
    ///
    /// Null, empty or whitespace-only strings, and non-scalar values are not
    /// identifiers. Floats with no fractional part (CSV readers produce those
    /// for integer columns with gaps) become integers.
    pub fn from_json(value: &serde_json::Value) -> Option<IdValue> {
        use serde_json::Value;
        match value {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(IdValue::Integer(i))
                } else {
                    n.as_f64()
                        .filter(|f| f.is_finite() && f.fract() == 0.0)
                        .map(|f| IdValue::Integer(f as i64))
                }
            }
            Value::String(s) if !s.trim().is_empty() => Some(IdValue::Text(s.trim().to_string())),
            _ => None,
        }
    }

    pub fn as_native_id(&self) -> NativeId {
        NativeId::new(self.canonical())
    }
}

impl fmt::Display for IdValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdValue::Integer(i) => write!(f, "{}", i),
            IdValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for IdValue {
    fn from(i: i64) -> Self {
        IdValue::Integer(i)
    }
}

impl From<&str> for IdValue {
    fn from(s: &str) -> Self {
        IdValue::Text(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_namespace_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Namespace::Govtrack).unwrap(), "\"govtrack\"");
        assert_eq!(Namespace::Littlesis.to_string(), "littlesis");
    }

    #[test]
    fn test_from_json() {
        assert_eq!(IdValue::from_json(&json!(100)), Some(IdValue::Integer(100)));
        assert_eq!(IdValue::from_json(&json!(100.0)), Some(IdValue::Integer(100)));
        assert_eq!(IdValue::from_json(&json!(" A1 ")), Some(IdValue::Text("A1".into())));
        assert_eq!(IdValue::from_json(&json!("")), None);
        assert_eq!(IdValue::from_json(&json!(null)), None);
        assert_eq!(IdValue::from_json(&json!(1.5)), None);
        assert_eq!(IdValue::from_json(&json!({"x": 1})), None);
    }

    #[test]
    fn test_same_as_compares_text() {
        assert!(IdValue::Integer(100).same_as(&IdValue::Text("100".into())));
        assert!(!IdValue::Integer(100).same_as(&IdValue::Text("0100".into())));
    }
}
