//! Core type definitions for the relationship graph

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Identifier of a node in the relationship graph's own id space.
///
/// Upstream files mix integer and string encodings of the same id, so the
/// canonical form is the decimal/string text and equality compares that text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeId(String);

impl NativeId {
    pub fn new(id: impl Into<String>) -> Self {
        NativeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Integer value when the canonical form is an integer
    pub fn as_i64(&self) -> Option<i64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for NativeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for NativeId {
    fn from(id: i64) -> Self {
        NativeId(id.to_string())
    }
}

impl From<i32> for NativeId {
    fn from(id: i32) -> Self {
        NativeId(id.to_string())
    }
}

impl From<&str> for NativeId {
    fn from(id: &str) -> Self {
        NativeId(id.to_string())
    }
}

impl From<String> for NativeId {
    fn from(id: String) -> Self {
        NativeId(id)
    }
}

impl Serialize for NativeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // "007" must survive a round trip, so only canonical integers become numbers
        match self.as_i64() {
            Some(i) if i.to_string() == self.0 => serializer.serialize_i64(i),
            _ => serializer.serialize_str(&self.0),
        }
    }
}

struct NativeIdVisitor;

impl<'de> Visitor<'de> for NativeIdVisitor {
    type Value = NativeId;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an integer or string node id")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<NativeId, E> {
        Ok(NativeId::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<NativeId, E> {
        Ok(NativeId(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<NativeId, E> {
        if v.fract() == 0.0 && v.is_finite() {
            Ok(NativeId((v as i64).to_string()))
        } else {
            Err(E::custom(format!("node id {} is not an integer", v)))
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<NativeId, E> {
        Ok(NativeId::from(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<NativeId, E> {
        Ok(NativeId(v))
    }
}

impl<'de> Deserialize<'de> for NativeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NativeIdVisitor)
    }
}

/// Unique identifier for an edge, assigned in insertion order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct EdgeId(pub u64);

impl EdgeId {
    pub fn new(id: u64) -> Self {
        EdgeId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EdgeId({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_id_equality_ignores_encoding() {
        let from_int: NativeId = serde_json::from_str("9001").unwrap();
        let from_str: NativeId = serde_json::from_str("\"9001\"").unwrap();
        assert_eq!(from_int, from_str);
        assert_eq!(from_int.as_i64(), Some(9001));
    }

    #[test]
    fn test_native_id_serializes_integers_as_numbers() {
        assert_eq!(serde_json::to_string(&NativeId::from(42)).unwrap(), "42");
        assert_eq!(serde_json::to_string(&NativeId::from("abc")).unwrap(), "\"abc\"");
    }

    #[test]
    fn test_native_id_as_map_key() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(NativeId::from(7), 1.5);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, "{\"7\":1.5}");

        let back: std::collections::BTreeMap<NativeId, f64> = serde_json::from_str(&json).unwrap();
        assert_eq!(back[&NativeId::from(7)], 1.5);
    }

    #[test]
    fn test_edge_id() {
        let id = EdgeId::new(99);
        assert_eq!(id.as_u64(), 99);
        assert_eq!(format!("{}", id), "EdgeId(99)");
    }
}
