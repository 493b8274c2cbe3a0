//! Node implementation for the relationship graph

use super::property::{PropertyMap, PropertyValue};
use super::store::{GraphError, GraphResult};
use super::types::NativeId;
use serde::{Deserialize, Serialize};

/// Attribute holding the node's id in the relationship-graph namespace
pub const ID_ATTRIBUTE: &str = "id";

/// A node in the relationship graph
///
/// The `key` identifies the node inside the graph (edges refer to it); the
/// optional `id` attribute is what entity records are matched against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Graph-level key of this node
    pub key: NativeId,

    /// Attributes associated with this node
    #[serde(default)]
    pub properties: PropertyMap,
}

impl Node {
    /// Create a node without attributes
    pub fn new(key: impl Into<NativeId>) -> Self {
        Node {
            key: key.into(),
            properties: PropertyMap::new(),
        }
    }

    /// Create a node with attributes
    pub fn new_with_properties(key: impl Into<NativeId>, properties: PropertyMap) -> Self {
        Node {
            key: key.into(),
            properties,
        }
    }

    /// Set an attribute value
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Option<PropertyValue> {
        self.properties.insert(key.into(), value.into())
    }

    /// The node's `id` attribute as a native id.
    ///
    /// Absent or null yields `None`. Integers, integral floats (`9001.0`) and
    /// strings are accepted; any other value is a malformed attribute.
    pub fn native_id_attribute(&self) -> GraphResult<Option<NativeId>> {
        match self.properties.get(ID_ATTRIBUTE) {
            None | Some(PropertyValue::Null) => Ok(None),
            Some(PropertyValue::Integer(i)) => Ok(Some(NativeId::from(*i))),
            Some(PropertyValue::Float(f)) if f.is_finite() && f.fract() == 0.0 => {
                Ok(Some(NativeId::from(*f as i64)))
            }
            Some(PropertyValue::String(s)) => Ok(Some(NativeId::from(s.as_str()))),
            Some(other) => Err(GraphError::MalformedAttribute {
                owner: format!("node {}", self.key),
                attribute: ID_ATTRIBUTE.to_string(),
                expected: "integer or string",
                found: other.type_name(),
            }),
        }
    }
}
