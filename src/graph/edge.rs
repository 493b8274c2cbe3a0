//! Edge implementation for the relationship graph

use super::property::{PropertyMap, PropertyValue};
use super::store::{GraphError, GraphResult};
use super::types::{EdgeId, NativeId};
use serde::{Deserialize, Serialize};

/// Attribute holding a contribution amount on financial edges
pub const AMOUNT_ATTRIBUTE: &str = "amount";

/// An edge in the relationship graph
///
/// Multiple edges may connect the same pair of nodes; donation edges carry an
/// `amount`, other relationships do not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    /// Unique identifier for this edge
    pub id: EdgeId,

    /// Source node key
    pub source: NativeId,

    /// Target node key
    pub target: NativeId,

    /// Attributes associated with this edge
    pub properties: PropertyMap,
}

impl Edge {
    /// Create a new edge with attributes
    pub fn new_with_properties(
        id: EdgeId,
        source: NativeId,
        target: NativeId,
        properties: PropertyMap,
    ) -> Self {
        Edge {
            id,
            source,
            target,
            properties,
        }
    }

    /// Set an attribute value
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties.insert(key.into(), value.into());
    }

    /// The contribution amount, if this is a financial edge.
    ///
    /// Absent or null yields `None`; a non-numeric value is malformed.
    pub fn amount(&self) -> GraphResult<Option<f64>> {
        match self.properties.get(AMOUNT_ATTRIBUTE) {
            None | Some(PropertyValue::Null) => Ok(None),
            Some(value) => match value.as_number() {
                Some(amount) if amount.is_finite() => Ok(Some(amount)),
                _ => Err(GraphError::MalformedAttribute {
                    owner: format!("edge {} -> {}", self.source, self.target),
                    attribute: AMOUNT_ATTRIBUTE.to_string(),
                    expected: "finite number",
                    found: value.type_name(),
                }),
            },
        }
    }

    /// The endpoint opposite to `node`
    pub fn other_end(&self, node: &NativeId) -> &NativeId {
        if &self.source == node {
            &self.target
        } else {
            &self.source
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge() -> Edge {
        Edge::new_with_properties(EdgeId::new(1), 42.into(), 9001.into(), PropertyMap::new())
    }

    #[test]
    fn test_amount_missing_is_none() {
        assert_eq!(edge().amount().unwrap(), None);
    }

    #[test]
    fn test_amount_numeric() {
        let mut e = edge();
        e.set_property("amount", 10i64);
        assert_eq!(e.amount().unwrap(), Some(10.0));
        e.set_property("amount", 5.5);
        assert_eq!(e.amount().unwrap(), Some(5.5));
    }

    #[test]
    fn test_amount_malformed() {
        let mut e = edge();
        e.set_property("amount", "a lot");
        assert!(matches!(
            e.amount(),
            Err(GraphError::MalformedAttribute { found: "String", .. })
        ));
    }

    #[test]
    fn test_other_end() {
        let e = edge();
        assert_eq!(e.other_end(&NativeId::from(42)), &NativeId::from(9001));
        assert_eq!(e.other_end(&NativeId::from(9001)), &NativeId::from(42));
    }
}
