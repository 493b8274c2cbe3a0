//! Relationship graph model
//!
//! A property graph of people and organizations whose nodes carry an optional
//! `id` attribute (the relationship-graph native id) and whose edges carry an
//! optional `amount` attribute (a contribution, for financial relationships).
//! Multiple edges between the same pair of nodes are allowed.

pub mod edge;
pub mod node;
pub mod property;
pub mod store;
pub mod types;

// Re-export main types
pub use edge::{Edge, AMOUNT_ATTRIBUTE};
pub use node::{Node, ID_ATTRIBUTE};
pub use property::{PropertyMap, PropertyValue};
pub use store::{
    EdgeRecord, GraphError, GraphFile, GraphResult, IncidentEdge, NodeRecord, RelationshipGraph,
};
pub use types::{EdgeId, NativeId};
