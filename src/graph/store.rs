//! In-memory relationship graph
//!
//! Nodes are kept in insertion order (the order of the source file), which is
//! the iteration order every downstream stage relies on for determinism.

use super::edge::Edge;
use super::node::Node;
use super::property::PropertyMap;
use super::types::{EdgeId, NativeId};
use crate::persistence::{self, PersistenceError};
use indexmap::IndexMap;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors that can occur during graph operations
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Node {0} not found")]
    UnknownNode(NativeId),

    #[error("Node {0} already exists")]
    DuplicateNode(NativeId),

    #[error("Malformed attribute '{attribute}' on {owner}: expected {expected}, found {found}")]
    MalformedAttribute {
        owner: String,
        attribute: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// An edge seen from one of its endpoints
#[derive(Debug, Clone, Copy)]
pub struct IncidentEdge<'a> {
    pub edge: &'a Edge,
    /// The endpoint on the far side
    pub neighbor: &'a NativeId,
}

/// In-memory relationship graph
///
/// - nodes: NativeId -> Node, insertion ordered
/// - edges: EdgeId (position) -> Edge
/// - outgoing/incoming: node position -> edge positions
#[derive(Debug, Clone)]
pub struct RelationshipGraph {
    directed: bool,
    nodes: IndexMap<NativeId, Node>,
    edges: Vec<Edge>,
    outgoing: Vec<Vec<usize>>,
    incoming: Vec<Vec<usize>>,
}

impl RelationshipGraph {
    /// Create a new empty graph
    pub fn new(directed: bool) -> Self {
        RelationshipGraph {
            directed,
            nodes: IndexMap::new(),
            edges: Vec::new(),
            outgoing: Vec::new(),
            incoming: Vec::new(),
        }
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Add a node; keys must be unique
    pub fn add_node(&mut self, key: impl Into<NativeId>, properties: PropertyMap) -> GraphResult<()> {
        let key = key.into();
        if self.nodes.contains_key(&key) {
            return Err(GraphError::DuplicateNode(key));
        }
        self.nodes.insert(key.clone(), Node::new_with_properties(key, properties));
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        Ok(())
    }

    /// Add an edge between two existing nodes
    pub fn add_edge(
        &mut self,
        source: impl Into<NativeId>,
        target: impl Into<NativeId>,
        properties: PropertyMap,
    ) -> GraphResult<EdgeId> {
        let source = source.into();
        let target = target.into();
        let source_pos = self
            .nodes
            .get_index_of(&source)
            .ok_or_else(|| GraphError::UnknownNode(source.clone()))?;
        let target_pos = self
            .nodes
            .get_index_of(&target)
            .ok_or_else(|| GraphError::UnknownNode(target.clone()))?;

        let position = self.edges.len();
        let id = EdgeId::new(position as u64);
        self.edges.push(Edge::new_with_properties(id, source, target, properties));
        self.outgoing[source_pos].push(position);
        self.incoming[target_pos].push(position);
        Ok(id)
    }

    /// Get a node by key
    pub fn node(&self, key: &NativeId) -> Option<&Node> {
        self.nodes.get(key)
    }

    /// Get an edge by id
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.as_u64() as usize)
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// All edges in insertion order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Edges leaving `key`.
    ///
    /// For a directed graph these are the outgoing edges. For an undirected
    /// graph every edge touching `key` counts, oriented away from it, in edge
    /// insertion order; a self-loop is reported once.
    pub fn incident_edges(&self, key: &NativeId) -> Vec<IncidentEdge<'_>> {
        let Some(pos) = self.nodes.get_index_of(key) else {
            return Vec::new();
        };

        let mut positions: Vec<usize> = self.outgoing[pos].clone();
        if !self.directed {
            positions.extend(
                self.incoming[pos]
                    .iter()
                    .copied()
                    .filter(|&e| self.edges[e].source != self.edges[e].target),
            );
            positions.sort_unstable();
        }

        positions
            .into_iter()
            .map(|e| {
                let edge = &self.edges[e];
                IncidentEdge { edge, neighbor: edge.other_end(key) }
            })
            .collect()
    }

    /// Get total number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get total number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Identifier of this graph snapshot: SHA-256 over node order and edge endpoints.
    ///
    /// Dense indices are only meaningful for the snapshot they were generated
    /// from; the fingerprint is stamped on every index artifact.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(if self.directed { b"directed\n" as &[u8] } else { b"undirected\n" });
        for key in self.nodes.keys() {
            hasher.update(b"n:");
            hasher.update(key.as_str().as_bytes());
            hasher.update(b"\n");
        }
        for edge in &self.edges {
            hasher.update(b"e:");
            hasher.update(edge.source.as_str().as_bytes());
            hasher.update(b",");
            hasher.update(edge.target.as_str().as_bytes());
            hasher.update(b"\n");
        }
        format!("{:x}", hasher.finalize())
    }

    /// Load a graph from its JSON file
    pub fn load(path: impl AsRef<Path>) -> GraphResult<Self> {
        let path = path.as_ref();
        let file: GraphFile = persistence::read_json(path)?;
        let graph = Self::from_file(file)?;
        info!(
            "Loaded relationship graph from {}: {} nodes, {} edges",
            path.display(),
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }

    /// Build a graph from its serialized form
    pub fn from_file(file: GraphFile) -> GraphResult<Self> {
        let mut graph = Self::new(file.directed);
        for node in file.nodes {
            graph.add_node(node.key, node.attributes)?;
        }
        for edge in file.edges {
            graph.add_edge(edge.source, edge.target, edge.attributes)?;
        }
        Ok(graph)
    }
}

impl Default for RelationshipGraph {
    fn default() -> Self {
        Self::new(false)
    }
}

/// On-disk graph format
#[derive(Debug, Clone, Deserialize)]
pub struct GraphFile {
    #[serde(default)]
    pub directed: bool,
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeRecord {
    pub key: NativeId,
    #[serde(default)]
    pub attributes: PropertyMap,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EdgeRecord {
    pub source: NativeId,
    pub target: NativeId,
    #[serde(default)]
    pub attributes: PropertyMap,
}
