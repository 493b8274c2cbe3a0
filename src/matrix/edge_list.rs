//! Graph topology rewritten in dense index space

use super::mapping::IndexMapping;
use super::{MatrixError, MatrixResult};
use crate::graph::RelationshipGraph;
use crate::persistence::{self, PersistenceError};
use std::fs;
use std::path::Path;
use tracing::info;

/// Every graph edge as a `(source, target)` pair of dense indices
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeList {
    pairs: Vec<(usize, usize)>,
}

impl EdgeList {
    /// Rewrite all edges of `graph`, donation or not, in edge order
    pub fn build(graph: &RelationshipGraph, mapping: &IndexMapping) -> MatrixResult<Self> {
        mapping.ensure_generation(graph)?;
        let pairs = graph
            .edges()
            .map(|edge| {
                let src = mapping
                    .dense_of(&edge.source)
                    .ok_or_else(|| MatrixError::UnknownNode(edge.source.clone()))?;
                let dst = mapping
                    .dense_of(&edge.target)
                    .ok_or_else(|| MatrixError::UnknownNode(edge.target.clone()))?;
                Ok((src, dst))
            })
            .collect::<MatrixResult<Vec<_>>>()?;
        Ok(EdgeList { pairs })
    }

    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// `src,dst` per line, no header
    pub fn to_text(&self) -> String {
        self.pairs
            .iter()
            .map(|(src, dst)| format!("{},{}\n", src, dst))
            .collect()
    }

    pub fn write(&self, path: impl AsRef<Path>) -> MatrixResult<()> {
        let path = path.as_ref();
        persistence::write_atomic(path, self.to_text().as_bytes())?;
        info!("Wrote {} edges to {}", self.len(), path.display());
        Ok(())
    }

    pub fn read(path: impl AsRef<Path>) -> MatrixResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| PersistenceError::io(path, e))?;

        let mut pairs = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let pair = line
                .split_once(',')
                .and_then(|(s, d)| Some((s.trim().parse().ok()?, d.trim().parse().ok()?)))
                .ok_or_else(|| MatrixError::Malformed {
                    path: path.to_path_buf(),
                    reason: format!("line {} is not a dense index pair: {:?}", idx + 1, line),
                })?;
            pairs.push(pair);
        }
        Ok(EdgeList { pairs })
    }
}
