//! Dense index mapping between graph node keys and contiguous integers

use super::{MatrixError, MatrixResult};
use crate::graph::{NativeId, RelationshipGraph};
use crate::persistence;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// One direction of the mapping as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LookupFile<K: std::hash::Hash + Eq, V> {
    generation: String,
    base: usize,
    mapping: IndexMap<K, V>,
}

/// Bijection between node keys and dense indices `base..base + n`.
///
/// Indices follow graph node order. A mapping belongs to the graph snapshot
/// it was generated from, identified by the graph fingerprint.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexMapping {
    generation: String,
    base: usize,
    native_to_dense: IndexMap<NativeId, usize>,
}

impl IndexMapping {
    /// Assign dense indices to every node of `graph`; `base` must be 0 or 1
    pub fn generate(graph: &RelationshipGraph, base: usize) -> MatrixResult<Self> {
        if base > 1 {
            return Err(MatrixError::InvalidBase(base));
        }
        let native_to_dense = graph
            .nodes()
            .enumerate()
            .map(|(i, node)| (node.key.clone(), base + i))
            .collect();

        let mapping = IndexMapping {
            generation: graph.fingerprint(),
            base,
            native_to_dense,
        };
        info!(
            "Generated dense indices {}..{} for graph {}",
            base,
            base + mapping.len(),
            mapping.short_generation()
        );
        Ok(mapping)
    }

    pub fn dense_of(&self, native: &NativeId) -> Option<usize> {
        self.native_to_dense.get(native).copied()
    }

    pub fn native_of(&self, dense: usize) -> Option<&NativeId> {
        let position = dense.checked_sub(self.base)?;
        self.native_to_dense.get_index(position).map(|(native, _)| native)
    }

    /// Dense indices in ascending order
    pub fn dense_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.native_to_dense.values().copied()
    }

    pub fn len(&self) -> usize {
        self.native_to_dense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.native_to_dense.is_empty()
    }

    pub fn base(&self) -> usize {
        self.base
    }

    /// Fingerprint of the graph this mapping was generated from
    pub fn generation(&self) -> &str {
        &self.generation
    }

    fn short_generation(&self) -> &str {
        self.generation.get(..12).unwrap_or(&self.generation)
    }

    /// Reject a mapping generated from a different graph snapshot
    pub fn ensure_generation(&self, graph: &RelationshipGraph) -> MatrixResult<()> {
        let current = graph.fingerprint();
        if current != self.generation {
            return Err(MatrixError::StaleMapping {
                mapping: self.generation.clone(),
                graph: current,
            });
        }
        Ok(())
    }

    /// Write both lookup tables
    pub fn save(&self, native_to_dense: impl AsRef<Path>, dense_to_native: impl AsRef<Path>) -> MatrixResult<()> {
        let forward = LookupFile {
            generation: self.generation.clone(),
            base: self.base,
            mapping: self.native_to_dense.clone(),
        };
        let backward = LookupFile {
            generation: self.generation.clone(),
            base: self.base,
            mapping: self
                .native_to_dense
                .iter()
                .map(|(native, &dense)| (dense, native.clone()))
                .collect::<IndexMap<usize, NativeId>>(),
        };
        persistence::write_json(native_to_dense, &forward)?;
        persistence::write_json(dense_to_native, &backward)?;
        Ok(())
    }

    /// Read both lookup tables and check they describe the same bijection
    pub fn load(native_to_dense: impl AsRef<Path>, dense_to_native: impl AsRef<Path>) -> MatrixResult<Self> {
        let forward: LookupFile<NativeId, usize> = persistence::read_json(native_to_dense)?;
        let backward: LookupFile<usize, NativeId> = persistence::read_json(dense_to_native)?;

        if forward.generation != backward.generation || forward.base != backward.base {
            return Err(MatrixError::BrokenMapping(format!(
                "lookup tables disagree on generation or base ({}/{} vs {}/{})",
                forward.generation, forward.base, backward.generation, backward.base
            )));
        }
        if forward.mapping.len() != backward.mapping.len() {
            return Err(MatrixError::BrokenMapping(format!(
                "{} native ids but {} dense indices",
                forward.mapping.len(),
                backward.mapping.len()
            )));
        }

        // Re-key in dense order so positions line up with `base + i`
        let mut native_to_dense: IndexMap<NativeId, usize> = IndexMap::with_capacity(forward.mapping.len());
        for i in 0..backward.mapping.len() {
            let dense = forward.base + i;
            let native = backward.mapping.get(&dense).ok_or_else(|| {
                MatrixError::BrokenMapping(format!("dense index {} is missing", dense))
            })?;
            match forward.mapping.get(native) {
                Some(&d) if d == dense => {}
                other => {
                    return Err(MatrixError::BrokenMapping(format!(
                        "{} -> {:?} but {} -> {}",
                        native, other, dense, native
                    )))
                }
            }
            native_to_dense.insert(native.clone(), dense);
        }

        Ok(IndexMapping {
            generation: forward.generation,
            base: forward.base,
            native_to_dense,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::PropertyMap;
    use tempfile::TempDir;

    fn five_nodes() -> RelationshipGraph {
        let mut graph = RelationshipGraph::new(false);
        for key in [30, 10, 50, 20, 40] {
            graph.add_node(key, PropertyMap::new()).unwrap();
        }
        graph.add_edge(30, 10, PropertyMap::new()).unwrap();
        graph
    }

    #[test]
    fn test_mapping_is_a_bijection() {
        for base in [0, 1] {
            let mapping = IndexMapping::generate(&five_nodes(), base).unwrap();
            assert_eq!(mapping.len(), 5);

            for dense in mapping.dense_indices() {
                let native = mapping.native_of(dense).unwrap();
                assert_eq!(mapping.dense_of(native), Some(dense));
            }
            for key in [10, 20, 30, 40, 50] {
                let native = NativeId::from(key);
                let dense = mapping.dense_of(&native).unwrap();
                assert_eq!(mapping.native_of(dense), Some(&native));
            }
        }
    }

    #[test]
    fn test_follows_node_order() {
        let mapping = IndexMapping::generate(&five_nodes(), 1).unwrap();
        assert_eq!(mapping.dense_of(&30.into()), Some(1));
        assert_eq!(mapping.dense_of(&40.into()), Some(5));
        assert_eq!(mapping.native_of(0), None);
        assert_eq!(mapping.native_of(6), None);
    }

    #[test]
    fn test_rejects_bad_base() {
        assert!(matches!(
            IndexMapping::generate(&five_nodes(), 2),
            Err(MatrixError::InvalidBase(2))
        ));
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let forward = dir.path().join("native_to_dense.json");
        let backward = dir.path().join("dense_to_native.json");

        let mapping = IndexMapping::generate(&five_nodes(), 1).unwrap();
        mapping.save(&forward, &backward).unwrap();
        let loaded = IndexMapping::load(&forward, &backward).unwrap();

        assert_eq!(loaded, mapping);
        loaded.ensure_generation(&five_nodes()).unwrap();
    }

    #[test]
    fn test_stale_mapping_is_rejected() {
        let mapping = IndexMapping::generate(&five_nodes(), 1).unwrap();
        let mut changed = five_nodes();
        changed.add_node(60, PropertyMap::new()).unwrap();

        assert!(matches!(
            mapping.ensure_generation(&changed),
            Err(MatrixError::StaleMapping { .. })
        ));
    }

    #[test]
    fn test_tampered_lookup_is_rejected() {
        let dir = TempDir::new().unwrap();
        let forward = dir.path().join("native_to_dense.json");
        let backward = dir.path().join("dense_to_native.json");
        IndexMapping::generate(&five_nodes(), 1).unwrap().save(&forward, &backward).unwrap();

        let mut value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&forward).unwrap()).unwrap();
        value["mapping"]["30"] = serde_json::json!(2);
        std::fs::write(&forward, value.to_string()).unwrap();

        assert!(matches!(
            IndexMapping::load(&forward, &backward),
            Err(MatrixError::BrokenMapping(_))
        ));
    }
}
