//! Ideology embedding: distance assembly, projection, and merge-back
//!
//! The distance computation itself (NVD) runs outside this crate; its
//! per-politician output files are assembled into one matrix here, projected
//! with each configured method, rescaled into [-1, 1], and attached to the
//! entity records by `littlesis` id.

pub mod distance;
pub mod merge;
pub mod projector;

pub use distance::DistanceMatrix;
pub use merge::merge_embeddings;
pub use projector::{
    rescale_columns, ClassicalMds, Isomap, MethodKind, Pca, ProjectionMethod, Projector,
};

use crate::graph::NativeId;
use crate::identity::PoliticalEntity;
use crate::persistence::PersistenceError;
use ideograph_algorithms::AlgorithmError;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

/// Projection errors
#[derive(Error, Debug)]
pub enum ProjectionError {
    #[error("Politician {politician} matches {matches} entities, expected exactly one")]
    UnresolvedPolitician { politician: NativeId, matches: usize },

    #[error("Dimension mismatch: expected {expected}, found {found}")]
    Dimension { expected: usize, found: usize },

    #[error("Invalid distance {value} at ({row}, {col})")]
    InvalidDistance { row: usize, col: usize, value: f64 },

    #[error("Malformed distance file {} at line {line}", .path.display())]
    MalformedDistanceFile { path: PathBuf, line: u64 },

    #[error("Unknown projection method '{0}' (expected PCA-1/2, MDS-1/2, Isomap-1/2)")]
    UnknownMethod(String),

    #[error("Projection failed: {0}")]
    Algorithm(#[from] AlgorithmError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

pub type ProjectionResult<T> = Result<T, ProjectionError>;

/// Run every method over `distances` and merge the rescaled coordinates
pub fn project_entities(
    entities: &[PoliticalEntity],
    distances: &DistanceMatrix,
    methods: &[ProjectionMethod],
    neighbors: usize,
    seed: u64,
) -> ProjectionResult<Vec<PoliticalEntity>> {
    let mut merged = entities.to_vec();
    for method in methods {
        info!("Running {}", method);
        let coords = method
            .projector(neighbors, seed)
            .project(distances.values(), method.dims)?;
        let scaled = rescale_columns(&coords);
        merged = merge_embeddings(&merged, distances.politicians(), &scaled, method)?;
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{IdValue, Namespace};
    use ndarray::array;
    use serde_json::json;

    #[test]
    fn test_project_entities_adds_every_method() {
        let entities: Vec<PoliticalEntity> = (0..4)
            .map(|i| {
                PoliticalEntity::seed(i, json!({}))
                    .with_id(Namespace::Littlesis, IdValue::Integer(9000 + i))
            })
            .collect();
        let politicians: Vec<NativeId> = (0..4).map(|i: i64| NativeId::from(9000 + i)).collect();
        let values = array![
            [0.0, 1.0, 2.0, 3.0],
            [1.0, 0.0, 1.0, 2.0],
            [2.0, 1.0, 0.0, 1.0],
            [3.0, 2.0, 1.0, 0.0]
        ];
        let distances = DistanceMatrix::new(politicians, values).unwrap();

        let merged =
            project_entities(&entities, &distances, &ProjectionMethod::all(), 2, 42).unwrap();
        for entity in &merged {
            assert_eq!(entity.embeddings.len(), 6);
            assert_eq!(entity.embeddings["MDS-1"].len(), 1);
            for coords in entity.embeddings.values() {
                assert!(coords.iter().all(|c| (-1.0..=1.0).contains(c)));
            }
        }
    }
}
