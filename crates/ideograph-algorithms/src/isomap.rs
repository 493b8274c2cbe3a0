//! Isomap: classical MDS over geodesic distances of a neighborhood graph

use super::common::{ensure_square, AlgorithmError, AlgorithmResult, GraphView};
use super::eigen::EigenConfig;
use super::mds::classical_mds;
use super::pathfinding::dijkstra_distances;
use ndarray::Array2;
use rayon::prelude::*;

/// Isomap configuration
#[derive(Debug, Clone)]
pub struct IsomapConfig {
    /// Neighbors per point in the k-NN graph
    pub neighbors: usize,
    pub eigen: EigenConfig,
}

impl Default for IsomapConfig {
    fn default() -> Self {
        Self {
            neighbors: 5,
            eigen: EigenConfig::default(),
        }
    }
}

/// Embed points from a precomputed distance matrix with Isomap.
///
/// Fails with `Disconnected` when the k-NN graph splits into several
/// components, since geodesic distances between them are undefined.
pub fn isomap(
    distances: &Array2<f64>,
    dims: usize,
    config: &IsomapConfig,
) -> AlgorithmResult<Array2<f64>> {
    let n = ensure_square(distances)?;
    let view = GraphView::knn_from_distances(distances, config.neighbors)?;

    let rows: Vec<Vec<f64>> = (0..n)
        .into_par_iter()
        .map(|source| dijkstra_distances(&view, source))
        .collect();

    let mut geodesic = Array2::zeros((n, n));
    for (i, row) in rows.iter().enumerate() {
        for (j, &d) in row.iter().enumerate() {
            if d.is_infinite() {
                return Err(AlgorithmError::Disconnected { from: i, to: j });
            }
            geodesic[[i, j]] = d;
        }
    }

    classical_mds(&geodesic, dims, &config.eigen)
}
