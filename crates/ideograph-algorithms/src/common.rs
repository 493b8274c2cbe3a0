//! Shared utilities for projection algorithms
//!
//! Provides a read-only, dense view of a weighted neighborhood graph and the
//! error type shared by every algorithm in this crate.

use ndarray::Array2;
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised by the projection algorithms
#[derive(Error, Debug, PartialEq)]
pub enum AlgorithmError {
    #[error("expected a square matrix, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("requested {requested} components but only {available} are available")]
    TooManyComponents { requested: usize, available: usize },

    #[error("matrix contains a non-finite value at ({row}, {col})")]
    NonFinite { row: usize, col: usize },

    #[error("neighborhood graph is disconnected: no path from {from} to {to}")]
    Disconnected { from: usize, to: usize },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type AlgorithmResult<T> = Result<T, AlgorithmError>;

/// A dense, integer-indexed view of a graph topology using Compressed Sparse Row (CSR) format.
pub struct GraphView {
    /// Number of nodes
    pub node_count: usize,

    /// Outgoing edges CSR structure
    /// Offsets into `out_targets`. Size = node_count + 1
    pub out_offsets: Vec<usize>,
    /// Contiguous array of target node indices
    pub out_targets: Vec<usize>,

    /// Edge weights: aligned with `out_targets`
    pub weights: Option<Vec<f64>>,
}

impl GraphView {
    /// Get the out-degree of a node (by index)
    pub fn out_degree(&self, idx: usize) -> usize {
        self.out_offsets[idx + 1] - self.out_offsets[idx]
    }

    /// Get outgoing neighbors (successors) of a node
    pub fn successors(&self, idx: usize) -> &[usize] {
        let start = self.out_offsets[idx];
        let end = self.out_offsets[idx + 1];
        &self.out_targets[start..end]
    }

    /// Get weights for outgoing edges of a node
    pub fn weights(&self, idx: usize) -> Option<&[f64]> {
        self.weights.as_ref().map(|w| {
            let start = self.out_offsets[idx];
            let end = self.out_offsets[idx + 1];
            &w[start..end]
        })
    }

    /// Build a CSR view from adjacency lists indexed by position
    pub fn from_adjacency_list(
        outgoing: Vec<Vec<usize>>,
        weights: Option<Vec<Vec<f64>>>,
    ) -> Self {
        let node_count = outgoing.len();

        let mut out_offsets = Vec::with_capacity(node_count + 1);
        let mut out_targets = Vec::new();
        let mut flat_weights = if weights.is_some() { Some(Vec::new()) } else { None };

        out_offsets.push(0);
        for (i, neighbors) in outgoing.into_iter().enumerate() {
            out_targets.extend(neighbors);
            out_offsets.push(out_targets.len());

            if let Some(ref mut w_flat) = flat_weights {
                if let Some(w_row) = weights.as_ref().map(|w| &w[i]) {
                    w_flat.extend(w_row.iter());
                }
            }
        }

        GraphView {
            node_count,
            out_offsets,
            out_targets,
            weights: flat_weights,
        }
    }

    /// Build the symmetric k-nearest-neighbor graph of a precomputed distance matrix.
    ///
    /// Each point is linked to its `k` closest other points; the link is then
    /// mirrored so the resulting graph is undirected. Ties are broken by index.
    pub fn knn_from_distances(distances: &Array2<f64>, k: usize) -> AlgorithmResult<Self> {
        let n = ensure_square(distances)?;
        if k == 0 {
            return Err(AlgorithmError::InvalidParameter(
                "neighbor count must be at least 1".to_string(),
            ));
        }
        if k >= n {
            return Err(AlgorithmError::InvalidParameter(format!(
                "neighbor count {} must be smaller than the number of points {}",
                k, n
            )));
        }

        let mut neighbors: Vec<HashMap<usize, f64>> = vec![HashMap::new(); n];
        for i in 0..n {
            let mut candidates: Vec<(usize, f64)> = (0..n)
                .filter(|&j| j != i)
                .map(|j| (j, distances[[i, j]]))
                .collect();
            candidates.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

            for &(j, d) in candidates.iter().take(k) {
                neighbors[i].insert(j, d);
                neighbors[j].insert(i, d);
            }
        }

        let mut outgoing = Vec::with_capacity(n);
        let mut weights = Vec::with_capacity(n);
        for row in neighbors {
            let mut row: Vec<(usize, f64)> = row.into_iter().collect();
            row.sort_by_key(|&(j, _)| j);
            outgoing.push(row.iter().map(|&(j, _)| j).collect());
            weights.push(row.iter().map(|&(_, d)| d).collect());
        }

        Ok(Self::from_adjacency_list(outgoing, Some(weights)))
    }
}

/// Check that a matrix is square and finite, returning its size
pub fn ensure_square(matrix: &Array2<f64>) -> AlgorithmResult<usize> {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return Err(AlgorithmError::NotSquare { rows, cols });
    }
    ensure_finite(matrix)?;
    Ok(rows)
}

/// Reject NaN and infinite entries
pub fn ensure_finite(matrix: &Array2<f64>) -> AlgorithmResult<()> {
    for ((row, col), value) in matrix.indexed_iter() {
        if !value.is_finite() {
            return Err(AlgorithmError::NonFinite { row, col });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_csr_from_adjacency() {
        // 0 -> 1, 0 -> 2, 2 -> 1
        let view = GraphView::from_adjacency_list(
            vec![vec![1, 2], vec![], vec![1]],
            Some(vec![vec![1.0, 4.0], vec![], vec![2.0]]),
        );

        assert_eq!(view.node_count, 3);
        assert_eq!(view.successors(0), &[1, 2]);
        assert_eq!(view.out_degree(1), 0);
        assert_eq!(view.weights(2), Some(&[2.0][..]));
    }

    #[test]
    fn test_knn_graph_is_symmetric() {
        let distances = array![
            [0.0, 1.0, 5.0, 9.0],
            [1.0, 0.0, 2.0, 8.0],
            [5.0, 2.0, 0.0, 3.0],
            [9.0, 8.0, 3.0, 0.0],
        ];
        let view = GraphView::knn_from_distances(&distances, 1).unwrap();

        // nearest: 0->1, 1->0, 2->1, 3->2
        assert_eq!(view.successors(0), &[1]);
        assert_eq!(view.successors(1), &[0, 2]);
        assert_eq!(view.successors(2), &[1, 3]);
        assert_eq!(view.successors(3), &[2]);
    }

    #[test]
    fn test_knn_rejects_large_k() {
        let distances = array![[0.0, 1.0], [1.0, 0.0]];
        assert!(matches!(
            GraphView::knn_from_distances(&distances, 2),
            Err(AlgorithmError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_non_square_rejected() {
        let m = Array2::<f64>::zeros((2, 3));
        assert_eq!(
            ensure_square(&m),
            Err(AlgorithmError::NotSquare { rows: 2, cols: 3 })
        );
    }
}
