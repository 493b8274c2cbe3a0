//! Classical (Torgerson) multidimensional scaling

use super::common::{ensure_square, AlgorithmError, AlgorithmResult};
use super::eigen::{top_eigenpairs, EigenConfig};
use ndarray::{Array2, Axis};

/// Embed points described only by a precomputed distance matrix.
///
/// Double-centers the squared distances and scales the leading eigenvectors
/// by the square root of their (clamped non-negative) eigenvalues.
pub fn classical_mds(
    distances: &Array2<f64>,
    dims: usize,
    config: &EigenConfig,
) -> AlgorithmResult<Array2<f64>> {
    let n = ensure_square(distances)?;
    if dims == 0 {
        return Err(AlgorithmError::InvalidParameter(
            "at least one dimension is required".to_string(),
        ));
    }
    if dims > n {
        return Err(AlgorithmError::TooManyComponents { requested: dims, available: n });
    }

    let squared = distances.mapv(|d| d * d);
    let row_means = squared
        .mean_axis(Axis(1))
        .ok_or_else(|| AlgorithmError::InvalidParameter("empty distance matrix".to_string()))?;
    let col_means = squared
        .mean_axis(Axis(0))
        .ok_or_else(|| AlgorithmError::InvalidParameter("empty distance matrix".to_string()))?;
    let grand_mean = row_means.mean().unwrap_or(0.0);

    let gram = Array2::from_shape_fn((n, n), |(i, j)| {
        -0.5 * (squared[[i, j]] - row_means[i] - col_means[j] + grand_mean)
    });

    let pairs = top_eigenpairs(&gram, dims, config)?;
    let mut coords = pairs.vectors;
    for (c, value) in pairs.values.iter().enumerate() {
        let scale = value.max(0.0).sqrt();
        coords.column_mut(c).mapv_inplace(|x| x * scale);
    }
    Ok(coords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_recovers_line_distances() {
        // Points at 0, 1, 3 on a line
        let distances = array![[0.0, 1.0, 3.0], [1.0, 0.0, 2.0], [3.0, 2.0, 0.0]];
        let coords = classical_mds(&distances, 1, &EigenConfig::default()).unwrap();

        for i in 0..3 {
            for j in 0..3 {
                let embedded = (coords[[i, 0]] - coords[[j, 0]]).abs();
                assert!((embedded - distances[[i, j]]).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_rejects_non_square() {
        let distances = Array2::<f64>::zeros((2, 3));
        assert!(matches!(
            classical_mds(&distances, 1, &EigenConfig::default()),
            Err(AlgorithmError::NotSquare { .. })
        ));
    }
}
