//! Principal component analysis

use super::common::{ensure_finite, AlgorithmError, AlgorithmResult};
use super::eigen::{top_eigenpairs, EigenConfig};
use ndarray::{Array2, Axis};

/// Project the rows of `data` onto its leading principal components.
///
/// Rows are samples and columns are features; columns are mean-centered
/// before the covariance matrix is decomposed. Returns `samples x components`
/// scores.
pub fn pca(
    data: &Array2<f64>,
    components: usize,
    config: &EigenConfig,
) -> AlgorithmResult<Array2<f64>> {
    ensure_finite(data)?;
    let (samples, features) = data.dim();
    if components == 0 {
        return Err(AlgorithmError::InvalidParameter(
            "at least one component is required".to_string(),
        ));
    }
    if components > features.min(samples) {
        return Err(AlgorithmError::TooManyComponents {
            requested: components,
            available: features.min(samples),
        });
    }

    let mean = data
        .mean_axis(Axis(0))
        .ok_or_else(|| AlgorithmError::InvalidParameter("empty data matrix".to_string()))?;
    let centered = data - &mean;

    let denominator = if samples > 1 { (samples - 1) as f64 } else { 1.0 };
    let covariance = centered.t().dot(&centered) / denominator;

    let pairs = top_eigenpairs(&covariance, components, config)?;
    Ok(centered.dot(&pairs.vectors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_points_on_a_line() {
        // All variance lies along (1, 1)
        let data = array![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 3.0]];
        let scores = pca(&data, 1, &EigenConfig::default()).unwrap();

        assert_eq!(scores.dim(), (4, 1));
        let step = 2.0_f64.sqrt();
        let expected = [-1.5 * step, -0.5 * step, 0.5 * step, 1.5 * step];
        for (got, want) in scores.column(0).iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-6, "{} vs {}", got, want);
        }
    }

    #[test]
    fn test_rejects_excess_components() {
        let data = array![[1.0, 2.0], [3.0, 4.0]];
        assert!(matches!(
            pca(&data, 3, &EigenConfig::default()),
            Err(AlgorithmError::TooManyComponents { .. })
        ));
    }
}
