//! Symmetric eigen-decomposition by power iteration with deflation
//!
//! Only the few leading eigenpairs are ever needed (one or two embedding
//! dimensions), so a full decomposition is not worth a LAPACK dependency.

use super::common::{ensure_square, AlgorithmError, AlgorithmResult};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Power iteration configuration
#[derive(Debug, Clone)]
pub struct EigenConfig {
    /// Maximum iterations per eigenpair
    pub max_iterations: usize,
    /// L1 change of the iterate below which an eigenvector counts as converged
    pub tolerance: f64,
    /// Seed for the random start vectors
    pub seed: u64,
}

impl Default for EigenConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: 1e-12,
            seed: 42,
        }
    }
}

/// Leading eigenpairs, largest eigenvalue first
#[derive(Debug, Clone)]
pub struct EigenPairs {
    pub values: Vec<f64>,
    /// One eigenvector per column, unit length
    pub vectors: Array2<f64>,
}

/// Compute the `k` algebraically largest eigenpairs of a symmetric matrix.
///
/// The matrix is shifted by its Gershgorin bound so every eigenvalue of the
/// iterated matrix is non-negative; the shift is removed from the reported
/// values. Eigenvector signs are fixed so the largest-magnitude component is
/// positive.
pub fn top_eigenpairs(
    matrix: &Array2<f64>,
    k: usize,
    config: &EigenConfig,
) -> AlgorithmResult<EigenPairs> {
    let n = ensure_square(matrix)?;
    if k > n {
        return Err(AlgorithmError::TooManyComponents { requested: k, available: n });
    }

    let shift = matrix
        .rows()
        .into_iter()
        .map(|row| row.iter().map(|v| v.abs()).sum::<f64>())
        .fold(0.0, f64::max);
    let mut shifted = matrix.clone();
    for i in 0..n {
        shifted[[i, i]] += shift;
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut values = Vec::with_capacity(k);
    let mut vectors = Array2::zeros((n, k));

    for c in 0..k {
        let mut v: Array1<f64> = Array1::from_shape_fn(n, |_| rng.gen_range(-1.0..1.0));
        orthogonalize(&mut v, &vectors, c);
        normalize(&mut v, c);

        for _ in 0..config.max_iterations {
            let mut w = shifted.dot(&v);
            orthogonalize(&mut w, &vectors, c);
            let norm = w.dot(&w).sqrt();
            if norm == 0.0 {
                // Remaining spectrum of the shifted matrix is zero
                break;
            }
            w /= norm;

            let change: f64 = w.iter().zip(v.iter()).map(|(a, b)| (a - b).abs()).sum();
            v = w;
            if change < config.tolerance {
                break;
            }
        }

        fix_sign(&mut v);
        let lambda = v.dot(&shifted.dot(&v));
        values.push(lambda - shift);
        vectors.column_mut(c).assign(&v);
    }

    Ok(EigenPairs { values, vectors })
}

/// Remove the components along the first `count` columns of `basis`
fn orthogonalize(v: &mut Array1<f64>, basis: &Array2<f64>, count: usize) {
    for c in 0..count {
        let u = basis.column(c);
        let projection = u.dot(&*v);
        v.scaled_add(-projection, &u);
    }
}

fn normalize(v: &mut Array1<f64>, fallback_axis: usize) {
    let norm = v.dot(&*v).sqrt();
    if norm > 0.0 {
        *v /= norm;
    } else {
        v.fill(0.0);
        v[fallback_axis] = 1.0;
    }
}

fn fix_sign(v: &mut Array1<f64>) {
    let dominant = v
        .iter()
        .copied()
        .fold(0.0_f64, |best, x| if x.abs() > best.abs() { x } else { best });
    if dominant < 0.0 {
        v.mapv_inplace(|x| -x);
    }
}
