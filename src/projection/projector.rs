//! Dimensionality reduction over a precomputed distance matrix

use super::{ProjectionError, ProjectionResult};
use ideograph_algorithms::{classical_mds, isomap, pca, EigenConfig, IsomapConfig};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Turns an `n x n` distance matrix into `n x dims` coordinates
pub trait Projector: Send + Sync {
    fn project(&self, distances: &Array2<f64>, dims: usize) -> ProjectionResult<Array2<f64>>;
}

/// PCA over the rows of the distance matrix, treating each row as a feature vector
#[derive(Debug, Clone, Default)]
pub struct Pca {
    pub eigen: EigenConfig,
}

impl Projector for Pca {
    fn project(&self, distances: &Array2<f64>, dims: usize) -> ProjectionResult<Array2<f64>> {
        Ok(pca(distances, dims, &self.eigen)?)
    }
}

/// Classical MDS with the distances taken as precomputed
#[derive(Debug, Clone, Default)]
pub struct ClassicalMds {
    pub eigen: EigenConfig,
}

impl Projector for ClassicalMds {
    fn project(&self, distances: &Array2<f64>, dims: usize) -> ProjectionResult<Array2<f64>> {
        Ok(classical_mds(distances, dims, &self.eigen)?)
    }
}

/// Isomap over a k-nearest-neighbor graph of the distances
#[derive(Debug, Clone, Default)]
pub struct Isomap {
    pub config: IsomapConfig,
}

impl Projector for Isomap {
    fn project(&self, distances: &Array2<f64>, dims: usize) -> ProjectionResult<Array2<f64>> {
        Ok(isomap(distances, dims, &self.config)?)
    }
}

/// Projection algorithm family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    Pca,
    Mds,
    Isomap,
}

impl MethodKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MethodKind::Pca => "PCA",
            MethodKind::Mds => "MDS",
            MethodKind::Isomap => "Isomap",
        }
    }
}

/// An algorithm plus output dimensionality, named like `PCA-2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectionMethod {
    pub kind: MethodKind,
    pub dims: usize,
}

impl ProjectionMethod {
    pub const fn new(kind: MethodKind, dims: usize) -> Self {
        ProjectionMethod { kind, dims }
    }

    /// Every method in both supported dimensionalities
    pub fn all() -> Vec<ProjectionMethod> {
        [MethodKind::Pca, MethodKind::Mds, MethodKind::Isomap]
            .into_iter()
            .flat_map(|kind| [2, 1].into_iter().map(move |dims| ProjectionMethod::new(kind, dims)))
            .collect()
    }

    /// Build the projector for this method
    pub fn projector(&self, neighbors: usize, seed: u64) -> Box<dyn Projector> {
        let eigen = EigenConfig { seed, ..EigenConfig::default() };
        match self.kind {
            MethodKind::Pca => Box::new(Pca { eigen }),
            MethodKind::Mds => Box::new(ClassicalMds { eigen }),
            MethodKind::Isomap => Box::new(Isomap {
                config: IsomapConfig { neighbors, eigen },
            }),
        }
    }
}

impl fmt::Display for ProjectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind.as_str(), self.dims)
    }
}

impl FromStr for ProjectionMethod {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || ProjectionError::UnknownMethod(s.to_string());
        let (kind, dims) = s.trim().rsplit_once('-').ok_or_else(unknown)?;
        let kind = match kind.to_ascii_lowercase().as_str() {
            "pca" => MethodKind::Pca,
            "mds" => MethodKind::Mds,
            "isomap" => MethodKind::Isomap,
            _ => return Err(unknown()),
        };
        match dims.parse() {
            Ok(dims @ (1 | 2)) => Ok(ProjectionMethod::new(kind, dims)),
            _ => Err(unknown()),
        }
    }
}

impl TryFrom<String> for ProjectionMethod {
    type Error = ProjectionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ProjectionMethod> for String {
    fn from(method: ProjectionMethod) -> Self {
        method.to_string()
    }
}

/// Min-max rescale each column independently into [-1, 1].
///
/// A constant column (including a single-row matrix) maps to 0.
pub fn rescale_columns(coords: &Array2<f64>) -> Array2<f64> {
    let mut scaled = coords.clone();
    for mut column in scaled.columns_mut() {
        let min = column.iter().copied().fold(f64::INFINITY, f64::min);
        let max = column.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let range = max - min;
        if range > 0.0 && range.is_finite() {
            column.mapv_inplace(|v| 2.0 * (v - min) / range - 1.0);
        } else {
            column.fill(0.0);
        }
    }
    scaled
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_method_names() {
        let names: Vec<String> = ProjectionMethod::all().iter().map(|m| m.to_string()).collect();
        assert_eq!(names, vec!["PCA-2", "PCA-1", "MDS-2", "MDS-1", "Isomap-2", "Isomap-1"]);

        for name in &names {
            let parsed: ProjectionMethod = name.parse().unwrap();
            assert_eq!(&parsed.to_string(), name);
        }
        assert!("TSNE-2".parse::<ProjectionMethod>().is_err());
        assert!("PCA-3".parse::<ProjectionMethod>().is_err());
    }

    #[test]
    fn test_method_serde() {
        let methods: Vec<ProjectionMethod> = serde_json::from_str(r#"["PCA-1", "isomap-2"]"#).unwrap();
        assert_eq!(methods[1], ProjectionMethod::new(MethodKind::Isomap, 2));
        assert_eq!(serde_json::to_string(&methods[0]).unwrap(), "\"PCA-1\"");
    }

    #[test]
    fn test_rescale_columns() {
        let coords = array![[0.0, 5.0, 3.0], [10.0, 5.0, 1.0], [5.0, 5.0, 2.0]];
        let scaled = rescale_columns(&coords);

        assert_eq!(scaled.column(0).to_vec(), vec![-1.0, 1.0, 0.0]);
        assert_eq!(scaled.column(1).to_vec(), vec![0.0, 0.0, 0.0]);
        assert_eq!(scaled.column(2).to_vec(), vec![1.0, -1.0, 0.0]);
    }

    #[test]
    fn test_projectors_return_requested_shape() {
        let distances = array![
            [0.0, 1.0, 2.0, 3.0],
            [1.0, 0.0, 1.0, 2.0],
            [2.0, 1.0, 0.0, 1.0],
            [3.0, 2.0, 1.0, 0.0]
        ];
        for method in ProjectionMethod::all() {
            let coords = method.projector(2, 42).project(&distances, method.dims).unwrap();
            assert_eq!(coords.dim(), (4, method.dims), "{}", method);
        }
    }
}
