pub mod common;
pub mod eigen;
pub mod isomap;
pub mod mds;
pub mod pathfinding;
pub mod pca;

pub use common::{AlgorithmError, AlgorithmResult, GraphView};
pub use eigen::{top_eigenpairs, EigenConfig, EigenPairs};
pub use isomap::{isomap, IsomapConfig};
pub use mds::classical_mds;
pub use pathfinding::dijkstra_distances;
pub use pca::pca;
