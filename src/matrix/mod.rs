//! Dense index space, edge list, and donor x politician feature matrix

pub mod edge_list;
pub mod feature;
pub mod mapping;

pub use edge_list::EdgeList;
pub use feature::{FeatureMatrix, DONOR_COLUMN};
pub use mapping::IndexMapping;

use crate::graph::NativeId;
use crate::persistence::PersistenceError;
use std::path::PathBuf;
use thiserror::Error;

/// Matrix builder errors
#[derive(Error, Debug)]
pub enum MatrixError {
    #[error("Dense index base must be 0 or 1, got {0}")]
    InvalidBase(usize),

    #[error("Node {0} has no dense index")]
    UnknownNode(NativeId),

    #[error("Index mapping belongs to graph {mapping}, current graph is {graph}")]
    StaleMapping { mapping: String, graph: String },

    #[error("Index mapping is not a bijection: {0}")]
    BrokenMapping(String),

    #[error("Malformed {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

pub type MatrixResult<T> = Result<T, MatrixError>;
