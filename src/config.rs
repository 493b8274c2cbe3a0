//! Pipeline configuration
//!
//! Loaded from an optional YAML file. Every field has a default, so a file
//! only needs the settings it changes.

use crate::persistence::{self, PersistenceError};
use crate::projection::ProjectionMethod;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings shared by every pipeline step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory holding inputs and receiving outputs
    pub data_dir: PathBuf,
    /// Legislative session whose roll-call members seed the run
    pub congress: u32,
    /// Divide each feature-matrix row by its sum
    pub normalize_rows: bool,
    /// First dense index (0 or 1)
    pub index_base: usize,
    /// Projection methods to run, e.g. `PCA-2`
    pub projections: Vec<ProjectionMethod>,
    /// Neighbors per point for Isomap
    pub isomap_neighbors: usize,
    /// Seed for the eigen solver's start vectors
    pub seed: u64,
    /// Directory of per-politician NVD files; `<data_dir>/nvd` when unset
    pub nvd_dir: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            congress: 117,
            normalize_rows: false,
            index_base: 1,
            projections: ProjectionMethod::all(),
            isomap_neighbors: 5,
            seed: 42,
            nvd_dir: None,
        }
    }
}

impl PipelineConfig {
    /// Load and validate a YAML config file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let config: PipelineConfig = persistence::read_yaml(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.index_base > 1 {
            return Err(ConfigError::Invalid(format!(
                "index_base must be 0 or 1, got {}",
                self.index_base
            )));
        }
        if self.isomap_neighbors == 0 {
            return Err(ConfigError::Invalid("isomap_neighbors must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn paths(&self) -> PipelinePaths {
        PipelinePaths::new(&self.data_dir, self.congress, self.nvd_dir.clone())
    }
}

/// Every input and output file of a pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelinePaths {
    pub members: PathBuf,
    pub registry: PathBuf,
    pub littlesis_entities: PathBuf,
    pub graph: PathBuf,
    pub politicians: PathBuf,
    pub coverage: PathBuf,
    pub donations: PathBuf,
    pub native_to_dense: PathBuf,
    pub dense_to_native: PathBuf,
    pub edge_list: PathBuf,
    pub feature_matrix: PathBuf,
    pub nvd_dir: PathBuf,
    pub distances: PathBuf,
}

impl PipelinePaths {
    pub fn new(data_dir: &Path, congress: u32, nvd_dir: Option<PathBuf>) -> Self {
        let at = |name: String| data_dir.join(name);
        PipelinePaths {
            members: at(format!("voteview-HS{}_members.csv", congress)),
            registry: at("legislators-historical.json".to_string()),
            littlesis_entities: at("littlesis-entities.json".to_string()),
            graph: at("littlesis-graph.json".to_string()),
            politicians: at(format!("politicians_{}.json", congress)),
            coverage: at(format!("politicians_{}-coverage.json", congress)),
            donations: at("donation_to_politician.json".to_string()),
            native_to_dense: at("id-mapping-littlesis-to-mine.json".to_string()),
            dense_to_native: at("id-mapping-mine-to-littlesis.json".to_string()),
            edge_list: at("nvd-network.csv".to_string()),
            feature_matrix: at("nvd-node_attributes.csv".to_string()),
            nvd_dir: nvd_dir.unwrap_or_else(|| data_dir.join("nvd")),
            distances: at("nvd-distance-matrix.json".to_string()),
        }
    }
}
