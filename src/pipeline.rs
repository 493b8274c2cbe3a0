//! Batch pipeline: each step reads the previous step's files and writes its own
//!
//! Steps run in a fixed order:
//! `map_ids` -> `donations` -> `build_matrix` -> (external NVD) -> `distances` -> `project`.

use crate::config::{ConfigError, PipelineConfig, PipelinePaths};
use crate::donation::{aggregate_donations, DonationTable};
use crate::graph::{GraphError, RelationshipGraph};
use crate::identity::{self, PoliticalEntity};
use crate::matrix::{EdgeList, FeatureMatrix, IndexMapping, MatrixError};
use crate::persistence::{self, PersistenceError};
use crate::projection::{project_entities, DistanceMatrix, ProjectionError};
use crate::resolve::{resolve_entities, Resolution, ResolveError, SourceTables};
use thiserror::Error;
use tracing::info;

/// Any pipeline step failure, tagged by the module that raised it
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Entity resolution failed: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Relationship graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Matrix build failed: {0}")]
    Matrix(#[from] MatrixError),

    #[error("Projection failed: {0}")]
    Projection(#[from] ProjectionError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Outputs of the matrix step
#[derive(Debug, Clone)]
pub struct MatrixArtifacts {
    pub mapping: IndexMapping,
    pub edges: EdgeList,
    pub features: FeatureMatrix,
}

/// What a full run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub resolution: Resolution,
    pub donations: DonationTable,
    pub matrix: MatrixArtifacts,
    /// `None` when no NVD output was available to project
    pub projected: Option<Vec<PoliticalEntity>>,
}

/// Runs pipeline steps against the files named by a config
pub struct Pipeline {
    config: PipelineConfig,
    paths: PipelinePaths,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> PipelineResult<Self> {
        config.validate()?;
        let paths = config.paths();
        Ok(Pipeline { config, paths })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn paths(&self) -> &PipelinePaths {
        &self.paths
    }

    /// Resolve identifiers and write the entity list plus its coverage report
    pub fn map_ids(&self) -> PipelineResult<Resolution> {
        let sources = SourceTables::load(
            &self.paths.members,
            &self.paths.registry,
            &self.paths.littlesis_entities,
        )?;
        let resolution = resolve_entities(&sources)?;

        identity::save_entities(&self.paths.politicians, &resolution.entities)?;
        persistence::write_json(&self.paths.coverage, &resolution.report)?;
        info!(
            "Wrote {} entities to {}",
            resolution.entities.len(),
            self.paths.politicians.display()
        );
        Ok(resolution)
    }

    /// Aggregate donations for every linked politician
    pub fn donations(&self) -> PipelineResult<DonationTable> {
        let graph = RelationshipGraph::load(&self.paths.graph)?;
        let entities = identity::load_entities(&self.paths.politicians)?;
        let table = aggregate_donations(&graph, &entities)?;
        table.save(&self.paths.donations)?;
        Ok(table)
    }

    /// Generate the dense index space, edge list, and feature matrix
    pub fn build_matrix(&self) -> PipelineResult<MatrixArtifacts> {
        let graph = RelationshipGraph::load(&self.paths.graph)?;
        let donations = DonationTable::load(&self.paths.donations)?;

        let mapping = IndexMapping::generate(&graph, self.config.index_base)?;
        mapping.save(&self.paths.native_to_dense, &self.paths.dense_to_native)?;

        let edges = EdgeList::build(&graph, &mapping)?;
        edges.write(&self.paths.edge_list)?;

        let features = FeatureMatrix::build(&donations, &mapping, self.config.normalize_rows)?;
        features.write_csv(&self.paths.feature_matrix)?;

        Ok(MatrixArtifacts { mapping, edges, features })
    }

    /// Assemble the NVD output into one distance matrix
    pub fn distances(&self) -> PipelineResult<DistanceMatrix> {
        let politicians = FeatureMatrix::read_header(&self.paths.feature_matrix)?;
        let distances = DistanceMatrix::assemble(&politicians, &self.paths.nvd_dir)?;
        distances.save(&self.paths.distances)?;
        Ok(distances)
    }

    /// Project the distance matrix and store the embeddings on the entity list
    pub fn project(&self) -> PipelineResult<Vec<PoliticalEntity>> {
        let entities = identity::load_entities(&self.paths.politicians)?;
        let distances = DistanceMatrix::load(&self.paths.distances)?;
        let projected = project_entities(
            &entities,
            &distances,
            &self.config.projections,
            self.config.isomap_neighbors,
            self.config.seed,
        )?;
        identity::save_entities(&self.paths.politicians, &projected)?;
        Ok(projected)
    }

    /// Run every step; projection is skipped when the NVD directory is absent
    pub fn run(&self) -> PipelineResult<RunSummary> {
        let resolution = self.map_ids()?;
        let donations = self.donations()?;
        let matrix = self.build_matrix()?;

        let projected = if self.paths.nvd_dir.is_dir() {
            self.distances()?;
            Some(self.project()?)
        } else {
            info!(
                "No NVD output at {}; stopping after the feature matrix",
                self.paths.nvd_dir.display()
            );
            None
        };

        Ok(RunSummary { resolution, donations, matrix, projected })
    }
}
