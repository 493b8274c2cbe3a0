//! Ideograph
//!
//! Legislator ideology scores from the structure of a campaign-donation
//! network, built as a batch pipeline over flat files.
//!
//! # Architecture
//!
//! - `identity`: per-legislator records linked across ICPSR, Bioguide,
//!   GovTrack and LittleSis ids
//! - `sources`: readers for the roll-call, registry and LittleSis tables
//! - `resolve`: the fixed join chain that builds the entity list
//! - `graph`: the LittleSis relationship graph
//! - `donation`: per-(politician, donor) donation totals
//! - `matrix`: dense index space, edge list and donor x politician features
//! - `projection`: distance assembly, projection and embedding merge-back
//! - `pipeline`: the steps above wired to the files named by `config`
//!
//! ## Example Usage
//!
//! ```rust
//! use ideograph::donation::aggregate_donations;
//! use ideograph::graph::{PropertyMap, PropertyValue, RelationshipGraph};
//! use ideograph::identity::{IdValue, Namespace, PoliticalEntity};
//!
//! let mut graph = RelationshipGraph::new(false);
//! let mut attrs = PropertyMap::new();
//! attrs.insert("id".to_string(), PropertyValue::Integer(9001));
//! graph.add_node(9001, attrs).unwrap();
//! graph.add_node(42, PropertyMap::new()).unwrap();
//!
//! let mut amount = PropertyMap::new();
//! amount.insert("amount".to_string(), PropertyValue::Float(99.0));
//! graph.add_edge(42, 9001, amount).unwrap();
//!
//! let entity = PoliticalEntity::seed(1, serde_json::json!({}))
//!     .with_id(Namespace::Littlesis, IdValue::Integer(9001));
//! let donations = aggregate_donations(&graph, &[entity]).unwrap();
//! assert_eq!(donations.amount(&9001.into(), &42.into()), Some(99.0));
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod donation;
pub mod graph;
pub mod identity;
pub mod matrix;
pub mod persistence;
pub mod pipeline;
pub mod projection;
pub mod resolve;
pub mod sources;

// Re-export main types for convenience
pub use config::{ConfigError, PipelineConfig, PipelinePaths};

pub use donation::{aggregate_donations, DonationTable};

pub use graph::{
    Edge, EdgeId, GraphError, GraphResult, NativeId, Node, PropertyMap, PropertyValue,
    RelationshipGraph,
};

pub use identity::{IdCoverage, IdValue, Namespace, PoliticalEntity};

pub use matrix::{EdgeList, FeatureMatrix, IndexMapping, MatrixError, MatrixResult};

pub use persistence::{PersistenceError, PersistenceResult};

pub use pipeline::{Pipeline, PipelineError, PipelineResult, RunSummary};

pub use projection::{
    merge_embeddings, rescale_columns, DistanceMatrix, ProjectionError, ProjectionMethod,
    ProjectionResult, Projector,
};

pub use resolve::{
    check_uniqueness, resolve_entities, EntityResolver, Resolution, ResolutionReport,
    ResolveError, ResolveResult, SourceTables,
};
