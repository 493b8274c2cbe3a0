//! Entity resolver: links roll-call members to registry and LittleSis ids
//!
//! The join chain is fixed:
//!
//! 1. seed one entity per roll-call row and map its `icpsr`
//! 2. attach `bioguide` from the same row
//! 3. join the legislator registry on `icpsr` to get `govtrack`
//! 4. join LittleSis entities by `govtrack`, then separately by `bioguide`
//! 5. check that no id is claimed by two entities

pub mod stages;

pub use stages::{
    attach_bioguide, join_littlesis_by_bioguide, join_littlesis_by_govtrack, join_registry,
    map_icpsr, seed_entities,
};

use crate::identity::{IdCoverage, Namespace, PoliticalEntity};
use crate::persistence::{PersistenceError, PersistenceResult};
use crate::sources::{self, LittleSisRecord, RegistryRecord, RollCallRow};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Resolver errors
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("{table} {at} has no '{field}'")]
    MissingKey {
        table: &'static str,
        /// Source location, e.g. `line 4`
        at: String,
        field: &'static str,
    },

    #[error("{namespace} id {value} is claimed by both {first} and {second}")]
    DuplicateIdentifier {
        namespace: Namespace,
        value: String,
        first: String,
        second: String,
    },

    #[error("{entity} already has {namespace} id {existing}, refusing {incoming}")]
    ConflictingIdentifier {
        namespace: Namespace,
        entity: String,
        existing: String,
        incoming: String,
    },

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

pub type ResolveResult<T> = Result<T, ResolveError>;

/// The three raw tables the resolver joins
#[derive(Debug, Clone, Default)]
pub struct SourceTables {
    pub members: Vec<RollCallRow>,
    pub registry: Vec<RegistryRecord>,
    pub littlesis: Vec<LittleSisRecord>,
}

impl SourceTables {
    pub fn load(
        members: impl AsRef<Path>,
        registry: impl AsRef<Path>,
        littlesis: impl AsRef<Path>,
    ) -> PersistenceResult<Self> {
        Ok(SourceTables {
            members: sources::read_members(members)?,
            registry: sources::read_legislators(registry)?,
            littlesis: sources::read_entities(littlesis)?,
        })
    }
}

/// Coverage snapshots taken while resolving; informational only
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionReport {
    pub before_mapping: IdCoverage,
    pub after_icpsr: IdCoverage,
    pub after_all: IdCoverage,
}

/// Output of a resolver run
#[derive(Debug, Clone)]
pub struct Resolution {
    pub entities: Vec<PoliticalEntity>,
    pub report: ResolutionReport,
}

/// Runs the join chain over a set of source tables
pub struct EntityResolver<'a> {
    sources: &'a SourceTables,
}

impl<'a> EntityResolver<'a> {
    pub fn new(sources: &'a SourceTables) -> Self {
        EntityResolver { sources }
    }

    pub fn resolve(&self) -> ResolveResult<Resolution> {
        let seeded = seed_entities(&self.sources.members);
        let before_mapping = IdCoverage::count(&seeded);
        info!("Coverage before mapping: {}", before_mapping);

        let mapped = map_icpsr(&seeded, &self.sources.members)?;
        let after_icpsr = IdCoverage::count(&mapped);
        info!("Coverage after icpsr mapping: {}", after_icpsr);

        let with_bioguide = attach_bioguide(&mapped);
        let with_govtrack = join_registry(&with_bioguide, &self.sources.registry)?;
        let by_govtrack = join_littlesis_by_govtrack(&with_govtrack, &self.sources.littlesis)?;
        let entities = join_littlesis_by_bioguide(&by_govtrack, &self.sources.littlesis)?;

        let after_all = IdCoverage::count(&entities);
        info!("Coverage after all mappings: {}", after_all);

        check_uniqueness(&entities)?;

        Ok(Resolution {
            entities,
            report: ResolutionReport { before_mapping, after_icpsr, after_all },
        })
    }
}

/// Resolve a set of source tables in one call
pub fn resolve_entities(sources: &SourceTables) -> ResolveResult<Resolution> {
    EntityResolver::new(sources).resolve()
}

/// Enforce the identifier invariants over a resolved list.
///
/// Every entity must carry an `icpsr`, and no non-null id in any namespace
/// may belong to two entities. Values compare by canonical text.
pub fn check_uniqueness(entities: &[PoliticalEntity]) -> ResolveResult<()> {
    for (idx, entity) in entities.iter().enumerate() {
        if !entity.has_id(Namespace::Icpsr) {
            return Err(ResolveError::MissingKey {
                table: "entities",
                at: format!("record {}", idx + 1),
                field: "icpsr",
            });
        }
    }

    for namespace in Namespace::ALL {
        let mut owners: HashMap<String, usize> = HashMap::new();
        for (idx, entity) in entities.iter().enumerate() {
            let Some(value) = entity.id(namespace) else {
                continue;
            };
            if let Some(&first) = owners.get(&value.canonical()) {
                return Err(ResolveError::DuplicateIdentifier {
                    namespace,
                    value: value.canonical(),
                    first: label(first, &entities[first]),
                    second: label(idx, entity),
                });
            }
            owners.insert(value.canonical(), idx);
        }
    }
    Ok(())
}

fn label(idx: usize, entity: &PoliticalEntity) -> String {
    format!("record {} ({})", idx + 1, entity.key())
}
