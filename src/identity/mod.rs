//! Identifier store: one record per legislator-term, linked across id systems

pub mod coverage;
pub mod entity;
pub mod namespace;

pub use coverage::IdCoverage;
pub use entity::PoliticalEntity;
pub use namespace::{IdValue, Namespace};

use crate::persistence::{self, PersistenceResult};
use std::path::Path;

/// Load a resolved entity list
pub fn load_entities(path: impl AsRef<Path>) -> PersistenceResult<Vec<PoliticalEntity>> {
    persistence::read_json(path)
}

/// Save an entity list atomically
pub fn save_entities(path: impl AsRef<Path>, entities: &[PoliticalEntity]) -> PersistenceResult<()> {
    persistence::write_json(path, entities)
}
