//! Raw source tables consumed by the entity resolver

pub mod littlesis;
pub mod registry;
pub mod rollcall;

pub use littlesis::{read_entities, LittleSisRecord};
pub use registry::{read_legislators, RegistryRecord};
pub use rollcall::{read_members, RollCallRow, BIOGUIDE_COLUMN, ICPSR_COLUMN};

use crate::persistence::{self, PersistenceResult};
use std::path::Path;
use tracing::info;

/// Convert a YAML document (the registry's distribution format) to JSON
pub fn convert_yaml_to_json(input: impl AsRef<Path>, output: impl AsRef<Path>) -> PersistenceResult<()> {
    let value: serde_json::Value = persistence::read_yaml(input.as_ref())?;
    persistence::write_json(output.as_ref(), &value)?;
    info!(
        "Converted {} to {}",
        input.as_ref().display(),
        output.as_ref().display()
    );
    Ok(())
}
