//! Legislator registry (historical legislator records with nested ids)

use crate::identity::IdValue;
use crate::persistence::{self, PersistenceResult};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

/// A registry record reduced to its join keys, with the full record kept as payload
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryRecord {
    pub icpsr: Option<IdValue>,
    pub govtrack: Option<IdValue>,
    pub payload: Value,
}

impl RegistryRecord {
    pub fn from_value(payload: Value) -> Self {
        let ids = payload.get("id");
        let icpsr = ids.and_then(|ids| ids.get("icpsr")).and_then(IdValue::from_json);
        let govtrack = ids.and_then(|ids| ids.get("govtrack")).and_then(IdValue::from_json);
        RegistryRecord { icpsr, govtrack, payload }
    }

    /// Both join keys, or `None` when the record cannot take part in the join
    pub fn join_keys(&self) -> Option<(&IdValue, &IdValue)> {
        Some((self.icpsr.as_ref()?, self.govtrack.as_ref()?))
    }
}

/// Read the registry from a JSON or YAML file
pub fn read_legislators(path: impl AsRef<Path>) -> PersistenceResult<Vec<RegistryRecord>> {
    let path = path.as_ref();
    let values: Vec<Value> = persistence::read_structured(path)?;
    let records: Vec<RegistryRecord> = values.into_iter().map(RegistryRecord::from_value).collect();

    let joinable = records.iter().filter(|r| r.join_keys().is_some()).count();
    debug!("{} registry records lack icpsr or govtrack", records.len() - joinable);
    info!(
        "Read {} registry records ({} joinable) from {}",
        records.len(),
        joinable,
        path.display()
    );
    Ok(records)
}
