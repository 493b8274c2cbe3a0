//! Relationship-graph entity records (the graph dataset's own person records)

use crate::identity::IdValue;
use crate::persistence::{self, PersistenceResult};
use serde_json::Value;
use std::path::Path;
use tracing::{info, warn};

/// A relationship-graph entity reduced to its id and elected-representative keys
#[derive(Debug, Clone, PartialEq)]
pub struct LittleSisRecord {
    pub id: IdValue,
    pub govtrack_id: Option<IdValue>,
    pub bioguide_id: Option<IdValue>,
    pub payload: Value,
}

impl LittleSisRecord {
    /// Extract the keys; records without an `id` cannot be linked and yield `None`
    pub fn from_value(payload: Value) -> Option<Self> {
        let id = payload.get("id").and_then(IdValue::from_json)?;
        let rep = payload
            .get("attributes")
            .and_then(|a| a.get("extensions"))
            .and_then(|e| e.get("ElectedRepresentative"));
        let govtrack_id = rep.and_then(|r| r.get("govtrack_id")).and_then(IdValue::from_json);
        let bioguide_id = rep.and_then(|r| r.get("bioguide_id")).and_then(IdValue::from_json);

        Some(LittleSisRecord { id, govtrack_id, bioguide_id, payload })
    }
}

/// Read the entity records from a JSON file
pub fn read_entities(path: impl AsRef<Path>) -> PersistenceResult<Vec<LittleSisRecord>> {
    let path = path.as_ref();
    let values: Vec<Value> = persistence::read_json(path)?;
    let total = values.len();
    let records: Vec<LittleSisRecord> = values.into_iter().filter_map(LittleSisRecord::from_value).collect();

    if records.len() < total {
        warn!("Skipped {} relationship-graph entities without an id", total - records.len());
    }
    info!("Read {} relationship-graph entities from {}", records.len(), path.display());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_elected_representative_keys() {
        let record = LittleSisRecord::from_value(json!({
            "id": 9001,
            "attributes": {"extensions": {"ElectedRepresentative": {
                "govtrack_id": "100", "bioguide_id": "A1"
            }}}
        }))
        .unwrap();

        assert_eq!(record.id, IdValue::Integer(9001));
        assert_eq!(record.govtrack_id, Some(IdValue::Text("100".into())));
        assert_eq!(record.bioguide_id, Some(IdValue::Text("A1".into())));
    }

    #[test]
    fn test_non_representative_has_no_keys() {
        let record = LittleSisRecord::from_value(json!({"id": 5, "attributes": {"extensions": {}}})).unwrap();
        assert_eq!(record.govtrack_id, None);
        assert_eq!(record.bioguide_id, None);
    }

    #[test]
    fn test_missing_id_is_skipped() {
        assert!(LittleSisRecord::from_value(json!({"attributes": {}})).is_none());
    }
}
