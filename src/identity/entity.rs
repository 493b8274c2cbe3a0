//! Per-legislator identifier record

use super::namespace::{IdValue, Namespace};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One legislator-term record linked across identifier systems.
///
/// `ids` only holds identifiers that are known; a missing namespace means
/// the id is null. `provenance` carries the source record each id came from,
/// keyed by the namespace that source contributed. Records are never mutated
/// in place by the pipeline: every stage builds new records through the
/// consuming `with_*` methods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoliticalEntity {
    pub ids: BTreeMap<Namespace, IdValue>,

    #[serde(default)]
    pub provenance: BTreeMap<Namespace, serde_json::Value>,

    /// Projection coordinates keyed by method name, e.g. `PCA-2`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub embeddings: BTreeMap<String, Vec<f64>>,
}

impl PoliticalEntity {
    /// A record holding only its roll-call row, before any id is mapped
    pub fn unlinked(row: serde_json::Value) -> Self {
        let mut provenance = BTreeMap::new();
        provenance.insert(Namespace::Icpsr, row);

        PoliticalEntity {
            ids: BTreeMap::new(),
            provenance,
            embeddings: BTreeMap::new(),
        }
    }

    /// A record from a roll-call row with its seed key already mapped
    pub fn seed(icpsr: i64, row: serde_json::Value) -> Self {
        Self::unlinked(row).with_id(Namespace::Icpsr, IdValue::Integer(icpsr))
    }

    pub fn id(&self, namespace: Namespace) -> Option<&IdValue> {
        self.ids.get(&namespace)
    }

    pub fn has_id(&self, namespace: Namespace) -> bool {
        self.ids.contains_key(&namespace)
    }

    /// Human-readable key for diagnostics, e.g. `icpsr=20301`
    pub fn key(&self) -> String {
        match self.id(Namespace::Icpsr) {
            Some(icpsr) => format!("icpsr={}", icpsr),
            None => "icpsr=<missing>".to_string(),
        }
    }

    pub fn provenance(&self, namespace: Namespace) -> Option<&serde_json::Value> {
        self.provenance.get(&namespace)
    }

    pub fn with_id(mut self, namespace: Namespace, value: IdValue) -> Self {
        self.ids.insert(namespace, value);
        self
    }

    pub fn with_provenance(mut self, namespace: Namespace, payload: serde_json::Value) -> Self {
        self.provenance.insert(namespace, payload);
        self
    }

    pub fn with_embedding(mut self, method: impl Into<String>, coords: Vec<f64>) -> Self {
        self.embeddings.insert(method.into(), coords);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_seed_and_merge() {
        let seeded = PoliticalEntity::seed(1, json!({"icpsr": 1}));
        assert_eq!(seeded.key(), "icpsr=1");
        assert!(!seeded.has_id(Namespace::Govtrack));

        let merged = seeded
            .clone()
            .with_id(Namespace::Govtrack, IdValue::Integer(100))
            .with_provenance(Namespace::Govtrack, json!({"id": {"govtrack": 100}}));

        assert_eq!(merged.id(Namespace::Govtrack), Some(&IdValue::Integer(100)));
        assert!(merged.provenance(Namespace::Govtrack).is_some());
        // the original record is untouched
        assert!(!seeded.has_id(Namespace::Govtrack));
    }

    #[test]
    fn test_serialized_shape() {
        let entity = PoliticalEntity::seed(1, json!({"icpsr": 1}))
            .with_id(Namespace::Bioguide, "A1".into())
            .with_embedding("PCA-1", vec![0.5]);

        let value = serde_json::to_value(&entity).unwrap();
        assert_eq!(value["ids"], json!({"icpsr": 1, "bioguide": "A1"}));
        assert_eq!(value["embeddings"]["PCA-1"], json!([0.5]));

        let back: PoliticalEntity = serde_json::from_value(value).unwrap();
        assert_eq!(back, entity);
    }
}
