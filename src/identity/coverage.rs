//! Namespace coverage counts for auditing the join stages

use super::entity::PoliticalEntity;
use super::namespace::Namespace;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// How many entities carry a non-null id in each namespace
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdCoverage(BTreeMap<Namespace, usize>);

impl IdCoverage {
    pub fn count(entities: &[PoliticalEntity]) -> Self {
        let mut counts = BTreeMap::new();
        for entity in entities {
            for namespace in entity.ids.keys() {
                *counts.entry(*namespace).or_insert(0) += 1;
            }
        }
        IdCoverage(counts)
    }

    pub fn get(&self, namespace: Namespace) -> usize {
        self.0.get(&namespace).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Namespace, usize)> + '_ {
        self.0.iter().map(|(ns, count)| (*ns, *count))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for IdCoverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("{}");
        }
        let parts: Vec<String> = self.iter().map(|(ns, count)| format!("{}={}", ns, count)).collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}
