//! Donation aggregation over the relationship graph
//!
//! A politician is any graph node whose `id` attribute equals some resolved
//! entity's `littlesis` id. For each politician, every incident edge with an
//! `amount` adds to the total for the node on the other end (the donor).

use crate::graph::{GraphResult, NativeId, RelationshipGraph};
use crate::identity::{Namespace, PoliticalEntity};
use crate::persistence::{self, PersistenceResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

/// politician native id -> (donor native id -> summed amount)
///
/// Politicians are kept in graph node order and donors in the order their
/// first edge was seen, so serialization is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DonationTable(IndexMap<NativeId, IndexMap<NativeId, f64>>);

impl DonationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a politician with no donors yet
    pub fn add_politician(&mut self, politician: NativeId) {
        self.0.entry(politician).or_default();
    }

    /// Add `amount` to the (politician, donor) total
    pub fn add(&mut self, politician: NativeId, donor: NativeId, amount: f64) {
        *self.0.entry(politician).or_default().entry(donor).or_insert(0.0) += amount;
    }

    pub fn politicians(&self) -> impl Iterator<Item = &NativeId> {
        self.0.keys()
    }

    pub fn donors_of(&self, politician: &NativeId) -> Option<&IndexMap<NativeId, f64>> {
        self.0.get(politician)
    }

    /// Summed amount, or `None` when the donor never gave to this politician
    pub fn amount(&self, politician: &NativeId, donor: &NativeId) -> Option<f64> {
        self.0.get(politician).and_then(|donors| donors.get(donor)).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NativeId, &IndexMap<NativeId, f64>)> {
        self.0.iter()
    }

    /// Number of politicians
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn save(&self, path: impl AsRef<Path>) -> PersistenceResult<()> {
        persistence::write_json(path, self)
    }

    pub fn load(path: impl AsRef<Path>) -> PersistenceResult<Self> {
        persistence::read_json(path)
    }
}

/// Sum donation amounts per (politician, donor) pair.
///
/// Every politician gets an entry, even with no qualifying edges. Edges
/// without an amount are skipped; a non-numeric amount is an error.
pub fn aggregate_donations(
    graph: &RelationshipGraph,
    entities: &[PoliticalEntity],
) -> GraphResult<DonationTable> {
    let littlesis_ids: HashSet<NativeId> = entities
        .iter()
        .filter_map(|e| e.id(Namespace::Littlesis))
        .map(|id| id.as_native_id())
        .collect();

    let mut table = DonationTable::new();
    let mut counted = 0usize;
    for node in graph.nodes() {
        let Some(politician) = node.native_id_attribute()? else {
            continue;
        };
        if !littlesis_ids.contains(&politician) {
            continue;
        }

        table.add_politician(politician.clone());
        for incident in graph.incident_edges(&node.key) {
            let Some(amount) = incident.edge.amount()? else {
                continue;
            };
            if amount < 0.0 {
                warn!(
                    "Negative amount {} on edge {} -> {}",
                    amount, incident.edge.source, incident.edge.target
                );
            }
            table.add(politician.clone(), incident.neighbor.clone(), amount);
            counted += 1;
        }
        debug!(
            "Politician {}: {} donors",
            politician,
            table.donors_of(&politician).map_or(0, |d| d.len())
        );
    }

    let unmatched = littlesis_ids.len().saturating_sub(table.len());
    if unmatched > 0 {
        warn!("{} littlesis ids have no node in the relationship graph", unmatched);
    }
    info!(
        "Aggregated {} donation edges for {} politicians",
        counted,
        table.len()
    );
    Ok(table)
}
