//! Join stages of the entity resolver
//!
//! Each stage takes the previous entity list and returns a new one; nothing is
//! mutated in place. Stages must run in the order `EntityResolver::resolve`
//! uses, since later joins key on ids attached by earlier ones.

use super::{ResolveError, ResolveResult};
use crate::identity::{IdValue, Namespace, PoliticalEntity};
use crate::sources::{LittleSisRecord, RegistryRecord, RollCallRow, BIOGUIDE_COLUMN, ICPSR_COLUMN};
use std::collections::HashMap;
use tracing::debug;

/// One unlinked entity per roll-call row
pub fn seed_entities(members: &[RollCallRow]) -> Vec<PoliticalEntity> {
    members
        .iter()
        .map(|row| PoliticalEntity::unlinked(row.clone().into_payload()))
        .collect()
}

/// Set `icpsr` from each entity's roll-call row; a row without one fails the run.
///
/// `members` are the rows the entities were seeded from, in the same order.
/// They are only used to report the source line of a failing row.
pub fn map_icpsr(
    entities: &[PoliticalEntity],
    members: &[RollCallRow],
) -> ResolveResult<Vec<PoliticalEntity>> {
    entities
        .iter()
        .enumerate()
        .map(|(idx, entity)| {
            let icpsr = roll_call_field(entity, ICPSR_COLUMN)
                .and_then(|value| match value {
                    IdValue::Integer(i) => Some(i),
                    IdValue::Text(s) => s.parse().ok(),
                })
                .ok_or_else(|| ResolveError::MissingKey {
                    table: "roll-call",
                    at: match members.get(idx) {
                        Some(row) => format!("line {}", row.line),
                        None => format!("record {}", idx + 1),
                    },
                    field: ICPSR_COLUMN,
                })?;
            Ok(entity.clone().with_id(Namespace::Icpsr, IdValue::Integer(icpsr)))
        })
        .collect()
}

/// Set `bioguide` from the roll-call row where present; blank stays null
pub fn attach_bioguide(entities: &[PoliticalEntity]) -> Vec<PoliticalEntity> {
    entities
        .iter()
        .map(|entity| match roll_call_field(entity, BIOGUIDE_COLUMN) {
            Some(bioguide) => entity.clone().with_id(Namespace::Bioguide, bioguide),
            None => entity.clone(),
        })
        .collect()
}

/// Attach `govtrack` and the registry payload by `icpsr` equality.
///
/// Entities without a registry record keep a null `govtrack`. Registry records
/// that disagree about the govtrack id of one icpsr are a conflict.
pub fn join_registry(
    entities: &[PoliticalEntity],
    registry: &[RegistryRecord],
) -> ResolveResult<Vec<PoliticalEntity>> {
    let mut by_icpsr: HashMap<String, Vec<(&IdValue, &serde_json::Value)>> = HashMap::new();
    for record in registry {
        if let Some((icpsr, govtrack)) = record.join_keys() {
            by_icpsr
                .entry(icpsr.canonical())
                .or_default()
                .push((govtrack, &record.payload));
        }
    }

    entities
        .iter()
        .map(|entity| {
            let Some(icpsr) = entity.id(Namespace::Icpsr) else {
                return Ok(entity.clone());
            };
            let Some(matches) = by_icpsr.get(&icpsr.canonical()) else {
                debug!("No registry record for {}", entity.key());
                return Ok(entity.clone());
            };

            let mut linked = entity.clone();
            for (govtrack, payload) in matches {
                linked = link(linked, Namespace::Govtrack, (*govtrack).clone(), payload)?;
            }
            Ok(linked)
        })
        .collect()
}

/// Attach `littlesis` where an entity's `govtrack` equals a record's `govtrack_id`
pub fn join_littlesis_by_govtrack(
    entities: &[PoliticalEntity],
    records: &[LittleSisRecord],
) -> ResolveResult<Vec<PoliticalEntity>> {
    join_littlesis(entities, records, Namespace::Govtrack, |r| r.govtrack_id.as_ref())
}

/// Attach `littlesis` where an entity's `bioguide` equals a record's `bioguide_id`
pub fn join_littlesis_by_bioguide(
    entities: &[PoliticalEntity],
    records: &[LittleSisRecord],
) -> ResolveResult<Vec<PoliticalEntity>> {
    join_littlesis(entities, records, Namespace::Bioguide, |r| r.bioguide_id.as_ref())
}

/// One littlesis pass keyed on `namespace`.
///
/// The match decision is made per (record, entity) pair from that pair's
/// keys alone. Keys compare by canonical text so `100` and `"100"` agree.
fn join_littlesis<F>(
    entities: &[PoliticalEntity],
    records: &[LittleSisRecord],
    namespace: Namespace,
    record_key: F,
) -> ResolveResult<Vec<PoliticalEntity>>
where
    F: Fn(&LittleSisRecord) -> Option<&IdValue>,
{
    let mut by_key: HashMap<String, Vec<&LittleSisRecord>> = HashMap::new();
    for record in records {
        if let Some(key) = record_key(record) {
            by_key.entry(key.canonical()).or_default().push(record);
        }
    }

    let mut matched = 0usize;
    let linked = entities
        .iter()
        .map(|entity| {
            let matches = entity
                .id(namespace)
                .and_then(|key| by_key.get(&key.canonical()));
            let Some(matches) = matches else {
                return Ok(entity.clone());
            };

            matched += 1;
            let mut linked = entity.clone();
            for record in matches {
                linked = link(linked, Namespace::Littlesis, record.id.clone(), &record.payload)?;
            }
            Ok(linked)
        })
        .collect::<ResolveResult<Vec<_>>>()?;

    debug!("littlesis by {}: {} entities matched", namespace, matched);
    Ok(linked)
}

/// Attach an id and its source payload, refusing to replace a different id
fn link(
    entity: PoliticalEntity,
    namespace: Namespace,
    value: IdValue,
    payload: &serde_json::Value,
) -> ResolveResult<PoliticalEntity> {
    if let Some(existing) = entity.id(namespace) {
        if !existing.same_as(&value) {
            return Err(ResolveError::ConflictingIdentifier {
                namespace,
                entity: entity.key(),
                existing: existing.canonical(),
                incoming: value.canonical(),
            });
        }
    }
    Ok(entity.with_id(namespace, value).with_provenance(namespace, payload.clone()))
}

fn roll_call_field(entity: &PoliticalEntity, column: &str) -> Option<IdValue> {
    entity
        .provenance(Namespace::Icpsr)
        .and_then(|row| row.get(column))
        .and_then(IdValue::from_json)
}
