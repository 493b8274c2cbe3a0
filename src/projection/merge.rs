//! Attach projected coordinates back onto entity records

use super::projector::ProjectionMethod;
use super::{ProjectionError, ProjectionResult};
use crate::graph::NativeId;
use crate::identity::{Namespace, PoliticalEntity};
use ndarray::Array2;
use std::collections::HashMap;
use tracing::info;

/// Store row `i` of `coords` as the `method` embedding of the entity whose
/// `littlesis` id is `politicians[i]`.
///
/// Every politician must resolve to exactly one entity. Entities not named
/// by any politician are returned unchanged.
pub fn merge_embeddings(
    entities: &[PoliticalEntity],
    politicians: &[NativeId],
    coords: &Array2<f64>,
    method: &ProjectionMethod,
) -> ProjectionResult<Vec<PoliticalEntity>> {
    if coords.nrows() != politicians.len() {
        return Err(ProjectionError::Dimension {
            expected: politicians.len(),
            found: coords.nrows(),
        });
    }

    let mut owners: HashMap<NativeId, Vec<usize>> = HashMap::new();
    for (idx, entity) in entities.iter().enumerate() {
        if let Some(id) = entity.id(Namespace::Littlesis) {
            owners.entry(id.as_native_id()).or_default().push(idx);
        }
    }

    let mut merged = entities.to_vec();
    for (row, politician) in politicians.iter().enumerate() {
        let matches = owners.get(politician).map_or(&[][..], |v| v.as_slice());
        let &[idx] = matches else {
            return Err(ProjectionError::UnresolvedPolitician {
                politician: politician.clone(),
                matches: matches.len(),
            });
        };
        merged[idx] = merged[idx]
            .clone()
            .with_embedding(method.to_string(), coords.row(row).to_vec());
    }

    info!("Merged {} embeddings for {}", politicians.len(), method);
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::IdValue;
    use crate::projection::MethodKind;
    use ndarray::array;
    use serde_json::json;

    fn entity(icpsr: i64, littlesis: Option<i64>) -> PoliticalEntity {
        let entity = PoliticalEntity::seed(icpsr, json!({}));
        match littlesis {
            Some(id) => entity.with_id(Namespace::Littlesis, IdValue::Integer(id)),
            None => entity,
        }
    }

    const PCA_2: ProjectionMethod = ProjectionMethod::new(MethodKind::Pca, 2);

    #[test]
    fn test_merge_by_littlesis_id() {
        let entities = vec![entity(1, Some(9001)), entity(2, None), entity(3, Some(9002))];
        let coords = array![[0.5, -1.0], [1.0, 0.0]];
        let merged =
            merge_embeddings(&entities, &[9002.into(), 9001.into()], &coords, &PCA_2).unwrap();

        assert_eq!(merged[0].embeddings["PCA-2"], vec![1.0, 0.0]);
        assert_eq!(merged[2].embeddings["PCA-2"], vec![0.5, -1.0]);
        assert!(merged[1].embeddings.is_empty());
        // input untouched
        assert!(entities[0].embeddings.is_empty());
    }

    #[test]
    fn test_unmatched_politician_fails() {
        let entities = vec![entity(1, Some(9001))];
        let err = merge_embeddings(&entities, &[7.into()], &array![[0.0, 0.0]], &PCA_2).unwrap_err();
        assert!(matches!(err, ProjectionError::UnresolvedPolitician { matches: 0, .. }));
    }

    #[test]
    fn test_ambiguous_politician_fails() {
        let entities = vec![entity(1, Some(9001)), entity(2, Some(9001))];
        let err = merge_embeddings(&entities, &[9001.into()], &array![[0.0, 0.0]], &PCA_2).unwrap_err();
        assert!(matches!(err, ProjectionError::UnresolvedPolitician { matches: 2, .. }));
    }

    #[test]
    fn test_row_count_must_match() {
        let entities = vec![entity(1, Some(9001))];
        assert!(matches!(
            merge_embeddings(&entities, &[9001.into()], &array![[0.0], [1.0]], &PCA_2),
            Err(ProjectionError::Dimension { expected: 1, found: 2 })
        ));
    }
}
