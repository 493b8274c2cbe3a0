//! Politician x politician distance matrix assembled from per-politician NVD files

use super::{ProjectionError, ProjectionResult};
use crate::graph::NativeId;
use crate::persistence::{self, PersistenceError};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

/// Symmetric, non-negative distances between politicians.
///
/// Row/column `i` belongs to `politicians[i]`, which follows the feature
/// matrix header order.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    politicians: Vec<NativeId>,
    values: Array2<f64>,
}

#[derive(Serialize, Deserialize)]
struct DistanceFile {
    politicians: Vec<NativeId>,
    distances: Vec<Vec<f64>>,
}

impl DistanceMatrix {
    /// Wrap a square matrix, validating shape and entries
    pub fn new(politicians: Vec<NativeId>, values: Array2<f64>) -> ProjectionResult<Self> {
        let n = politicians.len();
        if values.dim() != (n, n) {
            return Err(ProjectionError::Dimension {
                expected: n,
                found: values.nrows().max(values.ncols()),
            });
        }
        for ((row, col), &value) in values.indexed_iter() {
            if !value.is_finite() || value < 0.0 {
                return Err(ProjectionError::InvalidDistance { row, col, value });
            }
        }
        Ok(DistanceMatrix { politicians, values })
    }

    /// Read `<dir>/<politician>.csv` for every politician.
    ///
    /// Each file holds `src,dst,distance` rows after a header line; both
    /// `[src][dst]` and `[dst][src]` are set. Pairs never mentioned stay 0.
    pub fn assemble(politicians: &[NativeId], dir: impl AsRef<Path>) -> ProjectionResult<Self> {
        let dir = dir.as_ref();
        let position: HashMap<&NativeId, usize> =
            politicians.iter().enumerate().map(|(i, p)| (p, i)).collect();
        let lookup = |id: NativeId| {
            position
                .get(&id)
                .copied()
                .ok_or(ProjectionError::UnresolvedPolitician { politician: id, matches: 0 })
        };

        let n = politicians.len();
        let mut values = Array2::<f64>::zeros((n, n));
        for politician in politicians {
            let path = dir.join(format!("{}.csv", politician));
            let file = File::open(&path).map_err(|e| PersistenceError::io(&path, e))?;
            let mut reader = csv::ReaderBuilder::new()
                .has_headers(true)
                .flexible(true)
                .from_reader(file);

            let mut rows = 0usize;
            for result in reader.records() {
                let record = result.map_err(|e| PersistenceError::csv(&path, e))?;
                let malformed = || ProjectionError::MalformedDistanceFile {
                    path: path.clone(),
                    line: record.position().map_or(0, |p| p.line()),
                };
                if record.len() < 3 {
                    return Err(malformed());
                }
                let src = lookup(parse_id(&record[0]))?;
                let dst = lookup(parse_id(&record[1]))?;
                let distance: f64 = record[2].trim().parse().map_err(|_| malformed())?;

                values[[src, dst]] = distance;
                values[[dst, src]] = distance;
                rows += 1;
            }
            debug!("{}: {} distances", path.display(), rows);
        }

        info!("Assembled {}x{} distance matrix from {}", n, n, dir.display());
        Self::new(politicians.to_vec(), values)
    }

    pub fn politicians(&self) -> &[NativeId] {
        &self.politicians
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.politicians.len()
    }

    pub fn is_empty(&self) -> bool {
        self.politicians.is_empty()
    }

    pub fn save(&self, path: impl AsRef<Path>) -> ProjectionResult<()> {
        let file = DistanceFile {
            politicians: self.politicians.clone(),
            distances: self.values.rows().into_iter().map(|r| r.to_vec()).collect(),
        };
        persistence::write_json(path, &file)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> ProjectionResult<Self> {
        let file: DistanceFile = persistence::read_json(path)?;
        let n = file.politicians.len();
        if file.distances.len() != n {
            return Err(ProjectionError::Dimension { expected: n, found: file.distances.len() });
        }
        if let Some(row) = file.distances.iter().find(|row| row.len() != n) {
            return Err(ProjectionError::Dimension { expected: n, found: row.len() });
        }
        let cells: Vec<f64> = file.distances.into_iter().flatten().collect();
        let values = Array2::from_shape_vec((n, n), cells)
            .map_err(|_| ProjectionError::Dimension { expected: n, found: 0 })?;
        Self::new(file.politicians, values)
    }
}

/// NVD output writes ids as integers, sometimes with a trailing `.0`
fn parse_id(cell: &str) -> NativeId {
    let cell = cell.trim();
    if let Ok(i) = cell.parse::<i64>() {
        return NativeId::from(i);
    }
    match cell.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 => NativeId::from(f as i64),
        _ => NativeId::from(cell),
    }
}
