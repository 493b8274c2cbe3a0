//! Donor x politician feature matrix

use super::mapping::IndexMapping;
use super::{MatrixError, MatrixResult};
use crate::donation::DonationTable;
use crate::graph::NativeId;
use crate::persistence::{self, PersistenceError};
use ndarray::Array2;
use std::fs::File;
use std::path::Path;
use tracing::{info, warn};

/// Header of the donor column
pub const DONOR_COLUMN: &str = "donor";

/// One row per dense donor index, one column per politician.
///
/// `cell = ln(1 + max(amount, 0))`, 0 where the donor gave nothing. With
/// row normalisation each non-zero row is divided by its sum.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    politicians: Vec<NativeId>,
    donors: Vec<usize>,
    values: Array2<f64>,
}

impl FeatureMatrix {
    pub fn build(
        donations: &DonationTable,
        mapping: &IndexMapping,
        normalize_rows: bool,
    ) -> MatrixResult<Self> {
        let politicians: Vec<NativeId> = donations.politicians().cloned().collect();
        let donors: Vec<usize> = mapping.dense_indices().collect();
        let mut values = Array2::<f64>::zeros((donors.len(), politicians.len()));

        let mut clamped = 0usize;
        for (col, politician) in politicians.iter().enumerate() {
            let Some(given) = donations.donors_of(politician) else {
                continue;
            };
            for (donor, &amount) in given {
                let dense = mapping
                    .dense_of(donor)
                    .ok_or_else(|| MatrixError::UnknownNode(donor.clone()))?;
                if amount < 0.0 {
                    clamped += 1;
                }
                values[[dense - mapping.base(), col]] = amount.max(0.0).ln_1p();
            }
        }
        if clamped > 0 {
            warn!("Clamped {} negative donation totals to 0", clamped);
        }

        if normalize_rows {
            for mut row in values.rows_mut() {
                let sum = row.sum();
                if sum > 0.0 {
                    row.mapv_inplace(|v| v / sum);
                }
            }
        }

        info!(
            "Built feature matrix: {} donors x {} politicians (normalized: {})",
            donors.len(),
            politicians.len(),
            normalize_rows
        );
        Ok(FeatureMatrix { politicians, donors, values })
    }

    /// Column header: politician native ids in column order
    pub fn politicians(&self) -> &[NativeId] {
        &self.politicians
    }

    /// Dense donor index of each row
    pub fn donors(&self) -> &[usize] {
        &self.donors
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn get(&self, donor: usize, politician: &NativeId) -> Option<f64> {
        let row = self.donors.iter().position(|&d| d == donor)?;
        let col = self.politicians.iter().position(|p| p == politician)?;
        Some(self.values[[row, col]])
    }

    /// Serialize as CSV; floats use shortest round-trip formatting
    pub fn to_csv(&self) -> Result<Vec<u8>, csv::Error> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        let mut header = vec![DONOR_COLUMN.to_string()];
        header.extend(self.politicians.iter().map(|p| p.to_string()));
        writer.write_record(&header)?;

        for (donor, row) in self.donors.iter().zip(self.values.rows()) {
            let mut record = Vec::with_capacity(row.len() + 1);
            record.push(donor.to_string());
            record.extend(row.iter().map(|v| v.to_string()));
            writer.write_record(&record)?;
        }

        writer
            .into_inner()
            .map_err(|e| csv::Error::from(e.into_error()))
    }

    pub fn write_csv(&self, path: impl AsRef<Path>) -> MatrixResult<()> {
        let path = path.as_ref();
        let bytes = self.to_csv().map_err(|e| PersistenceError::csv(path, e))?;
        persistence::write_atomic(path, &bytes)?;
        info!("Wrote feature matrix to {}", path.display());
        Ok(())
    }

    /// Read only the politician header of a matrix file
    pub fn read_header(path: impl AsRef<Path>) -> MatrixResult<Vec<NativeId>> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| PersistenceError::io(path, e))?;
        let mut reader = csv::Reader::from_reader(file);
        let headers = reader.headers().map_err(|e| PersistenceError::csv(path, e))?;
        if headers.get(0) != Some(DONOR_COLUMN) {
            return Err(MatrixError::Malformed {
                path: path.to_path_buf(),
                reason: format!("first column must be '{}'", DONOR_COLUMN),
            });
        }
        Ok(headers.iter().skip(1).map(NativeId::from).collect())
    }

    pub fn read_csv(path: impl AsRef<Path>) -> MatrixResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| PersistenceError::io(path, e))?;
        let mut reader = csv::Reader::from_reader(file);
        let malformed = |reason: String| MatrixError::Malformed { path: path.to_path_buf(), reason };

        let headers = reader
            .headers()
            .map_err(|e| PersistenceError::csv(path, e))?
            .clone();
        if headers.get(0) != Some(DONOR_COLUMN) {
            return Err(malformed(format!("first column must be '{}'", DONOR_COLUMN)));
        }
        let politicians: Vec<NativeId> = headers.iter().skip(1).map(NativeId::from).collect();

        let mut donors = Vec::new();
        let mut cells = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result.map_err(|e| PersistenceError::csv(path, e))?;
            if record.len() != politicians.len() + 1 {
                return Err(malformed(format!(
                    "row {} has {} cells, expected {}",
                    idx + 1,
                    record.len(),
                    politicians.len() + 1
                )));
            }
            let donor: usize = record[0]
                .parse()
                .map_err(|_| malformed(format!("row {}: bad donor index {:?}", idx + 1, &record[0])))?;
            donors.push(donor);
            for cell in record.iter().skip(1) {
                let value: f64 = cell
                    .parse()
                    .map_err(|_| malformed(format!("row {}: bad cell {:?}", idx + 1, cell)))?;
                cells.push(value);
            }
        }

        let values = Array2::from_shape_vec((donors.len(), politicians.len()), cells)
            .map_err(|e| malformed(e.to_string()))?;
        Ok(FeatureMatrix { politicians, donors, values })
    }
}
