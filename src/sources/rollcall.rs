//! Roll-call member table (one CSV row per legislator-term)

use crate::persistence::{PersistenceError, PersistenceResult};
use serde_json::{Map, Value};
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::info;

/// Column holding the seed key
pub const ICPSR_COLUMN: &str = "icpsr";
/// Column holding the biographical-directory id
pub const BIOGUIDE_COLUMN: &str = "bioguide_id";

/// A member row with every cell typed as a JSON scalar
#[derive(Debug, Clone, PartialEq)]
pub struct RollCallRow {
    /// 1-based line in the source file, for error reporting
    pub line: u64,
    pub record: Map<String, Value>,
}

impl RollCallRow {
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.record.get(name).filter(|v| !v.is_null())
    }

    pub fn into_payload(self) -> Value {
        Value::Object(self.record)
    }
}

/// Read the member table from a CSV file
pub fn read_members(path: impl AsRef<Path>) -> PersistenceResult<Vec<RollCallRow>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| PersistenceError::io(path, e))?;
    let rows = parse_members(file).map_err(|e| PersistenceError::csv(path, e))?;
    info!("Read {} roll-call rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Parse a member table from any reader
pub fn parse_members<R: io::Read>(reader: R) -> Result<Vec<RollCallRow>, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = rdr.headers()?.clone();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let fields = headers
            .iter()
            .zip(record.iter())
            .map(|(name, cell)| (name.to_string(), parse_cell(cell)))
            .collect();
        rows.push(RollCallRow { line, record: fields });
    }
    Ok(rows)
}

/// Type a CSV cell: empty => null, then integer, then float, else string.
///
/// Cells that parse as a non-finite float (`nan`, `NaN`, `inf`) are missing
/// values and become null.
fn parse_cell(cell: &str) -> Value {
    let cell = cell.trim();
    if cell.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = cell.parse::<i64>() {
        return Value::from(i);
    }
    if let Ok(f) = cell.parse::<f64>() {
        return serde_json::Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null);
    }
    Value::String(cell.to_string())
}
