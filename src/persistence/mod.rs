//! Flat-file persistence for pipeline artifacts
//!
//! Every stage output is buffered fully in memory and then written through a
//! temp file in the destination directory followed by a rename, so a reader
//! (or an interrupted run) never observes a half-written artifact.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

/// Persistence errors
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid YAML in {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid CSV in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

impl PersistenceError {
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        PersistenceError::Io { path: path.as_ref().to_path_buf(), source }
    }

    pub fn csv(path: impl AsRef<Path>, source: csv::Error) -> Self {
        PersistenceError::Csv { path: path.as_ref().to_path_buf(), source }
    }
}

/// Read and deserialize a JSON file
pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> PersistenceResult<T> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| PersistenceError::io(path, e))?;
    serde_json::from_slice(&bytes).map_err(|source| PersistenceError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and deserialize a YAML file
pub fn read_yaml<T: DeserializeOwned>(path: impl AsRef<Path>) -> PersistenceResult<T> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| PersistenceError::io(path, e))?;
    serde_yaml::from_slice(&bytes).map_err(|source| PersistenceError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a JSON or YAML file, chosen by extension (`.yaml`/`.yml` => YAML)
pub fn read_structured<T: DeserializeOwned>(path: impl AsRef<Path>) -> PersistenceResult<T> {
    let path = path.as_ref();
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => read_yaml(path),
        _ => read_json(path),
    }
}

/// Serialize to pretty JSON and write atomically
pub fn write_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> PersistenceResult<()> {
    let path = path.as_ref();
    let bytes = serde_json::to_vec_pretty(value).map_err(|source| PersistenceError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    write_atomic(path, &bytes)
}

/// Write bytes to `path` via a sibling temp file and rename
pub fn write_atomic(path: impl AsRef<Path>, content: &[u8]) -> PersistenceResult<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(|e| PersistenceError::io(&dir, e))?;

    let mut temp = NamedTempFile::new_in(&dir).map_err(|e| PersistenceError::io(&dir, e))?;
    temp.write_all(content).map_err(|e| PersistenceError::io(temp.path(), e))?;
    temp.flush().map_err(|e| PersistenceError::io(temp.path(), e))?;
    temp.persist(path).map_err(|e| PersistenceError::io(path, e.error))?;

    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_json_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("out.json");

        let value = json!({"a": [1, 2, 3]});
        write_json(&path, &value).unwrap();

        let back: serde_json::Value = read_json(&path).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_atomic_write_replaces_and_leaves_no_temp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("edges.csv");

        write_atomic(&path, b"old").unwrap();
        write_atomic(&path, b"new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_structured_reads_yaml_by_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("list.yaml");
        fs::write(&path, "- id: {icpsr: 1}\n").unwrap();

        let value: serde_json::Value = read_structured(&path).unwrap();
        assert_eq!(value, json!([{"id": {"icpsr": 1}}]));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = read_json::<serde_json::Value>("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
