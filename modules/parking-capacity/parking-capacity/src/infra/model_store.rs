//! JSON file storage for model artifacts.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::domain::error::DomainError;
use crate::domain::estimator::model::ModelArtifact;
use crate::domain::ports::ModelStore;

/// Stores each artifact as a pretty-printed JSON document.
///
/// Writes go to a uniquely named temporary file next to the target and are
/// renamed into place, so a reader never observes a half-written artifact
/// and concurrent writers never share a temporary file.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFileModelStore;

impl JsonFileModelStore {
    fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;
        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(bytes)?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl ModelStore for JsonFileModelStore {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn save(&self, path: &Path, artifact: &ModelArtifact) -> Result<(), DomainError> {
        let bytes = serde_json::to_vec_pretty(artifact)
            .map_err(|e| DomainError::persistence(path, io::Error::other(e)))?;
        Self::write_atomically(path, &bytes).map_err(|e| DomainError::persistence(path, e))
    }

    fn load(&self, path: &Path) -> Result<ModelArtifact, DomainError> {
        let bytes = fs::read(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => DomainError::ModelNotFound {
                path: path.to_path_buf(),
            },
            _ => DomainError::persistence(path, e),
        })?;
        serde_json::from_slice(&bytes).map_err(|e| DomainError::model_corrupt(path, e.to_string()))
    }
}
