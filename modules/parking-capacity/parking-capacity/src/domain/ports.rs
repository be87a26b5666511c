//! Ports the domain depends on, implemented in `infra`.

use std::path::Path;

use crate::domain::error::DomainError;
use crate::domain::estimator::model::ModelArtifact;

/// Durable storage for model artifacts.
pub trait ModelStore: Send + Sync {
    /// Whether an artifact exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Persist `artifact` at `path`, replacing any previous artifact.
    ///
    /// # Errors
    ///
    /// Returns `Persistence` on I/O failure.
    fn save(&self, path: &Path, artifact: &ModelArtifact) -> Result<(), DomainError>;

    /// Read the artifact at `path`.
    ///
    /// # Errors
    ///
    /// * `ModelNotFound` - If nothing exists at `path`
    /// * `ModelCorrupt` - If the content cannot be decoded
    /// * `Persistence` - On any other I/O failure
    fn load(&self, path: &Path) -> Result<ModelArtifact, DomainError>;
}
