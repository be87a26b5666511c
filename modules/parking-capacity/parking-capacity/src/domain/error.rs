//! Domain errors for the Parking Capacity module.

use std::fmt;
use std::path::{Path, PathBuf};

use parking_capacity_sdk::ParkingCapacityError;
use thiserror::Error;

/// Entities the core looks up by key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Parking,
    Gateway,
    Zone,
}

impl Entity {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Parking => "Parking",
            Self::Gateway => "Gateway",
            Self::Zone => "Zone",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Zone invariants enforced on admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusinessRuleViolation {
    /// The parking already holds the maximum number of zones.
    MaxZones,
    /// The zones would cover more than the parking's available area.
    AreaExceeded,
}

impl fmt::Display for BusinessRuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxZones => f.write_str("max zones"),
            Self::AreaExceeded => f.write_str("area exceeded"),
        }
    }
}

/// Domain-level errors for the Parking Capacity module.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Malformed caller input.
    #[error("validation error: {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// The requested entity was not found.
    #[error("{entity} not found: {key}")]
    NotFound { entity: Entity, key: String },

    /// A zone invariant would be violated.
    #[error("business rule violated: {0}")]
    BusinessRule(BusinessRuleViolation),

    /// The parking already holds as many gateways as it requires.
    #[error("gateway capacity exceeded: {current} gateways present, {required} required")]
    CapacityExceeded { current: u32, required: u32 },

    /// Estimator parameters are unusable.
    #[error("estimator configuration error: {0}")]
    Configuration(String),

    /// Training was requested without samples.
    #[error("insufficient training data: at least one sample is required")]
    InsufficientData,

    /// Reading or writing the model artifact failed.
    #[error("model persistence failed for {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No model artifact at the given path.
    #[error("model not found at {}", path.display())]
    ModelNotFound { path: PathBuf },

    /// The artifact does not match the expected schema.
    #[error("model artifact {} is corrupt: {reason}", path.display())]
    ModelCorrupt { path: PathBuf, reason: String },

    /// No model has been loaded yet.
    #[error("model not ready: train or load a model first")]
    ModelNotReady,

    /// Failure reported by a repository collaborator.
    #[error("repository error: {0}")]
    Repository(#[from] anyhow::Error),
}

impl DomainError {
    #[must_use]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_found(entity: Entity, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    #[must_use]
    pub fn persistence(path: &Path, source: std::io::Error) -> Self {
        Self::Persistence {
            path: path.to_path_buf(),
            source,
        }
    }

    #[must_use]
    pub fn model_corrupt(path: &Path, reason: impl Into<String>) -> Self {
        Self::ModelCorrupt {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

/// Convert `DomainError` to SDK `ParkingCapacityError`.
impl From<DomainError> for ParkingCapacityError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation { field, message } => Self::validation(field, message),
            DomainError::NotFound { entity, key } => Self::not_found(entity.as_str(), key),
            DomainError::BusinessRule(rule) => Self::business_rule(rule.to_string()),
            DomainError::CapacityExceeded { current, required } => {
                Self::capacity_exceeded(current, required)
            }
            DomainError::Configuration(message) => Self::Configuration { message },
            DomainError::InsufficientData => Self::InsufficientData,
            e @ DomainError::Persistence { .. } => Self::Persistence {
                message: e.to_string(),
            },
            DomainError::ModelNotFound { path } => Self::ModelNotFound {
                path: path.display().to_string(),
            },
            e @ DomainError::ModelCorrupt { .. } => Self::ModelCorrupt {
                message: e.to_string(),
            },
            DomainError::ModelNotReady => Self::ModelNotReady,
            DomainError::Repository(e) => Self::internal(e.to_string()),
        }
    }
}
