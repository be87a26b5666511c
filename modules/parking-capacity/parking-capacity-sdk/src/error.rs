//! Parking capacity error types.
//!
//! Transport-agnostic error definitions for the parking-capacity module.

use thiserror::Error;

/// Error type for parking-capacity operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParkingCapacityError {
    /// Malformed caller input (MAC address, IP, dimensions, ...).
    #[error("validation error: {field}: {message}")]
    Validation { field: String, message: String },

    /// A parking, gateway or zone does not exist.
    #[error("{entity} not found: {key}")]
    NotFound { entity: String, key: String },

    /// A zone-count or area invariant would be violated.
    #[error("business rule violated: {rule}")]
    BusinessRule { rule: String },

    /// Gateway admission rejected because the parking already holds enough gateways.
    #[error("gateway capacity exceeded: {current} gateways present, {required} required")]
    CapacityExceeded { current: u32, required: u32 },

    /// Estimator parameters are unusable (non-positive divisors).
    #[error("estimator configuration error: {message}")]
    Configuration { message: String },

    /// Training was requested without any samples.
    #[error("insufficient training data")]
    InsufficientData,

    /// The model artifact could not be written or read.
    #[error("model persistence failed: {message}")]
    Persistence { message: String },

    /// No model artifact exists at the given path.
    #[error("model not found at {path}")]
    ModelNotFound { path: String },

    /// The model artifact does not match the expected schema.
    #[error("model artifact is corrupt: {message}")]
    ModelCorrupt { message: String },

    /// Prediction requested before any model was loaded.
    #[error("model not ready")]
    ModelNotReady,

    /// Internal error.
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl ParkingCapacityError {
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_found(entity: impl Into<String>, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            key: key.into(),
        }
    }

    #[must_use]
    pub fn business_rule(rule: impl Into<String>) -> Self {
        Self::BusinessRule { rule: rule.into() }
    }

    #[must_use]
    pub fn capacity_exceeded(current: u32, required: u32) -> Self {
        Self::CapacityExceeded { current, required }
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    #[must_use]
    pub fn is_business_rule(&self) -> bool {
        matches!(self, Self::BusinessRule { .. })
    }

    #[must_use]
    pub fn is_capacity_exceeded(&self) -> bool {
        matches!(self, Self::CapacityExceeded { .. })
    }

    /// HTTP status class an outer transport layer should render this error with.
    #[must_use]
    pub fn status_hint(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::NotFound { .. } | Self::ModelNotFound { .. } => 404,
            Self::CapacityExceeded { .. } => 409,
            Self::BusinessRule { .. } | Self::InsufficientData => 422,
            Self::ModelNotReady => 503,
            Self::Configuration { .. }
            | Self::Persistence { .. }
            | Self::ModelCorrupt { .. }
            | Self::Internal { .. } => 500,
        }
    }
}
