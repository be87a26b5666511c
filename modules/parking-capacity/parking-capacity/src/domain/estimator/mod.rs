//! Required-gateway estimators.
//!
//! Two interchangeable strategies answer the same question: the deterministic
//! [`HeuristicEstimator`] and the trainable [`LearnedEstimator`]. Services hold
//! an `Arc<dyn CapacityEstimator>` chosen when the module is composed.

mod heuristic;
mod learned;
pub mod model;

pub use heuristic::HeuristicEstimator;
pub use learned::{LearnedEstimator, default_training_set};

use parking_capacity_sdk::{CoverageParams, EstimatorKind};
use rust_decimal::Decimal;

use crate::domain::error::DomainError;

/// Strategy that decides how many gateways a parking requires.
pub trait CapacityEstimator: Send + Sync {
    /// Which strategy this is.
    fn kind(&self) -> EstimatorKind;

    /// Gateways required for the given area and vehicle capacity.
    ///
    /// `coverage` carries the per-gateway limits of the gateway being
    /// admitted. Strategies that learned their own limits ignore it.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` for unusable coverage parameters and
    /// `ModelNotReady` when a learned strategy has no active model.
    fn required_gateways(
        &self,
        available_area: Decimal,
        capacity: u32,
        coverage: &CoverageParams,
    ) -> Result<u32, DomainError>;
}
