//! Deterministic coverage-formula estimator.

use parking_capacity_sdk::{CoverageParams, EstimatorKind, required_gateways};
use rust_decimal::Decimal;

use super::CapacityEstimator;
use crate::domain::error::DomainError;

/// `max(ceil(area / max_coverage_area), ceil(capacity / max_capacity))`.
///
/// Pure and deterministic; the only failure is a non-positive divisor.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicEstimator;

impl HeuristicEstimator {
    /// # Errors
    ///
    /// Returns `Configuration` if either coverage divisor is not positive,
    /// or if the area quotient does not fit in a `u32`.
    pub fn estimate(
        available_area: Decimal,
        capacity: u32,
        coverage: &CoverageParams,
    ) -> Result<u32, DomainError> {
        if coverage.max_coverage_area <= Decimal::ZERO {
            return Err(DomainError::Configuration(format!(
                "max_coverage_area must be positive, got {}",
                coverage.max_coverage_area
            )));
        }
        if coverage.max_capacity == 0 {
            return Err(DomainError::Configuration(
                "max_capacity must be positive, got 0".to_owned(),
            ));
        }
        required_gateways(available_area, capacity, coverage).ok_or_else(|| {
            DomainError::Configuration(format!(
                "area {available_area} over coverage {} overflows the gateway count",
                coverage.max_coverage_area
            ))
        })
    }
}

impl CapacityEstimator for HeuristicEstimator {
    fn kind(&self) -> EstimatorKind {
        EstimatorKind::Heuristic
    }

    fn required_gateways(
        &self,
        available_area: Decimal,
        capacity: u32,
        coverage: &CoverageParams,
    ) -> Result<u32, DomainError> {
        Self::estimate(available_area, capacity, coverage)
    }
}
