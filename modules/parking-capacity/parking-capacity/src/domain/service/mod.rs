//! Domain services for the Parking Capacity module.
//!
//! [`Service`] bundles the admission services with the estimator lifecycle
//! and is what the local client delegates to.

mod gateways;
mod parkings;
mod zones;

use std::path::Path;
use std::sync::Arc;

use parking_capacity_sdk::{CoverageParams, EstimatorKind, TrainingSample};
use rust_decimal::Decimal;
use tracing::{debug, instrument};

pub use gateways::GatewayAdmissionService;
pub use parkings::ParkingService;
pub use zones::ZoneAdmissionService;

use super::error::DomainError;
use super::estimator::{CapacityEstimator, HeuristicEstimator, LearnedEstimator};
use super::locks::ParkingLocks;
use super::repo::{GatewayRepository, ParkingRepository, ZoneRepository};

/// Both estimator strategies plus the coverage used when the caller gives none.
pub struct Estimators {
    heuristic: Arc<HeuristicEstimator>,
    learned: Arc<LearnedEstimator>,
    default_coverage: CoverageParams,
}

impl Estimators {
    #[must_use]
    pub fn new(learned: Arc<LearnedEstimator>, default_coverage: CoverageParams) -> Self {
        Self {
            heuristic: Arc::new(HeuristicEstimator),
            learned,
            default_coverage,
        }
    }

    /// The estimator implementing `kind`.
    #[must_use]
    pub fn get(&self, kind: EstimatorKind) -> Arc<dyn CapacityEstimator> {
        match kind {
            EstimatorKind::Heuristic => self.heuristic.clone(),
            EstimatorKind::Learned => self.learned.clone(),
        }
    }

    #[must_use]
    pub fn learned(&self) -> &Arc<LearnedEstimator> {
        &self.learned
    }

    #[must_use]
    pub fn default_coverage(&self) -> &CoverageParams {
        &self.default_coverage
    }

    /// Required gateways for `(available_area, capacity)` under the default coverage.
    ///
    /// # Errors
    ///
    /// Whatever the chosen estimator reports.
    pub fn estimate(
        &self,
        kind: EstimatorKind,
        available_area: Decimal,
        capacity: u32,
    ) -> Result<u32, DomainError> {
        self.get(kind)
            .required_gateways(available_area, capacity, &self.default_coverage)
    }
}

/// Collaborators shared by every service.
#[derive(Clone)]
pub struct Repositories {
    pub parkings: Arc<dyn ParkingRepository>,
    pub gateways: Arc<dyn GatewayRepository>,
    pub zones: Arc<dyn ZoneRepository>,
}

/// Entry point of the domain layer.
pub struct Service {
    estimators: Arc<Estimators>,
    parkings: ParkingService,
    gateways: GatewayAdmissionService,
    zones: ZoneAdmissionService,
}

impl Service {
    /// Wires the services. Gateway admission uses the `admission` estimator.
    #[must_use]
    pub fn new(repos: Repositories, estimators: Arc<Estimators>, admission: EstimatorKind) -> Self {
        let locks = Arc::new(ParkingLocks::new());
        Self {
            parkings: ParkingService::new(repos.clone(), estimators.clone(), locks.clone()),
            gateways: GatewayAdmissionService::new(
                repos.parkings.clone(),
                repos.gateways.clone(),
                estimators.get(admission),
                locks.clone(),
            ),
            zones: ZoneAdmissionService::new(repos.parkings, repos.zones, locks),
            estimators,
        }
    }

    #[must_use]
    pub fn parkings(&self) -> &ParkingService {
        &self.parkings
    }

    #[must_use]
    pub fn gateways(&self) -> &GatewayAdmissionService {
        &self.gateways
    }

    #[must_use]
    pub fn zones(&self) -> &ZoneAdmissionService {
        &self.zones
    }

    /// # Errors
    ///
    /// Whatever the chosen estimator reports.
    #[instrument(skip(self), fields(kind = %kind))]
    pub fn estimate_gateways(
        &self,
        kind: EstimatorKind,
        available_area: Decimal,
        capacity: u32,
    ) -> Result<u32, DomainError> {
        let required = self.estimators.estimate(kind, available_area, capacity)?;
        debug!(%available_area, capacity, required, "Estimated required gateways");
        Ok(required)
    }

    /// Trains on `samples`, persists the model at `path` and activates it.
    ///
    /// # Errors
    ///
    /// `InsufficientData`, `Persistence`, `ModelNotFound` or `ModelCorrupt`.
    pub fn train_model(&self, samples: &[TrainingSample], path: &Path) -> Result<(), DomainError> {
        self.estimators.learned().train_save_load(samples, path)
    }

    /// # Errors
    ///
    /// `ModelNotFound` or `ModelCorrupt`; the previous model stays active.
    pub fn load_model(&self, path: &Path) -> Result<(), DomainError> {
        self.estimators.learned().load(path)
    }
}
