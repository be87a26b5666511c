//! Parking Capacity module definition.

use std::sync::Arc;

use anyhow::{Context, bail};
use arc_swap::ArcSwapOption;
use parking_capacity_sdk::ParkingCapacityApi;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::config::ParkingCapacityConfig;
use crate::domain::estimator::LearnedEstimator;
use crate::domain::ports::ModelStore;
use crate::domain::service::{Estimators, Repositories, Service};
use crate::infra::model_store::JsonFileModelStore;
use crate::infra::storage::InMemoryParkingStore;
use crate::local_client::ParkingCapacityLocalClient;

/// Parking Capacity module.
///
/// This module provides:
/// - Required-gateway estimation (coverage heuristic and learned model)
/// - Zone and gateway admission control per parking
/// - Parking registration with planning hints
#[derive(Default)]
pub struct ParkingCapacityModule {
    service: ArcSwapOption<Service>,
}

impl ParkingCapacityModule {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wires the module over the in-memory store.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is unusable or the learned model cannot be
    /// bootstrapped.
    pub fn init(&self, cfg: &ParkingCapacityConfig) -> anyhow::Result<()> {
        let store = Arc::new(InMemoryParkingStore::new());
        self.init_with(
            cfg,
            Repositories {
                parkings: store.clone(),
                gateways: store.clone(),
                zones: store,
            },
            Arc::new(JsonFileModelStore),
        )
    }

    /// Wires the module over caller-supplied collaborators.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is unusable or the learned model cannot be
    /// bootstrapped.
    pub fn init_with(
        &self,
        cfg: &ParkingCapacityConfig,
        repos: Repositories,
        model_store: Arc<dyn ModelStore>,
    ) -> anyhow::Result<()> {
        info!("Initializing parking capacity module");

        if cfg.default_max_coverage_area <= Decimal::ZERO || cfg.default_max_capacity == 0 {
            bail!(
                "default coverage must be positive (max_coverage_area={}, max_capacity={})",
                cfg.default_max_coverage_area,
                cfg.default_max_capacity
            );
        }

        let learned = if cfg.bootstrap_learned_model {
            LearnedEstimator::bootstrap(model_store, &cfg.model_path).with_context(|| {
                format!(
                    "failed to bootstrap gateway model at {}",
                    cfg.model_path.display()
                )
            })?
        } else {
            let estimator = LearnedEstimator::new(model_store.clone());
            if model_store.exists(&cfg.model_path) {
                estimator.load(&cfg.model_path).with_context(|| {
                    format!("failed to load gateway model at {}", cfg.model_path.display())
                })?;
            } else {
                warn!(
                    path = %cfg.model_path.display(),
                    "No gateway model present and bootstrap disabled; learned estimator is not ready"
                );
            }
            estimator
        };

        let estimators = Arc::new(Estimators::new(
            Arc::new(learned),
            cfg.default_coverage(),
        ));
        let service = Arc::new(Service::new(repos, estimators, cfg.admission_estimator));
        self.service.store(Some(service));

        info!(
            admission_estimator = %cfg.admission_estimator,
            model_path = %cfg.model_path.display(),
            "Parking capacity module initialized"
        );
        Ok(())
    }

    /// The public API backed by this module.
    ///
    /// # Errors
    ///
    /// Fails if [`Self::init`] has not completed.
    pub fn api(&self) -> anyhow::Result<Arc<dyn ParkingCapacityApi>> {
        let service = self
            .service
            .load_full()
            .ok_or_else(|| anyhow::anyhow!("parking capacity service not initialized"))?;
        Ok(Arc::new(ParkingCapacityLocalClient::new(service)))
    }
}
