use std::sync::Arc;

use parking_capacity_sdk::{CoverageParams, Gateway, GatewayUpdate, NewGateway, Parking};
use time::OffsetDateTime;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::domain::error::{DomainError, Entity};
use crate::domain::estimator::CapacityEstimator;
use crate::domain::locks::ParkingLocks;
use crate::domain::repo::{GatewayRepository, ParkingRepository};
use crate::domain::validation::validate_gateway_addresses;

/// Admits gateways into a parking only while it holds fewer than the
/// estimator's required count.
pub struct GatewayAdmissionService {
    parking_repo: Arc<dyn ParkingRepository>,
    gateway_repo: Arc<dyn GatewayRepository>,
    estimator: Arc<dyn CapacityEstimator>,
    locks: Arc<ParkingLocks>,
}

impl GatewayAdmissionService {
    #[must_use]
    pub fn new(
        parking_repo: Arc<dyn ParkingRepository>,
        gateway_repo: Arc<dyn GatewayRepository>,
        estimator: Arc<dyn CapacityEstimator>,
        locks: Arc<ParkingLocks>,
    ) -> Self {
        Self {
            parking_repo,
            gateway_repo,
            estimator,
            locks,
        }
    }

    /// Registers a gateway if its parking still has room for one.
    ///
    /// # Errors
    ///
    /// * `Validation` - If the MAC address or IP is malformed
    /// * `NotFound` - If the parking does not exist
    /// * `CapacityExceeded` - If the parking already holds `required` gateways
    #[instrument(skip(self, new), fields(parking_id = %new.parking_id, mac_address = %new.mac_address))]
    pub async fn add_gateway(&self, new: NewGateway) -> Result<Gateway, DomainError> {
        validate_gateway_addresses(&new.mac_address, &new.last_ip)?;

        let _guard = self.locks.acquire(new.parking_id).await;
        let parking = self.load_parking(new.parking_id).await?;
        self.admit(&parking, &new.coverage).await?;

        let gateway = Gateway {
            id: Uuid::new_v4(),
            parking_id: new.parking_id,
            model: new.model,
            status: new.status,
            mac_address: new.mac_address,
            last_ip: new.last_ip,
            coverage: new.coverage,
            registered_at: OffsetDateTime::now_utc(),
        };
        let gateway = self.gateway_repo.add(gateway).await?;

        info!(gateway_id = %gateway.id, "Admitted gateway");
        Ok(gateway)
    }

    /// Replaces a gateway's fields. Moving it to another parking re-runs
    /// admission against the destination; on rejection nothing changes.
    ///
    /// # Errors
    ///
    /// * `Validation` - If the MAC address or IP is malformed
    /// * `NotFound` - If the gateway or the destination parking does not exist
    /// * `CapacityExceeded` - If the destination already holds `required` gateways
    #[instrument(skip(self, update), fields(gateway_id = %id, parking_id = %update.parking_id))]
    pub async fn update_gateway(
        &self,
        id: Uuid,
        update: GatewayUpdate,
    ) -> Result<Gateway, DomainError> {
        validate_gateway_addresses(&update.mac_address, &update.last_ip)?;

        let _guard = self.locks.acquire(update.parking_id).await;
        let existing = self.load_gateway(id).await?;
        let moving = existing.parking_id != update.parking_id;
        if moving {
            let destination = self.load_parking(update.parking_id).await?;
            // the gateway is still attached to its source, so the destination
            // count does not include it
            self.admit(&destination, &update.coverage).await?;
        }

        let gateway = Gateway {
            id,
            parking_id: update.parking_id,
            model: update.model,
            status: update.status,
            mac_address: update.mac_address,
            last_ip: update.last_ip,
            coverage: update.coverage,
            registered_at: existing.registered_at,
        };
        let gateway = self.gateway_repo.update(gateway).await?;

        if moving {
            info!(from = %existing.parking_id, "Moved gateway");
        } else {
            info!("Updated gateway");
        }
        Ok(gateway)
    }

    /// # Errors
    ///
    /// Returns `NotFound` if the gateway does not exist.
    #[instrument(skip(self), fields(gateway_id = %id))]
    pub async fn remove_gateway(&self, id: Uuid) -> Result<(), DomainError> {
        if !self.gateway_repo.remove(id).await? {
            return Err(DomainError::not_found(Entity::Gateway, id));
        }
        info!("Removed gateway");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `NotFound` if the gateway does not exist.
    pub async fn get_gateway(&self, id: Uuid) -> Result<Gateway, DomainError> {
        self.load_gateway(id).await
    }

    /// # Errors
    ///
    /// Returns `NotFound` if no gateway carries `mac_address`.
    pub async fn get_gateway_by_mac(&self, mac_address: &str) -> Result<Gateway, DomainError> {
        self.gateway_repo
            .get_by_mac_address(mac_address)
            .await?
            .ok_or_else(|| DomainError::not_found(Entity::Gateway, mac_address))
    }

    /// # Errors
    ///
    /// Returns `NotFound` if the parking does not exist.
    pub async fn list_gateways(&self, parking_id: Uuid) -> Result<Vec<Gateway>, DomainError> {
        self.load_parking(parking_id).await?;
        Ok(self.gateway_repo.get_all_by_parking_id(parking_id).await?)
    }

    /// Fails unless `parking` holds fewer gateways than it requires.
    async fn admit(&self, parking: &Parking, coverage: &CoverageParams) -> Result<(), DomainError> {
        let required =
            self.estimator
                .required_gateways(parking.available_area, parking.capacity, coverage)?;
        let installed = self.gateway_repo.get_all_by_parking_id(parking.id).await?;
        let current = u32::try_from(installed.len()).unwrap_or(u32::MAX);

        debug!(
            estimator = %self.estimator.kind(),
            current,
            required,
            "Checked gateway capacity"
        );
        if current >= required {
            warn!(current, required, "Rejected gateway: capacity exceeded");
            return Err(DomainError::CapacityExceeded { current, required });
        }
        Ok(())
    }

    async fn load_parking(&self, id: Uuid) -> Result<Parking, DomainError> {
        self.parking_repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(Entity::Parking, id))
    }

    async fn load_gateway(&self, id: Uuid) -> Result<Gateway, DomainError> {
        self.gateway_repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(Entity::Gateway, id))
    }
}
