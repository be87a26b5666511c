//! Local client adapter implementing the SDK API trait.
//!
//! Bridges the domain [`Service`] to [`ParkingCapacityApi`] and converts
//! domain errors into the public error type. Model training and loading do
//! file I/O and CPU-bound fitting, so they run on the blocking pool.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use parking_capacity_sdk::{
    EstimatorKind, Gateway, GatewayUpdate, NewGateway, NewParking, NewZone, Parking,
    ParkingCapacityApi, ParkingCapacityError, ParkingSuggestion, ParkingUpdate, TrainingSample,
    Zone, ZoneUpdate,
};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::service::Service;

pub struct ParkingCapacityLocalClient {
    service: Arc<Service>,
}

impl ParkingCapacityLocalClient {
    #[must_use]
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ParkingCapacityApi for ParkingCapacityLocalClient {
    // === Estimation ===

    async fn estimate_gateways(
        &self,
        kind: EstimatorKind,
        available_area: Decimal,
        capacity: u32,
    ) -> Result<u32, ParkingCapacityError> {
        self.service
            .estimate_gateways(kind, available_area, capacity)
            .map_err(Into::into)
    }

    async fn train_model(
        &self,
        samples: Vec<TrainingSample>,
        path: &Path,
    ) -> Result<(), ParkingCapacityError> {
        let service = self.service.clone();
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || service.train_model(&samples, &path))
            .await
            .map_err(|e| ParkingCapacityError::internal(format!("model training task failed: {e}")))?
            .map_err(Into::into)
    }

    async fn load_model(&self, path: &Path) -> Result<(), ParkingCapacityError> {
        let service = self.service.clone();
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || service.load_model(&path))
            .await
            .map_err(|e| ParkingCapacityError::internal(format!("model loading task failed: {e}")))?
            .map_err(Into::into)
    }

    // === Parkings ===

    async fn create_parking(
        &self,
        new_parking: NewParking,
        kind: EstimatorKind,
    ) -> Result<ParkingSuggestion, ParkingCapacityError> {
        self.service
            .parkings()
            .create_parking(new_parking, kind)
            .await
            .map_err(Into::into)
    }

    async fn get_parking(&self, id: Uuid) -> Result<Parking, ParkingCapacityError> {
        self.service
            .parkings()
            .get_parking(id)
            .await
            .map_err(Into::into)
    }

    async fn get_parking_by_location(
        &self,
        street: &str,
        complement: &str,
    ) -> Result<Parking, ParkingCapacityError> {
        self.service
            .parkings()
            .get_parking_by_location(street, complement)
            .await
            .map_err(Into::into)
    }

    async fn update_parking(
        &self,
        id: Uuid,
        update: ParkingUpdate,
        kind: EstimatorKind,
    ) -> Result<ParkingSuggestion, ParkingCapacityError> {
        self.service
            .parkings()
            .update_parking(id, update, kind)
            .await
            .map_err(Into::into)
    }

    async fn remove_parking(&self, id: Uuid) -> Result<(), ParkingCapacityError> {
        self.service
            .parkings()
            .remove_parking(id)
            .await
            .map_err(Into::into)
    }

    // === Gateways ===

    async fn add_gateway(&self, new_gateway: NewGateway) -> Result<Gateway, ParkingCapacityError> {
        self.service
            .gateways()
            .add_gateway(new_gateway)
            .await
            .map_err(Into::into)
    }

    async fn update_gateway(
        &self,
        id: Uuid,
        update: GatewayUpdate,
    ) -> Result<Gateway, ParkingCapacityError> {
        self.service
            .gateways()
            .update_gateway(id, update)
            .await
            .map_err(Into::into)
    }

    async fn remove_gateway(&self, id: Uuid) -> Result<(), ParkingCapacityError> {
        self.service
            .gateways()
            .remove_gateway(id)
            .await
            .map_err(Into::into)
    }

    async fn get_gateway(&self, id: Uuid) -> Result<Gateway, ParkingCapacityError> {
        self.service
            .gateways()
            .get_gateway(id)
            .await
            .map_err(Into::into)
    }

    async fn get_gateway_by_mac(&self, mac_address: &str) -> Result<Gateway, ParkingCapacityError> {
        self.service
            .gateways()
            .get_gateway_by_mac(mac_address)
            .await
            .map_err(Into::into)
    }

    async fn list_gateways(&self, parking_id: Uuid) -> Result<Vec<Gateway>, ParkingCapacityError> {
        self.service
            .gateways()
            .list_gateways(parking_id)
            .await
            .map_err(Into::into)
    }

    // === Zones ===

    async fn add_zone(&self, new_zone: NewZone) -> Result<Zone, ParkingCapacityError> {
        self.service
            .zones()
            .add_zone(new_zone)
            .await
            .map_err(Into::into)
    }

    async fn update_zone(&self, id: Uuid, update: ZoneUpdate) -> Result<Zone, ParkingCapacityError> {
        self.service
            .zones()
            .update_zone(id, update)
            .await
            .map_err(Into::into)
    }

    async fn remove_zone(&self, id: Uuid) -> Result<(), ParkingCapacityError> {
        self.service
            .zones()
            .remove_zone(id)
            .await
            .map_err(Into::into)
    }

    async fn get_zone(&self, id: Uuid) -> Result<Zone, ParkingCapacityError> {
        self.service.zones().get_zone(id).await.map_err(Into::into)
    }

    async fn list_zones(&self, parking_id: Uuid) -> Result<Vec<Zone>, ParkingCapacityError> {
        self.service
            .zones()
            .list_zones(parking_id)
            .await
            .map_err(Into::into)
    }
}
