//! `ParkingCapacityApi` trait definition.
//!
//! This trait defines the public API for the `parking-capacity` module.
//! HTTP controllers, CLIs and other modules consume the core through it.

use std::path::Path;

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::ParkingCapacityError;
use crate::models::{
    EstimatorKind, Gateway, GatewayUpdate, NewGateway, NewParking, NewZone, Parking,
    ParkingSuggestion, ParkingUpdate, TrainingSample, Zone, ZoneUpdate,
};

/// Public API trait for the `parking-capacity` module.
#[async_trait]
pub trait ParkingCapacityApi: Send + Sync {
    // === Estimation ===

    /// Number of gateways required for the given area and vehicle capacity.
    ///
    /// The heuristic variant uses the default coverage parameters.
    ///
    /// # Errors
    ///
    /// * `Configuration` - If the default coverage parameters are not positive
    /// * `ModelNotReady` - If the learned estimator has no active model
    async fn estimate_gateways(
        &self,
        kind: EstimatorKind,
        available_area: Decimal,
        capacity: u32,
    ) -> Result<u32, ParkingCapacityError>;

    /// Fit a new regression model, persist it at `path` and make it active.
    ///
    /// # Errors
    ///
    /// * `InsufficientData` - If `samples` is empty
    /// * `Persistence` - If the artifact cannot be written
    async fn train_model(
        &self,
        samples: Vec<TrainingSample>,
        path: &Path,
    ) -> Result<(), ParkingCapacityError>;

    /// Replace the active regression model with the artifact at `path`.
    ///
    /// # Errors
    ///
    /// * `ModelNotFound` - If nothing exists at `path`
    /// * `ModelCorrupt` - If the artifact does not match the expected schema
    async fn load_model(&self, path: &Path) -> Result<(), ParkingCapacityError>;

    // === Parkings ===

    /// Register a parking and return planning hints computed with `kind`.
    ///
    /// # Errors
    ///
    /// * `Validation` - If the name is blank or the area is negative
    async fn create_parking(
        &self,
        new_parking: NewParking,
        kind: EstimatorKind,
    ) -> Result<ParkingSuggestion, ParkingCapacityError>;

    /// Retrieve a parking with its zones and gateways.
    ///
    /// # Errors
    ///
    /// * `NotFound` - If the parking does not exist
    async fn get_parking(&self, id: Uuid) -> Result<Parking, ParkingCapacityError>;

    /// Retrieve the parking registered at `street` / `complement`.
    ///
    /// # Errors
    ///
    /// * `Validation` - If `street` or `complement` is blank
    /// * `NotFound` - If no parking has that address
    async fn get_parking_by_location(
        &self,
        street: &str,
        complement: &str,
    ) -> Result<Parking, ParkingCapacityError>;

    /// Replace a parking's own fields and return fresh planning hints.
    ///
    /// # Errors
    ///
    /// * `NotFound` - If the parking does not exist
    /// * `BusinessRule` - If the new area is smaller than the area already used by zones
    async fn update_parking(
        &self,
        id: Uuid,
        update: ParkingUpdate,
        kind: EstimatorKind,
    ) -> Result<ParkingSuggestion, ParkingCapacityError>;

    /// Remove a parking together with all of its zones and gateways.
    ///
    /// # Errors
    ///
    /// * `NotFound` - If the parking does not exist
    async fn remove_parking(&self, id: Uuid) -> Result<(), ParkingCapacityError>;

    // === Gateways ===

    /// Admit a new gateway into a parking.
    ///
    /// # Errors
    ///
    /// * `Validation` - If the MAC address or IP is malformed
    /// * `NotFound` - If the parking does not exist
    /// * `CapacityExceeded` - If the parking already holds the required number of gateways
    async fn add_gateway(&self, new_gateway: NewGateway) -> Result<Gateway, ParkingCapacityError>;

    /// Replace a gateway's fields, re-checking admission when it moves to another parking.
    ///
    /// # Errors
    ///
    /// * `Validation` - If the MAC address or IP is malformed
    /// * `NotFound` - If the gateway or the destination parking does not exist
    /// * `CapacityExceeded` - If the destination parking has no free slot
    async fn update_gateway(
        &self,
        id: Uuid,
        update: GatewayUpdate,
    ) -> Result<Gateway, ParkingCapacityError>;

    /// Delete a gateway.
    ///
    /// # Errors
    ///
    /// * `NotFound` - If the gateway does not exist
    async fn remove_gateway(&self, id: Uuid) -> Result<(), ParkingCapacityError>;

    /// Retrieve a gateway by ID.
    ///
    /// # Errors
    ///
    /// * `NotFound` - If the gateway does not exist
    async fn get_gateway(&self, id: Uuid) -> Result<Gateway, ParkingCapacityError>;

    /// Retrieve a gateway by MAC address.
    ///
    /// # Errors
    ///
    /// * `NotFound` - If no gateway has this MAC address
    async fn get_gateway_by_mac(&self, mac_address: &str)
    -> Result<Gateway, ParkingCapacityError>;

    /// List the gateways installed in a parking.
    ///
    /// # Errors
    ///
    /// * `NotFound` - If the parking does not exist
    async fn list_gateways(&self, parking_id: Uuid) -> Result<Vec<Gateway>, ParkingCapacityError>;

    // === Zones ===

    /// Admit a new zone into a parking.
    ///
    /// # Errors
    ///
    /// * `Validation` - If width or length is not positive
    /// * `NotFound` - If the parking does not exist
    /// * `BusinessRule` - If the parking already has four zones or the area would be exceeded
    async fn add_zone(&self, new_zone: NewZone) -> Result<Zone, ParkingCapacityError>;

    /// Replace a zone's fields, re-checking admission when it moves to another parking.
    ///
    /// # Errors
    ///
    /// * `Validation` - If width or length is not positive
    /// * `NotFound` - If the zone or the destination parking does not exist
    /// * `BusinessRule` - If the destination cannot take the zone
    async fn update_zone(&self, id: Uuid, update: ZoneUpdate) -> Result<Zone, ParkingCapacityError>;

    /// Delete a zone.
    ///
    /// # Errors
    ///
    /// * `NotFound` - If the zone does not exist
    async fn remove_zone(&self, id: Uuid) -> Result<(), ParkingCapacityError>;

    /// Retrieve a zone by ID.
    ///
    /// # Errors
    ///
    /// * `NotFound` - If the zone does not exist
    async fn get_zone(&self, id: Uuid) -> Result<Zone, ParkingCapacityError>;

    /// List the zones of a parking.
    ///
    /// # Errors
    ///
    /// * `NotFound` - If the parking does not exist
    async fn list_zones(&self, parking_id: Uuid) -> Result<Vec<Zone>, ParkingCapacityError>;
}
