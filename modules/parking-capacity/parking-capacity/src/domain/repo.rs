//! Repository traits for the Parking Capacity domain.
//!
//! These are the read/write contracts the admission services consume.
//! Persistence-engine specifics stay behind them.

use async_trait::async_trait;
use parking_capacity_sdk::{Gateway, Parking, Zone};
use uuid::Uuid;

/// Repository trait for Parking aggregates.
#[async_trait]
pub trait ParkingRepository: Send + Sync {
    /// Find a parking by ID, with its zones and gateways attached.
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<Parking>>;

    /// Find the earliest registered parking whose address has exactly this
    /// street and complement, with its zones and gateways attached.
    async fn get_by_location(
        &self,
        street: &str,
        complement: &str,
    ) -> anyhow::Result<Option<Parking>>;

    /// Insert a new parking.
    async fn add(&self, parking: Parking) -> anyhow::Result<Parking>;

    /// Replace the parking's own fields. Attached zones and gateways are ignored.
    async fn update(&self, parking: Parking) -> anyhow::Result<Parking>;

    /// Delete a parking and everything it owns. Returns `false` if it did not exist.
    async fn remove(&self, id: Uuid) -> anyhow::Result<bool>;
}

/// Repository trait for Gateway entities.
#[async_trait]
pub trait GatewayRepository: Send + Sync {
    /// Find a gateway by ID.
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<Gateway>>;

    /// Find a gateway by MAC address.
    async fn get_by_mac_address(&self, mac_address: &str) -> anyhow::Result<Option<Gateway>>;

    /// All gateways installed in a parking, in insertion order.
    async fn get_all_by_parking_id(&self, parking_id: Uuid) -> anyhow::Result<Vec<Gateway>>;

    /// Insert a new gateway.
    async fn add(&self, gateway: Gateway) -> anyhow::Result<Gateway>;

    /// Replace all fields of an existing gateway, including its parking.
    async fn update(&self, gateway: Gateway) -> anyhow::Result<Gateway>;

    /// Delete a gateway. Returns `false` if it did not exist.
    async fn remove(&self, id: Uuid) -> anyhow::Result<bool>;
}

/// Repository trait for Zone entities.
#[async_trait]
pub trait ZoneRepository: Send + Sync {
    /// Find a zone by ID.
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<Zone>>;

    /// All zones of a parking, in insertion order.
    async fn get_by_parking_id(&self, parking_id: Uuid) -> anyhow::Result<Vec<Zone>>;

    /// Number of zones attached to a parking.
    async fn count_by_parking_id(&self, parking_id: Uuid) -> anyhow::Result<usize>;

    /// Insert a new zone.
    async fn add(&self, zone: Zone) -> anyhow::Result<Zone>;

    /// Replace all fields of an existing zone, including its parking.
    async fn update(&self, zone: Zone) -> anyhow::Result<Zone>;

    /// Delete a zone. Returns `false` if it did not exist.
    async fn remove(&self, id: Uuid) -> anyhow::Result<bool>;
}
