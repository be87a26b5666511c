//! In-memory implementation of the parking, zone and gateway repositories.

use anyhow::{Context, bail};
use async_trait::async_trait;
use parking_capacity_sdk::{Gateway, Parking, Zone};
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::repo::{GatewayRepository, ParkingRepository, ZoneRepository};

#[derive(Default)]
struct State {
    /// Parkings without their zones and gateways; those live in the vectors below.
    parkings: HashMap<Uuid, Parking>,
    zones: Vec<Zone>,
    gateways: Vec<Gateway>,
}

impl State {
    fn ensure_parking(&self, id: Uuid) -> anyhow::Result<()> {
        if !self.parkings.contains_key(&id) {
            bail!("parking {id} does not exist");
        }
        Ok(())
    }

    fn hydrate(&self, parking: &Parking) -> Parking {
        let mut parking = parking.clone();
        parking.zones = self
            .zones
            .iter()
            .filter(|z| z.parking_id == parking.id)
            .cloned()
            .collect();
        parking.gateways = self
            .gateways
            .iter()
            .filter(|g| g.parking_id == parking.id)
            .cloned()
            .collect();
        parking
    }
}

/// One store backing all three repository traits, so parking removal can
/// cascade to zones and gateways under a single write lock.
///
/// Rows keep insertion order. Zone and gateway writes require the owning
/// parking to exist.
#[derive(Default)]
pub struct InMemoryParkingStore {
    state: RwLock<State>,
}

impl InMemoryParkingStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn parking_count(&self) -> usize {
        self.state.read().parkings.len()
    }
}

#[async_trait]
impl ParkingRepository for InMemoryParkingStore {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<Parking>> {
        let state = self.state.read();
        Ok(state.parkings.get(&id).map(|p| state.hydrate(p)))
    }

    async fn get_by_location(
        &self,
        street: &str,
        complement: &str,
    ) -> anyhow::Result<Option<Parking>> {
        let state = self.state.read();
        Ok(state
            .parkings
            .values()
            .filter(|p| p.location.street == street && p.location.complement == complement)
            .min_by_key(|p| p.registered_at)
            .map(|p| state.hydrate(p)))
    }

    async fn add(&self, mut parking: Parking) -> anyhow::Result<Parking> {
        let mut state = self.state.write();
        if state.parkings.contains_key(&parking.id) {
            bail!("parking {} already exists", parking.id);
        }
        parking.zones.clear();
        parking.gateways.clear();
        state.parkings.insert(parking.id, parking.clone());
        Ok(parking)
    }

    async fn update(&self, mut parking: Parking) -> anyhow::Result<Parking> {
        let mut state = self.state.write();
        parking.zones.clear();
        parking.gateways.clear();
        let slot = state
            .parkings
            .get_mut(&parking.id)
            .with_context(|| format!("parking {} does not exist", parking.id))?;
        slot.clone_from(&parking);
        Ok(state.hydrate(&parking))
    }

    async fn remove(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut state = self.state.write();
        if state.parkings.remove(&id).is_none() {
            return Ok(false);
        }
        state.zones.retain(|z| z.parking_id != id);
        state.gateways.retain(|g| g.parking_id != id);
        Ok(true)
    }
}

#[async_trait]
impl GatewayRepository for InMemoryParkingStore {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<Gateway>> {
        Ok(self.state.read().gateways.iter().find(|g| g.id == id).cloned())
    }

    async fn get_by_mac_address(&self, mac_address: &str) -> anyhow::Result<Option<Gateway>> {
        Ok(self
            .state
            .read()
            .gateways
            .iter()
            .find(|g| g.mac_address == mac_address)
            .cloned())
    }

    async fn get_all_by_parking_id(&self, parking_id: Uuid) -> anyhow::Result<Vec<Gateway>> {
        Ok(self
            .state
            .read()
            .gateways
            .iter()
            .filter(|g| g.parking_id == parking_id)
            .cloned()
            .collect())
    }

    async fn add(&self, gateway: Gateway) -> anyhow::Result<Gateway> {
        let mut state = self.state.write();
        state.ensure_parking(gateway.parking_id)?;
        if state.gateways.iter().any(|g| g.id == gateway.id) {
            bail!("gateway {} already exists", gateway.id);
        }
        state.gateways.push(gateway.clone());
        Ok(gateway)
    }

    async fn update(&self, gateway: Gateway) -> anyhow::Result<Gateway> {
        let mut state = self.state.write();
        state.ensure_parking(gateway.parking_id)?;
        let slot = state
            .gateways
            .iter_mut()
            .find(|g| g.id == gateway.id)
            .with_context(|| format!("gateway {} does not exist", gateway.id))?;
        slot.clone_from(&gateway);
        Ok(gateway)
    }

    async fn remove(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut state = self.state.write();
        let before = state.gateways.len();
        state.gateways.retain(|g| g.id != id);
        Ok(state.gateways.len() != before)
    }
}

#[async_trait]
impl ZoneRepository for InMemoryParkingStore {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<Zone>> {
        Ok(self.state.read().zones.iter().find(|z| z.id == id).cloned())
    }

    async fn get_by_parking_id(&self, parking_id: Uuid) -> anyhow::Result<Vec<Zone>> {
        Ok(self
            .state
            .read()
            .zones
            .iter()
            .filter(|z| z.parking_id == parking_id)
            .cloned()
            .collect())
    }

    async fn count_by_parking_id(&self, parking_id: Uuid) -> anyhow::Result<usize> {
        Ok(self
            .state
            .read()
            .zones
            .iter()
            .filter(|z| z.parking_id == parking_id)
            .count())
    }

    async fn add(&self, zone: Zone) -> anyhow::Result<Zone> {
        let mut state = self.state.write();
        state.ensure_parking(zone.parking_id)?;
        if state.zones.iter().any(|z| z.id == zone.id) {
            bail!("zone {} already exists", zone.id);
        }
        state.zones.push(zone.clone());
        Ok(zone)
    }

    async fn update(&self, zone: Zone) -> anyhow::Result<Zone> {
        let mut state = self.state.write();
        state.ensure_parking(zone.parking_id)?;
        let slot = state
            .zones
            .iter_mut()
            .find(|z| z.id == zone.id)
            .with_context(|| format!("zone {} does not exist", zone.id))?;
        slot.clone_from(&zone);
        Ok(zone)
    }

    async fn remove(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut state = self.state.write();
        let before = state.zones.len();
        state.zones.retain(|z| z.id != id);
        Ok(state.zones.len() != before)
    }
}
