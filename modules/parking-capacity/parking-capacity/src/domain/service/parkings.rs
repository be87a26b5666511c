use std::sync::Arc;

use parking_capacity_sdk::{
    EstimatorKind, MAX_ZONES_PER_PARKING, NewParking, Parking, ParkingSuggestion, ParkingUpdate,
};
use time::OffsetDateTime;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{Estimators, Repositories};
use crate::domain::error::{BusinessRuleViolation, DomainError, Entity};
use crate::domain::locks::ParkingLocks;
use crate::domain::validation::{validate_location_query, validate_parking_fields};

/// Registers parkings and answers with zone and gateway planning hints.
pub struct ParkingService {
    repos: Repositories,
    estimators: Arc<Estimators>,
    locks: Arc<ParkingLocks>,
}

impl ParkingService {
    #[must_use]
    pub fn new(repos: Repositories, estimators: Arc<Estimators>, locks: Arc<ParkingLocks>) -> Self {
        Self {
            repos,
            estimators,
            locks,
        }
    }

    /// Registers a parking and suggests how to split and equip it.
    ///
    /// # Errors
    ///
    /// * `Validation` - If the name is blank or the area is negative
    /// * Any error of the chosen estimator; nothing is stored in that case
    #[instrument(skip(self, new), fields(name = %new.name, estimator = %kind))]
    pub async fn create_parking(
        &self,
        new: NewParking,
        kind: EstimatorKind,
    ) -> Result<ParkingSuggestion, DomainError> {
        validate_parking_fields(&new.name, new.available_area)?;
        let suggested = self
            .estimators
            .estimate(kind, new.available_area, new.capacity)?;

        let parking = Parking {
            id: Uuid::new_v4(),
            name: new.name,
            location: new.location,
            available_area: new.available_area,
            capacity: new.capacity,
            registered_at: OffsetDateTime::now_utc(),
            zones: Vec::new(),
            gateways: Vec::new(),
        };
        let parking = self.repos.parkings.add(parking).await?;

        info!(parking_id = %parking.id, suggested_gateways = suggested, "Registered parking");
        Ok(suggestion(&parking, suggested, kind))
    }

    /// # Errors
    ///
    /// Returns `NotFound` if the parking does not exist.
    pub async fn get_parking(&self, id: Uuid) -> Result<Parking, DomainError> {
        self.repos
            .parkings
            .get_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(Entity::Parking, id))
    }

    /// Finds the parking registered at a street address.
    ///
    /// # Errors
    ///
    /// * `Validation` - If `street` or `complement` is blank
    /// * `NotFound` - If no parking has that address
    pub async fn get_parking_by_location(
        &self,
        street: &str,
        complement: &str,
    ) -> Result<Parking, DomainError> {
        validate_location_query(street, complement)?;
        self.repos
            .parkings
            .get_by_location(street, complement)
            .await?
            .ok_or_else(|| DomainError::not_found(Entity::Parking, format!("{street}, {complement}")))
    }

    /// Replaces a parking's own fields.
    ///
    /// # Errors
    ///
    /// * `Validation` - If the name is blank or the area is negative
    /// * `NotFound` - If the parking does not exist
    /// * `BusinessRule` - `area exceeded` if the new area is smaller than the zones already in place
    #[instrument(skip(self, update), fields(parking_id = %id, estimator = %kind))]
    pub async fn update_parking(
        &self,
        id: Uuid,
        update: ParkingUpdate,
        kind: EstimatorKind,
    ) -> Result<ParkingSuggestion, DomainError> {
        validate_parking_fields(&update.name, update.available_area)?;

        let _guard = self.locks.acquire(id).await;
        let mut parking = self.get_parking(id).await?;
        parking.zones = self.repos.zones.get_by_parking_id(id).await?;

        let occupied = parking.occupied_area();
        if occupied > update.available_area {
            warn!(%occupied, available = %update.available_area, "Rejected parking update: area exceeded");
            return Err(DomainError::BusinessRule(
                BusinessRuleViolation::AreaExceeded,
            ));
        }
        let suggested = self
            .estimators
            .estimate(kind, update.available_area, update.capacity)?;

        parking.name = update.name;
        parking.location = update.location;
        parking.available_area = update.available_area;
        parking.capacity = update.capacity;
        let parking = self.repos.parkings.update(parking).await?;

        info!(suggested_gateways = suggested, "Updated parking");
        Ok(suggestion(&parking, suggested, kind))
    }

    /// Deletes a parking together with its zones and gateways.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the parking does not exist.
    #[instrument(skip(self), fields(parking_id = %id))]
    pub async fn remove_parking(&self, id: Uuid) -> Result<(), DomainError> {
        let _guard = self.locks.acquire(id).await;
        let zones = self.repos.zones.count_by_parking_id(id).await?;
        let gateways = self.repos.gateways.get_all_by_parking_id(id).await?.len();
        if !self.repos.parkings.remove(id).await? {
            return Err(DomainError::not_found(Entity::Parking, id));
        }

        info!(zones, gateways, "Removed parking");
        Ok(())
    }
}

fn suggestion(parking: &Parking, suggested_gateways: u32, kind: EstimatorKind) -> ParkingSuggestion {
    let max_zone_area = parking.max_zone_area();
    ParkingSuggestion {
        parking_id: parking.id,
        name: parking.name.clone(),
        available_area: parking.available_area,
        capacity: parking.capacity,
        max_zones: MAX_ZONES_PER_PARKING,
        max_zone_area,
        zone_message: format!(
            "Up to {MAX_ZONES_PER_PARKING} zones of at most {max_zone_area:.2} m² each"
        ),
        suggested_gateways,
        estimator: kind,
    }
}
