use std::sync::Arc;

use parking_capacity_sdk::{MAX_ZONES_PER_PARKING, NewZone, Parking, Zone, ZoneUpdate};
use rust_decimal::Decimal;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::domain::error::{BusinessRuleViolation, DomainError, Entity};
use crate::domain::locks::ParkingLocks;
use crate::domain::repo::{ParkingRepository, ZoneRepository};
use crate::domain::validation::validate_zone_dimensions;

/// Keeps every parking at no more than four zones whose areas fit inside
/// its available area.
pub struct ZoneAdmissionService {
    parking_repo: Arc<dyn ParkingRepository>,
    zone_repo: Arc<dyn ZoneRepository>,
    locks: Arc<ParkingLocks>,
}

impl ZoneAdmissionService {
    #[must_use]
    pub fn new(
        parking_repo: Arc<dyn ParkingRepository>,
        zone_repo: Arc<dyn ZoneRepository>,
        locks: Arc<ParkingLocks>,
    ) -> Self {
        Self {
            parking_repo,
            zone_repo,
            locks,
        }
    }

    /// # Errors
    ///
    /// * `Validation` - If width or length is not positive
    /// * `NotFound` - If the parking does not exist
    /// * `BusinessRule` - `max zones` or `area exceeded`
    #[instrument(skip(self, new), fields(parking_id = %new.parking_id, width = %new.width, length = %new.length))]
    pub async fn add_zone(&self, new: NewZone) -> Result<Zone, DomainError> {
        validate_zone_dimensions(new.width, new.length)?;

        let _guard = self.locks.acquire(new.parking_id).await;
        let parking = self.load_parking(new.parking_id).await?;

        let zone = Zone {
            id: Uuid::new_v4(),
            parking_id: new.parking_id,
            name: new.name,
            description: new.description,
            width: new.width,
            length: new.length,
        };
        admit(&parking, zone.area())?;

        let zone = self.zone_repo.add(zone).await?;
        info!(zone_id = %zone.id, "Admitted zone");
        Ok(zone)
    }

    /// Replaces a zone's fields.
    ///
    /// Moving to another parking checks both invariants against the
    /// destination. Resizing in place checks the area invariant with the
    /// zone's previous area taken out of the sum.
    ///
    /// # Errors
    ///
    /// * `Validation` - If width or length is not positive
    /// * `NotFound` - If the zone or the destination parking does not exist
    /// * `BusinessRule` - `max zones` or `area exceeded`
    #[instrument(skip(self, update), fields(zone_id = %id, parking_id = %update.parking_id))]
    pub async fn update_zone(&self, id: Uuid, update: ZoneUpdate) -> Result<Zone, DomainError> {
        validate_zone_dimensions(update.width, update.length)?;

        let _guard = self.locks.acquire(update.parking_id).await;
        let existing = self.load_zone(id).await?;
        let mut destination = self.load_parking(update.parking_id).await?;
        let moving = existing.parking_id != update.parking_id;
        if moving {
            admit(&destination, update.area())?;
        } else {
            destination.zones.retain(|z| z.id != id);
            check_area(&destination, update.area())?;
        }

        let zone = Zone {
            id,
            parking_id: update.parking_id,
            name: update.name,
            description: update.description,
            width: update.width,
            length: update.length,
        };
        let zone = self.zone_repo.update(zone).await?;

        if moving {
            info!(from = %existing.parking_id, "Moved zone");
        } else {
            info!("Updated zone");
        }
        Ok(zone)
    }

    /// # Errors
    ///
    /// Returns `NotFound` if the zone does not exist.
    #[instrument(skip(self), fields(zone_id = %id))]
    pub async fn remove_zone(&self, id: Uuid) -> Result<(), DomainError> {
        if !self.zone_repo.remove(id).await? {
            return Err(DomainError::not_found(Entity::Zone, id));
        }
        info!("Removed zone");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `NotFound` if the zone does not exist.
    pub async fn get_zone(&self, id: Uuid) -> Result<Zone, DomainError> {
        self.load_zone(id).await
    }

    /// # Errors
    ///
    /// Returns `NotFound` if the parking does not exist.
    pub async fn list_zones(&self, parking_id: Uuid) -> Result<Vec<Zone>, DomainError> {
        Ok(self.load_parking(parking_id).await?.zones)
    }

    /// The parking with its zones read fresh from the zone repository.
    async fn load_parking(&self, id: Uuid) -> Result<Parking, DomainError> {
        let mut parking = self
            .parking_repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(Entity::Parking, id))?;
        parking.zones = self.zone_repo.get_by_parking_id(id).await?;
        Ok(parking)
    }

    async fn load_zone(&self, id: Uuid) -> Result<Zone, DomainError> {
        self.zone_repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(Entity::Zone, id))
    }
}

/// Both zone invariants for a zone of `candidate_area` joining `parking`.
fn admit(parking: &Parking, candidate_area: Decimal) -> Result<(), DomainError> {
    if parking.has_reached_max_zones() {
        warn!(
            zones = parking.zone_count(),
            max = MAX_ZONES_PER_PARKING,
            "Rejected zone: max zones"
        );
        return Err(DomainError::BusinessRule(BusinessRuleViolation::MaxZones));
    }
    check_area(parking, candidate_area)
}

fn check_area(parking: &Parking, candidate_area: Decimal) -> Result<(), DomainError> {
    debug!(
        occupied = %parking.occupied_area(),
        candidate = %candidate_area,
        available = %parking.available_area,
        "Checked zone area"
    );
    if parking.exceeds_available_area(candidate_area) {
        warn!("Rejected zone: area exceeded");
        return Err(DomainError::BusinessRule(
            BusinessRuleViolation::AreaExceeded,
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::infra::storage::InMemoryParkingStore;
    use parking_capacity_sdk::Address;
    use time::OffsetDateTime;

    struct Fixture {
        store: Arc<InMemoryParkingStore>,
        locks: Arc<ParkingLocks>,
        service: ZoneAdmissionService,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryParkingStore::new());
        let locks = Arc::new(ParkingLocks::new());
        let service = ZoneAdmissionService::new(store.clone(), store.clone(), locks.clone());
        Fixture {
            store,
            locks,
            service,
        }
    }

    async fn parking(store: &InMemoryParkingStore, area: i64) -> Parking {
        ParkingRepository::add(
            store,
            Parking {
                id: Uuid::new_v4(),
                name: "Lot".to_owned(),
                location: Address::default(),
                available_area: Decimal::from(area),
                capacity: 100,
                registered_at: OffsetDateTime::now_utc(),
                zones: Vec::new(),
                gateways: Vec::new(),
            },
        )
        .await
        .unwrap()
    }

    fn new_zone(parking_id: Uuid, width: i64, length: i64) -> NewZone {
        NewZone {
            parking_id,
            name: "Zone".to_owned(),
            description: String::new(),
            width: Decimal::from(width),
            length: Decimal::from(length),
        }
    }

    fn as_update(zone: &Zone, parking_id: Uuid, width: i64, length: i64) -> ZoneUpdate {
        ZoneUpdate {
            parking_id,
            name: zone.name.clone(),
            description: zone.description.clone(),
            width: Decimal::from(width),
            length: Decimal::from(length),
        }
    }

    #[tokio::test]
    async fn test_fifth_zone_is_rejected() {
        let f = fixture();
        let lot = parking(&f.store, 10_000).await;
        for _ in 0..4 {
            f.service.add_zone(new_zone(lot.id, 10, 10)).await.unwrap();
        }

        let err = f.service.add_zone(new_zone(lot.id, 10, 10)).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::BusinessRule(BusinessRuleViolation::MaxZones)
        ));
    }

    #[tokio::test]
    async fn test_area_exactly_full_passes_one_over_fails() {
        let f = fixture();
        let lot = parking(&f.store, 1_000).await;
        f.service.add_zone(new_zone(lot.id, 20, 25)).await.unwrap();
        f.service.add_zone(new_zone(lot.id, 20, 25)).await.unwrap();

        let err = f.service.add_zone(new_zone(lot.id, 1, 1)).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::BusinessRule(BusinessRuleViolation::AreaExceeded)
        ));
    }

    #[tokio::test]
    async fn test_dimensions_are_validated_first() {
        let f = fixture();
        let err = f
            .service
            .add_zone(new_zone(Uuid::new_v4(), 0, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { field: "width", .. }));
    }

    #[tokio::test]
    async fn test_unknown_parking_is_not_found() {
        let f = fixture();
        let err = f
            .service
            .add_zone(new_zone(Uuid::new_v4(), 10, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: Entity::Parking, .. }));
        assert!(f.locks.is_empty());
    }

    #[tokio::test]
    async fn test_move_checks_destination() {
        let f = fixture();
        let source = parking(&f.store, 10_000).await;
        let destination = parking(&f.store, 500).await;
        f.service
            .add_zone(new_zone(destination.id, 20, 20))
            .await
            .unwrap();
        let zone = f.service.add_zone(new_zone(source.id, 10, 20)).await.unwrap();

        // 400 + 200 > 500
        let err = f
            .service
            .update_zone(zone.id, as_update(&zone, destination.id, 10, 20))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::BusinessRule(BusinessRuleViolation::AreaExceeded)
        ));
        assert_eq!(f.service.get_zone(zone.id).await.unwrap().parking_id, source.id);

        // 400 + 100 == 500
        let moved = f
            .service
            .update_zone(zone.id, as_update(&zone, destination.id, 10, 10))
            .await
            .unwrap();
        assert_eq!(moved.parking_id, destination.id);
        assert!(f.service.list_zones(source.id).await.unwrap().is_empty());
        assert_eq!(f.service.list_zones(destination.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_move_into_parking_with_four_zones() {
        let f = fixture();
        let source = parking(&f.store, 10_000).await;
        let full = parking(&f.store, 10_000).await;
        for _ in 0..4 {
            f.service.add_zone(new_zone(full.id, 1, 1)).await.unwrap();
        }
        let zone = f.service.add_zone(new_zone(source.id, 1, 1)).await.unwrap();

        let err = f
            .service
            .update_zone(zone.id, as_update(&zone, full.id, 1, 1))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::BusinessRule(BusinessRuleViolation::MaxZones)
        ));
    }

    #[tokio::test]
    async fn test_resize_in_place_excludes_own_area() {
        let f = fixture();
        let lot = parking(&f.store, 1_000).await;
        for _ in 0..3 {
            f.service.add_zone(new_zone(lot.id, 10, 10)).await.unwrap();
        }
        let zone = f.service.add_zone(new_zone(lot.id, 10, 10)).await.unwrap();

        // a full parking still accepts an in-place update: 300 + 700 == 1000
        let resized = f
            .service
            .update_zone(zone.id, as_update(&zone, lot.id, 10, 70))
            .await
            .unwrap();
        assert_eq!(resized.area(), Decimal::from(700));

        let err = f
            .service
            .update_zone(zone.id, as_update(&zone, lot.id, 10, 71))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::BusinessRule(BusinessRuleViolation::AreaExceeded)
        ));
    }

    #[tokio::test]
    async fn test_remove_zone_frees_a_slot() {
        let f = fixture();
        let lot = parking(&f.store, 10_000).await;
        let mut last = None;
        for _ in 0..4 {
            last = Some(f.service.add_zone(new_zone(lot.id, 1, 1)).await.unwrap());
        }
        let last = last.unwrap();

        f.service.remove_zone(last.id).await.unwrap();
        f.service.add_zone(new_zone(lot.id, 1, 1)).await.unwrap();

        let err = f.service.remove_zone(last.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: Entity::Zone, .. }));
    }
}
