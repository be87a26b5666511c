#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

//! Common test utilities for parking-capacity integration tests

use std::sync::Arc;

use parking_capacity::{
    Address, CoverageParams, EstimatorKind, GatewayStatus, NewGateway, NewParking, NewZone,
    ParkingCapacityApi, ParkingCapacityConfig, ParkingCapacityModule,
};
use rust_decimal::Decimal;
use tempfile::TempDir;
use uuid::Uuid;

/// Keeps the model directory alive for as long as the API is used.
pub struct Harness {
    pub dir: TempDir,
    pub config: ParkingCapacityConfig,
    pub api: Arc<dyn ParkingCapacityApi>,
}

pub fn create_api(admission_estimator: EstimatorKind) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let config = ParkingCapacityConfig {
        admission_estimator,
        model_path: dir.path().join("models/gateway_model.json"),
        ..ParkingCapacityConfig::default()
    };
    let module = ParkingCapacityModule::new();
    module.init(&config).unwrap();
    let api = module.api().unwrap();
    Harness { dir, config, api }
}

pub fn new_parking(area: i64, capacity: u32) -> NewParking {
    NewParking {
        name: "Central".to_owned(),
        location: Address {
            street: "Av. Paulista, 1000".to_owned(),
            city: "São Paulo".to_owned(),
            state: "SP".to_owned(),
            ..Address::default()
        },
        available_area: Decimal::from(area),
        capacity,
    }
}

pub async fn create_parking(api: &dyn ParkingCapacityApi, area: i64, capacity: u32) -> Uuid {
    api.create_parking(new_parking(area, capacity), EstimatorKind::Heuristic)
        .await
        .unwrap()
        .parking_id
}

/// A gateway whose MAC address is derived from `n`.
pub fn new_gateway(parking_id: Uuid, n: u8) -> NewGateway {
    NewGateway {
        parking_id,
        model: "PG-2000".to_owned(),
        status: GatewayStatus::Active,
        mac_address: format!("AA:BB:CC:DD:EE:{n:02X}"),
        last_ip: format!("10.0.0.{n}"),
        coverage: CoverageParams::default(),
    }
}

pub fn new_zone(parking_id: Uuid, width: i64, length: i64) -> NewZone {
    NewZone {
        parking_id,
        name: "Zone".to_owned(),
        description: "Covered".to_owned(),
        width: Decimal::from(width),
        length: Decimal::from(length),
    }
}
