//! Parking Capacity SDK
//!
//! This crate provides the public API for the `parking-capacity` module:
//! - `ParkingCapacityApi` trait for callers (HTTP layer, CLI, other modules)
//! - `Parking`, `Zone` and `Gateway` models with the aggregate invariant helpers
//! - `TrainingSample` and `EstimatorKind` for the capacity estimators
//! - `ParkingCapacityError` for error handling
//!
//! ## Usage
//!
//! ```ignore
//! use parking_capacity_sdk::{EstimatorKind, ParkingCapacityApi};
//!
//! let required = client
//!     .estimate_gateways(EstimatorKind::Heuristic, area, capacity)
//!     .await?;
//!
//! let gateway = client.add_gateway(new_gateway).await?;
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod api;
pub mod error;
pub mod models;

// Re-export main types at crate root for convenience
pub use api::ParkingCapacityApi;
pub use error::ParkingCapacityError;
pub use models::{
    Address, CoverageParams, DEFAULT_MAX_CAPACITY, DEFAULT_MAX_COVERAGE_AREA, EstimatorKind,
    Gateway, GatewayStatus, GatewayUpdate, MAX_ZONES_PER_PARKING, NewGateway, NewParking,
    NewZone, Parking, ParkingSuggestion, ParkingUpdate, TrainingSample, Zone, ZoneUpdate,
    required_gateways,
};
