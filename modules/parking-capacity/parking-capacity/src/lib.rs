//! Parking Capacity Module Implementation
//!
//! Decides how many network gateways a parking lot needs and whether a new
//! or relocated zone or gateway may be admitted without breaking the lot's
//! capacity invariants.
//!
//! ## Architecture
//!
//! ```text
//!         Caller (HTTP layer, CLI)
//!                 │
//!                 ▼ ParkingCapacityApi
//! ┌────────────────────────────────────┐
//! │        ParkingCapacityModule       │
//! │  ┌──────────────────────────────┐  │
//! │  │ Parking / Zone / Gateway     │  │
//! │  │ admission services           │──┼──► repositories
//! │  └──────────────────────────────┘  │
//! │               │                    │
//! │               ▼ CapacityEstimator  │
//! │     ┌─────────┴─────────┐          │
//! │  Heuristic          Learned ───────┼──► model artifact (JSON)
//! └────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! The public API is defined in `parking-capacity-sdk` and re-exported here.

// === PUBLIC API (from SDK) ===
pub use parking_capacity_sdk::{
    Address, CoverageParams, EstimatorKind, Gateway, GatewayStatus, GatewayUpdate,
    MAX_ZONES_PER_PARKING, NewGateway, NewParking, NewZone, Parking, ParkingCapacityApi,
    ParkingCapacityError, ParkingSuggestion, ParkingUpdate, TrainingSample, Zone, ZoneUpdate,
};

// === MODULE DEFINITION ===
pub mod module;
pub use module::ParkingCapacityModule;

// === LOCAL CLIENT ===
pub mod local_client;

// === INTERNAL MODULES ===
pub mod config;
pub use config::ParkingCapacityConfig;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
