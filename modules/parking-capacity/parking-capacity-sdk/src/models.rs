//! Parking capacity models.
//!
//! Transport-agnostic models shared by the capacity core and its callers.
//! The aggregate invariant helpers live on [`Parking`] so that the
//! deterministic code path and the admission services agree on one formula.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Maximum number of zones a single parking may hold.
pub const MAX_ZONES_PER_PARKING: usize = 4;

/// Area one gateway is assumed to cover when the caller does not say otherwise.
pub const DEFAULT_MAX_COVERAGE_AREA: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Vehicles one gateway is assumed to serve when the caller does not say otherwise.
pub const DEFAULT_MAX_CAPACITY: u32 = 100;

/// Computes `max(ceil(area / max_coverage_area), ceil(capacity / max_capacity))`.
///
/// Returns `None` when either divisor is not positive or the area quotient
/// does not fit in a `u32`.
#[must_use]
pub fn required_gateways(
    available_area: Decimal,
    capacity: u32,
    coverage: &CoverageParams,
) -> Option<u32> {
    if coverage.max_coverage_area <= Decimal::ZERO || coverage.max_capacity == 0 {
        return None;
    }

    let by_area = available_area
        .checked_div(coverage.max_coverage_area)?
        .ceil()
        .to_u32()?;
    let by_capacity = capacity.div_ceil(coverage.max_capacity);

    Some(by_area.max(by_capacity))
}

fn rectangle_area(width: Decimal, length: Decimal) -> Decimal {
    width.saturating_mul(length)
}

/// Per-gateway coverage parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageParams {
    /// Maximum physical area one gateway serves.
    pub max_coverage_area: Decimal,
    /// Maximum number of vehicles one gateway serves.
    pub max_capacity: u32,
}

impl Default for CoverageParams {
    fn default() -> Self {
        Self {
            max_coverage_area: DEFAULT_MAX_COVERAGE_AREA,
            max_capacity: DEFAULT_MAX_CAPACITY,
        }
    }
}

/// Postal location of a parking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub complement: String,
    pub neighborhood: String,
    pub postal_code: String,
    pub city: String,
    pub state: String,
}

/// A physical parking lot and the resources it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parking {
    pub id: Uuid,
    pub name: String,
    pub location: Address,
    /// Usable area in square metres. Never negative.
    pub available_area: Decimal,
    /// Vehicle capacity.
    pub capacity: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub registered_at: OffsetDateTime,
    /// Zones in insertion order.
    pub zones: Vec<Zone>,
    /// Gateways in insertion order.
    pub gateways: Vec<Gateway>,
}

impl Parking {
    /// Gateways this parking needs under the deterministic coverage formula.
    ///
    /// Returns `None` when the coverage parameters are not positive.
    #[must_use]
    pub fn required_gateways(&self, coverage: &CoverageParams) -> Option<u32> {
        required_gateways(self.available_area, self.capacity, coverage)
    }

    #[must_use]
    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    #[must_use]
    pub fn has_reached_max_zones(&self) -> bool {
        self.zones.len() >= MAX_ZONES_PER_PARKING
    }

    /// Sum of `width * length` over the zones currently attached.
    #[must_use]
    pub fn occupied_area(&self) -> Decimal {
        self.zones
            .iter()
            .map(Zone::area)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Whether adding a zone of `candidate_area` would push the total zone
    /// area past `available_area`. A total exactly equal to the available
    /// area is allowed.
    #[must_use]
    pub fn exceeds_available_area(&self, candidate_area: Decimal) -> bool {
        self.occupied_area().saturating_add(candidate_area) > self.available_area
    }

    /// Largest area each zone may have if the lot is split into the maximum
    /// number of zones.
    #[must_use]
    pub fn max_zone_area(&self) -> Decimal {
        self.available_area / Decimal::from(MAX_ZONES_PER_PARKING)
    }
}

/// Fields required to register a parking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewParking {
    pub name: String,
    pub location: Address,
    pub available_area: Decimal,
    pub capacity: u32,
}

/// Full replacement of a parking's own fields. Zones and gateways are
/// managed through their own operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkingUpdate {
    pub name: String,
    pub location: Address,
    pub available_area: Decimal,
    pub capacity: u32,
}

/// A rectangular area inside a parking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: Uuid,
    pub parking_id: Uuid,
    pub name: String,
    pub description: String,
    pub width: Decimal,
    pub length: Decimal,
}

impl Zone {
    #[must_use]
    pub fn area(&self) -> Decimal {
        rectangle_area(self.width, self.length)
    }

    #[must_use]
    pub fn has_valid_dimensions(&self) -> bool {
        self.width > Decimal::ZERO && self.length > Decimal::ZERO
    }
}

/// Fields required to add a zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewZone {
    pub parking_id: Uuid,
    pub name: String,
    pub description: String,
    pub width: Decimal,
    pub length: Decimal,
}

/// Full replacement of a zone's fields, including its owning parking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneUpdate {
    pub parking_id: Uuid,
    pub name: String,
    pub description: String,
    pub width: Decimal,
    pub length: Decimal,
}

impl ZoneUpdate {
    #[must_use]
    pub fn area(&self) -> Decimal {
        rectangle_area(self.width, self.length)
    }
}

/// Operational state of a gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayStatus {
    #[default]
    Active,
    Inactive,
    Maintenance,
}

/// A network gateway installed in a parking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gateway {
    pub id: Uuid,
    pub parking_id: Uuid,
    pub model: String,
    pub status: GatewayStatus,
    pub mac_address: String,
    pub last_ip: String,
    pub coverage: CoverageParams,
    #[serde(with = "time::serde::rfc3339")]
    pub registered_at: OffsetDateTime,
}

/// Fields required to add a gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGateway {
    pub parking_id: Uuid,
    pub model: String,
    #[serde(default)]
    pub status: GatewayStatus,
    pub mac_address: String,
    pub last_ip: String,
    #[serde(default)]
    pub coverage: CoverageParams,
}

/// Full replacement of a gateway's fields, including its owning parking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayUpdate {
    pub parking_id: Uuid,
    pub model: String,
    #[serde(default)]
    pub status: GatewayStatus,
    pub mac_address: String,
    pub last_ip: String,
    #[serde(default)]
    pub coverage: CoverageParams,
}

/// Which strategy produces the required-gateway count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimatorKind {
    /// Deterministic coverage formula.
    #[default]
    Heuristic,
    /// Trained regression model.
    Learned,
}

impl EstimatorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Heuristic => "heuristic",
            Self::Learned => "learned",
        }
    }
}

impl fmt::Display for EstimatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EstimatorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heuristic" => Ok(Self::Heuristic),
            "learned" => Ok(Self::Learned),
            other => Err(format!(
                "unknown estimator '{other}', expected 'heuristic' or 'learned'"
            )),
        }
    }
}

/// One observation used to fit the learned estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingSample {
    pub available_area: Decimal,
    pub capacity: u32,
    pub observed_gateways: u32,
}

impl TrainingSample {
    #[must_use]
    pub fn new(available_area: Decimal, capacity: u32, observed_gateways: u32) -> Self {
        Self {
            available_area,
            capacity,
            observed_gateways,
        }
    }
}

/// Planning hints returned when a parking is registered or updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkingSuggestion {
    pub parking_id: Uuid,
    pub name: String,
    pub available_area: Decimal,
    pub capacity: u32,
    pub max_zones: usize,
    pub max_zone_area: Decimal,
    pub zone_message: String,
    pub suggested_gateways: u32,
    pub estimator: EstimatorKind,
}
