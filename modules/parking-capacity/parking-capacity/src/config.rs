//! Configuration for the Parking Capacity module.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use parking_capacity_sdk::{
    CoverageParams, DEFAULT_MAX_CAPACITY, DEFAULT_MAX_COVERAGE_AREA, EstimatorKind,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Prefix of environment variables that override file configuration.
pub const ENV_PREFIX: &str = "PARKING_CAPACITY_";

/// Keys read from the environment; other `PARKING_CAPACITY_*` variables are ignored.
const ENV_KEYS: &[&str] = &[
    "admission_estimator",
    "model_path",
    "bootstrap_learned_model",
    "default_max_coverage_area",
    "default_max_capacity",
];

/// Configuration for the Parking Capacity module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ParkingCapacityConfig {
    /// Estimator used by gateway admission.
    /// Default: `heuristic`
    pub admission_estimator: EstimatorKind,

    /// Location of the persisted regression model.
    /// Default: `models/gateway_model.json`
    pub model_path: PathBuf,

    /// Train and persist the default model when `model_path` holds nothing.
    /// Default: `true`
    pub bootstrap_learned_model: bool,

    /// Coverage used by the heuristic when the caller supplies none.
    /// Default: `10000`
    pub default_max_coverage_area: Decimal,

    /// Vehicles per gateway used by the heuristic when the caller supplies none.
    /// Default: `100`
    pub default_max_capacity: u32,
}

impl Default for ParkingCapacityConfig {
    fn default() -> Self {
        Self {
            admission_estimator: EstimatorKind::Heuristic,
            model_path: PathBuf::from("models/gateway_model.json"),
            bootstrap_learned_model: true,
            default_max_coverage_area: DEFAULT_MAX_COVERAGE_AREA,
            default_max_capacity: DEFAULT_MAX_CAPACITY,
        }
    }
}

impl ParkingCapacityConfig {
    /// Builds the layered configuration: defaults, then the optional YAML
    /// file, then `PARKING_CAPACITY_*` environment variables.
    #[must_use]
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = file {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).only(ENV_KEYS))
    }

    /// Loads the configuration from the standard layers.
    ///
    /// # Errors
    ///
    /// Returns a `figment::Error` if a layer holds a malformed or unknown key.
    pub fn load(file: Option<&Path>) -> Result<Self, Box<figment::Error>> {
        Self::figment(file).extract().map_err(Box::new)
    }

    /// Coverage parameters used when the caller supplies none.
    #[must_use]
    pub fn default_coverage(&self) -> CoverageParams {
        CoverageParams {
            max_coverage_area: self.default_max_coverage_area,
            max_capacity: self.default_max_capacity,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let cfg = ParkingCapacityConfig::default();
        assert_eq!(cfg.admission_estimator, EstimatorKind::Heuristic);
        assert_eq!(cfg.model_path, PathBuf::from("models/gateway_model.json"));
        assert!(cfg.bootstrap_learned_model);
        assert_eq!(cfg.default_coverage(), CoverageParams::default());
    }

    #[test]
    fn test_yaml_and_env_layers() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "parking.yaml",
                r"
admission_estimator: learned
model_path: /var/lib/parking/model.json
default_max_capacity: 80
",
            )?;
            jail.set_env("PARKING_CAPACITY_DEFAULT_MAX_CAPACITY", "120");

            let cfg = ParkingCapacityConfig::load(Some(Path::new("parking.yaml"))).unwrap();
            assert_eq!(cfg.admission_estimator, EstimatorKind::Learned);
            assert_eq!(cfg.model_path, PathBuf::from("/var/lib/parking/model.json"));
            assert_eq!(cfg.default_max_capacity, 120);
            assert_eq!(cfg.default_max_coverage_area, DEFAULT_MAX_COVERAGE_AREA);
            Ok(())
        });
    }

    #[test]
    fn test_unrelated_env_vars_are_ignored() {
        Jail::expect_with(|jail| {
            jail.set_env("PARKING_CAPACITY_LOG_DIR", "/var/log/parking");
            jail.set_env("PARKING_CAPACITY_ADMISSION_ESTIMATOR", "learned");

            let cfg = ParkingCapacityConfig::load(None).unwrap();
            assert_eq!(cfg.admission_estimator, EstimatorKind::Learned);
            assert_eq!(cfg.default_max_capacity, DEFAULT_MAX_CAPACITY);
            Ok(())
        });
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("parking.yaml", "max_gateways: 3\n")?;
            assert!(ParkingCapacityConfig::load(Some(Path::new("parking.yaml"))).is_err());
            Ok(())
        });
    }
}
