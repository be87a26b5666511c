//! Regression model behind the learned estimator.
//!
//! Features are `(available_area, capacity)`, z-score normalized; the label
//! is the observed gateway count. Fitting solves the ridge-stabilised normal
//! equations, which minimise squared error and stay solvable when the two
//! features are collinear.

use nalgebra::{DMatrix, DVector};
use parking_capacity_sdk::TrainingSample;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Version of the persisted artifact layout.
pub const FORMAT_VERSION: u32 = 1;

/// Feature columns, in the order the weights are stored.
pub const FEATURES: [&str; 2] = ["available_area", "capacity"];

/// Label column.
pub const LABEL: &str = "observed_gateways";

/// Ridge penalty per sample. Small enough not to bias well-conditioned fits.
const RIDGE_PENALTY: f64 = 1e-6;

/// Standard deviations below this are treated as a constant feature.
const MIN_STD_DEV: f64 = 1e-12;

/// Input/output schema stored next to the fitted parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSchema {
    pub format_version: u32,
    pub features: Vec<String>,
    pub label: String,
}

impl ModelSchema {
    #[must_use]
    pub fn current() -> Self {
        Self {
            format_version: FORMAT_VERSION,
            features: FEATURES.iter().map(|f| (*f).to_owned()).collect(),
            label: LABEL.to_owned(),
        }
    }

    /// Describes the first difference from the schema this build understands.
    #[must_use]
    pub fn mismatch(&self) -> Option<String> {
        let expected = Self::current();
        if self.format_version != expected.format_version {
            return Some(format!(
                "format version {} is not supported (expected {})",
                self.format_version, expected.format_version
            ));
        }
        if self.features != expected.features {
            return Some(format!(
                "features {:?} do not match {:?}",
                self.features, expected.features
            ));
        }
        if self.label != expected.label {
            return Some(format!(
                "label '{}' does not match '{}'",
                self.label, expected.label
            ));
        }
        None
    }
}

/// Mean/variance normalization of one feature column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureScaling {
    pub mean: f64,
    pub std_dev: f64,
}

impl FeatureScaling {
    fn fit(column: &[f64], count: f64) -> Self {
        let mean = column.iter().sum::<f64>() / count;
        let variance = column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;
        let std_dev = variance.sqrt();
        Self {
            mean,
            std_dev: if std_dev < MIN_STD_DEV { 1.0 } else { std_dev },
        }
    }

    fn apply(self, value: f64) -> f64 {
        (value - self.mean) / self.std_dev
    }
}

/// Fitted linear model over normalized features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayModel {
    pub scaling: [FeatureScaling; 2],
    pub weights: [f64; 2],
    pub bias: f64,
    pub trained_samples: usize,
}

impl GatewayModel {
    /// Fits the model on `samples`.
    ///
    /// # Errors
    ///
    /// * `InsufficientData` - If `samples` is empty
    /// * `Configuration` - If the samples cannot produce a finite fit
    pub fn fit(samples: &[TrainingSample]) -> Result<Self, DomainError> {
        if samples.is_empty() {
            return Err(DomainError::InsufficientData);
        }

        let count = u32::try_from(samples.len())
            .map(f64::from)
            .map_err(|_| DomainError::Configuration("too many training samples".to_owned()))?;

        let areas = samples
            .iter()
            .map(|s| decimal_to_f64(s.available_area))
            .collect::<Result<Vec<_>, _>>()?;
        let capacities: Vec<f64> = samples.iter().map(|s| f64::from(s.capacity)).collect();
        let labels: Vec<f64> = samples
            .iter()
            .map(|s| f64::from(s.observed_gateways))
            .collect();

        let scaling = [
            FeatureScaling::fit(&areas, count),
            FeatureScaling::fit(&capacities, count),
        ];
        let bias = labels.iter().sum::<f64>() / count;

        let x = DMatrix::from_fn(samples.len(), 2, |i, j| {
            let raw = if j == 0 { areas[i] } else { capacities[i] };
            scaling[j].apply(raw)
        });
        let y = DVector::from_fn(samples.len(), |i, _| labels[i] - bias);

        let gram = x.transpose() * &x + DMatrix::<f64>::identity(2, 2) * (RIDGE_PENALTY * count);
        let rhs = x.transpose() * &y;
        let solution = gram
            .cholesky()
            .ok_or_else(|| {
                DomainError::Configuration("normal equations are not positive definite".to_owned())
            })?
            .solve(&rhs);

        let model = Self {
            scaling,
            weights: [solution[0], solution[1]],
            bias,
            trained_samples: samples.len(),
        };
        if !model.is_finite() {
            return Err(DomainError::Configuration(
                "training produced non-finite parameters".to_owned(),
            ));
        }
        Ok(model)
    }

    /// Raw regression score, before rounding and clipping.
    #[must_use]
    pub fn score(&self, available_area: f64, capacity: f64) -> f64 {
        self.bias
            + self.weights[0] * self.scaling[0].apply(available_area)
            + self.weights[1] * self.scaling[1].apply(capacity)
    }

    /// Whether every parameter is finite and every scale is positive.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.bias.is_finite()
            && self.weights.iter().all(|w| w.is_finite())
            && self
                .scaling
                .iter()
                .all(|s| s.mean.is_finite() && s.std_dev.is_finite() && s.std_dev > 0.0)
    }
}

/// Persisted form of a fitted model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub schema: ModelSchema,
    pub model: GatewayModel,
}

impl ModelArtifact {
    #[must_use]
    pub fn new(model: GatewayModel) -> Self {
        Self {
            schema: ModelSchema::current(),
            model,
        }
    }
}

pub(crate) fn decimal_to_f64(value: Decimal) -> Result<f64, DomainError> {
    value
        .to_f64()
        .ok_or_else(|| DomainError::validation("available_area", "not representable as f64"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample(area: i64, capacity: u32, gateways: u32) -> TrainingSample {
        TrainingSample::new(Decimal::from(area), capacity, gateways)
    }

    #[test]
    fn test_fit_requires_samples() {
        assert!(matches!(
            GatewayModel::fit(&[]),
            Err(DomainError::InsufficientData)
        ));
    }

    #[test]
    fn test_single_sample_predicts_its_label() {
        let model = GatewayModel::fit(&[sample(12_000, 120, 3)]).unwrap();
        assert_relative_eq!(model.score(12_000.0, 120.0), 3.0, epsilon = 1e-9);
        assert_relative_eq!(model.score(90_000.0, 10.0), 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_recovers_an_exact_linear_relation() {
        // gateways = area / 10000 + capacity / 100, features not collinear
        let samples = [
            sample(10_000, 100, 2),
            sample(20_000, 100, 3),
            sample(10_000, 300, 4),
            sample(30_000, 200, 5),
            sample(40_000, 400, 8),
        ];
        let model = GatewayModel::fit(&samples).unwrap();
        for s in &samples {
            let area = decimal_to_f64(s.available_area).unwrap();
            assert_relative_eq!(
                model.score(area, f64::from(s.capacity)),
                f64::from(s.observed_gateways),
                epsilon = 1e-3
            );
        }
    }

    #[test]
    fn test_collinear_features_still_fit() {
        let samples = [
            sample(5_000, 50, 1),
            sample(10_000, 100, 1),
            sample(15_000, 150, 2),
            sample(20_000, 200, 2),
            sample(30_000, 300, 3),
            sample(40_000, 400, 4),
            sample(50_000, 500, 5),
        ];
        let model = GatewayModel::fit(&samples).unwrap();
        assert!(model.is_finite());
        assert_relative_eq!(model.weights[0], model.weights[1], epsilon = 1e-9);
        for s in &samples {
            let area = decimal_to_f64(s.available_area).unwrap();
            let score = model.score(area, f64::from(s.capacity));
            assert!((score - f64::from(s.observed_gateways)).abs() < 0.5);
        }
    }

    #[test]
    fn test_constant_feature_is_not_divided_by_zero() {
        let samples = [sample(10_000, 100, 1), sample(10_000, 100, 3)];
        let model = GatewayModel::fit(&samples).unwrap();
        assert!(model.is_finite());
        assert_relative_eq!(model.score(10_000.0, 100.0), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_schema_mismatch_is_described() {
        assert_eq!(ModelSchema::current().mismatch(), None);

        let mut schema = ModelSchema::current();
        schema.label = "gateways".to_owned();
        assert!(schema.mismatch().unwrap().contains("label"));

        let mut schema = ModelSchema::current();
        schema.features.reverse();
        assert!(schema.mismatch().unwrap().contains("features"));

        let mut schema = ModelSchema::current();
        schema.format_version = 99;
        assert!(schema.mismatch().unwrap().contains("format version"));
    }
}
