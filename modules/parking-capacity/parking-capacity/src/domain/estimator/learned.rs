//! Trainable regression estimator with a persist/reload lifecycle.
//!
//! Lifecycle: `bootstrap -> [train -> save -> load]* -> predict*`.
//! The active model sits behind an `ArcSwapOption`: `predict` takes a
//! snapshot of the pointer and never waits on a writer, and `load` swaps the
//! pointer only after the new model is fully decoded and checked.

use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use parking_capacity_sdk::{CoverageParams, EstimatorKind, TrainingSample};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use tracing::{debug, info, instrument};

use super::CapacityEstimator;
use super::model::{GatewayModel, ModelArtifact, decimal_to_f64};
use crate::domain::error::DomainError;
use crate::domain::ports::ModelStore;

/// Monotonically increasing `(area, capacity, gateways)` observations used
/// when no model has been persisted yet.
#[must_use]
pub fn default_training_set() -> Vec<TrainingSample> {
    [
        (5_000, 50, 1),
        (10_000, 100, 1),
        (15_000, 150, 2),
        (20_000, 200, 2),
        (30_000, 300, 3),
        (40_000, 400, 4),
        (50_000, 500, 5),
    ]
    .into_iter()
    .map(|(area, capacity, gateways)| {
        TrainingSample::new(Decimal::from(area), capacity, gateways)
    })
    .collect()
}

/// Regression-backed estimator.
pub struct LearnedEstimator {
    /// Model used by `predict`.
    active: ArcSwapOption<GatewayModel>,
    /// Last fitted model not yet saved. Holding this lock makes the caller
    /// the only writer; `predict` never takes it.
    staged: Mutex<Option<Arc<GatewayModel>>>,
    store: Arc<dyn ModelStore>,
}

impl LearnedEstimator {
    /// Creates an estimator with no active model.
    #[must_use]
    pub fn new(store: Arc<dyn ModelStore>) -> Self {
        Self {
            active: ArcSwapOption::from(None),
            staged: Mutex::new(None),
            store,
        }
    }

    /// Creates an estimator that is ready to predict.
    ///
    /// Loads the artifact at `path` if one exists; otherwise trains on
    /// [`default_training_set`], saves the result at `path` and loads it.
    ///
    /// # Errors
    ///
    /// Any load, train or save failure. Startup is expected to abort on it.
    #[instrument(skip(store, path), fields(path = %path.display()))]
    pub fn bootstrap(store: Arc<dyn ModelStore>, path: &Path) -> Result<Self, DomainError> {
        let estimator = Self::new(store);
        if estimator.store.exists(path) {
            estimator.load(path)?;
            info!("Loaded persisted gateway model");
        } else {
            estimator.train_save_load(&default_training_set(), path)?;
            info!("Trained and persisted default gateway model");
        }
        Ok(estimator)
    }

    /// Fits a model on `samples` and stages it for [`Self::save`].
    ///
    /// The active model is not touched.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientData` if `samples` is empty.
    #[instrument(skip(self, samples), fields(samples = samples.len()))]
    pub fn train(&self, samples: &[TrainingSample]) -> Result<(), DomainError> {
        let mut staged = self.staged.lock();
        Self::stage(&mut staged, samples)
    }

    /// Persists the staged model, or the active one if nothing is staged.
    /// A staged model is cleared once it is on disk.
    ///
    /// # Errors
    ///
    /// * `ModelNotReady` - If there is neither a staged nor an active model
    /// * `Persistence` - On I/O failure; the staged model is kept
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub fn save(&self, path: &Path) -> Result<(), DomainError> {
        let mut staged = self.staged.lock();
        self.persist(&mut staged, path)
    }

    /// Reads the artifact at `path` and makes it the active model.
    ///
    /// # Errors
    ///
    /// * `ModelNotFound` - If nothing exists at `path`
    /// * `ModelCorrupt` - If the schema or the parameters are unusable
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub fn load(&self, path: &Path) -> Result<(), DomainError> {
        let _writer = self.staged.lock();
        self.activate(path)
    }

    /// Train, save and load as one writer sequence.
    ///
    /// Concurrent `predict` calls keep using the previous model until the
    /// new one is activated.
    ///
    /// # Errors
    ///
    /// Any error of [`Self::train`], [`Self::save`] or [`Self::load`].
    pub fn train_save_load(
        &self,
        samples: &[TrainingSample],
        path: &Path,
    ) -> Result<(), DomainError> {
        let mut staged = self.staged.lock();
        Self::stage(&mut staged, samples)?;
        self.persist(&mut staged, path)?;
        self.activate(path)
    }

    fn stage(
        staged: &mut Option<Arc<GatewayModel>>,
        samples: &[TrainingSample],
    ) -> Result<(), DomainError> {
        let model = GatewayModel::fit(samples)?;
        debug!(weights = ?model.weights, bias = model.bias, "Fitted gateway model");
        *staged = Some(Arc::new(model));
        Ok(())
    }

    fn persist(
        &self,
        staged: &mut Option<Arc<GatewayModel>>,
        path: &Path,
    ) -> Result<(), DomainError> {
        let model = staged
            .clone()
            .or_else(|| self.active.load_full())
            .ok_or(DomainError::ModelNotReady)?;
        self.store.save(path, &ModelArtifact::new((*model).clone()))?;
        *staged = None;
        info!("Saved gateway model");
        Ok(())
    }

    fn activate(&self, path: &Path) -> Result<(), DomainError> {
        let artifact = self.store.load(path)?;
        if let Some(reason) = artifact.schema.mismatch() {
            return Err(DomainError::model_corrupt(path, reason));
        }
        if !artifact.model.is_finite() {
            return Err(DomainError::model_corrupt(
                path,
                "model parameters are not finite",
            ));
        }
        self.active.store(Some(Arc::new(artifact.model)));
        info!("Activated gateway model");
        Ok(())
    }

    /// Predicted gateway count, rounded to the nearest integer and clipped at zero.
    ///
    /// # Errors
    ///
    /// Returns `ModelNotReady` if no model has been loaded.
    pub fn predict(&self, available_area: Decimal, capacity: u32) -> Result<u32, DomainError> {
        let guard = self.active.load();
        let model = guard.as_deref().ok_or(DomainError::ModelNotReady)?;
        let score = model.score(decimal_to_f64(available_area)?, f64::from(capacity));
        Ok(clip_to_count(score))
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.active.load().is_some()
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to the u32 range first
fn clip_to_count(score: f64) -> u32 {
    if score.is_nan() {
        return 0;
    }
    score.round().clamp(0.0, f64::from(u32::MAX)) as u32
}

impl CapacityEstimator for LearnedEstimator {
    fn kind(&self) -> EstimatorKind {
        EstimatorKind::Learned
    }

    fn required_gateways(
        &self,
        available_area: Decimal,
        capacity: u32,
        _coverage: &CoverageParams,
    ) -> Result<u32, DomainError> {
        self.predict(available_area, capacity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    /// Keeps artifacts in memory.
    #[derive(Default)]
    struct MemoryStore {
        artifacts: Mutex<HashMap<PathBuf, ModelArtifact>>,
    }

    impl ModelStore for MemoryStore {
        fn exists(&self, path: &Path) -> bool {
            self.artifacts.lock().contains_key(path)
        }

        fn save(&self, path: &Path, artifact: &ModelArtifact) -> Result<(), DomainError> {
            self.artifacts
                .lock()
                .insert(path.to_path_buf(), artifact.clone());
            Ok(())
        }

        fn load(&self, path: &Path) -> Result<ModelArtifact, DomainError> {
            self.artifacts
                .lock()
                .get(path)
                .cloned()
                .ok_or_else(|| DomainError::ModelNotFound {
                    path: path.to_path_buf(),
                })
        }
    }

    struct FailingStore;

    impl ModelStore for FailingStore {
        fn exists(&self, _path: &Path) -> bool {
            false
        }

        fn save(&self, path: &Path, _artifact: &ModelArtifact) -> Result<(), DomainError> {
            Err(DomainError::persistence(
                path,
                std::io::Error::other("read-only"),
            ))
        }

        fn load(&self, path: &Path) -> Result<ModelArtifact, DomainError> {
            Err(DomainError::ModelNotFound {
                path: path.to_path_buf(),
            })
        }
    }

    fn estimator() -> (Arc<MemoryStore>, LearnedEstimator) {
        let store = Arc::new(MemoryStore::default());
        let estimator = LearnedEstimator::new(store.clone());
        (store, estimator)
    }

    #[test]
    fn test_predict_before_load_is_not_ready() {
        let (_, estimator) = estimator();
        assert!(!estimator.is_ready());
        assert!(matches!(
            estimator.predict(Decimal::from(10_000), 100),
            Err(DomainError::ModelNotReady)
        ));
    }

    #[test]
    fn test_train_does_not_activate() {
        let (_, estimator) = estimator();
        estimator.train(&default_training_set()).unwrap();
        assert!(!estimator.is_ready());
    }

    #[test]
    fn test_save_without_model_is_not_ready() {
        let (_, estimator) = estimator();
        assert!(matches!(
            estimator.save(Path::new("model.json")),
            Err(DomainError::ModelNotReady)
        ));
    }

    #[test]
    fn test_bootstrap_trains_default_model_when_absent() {
        let store = Arc::new(MemoryStore::default());
        let path = Path::new("models/gateway_model.json");
        let estimator = LearnedEstimator::bootstrap(store.clone(), path).unwrap();
        assert!(estimator.is_ready());
        assert!(store.exists(path));
        for sample in default_training_set() {
            let predicted = estimator
                .predict(sample.available_area, sample.capacity)
                .unwrap();
            assert_eq!(predicted, sample.observed_gateways);
        }
    }

    #[test]
    fn test_bootstrap_prefers_persisted_model() {
        let store = Arc::new(MemoryStore::default());
        let path = Path::new("model.json");
        let custom = [
            TrainingSample::new(Decimal::from(1_000), 10, 9),
            TrainingSample::new(Decimal::from(2_000), 20, 9),
        ];
        store
            .save(path, &ModelArtifact::new(GatewayModel::fit(&custom).unwrap()))
            .unwrap();

        let estimator = LearnedEstimator::bootstrap(store, path).unwrap();
        assert_eq!(estimator.predict(Decimal::from(50_000), 500).unwrap(), 9);
    }

    #[test]
    fn test_predict_never_negative() {
        let (_, estimator) = estimator();
        // gateways fall as area grows, so small inputs score below zero after extrapolation
        let samples = [
            TrainingSample::new(Decimal::from(10_000), 100, 10),
            TrainingSample::new(Decimal::from(20_000), 200, 5),
            TrainingSample::new(Decimal::from(30_000), 300, 0),
        ];
        estimator
            .train_save_load(&samples, Path::new("falling.json"))
            .unwrap();
        assert_eq!(estimator.predict(Decimal::from(90_000), 900).unwrap(), 0);
        assert_eq!(estimator.predict(Decimal::ZERO, 0).unwrap(), 15);
    }

    #[test]
    fn test_predict_is_deterministic_between_loads() {
        let (_, estimator) = estimator();
        estimator
            .train_save_load(&default_training_set(), Path::new("m.json"))
            .unwrap();
        let first = estimator.predict(Decimal::from(27_500), 275).unwrap();
        for _ in 0..100 {
            assert_eq!(estimator.predict(Decimal::from(27_500), 275).unwrap(), first);
        }
    }

    #[test]
    fn test_load_rejects_schema_mismatch() {
        let (store, estimator) = estimator();
        let path = Path::new("foreign.json");
        let mut artifact =
            ModelArtifact::new(GatewayModel::fit(&default_training_set()).unwrap());
        artifact.schema.label = "gateways".to_owned();
        store.save(path, &artifact).unwrap();

        assert!(matches!(
            estimator.load(path),
            Err(DomainError::ModelCorrupt { .. })
        ));
        assert!(!estimator.is_ready());
    }

    #[test]
    fn test_load_rejects_non_finite_parameters() {
        let (store, estimator) = estimator();
        let path = Path::new("nan.json");
        let mut artifact =
            ModelArtifact::new(GatewayModel::fit(&default_training_set()).unwrap());
        artifact.model.bias = f64::NAN;
        store.save(path, &artifact).unwrap();

        assert!(matches!(
            estimator.load(path),
            Err(DomainError::ModelCorrupt { .. })
        ));
    }

    #[test]
    fn test_failed_load_keeps_previous_model() {
        let (_, estimator) = estimator();
        estimator
            .train_save_load(&default_training_set(), Path::new("good.json"))
            .unwrap();
        let before = estimator.predict(Decimal::from(40_000), 400).unwrap();

        assert!(matches!(
            estimator.load(Path::new("missing.json")),
            Err(DomainError::ModelNotFound { .. })
        ));
        assert_eq!(estimator.predict(Decimal::from(40_000), 400).unwrap(), before);
    }

    #[test]
    fn test_save_after_reload_persists_the_active_model() {
        let (store, estimator) = estimator();
        let low = Path::new("low.json");
        let high = Path::new("high.json");
        let high_model = GatewayModel::fit(&[
            TrainingSample::new(Decimal::from(1_000), 10, 8),
            TrainingSample::new(Decimal::from(2_000), 20, 8),
        ])
        .unwrap();
        store.save(high, &ModelArtifact::new(high_model.clone())).unwrap();

        estimator
            .train_save_load(&default_training_set(), low)
            .unwrap();
        estimator.load(high).unwrap();
        estimator.save(Path::new("copy.json")).unwrap();

        assert_eq!(
            store.load(Path::new("copy.json")).unwrap().model,
            high_model
        );
    }

    #[test]
    fn test_failed_save_keeps_staged_model() {
        let estimator = LearnedEstimator::new(Arc::new(FailingStore));
        estimator.train(&default_training_set()).unwrap();

        assert!(matches!(
            estimator.save(Path::new("model.json")),
            Err(DomainError::Persistence { .. })
        ));
        assert!(estimator.staged.lock().is_some());
    }

    #[test]
    fn test_clip_to_count() {
        assert_eq!(clip_to_count(-3.7), 0);
        assert_eq!(clip_to_count(2.5), 3);
        assert_eq!(clip_to_count(2.49), 2);
        assert_eq!(clip_to_count(f64::NAN), 0);
        assert_eq!(clip_to_count(f64::INFINITY), u32::MAX);
    }
}
