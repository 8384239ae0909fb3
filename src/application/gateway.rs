//! Model gateway: load-once access to the pre-trained classifier.
//!
//! The artifact is read and deserialized at most once per gateway. A failed
//! load is cached as `ModelHandle::Unavailable`; every later call that needs
//! the model short-circuits with `HeartCareError::ModelUnavailable` instead
//! of retrying, since a missing file will not fix itself.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use crate::adapters::JsonModelLoader;
use crate::config::AppConfig;
use crate::domain::{FeatureVector, Label};
use crate::ports::{Classifier, LoadedModel, ModelError, ModelLoader};
use crate::HeartCareError;

/// Tolerance on `P(negative) + P(positive) == 1`.
const PROBABILITY_SUM_TOLERANCE: f64 = 1e-6;

static GLOBAL_GATEWAY: OnceLock<Arc<ModelGateway>> = OnceLock::new();

/// Outcome of the one-time load.
#[derive(Debug, Clone)]
pub enum ModelHandle {
    Loaded(LoadedModel),
    Unavailable { reason: String },
}

impl ModelHandle {
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

/// Status-panel summary of the loaded model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    pub path: PathBuf,
    pub model_type: String,
    /// Hex-encoded SHA-256 of the artifact
    pub fingerprint: String,
}

impl ModelInfo {
    /// First 12 hex characters of the fingerprint.
    #[must_use]
    pub fn short_fingerprint(&self) -> &str {
        let end = self.fingerprint.len().min(12);
        &self.fingerprint[..end]
    }
}

/// Lazily initialized, read-only handle to the classifier.
pub struct ModelGateway {
    path: PathBuf,
    loader: Box<dyn ModelLoader>,
    handle: OnceLock<ModelHandle>,
}

impl std::fmt::Debug for ModelGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelGateway")
            .field("path", &self.path)
            .field("handle", &self.handle.get())
            .finish()
    }
}

impl ModelGateway {
    /// Gateway over the JSON model artifact at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_loader(path, JsonModelLoader)
    }

    /// Gateway with a custom artifact loader.
    #[must_use]
    pub fn with_loader(path: impl Into<PathBuf>, loader: impl ModelLoader + 'static) -> Self {
        Self {
            path: path.into(),
            loader: Box::new(loader),
            handle: OnceLock::new(),
        }
    }

    /// Process-wide gateway for the configured model path.
    ///
    /// The path is read from the environment on first call only.
    pub fn global() -> Arc<ModelGateway> {
        GLOBAL_GATEWAY
            .get_or_init(|| {
                let path = AppConfig::from_env().resolved_model_path();
                Arc::new(ModelGateway::new(path))
            })
            .clone()
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the model, or return the cached outcome of the first load.
    ///
    /// Never fails: load errors are recorded as `ModelHandle::Unavailable`.
    pub fn load(&self) -> &ModelHandle {
        self.handle.get_or_init(|| {
            tracing::info!("Loading model artifact from {:?}", self.path);
            match self.loader.load(&self.path) {
                Ok(model) => ModelHandle::Loaded(model),
                Err(e) => {
                    tracing::error!("Model unavailable: {}", e);
                    ModelHandle::Unavailable {
                        reason: e.to_string(),
                    }
                }
            }
        })
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.load().is_loaded()
    }

    /// Summary of the loaded model, `None` if unavailable.
    #[must_use]
    pub fn info(&self) -> Option<ModelInfo> {
        match self.load() {
            ModelHandle::Loaded(model) => Some(ModelInfo {
                path: self.path.clone(),
                model_type: model.classifier.model_type().to_string(),
                fingerprint: model.fingerprint.clone(),
            }),
            ModelHandle::Unavailable { .. } => None,
        }
    }

    /// The loaded classifier.
    ///
    /// # Errors
    /// Returns `HeartCareError::ModelUnavailable` if loading failed.
    pub fn classifier(&self) -> Result<&Arc<dyn Classifier>, HeartCareError> {
        match self.load() {
            ModelHandle::Loaded(model) => Ok(&model.classifier),
            ModelHandle::Unavailable { reason } => {
                Err(HeartCareError::ModelUnavailable(reason.clone()))
            }
        }
    }

    /// Discrete class label (0 = negative, 1 = positive).
    ///
    /// # Errors
    /// Returns `ModelUnavailable` without a model, `Inference` on model failure.
    pub fn predict(&self, features: &FeatureVector) -> Result<Label, HeartCareError> {
        Ok(self.classifier()?.predict(features)?)
    }

    /// Probability of the positive class (index 1 of the pair).
    ///
    /// # Errors
    /// Returns `ModelUnavailable` without a model, `Inference` on model failure
    /// or when the probability pair violates the two-class contract.
    pub fn predict_proba(&self, features: &FeatureVector) -> Result<f64, HeartCareError> {
        let pair = self.classifier()?.predict_proba(features)?;
        Ok(check_probability_pair(pair)?)
    }
}

fn check_probability_pair([negative, positive]: [f64; 2]) -> Result<f64, ModelError> {
    let in_unit = |p: f64| p.is_finite() && (0.0..=1.0).contains(&p);
    if !in_unit(negative) || !in_unit(positive) {
        return Err(ModelError::InvalidProbability(format!(
            "[{negative}, {positive}] outside [0, 1]"
        )));
    }
    if (negative + positive - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
        return Err(ModelError::InvalidProbability(format!(
            "[{negative}, {positive}] does not sum to 1"
        )));
    }
    Ok(positive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ChestPain, ClinicalObservation, RestingEcg, Sex, Thal, AGE_RANGE, CHOLESTEROL_RANGE,
        MAX_HEART_RATE_RANGE, RESTING_BP_RANGE, ST_DEPRESSION_RANGE, VESSELS_RANGE,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedClassifier {
        pair: [f64; 2],
    }

    impl Classifier for FixedClassifier {
        fn predict_proba(&self, _features: &FeatureVector) -> Result<[f64; 2], ModelError> {
            Ok(self.pair)
        }

        fn model_type(&self) -> &str {
            "fixed"
        }
    }

    /// Loader that counts artifact reads.
    struct CountingLoader {
        reads: Arc<AtomicUsize>,
        pair: Option<[f64; 2]>,
    }

    impl ModelLoader for CountingLoader {
        fn load(&self, path: &Path) -> Result<LoadedModel, ModelError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            match self.pair {
                Some(pair) => Ok(LoadedModel {
                    classifier: Arc::new(FixedClassifier { pair }),
                    fingerprint: "ab".repeat(32),
                }),
                None => Err(ModelError::NotFound(path.display().to_string())),
            }
        }
    }

    fn counting_gateway(pair: Option<[f64; 2]>) -> (ModelGateway, Arc<AtomicUsize>) {
        let reads = Arc::new(AtomicUsize::new(0));
        let gateway = ModelGateway::with_loader(
            "models/heart_model.json",
            CountingLoader {
                reads: reads.clone(),
                pair,
            },
        );
        (gateway, reads)
    }

    #[test]
    fn test_load_reads_artifact_once() {
        let (gateway, reads) = counting_gateway(Some([0.27, 0.73]));
        let features = ClinicalObservation::default().to_feature_vector();

        assert_eq!(reads.load(Ordering::SeqCst), 0, "load must be lazy");

        let first = gateway.predict_proba(&features).expect("proba");
        let second = gateway.predict_proba(&features).expect("proba");
        assert!(gateway.load().is_loaded());
        assert!(gateway.load().is_loaded());

        assert!((first - second).abs() < f64::EPSILON);
        assert_eq!(reads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_concurrent_loads_share_one_read() {
        let (gateway, reads) = counting_gateway(Some([0.6, 0.4]));
        let gateway = Arc::new(gateway);

        let threads: Vec<_> = (0..8)
            .map(|_| {
                let g = gateway.clone();
                std::thread::spawn(move || g.is_available())
            })
            .collect();
        for t in threads {
            assert!(t.join().expect("thread"));
        }

        assert_eq!(reads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_load_is_cached_and_short_circuits() {
        let (gateway, reads) = counting_gateway(None);
        let features = ClinicalObservation::default().to_feature_vector();

        assert!(!gateway.is_available());
        assert!(gateway.info().is_none());
        assert!(matches!(
            gateway.predict(&features),
            Err(HeartCareError::ModelUnavailable(_))
        ));
        assert!(matches!(
            gateway.predict_proba(&features),
            Err(HeartCareError::ModelUnavailable(_))
        ));
        assert_eq!(reads.load(Ordering::SeqCst), 1, "no retries");
    }

    #[test]
    fn test_missing_artifact_on_disk_is_unavailable() {
        let temp = tempfile::tempdir().expect("tempdir");
        let gateway = ModelGateway::new(temp.path().join("models/heart_model.json"));

        match gateway.load() {
            ModelHandle::Unavailable { reason } => assert!(reason.contains("not found")),
            ModelHandle::Loaded(_) => panic!("must be unavailable"),
        }
    }

    #[test]
    fn test_predict_returns_positive_class_probability() {
        let (gateway, _) = counting_gateway(Some([0.27, 0.73]));
        let features = ClinicalObservation::default().to_feature_vector();

        let p = gateway.predict_proba(&features).expect("proba");
        assert!((p - 0.73).abs() < f64::EPSILON);
        assert_eq!(gateway.predict(&features).expect("predict"), Label::Positive);
    }

    #[test]
    fn test_rejects_broken_probability_pairs() {
        let features = ClinicalObservation::default().to_feature_vector();

        for pair in [[0.2, 0.9], [-0.1, 1.1], [f64::NAN, 0.5]] {
            let (gateway, _) = counting_gateway(Some(pair));
            assert!(
                matches!(
                    gateway.predict_proba(&features),
                    Err(HeartCareError::Inference(ModelError::InvalidProbability(_)))
                ),
                "{pair:?} must be rejected"
            );
        }
    }

    #[test]
    fn test_info_exposes_fingerprint() {
        let (gateway, _) = counting_gateway(Some([0.5, 0.5]));
        let info = gateway.info().expect("loaded");
        assert_eq!(info.model_type, "fixed");
        assert_eq!(info.short_fingerprint(), "abababababab");
    }

    #[test]
    fn test_shipped_model_through_gateway() {
        let gateway = ModelGateway::new("models/heart_model.json");
        let features = ClinicalObservation::default().to_feature_vector();

        let p = gateway.predict_proba(&features).expect("proba");
        assert!((0.0..=1.0).contains(&p));
        assert_eq!(
            gateway.predict(&features).expect("predict"),
            Label::from_probability(p)
        );
    }

    fn expand<F>(observations: Vec<ClinicalObservation>, variants: F) -> Vec<ClinicalObservation>
    where
        F: Fn(ClinicalObservation) -> Vec<ClinicalObservation>,
    {
        observations.into_iter().flat_map(variants).collect()
    }

    /// Every range endpoint crossed with every categorical option.
    fn domain_corners() -> Vec<ClinicalObservation> {
        let mut all = vec![ClinicalObservation::default()];
        all = expand(all, |o| {
            [*AGE_RANGE.start(), *AGE_RANGE.end()]
                .map(|age| ClinicalObservation { age, ..o })
                .to_vec()
        });
        all = expand(all, |o| Sex::ALL.map(|sex| ClinicalObservation { sex, ..o }).to_vec());
        all = expand(all, |o| {
            ChestPain::ALL
                .map(|chest_pain| ClinicalObservation { chest_pain, ..o })
                .to_vec()
        });
        all = expand(all, |o| {
            [*RESTING_BP_RANGE.start(), *RESTING_BP_RANGE.end()]
                .map(|resting_bp| ClinicalObservation { resting_bp, ..o })
                .to_vec()
        });
        all = expand(all, |o| {
            [*CHOLESTEROL_RANGE.start(), *CHOLESTEROL_RANGE.end()]
                .map(|cholesterol| ClinicalObservation { cholesterol, ..o })
                .to_vec()
        });
        all = expand(all, |o| {
            [false, true]
                .map(|fasting_sugar_elevated| ClinicalObservation {
                    fasting_sugar_elevated,
                    ..o
                })
                .to_vec()
        });
        all = expand(all, |o| {
            RestingEcg::ALL
                .map(|resting_ecg| ClinicalObservation { resting_ecg, ..o })
                .to_vec()
        });
        all = expand(all, |o| {
            [*MAX_HEART_RATE_RANGE.start(), *MAX_HEART_RATE_RANGE.end()]
                .map(|max_heart_rate| ClinicalObservation { max_heart_rate, ..o })
                .to_vec()
        });
        all = expand(all, |o| {
            [false, true]
                .map(|exercise_angina| ClinicalObservation {
                    exercise_angina,
                    ..o
                })
                .to_vec()
        });
        all = expand(all, |o| {
            [*ST_DEPRESSION_RANGE.start(), *ST_DEPRESSION_RANGE.end()]
                .map(|st_depression| ClinicalObservation { st_depression, ..o })
                .to_vec()
        });
        all = expand(all, |o| {
            [*VESSELS_RANGE.start(), *VESSELS_RANGE.end()]
                .map(|vessels| ClinicalObservation { vessels, ..o })
                .to_vec()
        });
        expand(all, |o| Thal::ALL.map(|thal| ClinicalObservation { thal, ..o }).to_vec())
    }

    #[test]
    fn test_shipped_model_stays_in_unit_interval_at_domain_corners() {
        let gateway = ModelGateway::new("models/heart_model.json");
        let corners = domain_corners();
        assert_eq!(corners.len(), 2 * 2 * 4 * 2 * 2 * 2 * 3 * 2 * 2 * 2 * 2 * 3);

        for obs in &corners {
            let features = obs.to_feature_vector();
            let p = gateway.predict_proba(&features).expect("proba");
            assert!((0.0..=1.0).contains(&p), "{obs:?} gave {p}");
            assert_eq!(
                gateway.predict(&features).expect("predict"),
                Label::from_probability(p),
                "{obs:?}"
            );
        }
    }

    #[test]
    fn test_global_gateway_is_shared() {
        let first = ModelGateway::global();
        let second = ModelGateway::global();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(std::ptr::eq(first.load(), second.load()));
    }
}
