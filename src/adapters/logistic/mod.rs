//! Logistic regression adapter: Implementation of `Classifier` for the
//! JSON model export.
//!
//! The training pipeline exports a standardized logistic regression as a
//! JSON document:
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "model_type": "logistic_regression",
//!   "feature_names": ["age", "sex", ...],
//!   "scaler": { "mean": [...], "scale": [...] },
//!   "coefficients": [...],
//!   "intercept": -0.168
//! }
//! ```
//!
//! `feature_names` must match the encoder's order exactly. A model trained
//! on a different ordering would silently produce wrong probabilities, so it
//! is rejected at load time instead.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
use crate::ports::{Classifier, LoadedModel, ModelError, ModelLoader};

/// Supported export format version.
pub const FORMAT_VERSION: u32 = 1;

/// `model_type` tag of this adapter.
pub const MODEL_TYPE: &str = "logistic_regression";

/// Per-feature standardization fitted during training.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Model parameters as exported by the training pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedLogisticModel {
    pub format_version: u32,
    pub model_type: String,
    pub feature_names: Vec<String>,
    #[serde(default)]
    pub scaler: Option<StandardScaler>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

/// Validated, immutable logistic regression.
#[derive(Debug, Clone)]
pub struct LogisticModel {
    coefficients: FeatureVector,
    intercept: f64,
    mean: FeatureVector,
    inv_scale: FeatureVector,
}

fn sha256_hex_bytes(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

fn to_feature_array(name: &str, values: &[f64]) -> Result<FeatureVector, ModelError> {
    let arr: FeatureVector = values.try_into().map_err(|_| {
        ModelError::Incompatible(format!(
            "{name} has {} values, expected {FEATURE_COUNT}",
            values.len()
        ))
    })?;
    if let Some(i) = arr.iter().position(|v| !v.is_finite()) {
        return Err(ModelError::Incompatible(format!(
            "{name}[{i}] is not a finite number"
        )));
    }
    Ok(arr)
}

/// Numerically stable logistic function.
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl LogisticModel {
    /// Validate exported parameters against the feature contract.
    ///
    /// # Errors
    /// Returns `ModelError::Incompatible` on version, type, ordering, or
    /// parameter shape mismatches.
    pub fn from_exported(model: &ExportedLogisticModel) -> Result<Self, ModelError> {
        if model.format_version != FORMAT_VERSION {
            return Err(ModelError::Incompatible(format!(
                "Unsupported format version: {}",
                model.format_version
            )));
        }
        if model.model_type != MODEL_TYPE {
            return Err(ModelError::Incompatible(format!(
                "Unsupported model type: {}",
                model.model_type
            )));
        }
        if model.feature_names.len() != FEATURE_COUNT
            || model
                .feature_names
                .iter()
                .zip(FEATURE_NAMES.iter())
                .any(|(got, want)| got != want)
        {
            return Err(ModelError::Incompatible(format!(
                "feature_names {:?} do not match expected order {:?}",
                model.feature_names, FEATURE_NAMES
            )));
        }

        let coefficients = to_feature_array("coefficients", &model.coefficients)?;
        if !model.intercept.is_finite() {
            return Err(ModelError::Incompatible("intercept is not finite".into()));
        }

        let (mean, inv_scale) = match &model.scaler {
            Some(scaler) => {
                let mean = to_feature_array("scaler.mean", &scaler.mean)?;
                let scale = to_feature_array("scaler.scale", &scaler.scale)?;
                if let Some(i) = scale.iter().position(|s| *s == 0.0) {
                    return Err(ModelError::Incompatible(format!(
                        "scaler.scale[{i}] is zero"
                    )));
                }
                (mean, scale.map(|s| 1.0 / s))
            }
            None => ([0.0; FEATURE_COUNT], [1.0; FEATURE_COUNT]),
        };

        Ok(Self {
            coefficients,
            intercept: model.intercept,
            mean,
            inv_scale,
        })
    }

    /// Parse and validate a JSON export.
    ///
    /// # Errors
    /// Returns error if the bytes are not a compatible export.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ModelError> {
        let exported: ExportedLogisticModel = serde_json::from_slice(bytes)?;
        Self::from_exported(&exported)
    }

    /// Linear score before the logistic link.
    #[must_use]
    pub fn decision_function(&self, features: &FeatureVector) -> f64 {
        features
            .iter()
            .zip(self.mean.iter())
            .zip(self.inv_scale.iter())
            .zip(self.coefficients.iter())
            .map(|(((x, mu), inv), w)| (x - mu) * inv * w)
            .sum::<f64>()
            + self.intercept
    }
}

impl Classifier for LogisticModel {
    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2], ModelError> {
        let z = self.decision_function(features);
        if !z.is_finite() {
            return Err(ModelError::InvalidProbability(format!(
                "decision function is not finite ({z})"
            )));
        }
        let positive = sigmoid(z);
        Ok([1.0 - positive, positive])
    }

    fn model_type(&self) -> &str {
        MODEL_TYPE
    }
}

/// Loads `LogisticModel` artifacts from JSON files.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonModelLoader;

impl ModelLoader for JsonModelLoader {
    fn load(&self, path: &Path) -> Result<LoadedModel, ModelError> {
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ModelError::NotFound(path.display().to_string()),
            _ => ModelError::Io(e),
        })?;
        let fingerprint = sha256_hex_bytes(&bytes);
        let model = LogisticModel::from_json(&bytes)?;

        tracing::info!(
            "Loaded {} model from {:?} (sha256={})",
            MODEL_TYPE,
            path,
            &fingerprint[..16]
        );

        Ok(LoadedModel {
            classifier: Arc::new(model),
            fingerprint,
        })
    }
}
