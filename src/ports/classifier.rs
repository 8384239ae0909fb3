//! Classifier port: Trait for the pre-trained binary model.
//!
//! This trait abstracts the model artifact format from the encoder and the
//! presenter, so the serialization library can change without touching them.

use std::path::Path;
use std::sync::Arc;

use crate::domain::{FeatureVector, Label};

/// Errors raised while loading or invoking a classifier.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Model file not found: {0}")]
    NotFound(String),

    #[error("Failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to deserialize model artifact: {0}")]
    Deserialization(#[from] serde_json::Error),

    #[error("Incompatible model artifact: {0}")]
    Incompatible(String),

    #[error("Invalid probability output: {0}")]
    InvalidProbability(String),
}

/// Capability interface of a pre-trained binary classifier.
///
/// Implementations are immutable once constructed and shared read-only
/// across threads.
pub trait Classifier: Send + Sync {
    /// Class probabilities `[P(negative), P(positive)]`.
    ///
    /// # Errors
    /// Returns `ModelError` if the model cannot score the vector.
    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2], ModelError>;

    /// Discrete class label.
    ///
    /// Defaults to thresholding `predict_proba` so that label and
    /// probability cannot disagree.
    ///
    /// # Errors
    /// Returns `ModelError` if the model cannot score the vector.
    fn predict(&self, features: &FeatureVector) -> Result<Label, ModelError> {
        let [_, positive] = self.predict_proba(features)?;
        Ok(Label::from_probability(positive))
    }

    /// Whether `predict` is computed independently of `predict_proba`.
    ///
    /// Only then is the label worth cross-checking against the probability.
    fn reports_own_label(&self) -> bool {
        false
    }

    /// Short identifier of the model family (e.g. "logistic_regression").
    fn model_type(&self) -> &str;
}

/// A deserialized classifier together with the digest of its artifact.
#[derive(Clone)]
pub struct LoadedModel {
    pub classifier: Arc<dyn Classifier>,
    /// Hex-encoded SHA-256 of the artifact bytes
    pub fingerprint: String,
}

impl std::fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModel")
            .field("model_type", &self.classifier.model_type())
            .field("fingerprint", &self.fingerprint)
            .finish()
    }
}

/// Trait for turning an artifact on disk into a classifier.
pub trait ModelLoader: Send + Sync {
    /// Read and deserialize the artifact at `path`.
    ///
    /// # Errors
    /// Returns `ModelError` if the file is missing, unreadable, or not a
    /// compatible model.
    fn load(&self, path: &Path) -> Result<LoadedModel, ModelError>;
}
