//! # HeartCare
//!
//! Cardiovascular risk predictor: collects thirteen clinical values, feeds
//! them to a pre-trained binary classifier and presents the predicted
//! disease probability.
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Clinical observation, feature encoding, result presentation
//! - `ports`: The `Classifier` capability and its loader
//! - `adapters`: JSON logistic regression, log sanitization
//! - `application`: Load-once model gateway and the analyze use case
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{Assessment, ClinicalObservation, Label, PredictionResult, RiskCategory};

/// Result type for HeartCare operations
pub type Result<T> = std::result::Result<T, HeartCareError>;

/// Main error type for HeartCare
#[derive(Debug, thiserror::Error)]
pub enum HeartCareError {
    /// The model artifact could not be located or deserialized.
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Inference failed: {0}")]
    Inference(#[from] ports::ModelError),
}

impl HeartCareError {
    /// Message shown in the result panel.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::ModelUnavailable(_) => {
                "Model file not found. Please check your models folder.".to_string()
            }
            other => other.to_string(),
        }
    }
}
