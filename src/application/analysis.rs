//! Analysis service: the "Analyze" action.
//!
//! Pipeline: model check → encode → predict → present. The model check runs
//! first so that an unavailable model aborts before any vector is built and
//! no partial result is ever produced.

use std::sync::Arc;

use crate::domain::{Assessment, ClinicalObservation, PredictionResult};
use crate::HeartCareError;

use super::gateway::ModelGateway;

/// Service running one analysis per submission.
pub struct AnalysisService {
    gateway: Arc<ModelGateway>,
}

impl AnalysisService {
    /// Create a new analysis service.
    pub fn new(gateway: Arc<ModelGateway>) -> Self {
        Self { gateway }
    }

    #[must_use]
    pub fn gateway(&self) -> &ModelGateway {
        &self.gateway
    }

    /// Run the full pipeline for one observation.
    ///
    /// The label is derived from the probability (`p > 0.5`), so the
    /// category, percentage and recommendation always agree. The model is
    /// scored once; a classifier that reports its own label is cross-checked
    /// and overruled on disagreement.
    ///
    /// # Errors
    /// Returns `ModelUnavailable` if the model could not be loaded, or
    /// `Inference` if the classifier fails.
    pub fn analyze(&self, observation: &ClinicalObservation) -> Result<Assessment, HeartCareError> {
        let classifier = match self.gateway.classifier() {
            Ok(classifier) => classifier,
            Err(e) => {
                tracing::warn!("Analysis aborted: {}", e);
                return Err(e);
            }
        };

        let features = observation.to_feature_vector();
        let probability = self.gateway.predict_proba(&features)?;
        let result = PredictionResult::from_probability(probability);

        if classifier.reports_own_label() {
            let reported = classifier.predict(&features)?;
            if reported != result.label {
                tracing::warn!(
                    "Classifier label {:?} disagrees with probability-derived label {:?}; using the latter",
                    reported,
                    result.label
                );
            }
        }

        let assessment = Assessment::present(result);
        tracing::info!(
            "Analysis complete: category={}, label={}",
            assessment.category,
            assessment.result.label.class()
        );
        match serde_json::to_string(&assessment) {
            Ok(json) => tracing::debug!("Assessment: {}", json),
            Err(e) => tracing::warn!("Cannot serialize assessment: {}", e),
        }

        Ok(assessment)
    }
}
