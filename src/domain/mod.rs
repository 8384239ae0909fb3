//! Domain layer: Core business types and logic.
//!
//! Pure types with no I/O: the clinical observation, its feature encoding,
//! and the presentation of prediction results.

mod assessment;
mod observation;

pub use assessment::{
    confidence_percent, format_percent, Assessment, Label, PredictionResult, RiskCategory,
    DECISION_THRESHOLD,
};
pub use observation::{
    ChestPain, ClinicalObservation, FeatureVector, RestingEcg, Sex, Thal, AGE_RANGE,
    CHOLESTEROL_RANGE, FEATURE_COUNT, FEATURE_NAMES, MAX_HEART_RATE_RANGE, RESTING_BP_RANGE,
    ST_DEPRESSION_RANGE, ST_DEPRESSION_STEP, TRAINED_ST_SLOPE, VESSELS_RANGE,
};
