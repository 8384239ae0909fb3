//! Prediction results and their presentation.
//!
//! A `PredictionResult` is the raw classifier outcome; an `Assessment` is
//! what the result panel renders. Both are recomputed on every submission
//! and never persisted.

use serde::Serialize;

/// Probability above which an observation is classified positive.
///
/// Strictly greater-than: a probability of exactly 0.5 is negative.
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Binary class label emitted by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Label {
    /// Class 0: no heart disease
    Negative,
    /// Class 1: heart disease present
    Positive,
}

impl Label {
    /// Derive the label from the positive-class probability.
    #[must_use]
    pub fn from_probability(probability: f64) -> Self {
        if probability > DECISION_THRESHOLD {
            Self::Positive
        } else {
            Self::Negative
        }
    }

    /// Numeric class (0 or 1).
    #[must_use]
    pub fn class(self) -> u8 {
        match self {
            Self::Negative => 0,
            Self::Positive => 1,
        }
    }
}

/// Result of a single inference call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    pub label: Label,
    /// P(positive), in [0, 1]
    pub probability: f64,
}

impl PredictionResult {
    /// Build a result whose label follows the decision threshold.
    #[must_use]
    pub fn from_probability(probability: f64) -> Self {
        Self {
            label: Label::from_probability(probability),
            probability,
        }
    }
}

/// Rendered outcome of the result panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskCategory {
    Stable,
    Critical,
}

impl RiskCategory {
    #[must_use]
    pub fn from_label(label: Label) -> Self {
        match label {
            Label::Positive => Self::Critical,
            Label::Negative => Self::Stable,
        }
    }

    /// Caption shown under the probability.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Critical => "Probability of Cardiovascular Disease",
            Self::Stable => "Low Risk Profile Detected",
        }
    }

    #[must_use]
    pub fn recommendation(&self) -> &'static str {
        match self {
            Self::Critical => "Patient should undergo an immediate Stress Echo.",
            Self::Stable => "Continue annual screenings and standard diet.",
        }
    }

    /// Associated color for TUI display (RGB).
    #[must_use]
    pub const fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::Stable => (0, 255, 136),   // #00FF88
            Self::Critical => (255, 75, 43), // #FF4B2B
        }
    }
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stable => write!(f, "STABLE"),
            Self::Critical => write!(f, "CRITICAL RISK"),
        }
    }
}

/// Distance of `probability` from the decision boundary, rescaled to 0..=100.
///
/// 0 at p = 0.5, 100 at p = 0 or p = 1. This is a display heuristic, not a
/// calibrated statistical confidence of the model.
#[must_use]
pub fn confidence_percent(probability: f64) -> f64 {
    (DECISION_THRESHOLD - probability).abs() * 200.0
}

/// Format a probability as a one-decimal percentage ("73.0%").
#[must_use]
pub fn format_percent(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}

/// Everything the result panel needs to render one analysis.
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub result: PredictionResult,
    pub category: RiskCategory,
    /// Heuristic confidence, 0..=100 (see [`confidence_percent`])
    pub confidence: f64,
    pub assessed_at: chrono::DateTime<chrono::Utc>,
}

impl Assessment {
    /// Present a prediction result.
    #[must_use]
    pub fn present(result: PredictionResult) -> Self {
        Self {
            category: RiskCategory::from_label(result.label),
            confidence: confidence_percent(result.probability),
            result,
            assessed_at: chrono::Utc::now(),
        }
    }

    #[must_use]
    pub fn probability(&self) -> f64 {
        self.result.probability
    }

    /// Progress indicator ratio, clamped for the gauge widget.
    #[must_use]
    pub fn gauge_ratio(&self) -> f64 {
        self.result.probability.clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn probability_display(&self) -> String {
        format_percent(self.result.probability)
    }

    /// Local time of the assessment, second precision.
    #[must_use]
    pub fn assessed_at_display(&self) -> String {
        self.assessed_at
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    }

    #[must_use]
    pub fn confidence_narrative(&self) -> String {
        format!(
            "The model is {:.1}% confident in this classification.",
            self.confidence
        )
    }

    #[must_use]
    pub fn recommendation(&self) -> &'static str {
        self.category.recommendation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_threshold() {
        assert_eq!(Label::from_probability(0.0), Label::Negative);
        assert_eq!(Label::from_probability(0.49), Label::Negative);
        assert_eq!(Label::from_probability(0.5), Label::Negative);
        assert_eq!(Label::from_probability(0.500_001), Label::Positive);
        assert_eq!(Label::from_probability(1.0), Label::Positive);
    }

    #[test]
    fn test_critical_scenario() {
        let assessment = Assessment::present(PredictionResult::from_probability(0.73));

        assert_eq!(assessment.category, RiskCategory::Critical);
        assert_eq!(assessment.category.to_string(), "CRITICAL RISK");
        assert_eq!(assessment.probability_display(), "73.0%");
        assert!((assessment.confidence - 46.0).abs() < 1e-9);
        assert_eq!(
            assessment.confidence_narrative(),
            "The model is 46.0% confident in this classification."
        );
        assert!(assessment.recommendation().contains("Stress Echo"));
    }

    #[test]
    fn test_boundary_resolves_to_stable() {
        let result = PredictionResult::from_probability(0.5);
        assert_eq!(result.label, Label::Negative);

        let assessment = Assessment::present(result);
        assert_eq!(assessment.category, RiskCategory::Stable);
        assert_eq!(assessment.probability_display(), "50.0%");
        assert!(assessment.confidence.abs() < f64::EPSILON);
        assert!(assessment.recommendation().contains("annual screenings"));
    }

    #[test]
    fn test_confidence_endpoints() {
        assert!(confidence_percent(0.5).abs() < f64::EPSILON);
        assert!((confidence_percent(0.0) - 100.0).abs() < f64::EPSILON);
        assert!((confidence_percent(1.0) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_confidence_is_symmetric() {
        for i in 0..=100 {
            let p = f64::from(i) / 100.0;
            let a = confidence_percent(p);
            let b = confidence_percent(1.0 - p);
            assert!((a - b).abs() < 1e-9, "p={p}: {a} vs {b}");
            assert!((0.0..=100.0 + 1e-9).contains(&a));
        }
    }

    #[test]
    fn test_serializes_for_logging() {
        let assessment = Assessment::present(PredictionResult::from_probability(0.73));
        let json = serde_json::to_value(&assessment).expect("serialize");

        assert_eq!(json["category"], "Critical");
        assert_eq!(json["result"]["label"], "Positive");
        assert!((json["confidence"].as_f64().expect("number") - 46.0).abs() < 1e-9);
        assert!(json["assessed_at"].is_string());
    }

    #[test]
    fn test_assessed_at_display_is_second_precision() {
        let assessment = Assessment::present(PredictionResult::from_probability(0.1));
        let shown = assessment.assessed_at_display();

        assert_eq!(shown.len(), "2026-01-01 00:00:00".len());
        assert!(chrono::NaiveDateTime::parse_from_str(&shown, "%Y-%m-%d %H:%M:%S").is_ok());
    }

    #[test]
    fn test_gauge_tracks_probability() {
        let assessment = Assessment::present(PredictionResult::from_probability(0.21));
        assert!((assessment.gauge_ratio() - 0.21).abs() < f64::EPSILON);
        assert_eq!(assessment.category, RiskCategory::Stable);
    }
}
