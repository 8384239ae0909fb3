//! Clinical observation types and the feature encoder.
//!
//! Based on the UCI Cleveland heart disease feature set (13 attributes).

use std::ops::RangeInclusive;

/// Number of features the trained model consumes.
pub const FEATURE_COUNT: usize = 13;

/// ST segment slope fed to the model for every observation.
///
/// Required by the trained model's feature contract: the model was fitted
/// with this attribute and the form never collects it.
pub const TRAINED_ST_SLOPE: u8 = 1;

/// Feature names in the exact order the model was trained on.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope", "ca", "thal",
];

/// Age in years.
pub const AGE_RANGE: RangeInclusive<u8> = 18..=100;
/// Resting blood pressure in mmHg.
pub const RESTING_BP_RANGE: RangeInclusive<u16> = 80..=200;
/// Serum cholesterol in mg/dl.
pub const CHOLESTEROL_RANGE: RangeInclusive<u16> = 100..=500;
/// Maximum achieved heart rate in bpm.
pub const MAX_HEART_RATE_RANGE: RangeInclusive<u16> = 60..=220;
/// ST depression induced by exercise relative to rest.
pub const ST_DEPRESSION_RANGE: RangeInclusive<f64> = 0.0..=6.0;
/// Slider step for ST depression.
pub const ST_DEPRESSION_STEP: f64 = 0.1;
/// Number of major vessels colored by fluoroscopy.
pub const VESSELS_RANGE: RangeInclusive<u8> = 0..=3;

/// Ordered numeric input of the classifier.
pub type FeatureVector = [f64; FEATURE_COUNT];

/// Assigned sex (`1` = male, `0` = female).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    pub const ALL: [Self; 2] = [Self::Male, Self::Female];

    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Female => 0,
            Self::Male => 1,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Female => "Female",
            Self::Male => "Male",
        }
    }
}

/// Chest pain category (`cp`), ordinal 0..=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChestPain {
    TypicalAngina,
    AtypicalAngina,
    NonAnginal,
    Asymptomatic,
}

impl ChestPain {
    pub const ALL: [Self; 4] = [
        Self::TypicalAngina,
        Self::AtypicalAngina,
        Self::NonAnginal,
        Self::Asymptomatic,
    ];

    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::TypicalAngina => 0,
            Self::AtypicalAngina => 1,
            Self::NonAnginal => 2,
            Self::Asymptomatic => 3,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::TypicalAngina => "Typical Angina",
            Self::AtypicalAngina => "Atypical Angina",
            Self::NonAnginal => "Non-anginal",
            Self::Asymptomatic => "Asymptomatic",
        }
    }
}

/// Resting electrocardiographic result (`restecg`), 0..=2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestingEcg {
    Normal,
    StTAbnormality,
    LeftVentricularHypertrophy,
}

impl RestingEcg {
    pub const ALL: [Self; 3] = [
        Self::Normal,
        Self::StTAbnormality,
        Self::LeftVentricularHypertrophy,
    ];

    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::StTAbnormality => 1,
            Self::LeftVentricularHypertrophy => 2,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "0 · Normal",
            Self::StTAbnormality => "1 · ST-T Abnormality",
            Self::LeftVentricularHypertrophy => "2 · LV Hypertrophy",
        }
    }
}

/// Thallium stress test assessment (`thal`), 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Thal {
    Normal,
    FixedDefect,
    ReversibleDefect,
}

impl Thal {
    pub const ALL: [Self; 3] = [Self::Normal, Self::FixedDefect, Self::ReversibleDefect];

    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Normal => 1,
            Self::FixedDefect => 2,
            Self::ReversibleDefect => 3,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::FixedDefect => "Fixed Defect",
            Self::ReversibleDefect => "Reversible Defect",
        }
    }
}

/// One form submission.
///
/// Ranges are owned by the input layer (bounded sliders and fixed option
/// sets); the encoder does not re-check them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClinicalObservation {
    /// Age in years (`age`)
    pub age: u8,
    /// Assigned sex (`sex`)
    pub sex: Sex,
    /// Chest pain category (`cp`)
    pub chest_pain: ChestPain,
    /// Resting blood pressure in mmHg (`trestbps`)
    pub resting_bp: u16,
    /// Serum cholesterol in mg/dl (`chol`)
    pub cholesterol: u16,
    /// Fasting blood sugar above 120 mg/dl (`fbs`)
    pub fasting_sugar_elevated: bool,
    /// Resting ECG result (`restecg`)
    pub resting_ecg: RestingEcg,
    /// Maximum heart rate achieved in bpm (`thalach`)
    pub max_heart_rate: u16,
    /// Exercise-induced angina (`exang`)
    pub exercise_angina: bool,
    /// ST depression score (`oldpeak`)
    pub st_depression: f64,
    /// Major vessels colored by fluoroscopy (`ca`)
    pub vessels: u8,
    /// Thallium assessment (`thal`)
    pub thal: Thal,
}

impl Default for ClinicalObservation {
    fn default() -> Self {
        Self {
            age: 45,
            sex: Sex::Male,
            chest_pain: ChestPain::TypicalAngina,
            resting_bp: 120,
            cholesterol: 210,
            fasting_sugar_elevated: false,
            resting_ecg: RestingEcg::Normal,
            max_heart_rate: 155,
            exercise_angina: false,
            st_depression: 1.2,
            vessels: 0,
            thal: Thal::Normal,
        }
    }
}

impl ClinicalObservation {
    /// Encode into the model's feature vector.
    ///
    /// Order: age, sex, cp, trestbps, chol, fbs, restecg, thalach, exang,
    /// oldpeak, slope, ca, thal. The order is the training contract of the
    /// model and is not self-describing.
    #[must_use]
    pub fn to_feature_vector(&self) -> FeatureVector {
        [
            f64::from(self.age),
            f64::from(self.sex.code()),
            f64::from(self.chest_pain.code()),
            f64::from(self.resting_bp),
            f64::from(self.cholesterol),
            f64::from(u8::from(self.fasting_sugar_elevated)),
            f64::from(self.resting_ecg.code()),
            f64::from(self.max_heart_rate),
            f64::from(u8::from(self.exercise_angina)),
            self.st_depression,
            f64::from(TRAINED_ST_SLOPE),
            f64::from(self.vessels),
            f64::from(self.thal.code()),
        ]
    }
}
