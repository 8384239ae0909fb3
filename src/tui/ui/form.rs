//! Clinical data entry form.
//!
//! Every input is a bounded selector: sliders clamp to their range and step,
//! choices cycle through a fixed option set. The form therefore only ever
//! holds observations inside the model's domain.

use std::ops::RangeInclusive;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    symbols,
    text::{Line, Span},
    widgets::{Block, Borders, LineGauge, Paragraph, Tabs},
    Frame,
};

use crate::domain::{
    ChestPain, ClinicalObservation, RestingEcg, Sex, Thal, AGE_RANGE, CHOLESTEROL_RANGE,
    MAX_HEART_RATE_RANGE, RESTING_BP_RANGE, ST_DEPRESSION_RANGE, ST_DEPRESSION_STEP,
    VESSELS_RANGE,
};
use crate::tui::styles::CardioTheme;

/// Steps applied by PgUp/PgDn.
pub const COARSE_STEPS: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormTab {
    Biometrics,
    Diagnostics,
}

impl FormTab {
    pub const ALL: [Self; 2] = [Self::Biometrics, Self::Diagnostics];

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Biometrics => "BIOMETRICS",
            Self::Diagnostics => "DIAGNOSTICS",
        }
    }

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Biometrics => 0,
            Self::Diagnostics => 1,
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Biometrics => Self::Diagnostics,
            Self::Diagnostics => Self::Biometrics,
        }
    }

    /// The two column groups of this tab.
    #[must_use]
    pub fn groups(self) -> [(&'static str, &'static [Field]); 2] {
        match self {
            Self::Biometrics => [("Demographics", DEMOGRAPHICS), ("Vital Signs", VITAL_SIGNS)],
            Self::Diagnostics => [
                ("Cardiac Data", CARDIAC_DATA),
                ("Stress Test Analysis", STRESS_TEST),
            ],
        }
    }

    /// Fields in navigation order.
    #[must_use]
    pub fn fields(self) -> Vec<Field> {
        self.groups()
            .iter()
            .flat_map(|(_, fields)| fields.iter().copied())
            .collect()
    }
}

/// One user-facing input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Age,
    Sex,
    RestingBp,
    Cholesterol,
    FastingSugar,
    MaxHeartRate,
    ChestPain,
    RestingEcg,
    StDepression,
    ExerciseAngina,
    Vessels,
    Thal,
}

const DEMOGRAPHICS: &[Field] = &[Field::Age, Field::Sex];
const VITAL_SIGNS: &[Field] = &[Field::RestingBp, Field::Cholesterol, Field::FastingSugar];
const CARDIAC_DATA: &[Field] = &[Field::MaxHeartRate, Field::ChestPain, Field::RestingEcg];
const STRESS_TEST: &[Field] = &[
    Field::StDepression,
    Field::ExerciseAngina,
    Field::Vessels,
    Field::Thal,
];

/// How a field renders.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldView {
    Slider { ratio: f64, display: String },
    Choice { options: Vec<&'static str>, selected: usize },
}

fn step_int<T>(value: T, range: &RangeInclusive<T>, steps: i32) -> T
where
    T: Copy + Into<i64> + TryFrom<i64>,
{
    let lo: i64 = (*range.start()).into();
    let hi: i64 = (*range.end()).into();
    let next = (value.into() + i64::from(steps)).clamp(lo, hi);
    T::try_from(next).unwrap_or(value)
}

fn ratio_int<T: Copy + Into<i64>>(value: T, range: &RangeInclusive<T>) -> f64 {
    let lo: i64 = (*range.start()).into();
    let hi: i64 = (*range.end()).into();
    (value.into() - lo) as f64 / (hi - lo) as f64
}

fn cycle<T: Copy + PartialEq>(options: &[T], current: T, steps: i32) -> T {
    let len = options.len() as i32;
    let idx = options.iter().position(|o| *o == current).unwrap_or(0) as i32;
    options[(idx + steps).rem_euclid(len) as usize]
}

fn position<T: PartialEq>(options: &[T], current: &T) -> usize {
    options.iter().position(|o| o == current).unwrap_or(0)
}

fn step_st_depression(value: f64, steps: i32) -> f64 {
    let tenths = (value / ST_DEPRESSION_STEP).round() as i64 + i64::from(steps);
    let lo = (ST_DEPRESSION_RANGE.start() / ST_DEPRESSION_STEP).round() as i64;
    let hi = (ST_DEPRESSION_RANGE.end() / ST_DEPRESSION_STEP).round() as i64;
    tenths.clamp(lo, hi) as f64 / 10.0
}

impl Field {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Age => "Patient Age",
            Self::Sex => "Assigned Sex",
            Self::RestingBp => "Resting Blood Pressure",
            Self::Cholesterol => "Serum Cholesterol",
            Self::FastingSugar => "Fasting Blood Sugar > 120",
            Self::MaxHeartRate => "Max Heart Rate (BPM)",
            Self::ChestPain => "Chest Pain Category",
            Self::RestingEcg => "Rest ECG",
            Self::StDepression => "ST Depression Score",
            Self::ExerciseAngina => "Exercise Angina",
            Self::Vessels => "Vessels (Fluoroscopy)",
            Self::Thal => "Thal Assessment",
        }
    }

    /// Move the value by `steps` (negative moves down/left).
    pub fn adjust(self, obs: &mut ClinicalObservation, steps: i32) {
        match self {
            Self::Age => obs.age = step_int(obs.age, &AGE_RANGE, steps),
            Self::RestingBp => obs.resting_bp = step_int(obs.resting_bp, &RESTING_BP_RANGE, steps),
            Self::Cholesterol => {
                obs.cholesterol = step_int(obs.cholesterol, &CHOLESTEROL_RANGE, steps)
            }
            Self::MaxHeartRate => {
                obs.max_heart_rate = step_int(obs.max_heart_rate, &MAX_HEART_RATE_RANGE, steps)
            }
            Self::StDepression => obs.st_depression = step_st_depression(obs.st_depression, steps),
            // Vessels is a select-slider: clamps like the other sliders.
            Self::Vessels => obs.vessels = step_int(obs.vessels, &VESSELS_RANGE, steps),
            Self::Sex => obs.sex = cycle(&Sex::ALL, obs.sex, steps),
            Self::ChestPain => obs.chest_pain = cycle(&ChestPain::ALL, obs.chest_pain, steps),
            Self::RestingEcg => obs.resting_ecg = cycle(&RestingEcg::ALL, obs.resting_ecg, steps),
            Self::Thal => obs.thal = cycle(&Thal::ALL, obs.thal, steps),
            Self::FastingSugar => {
                obs.fasting_sugar_elevated = cycle(&[false, true], obs.fasting_sugar_elevated, steps)
            }
            Self::ExerciseAngina => {
                obs.exercise_angina = cycle(&[false, true], obs.exercise_angina, steps)
            }
        }
    }

    #[must_use]
    pub fn view(self, obs: &ClinicalObservation) -> FieldView {
        match self {
            Self::Age => FieldView::Slider {
                ratio: ratio_int(obs.age, &AGE_RANGE),
                display: format!("{} years", obs.age),
            },
            Self::RestingBp => FieldView::Slider {
                ratio: ratio_int(obs.resting_bp, &RESTING_BP_RANGE),
                display: format!("{} mmHg", obs.resting_bp),
            },
            Self::Cholesterol => FieldView::Slider {
                ratio: ratio_int(obs.cholesterol, &CHOLESTEROL_RANGE),
                display: format!("{} mg/dl", obs.cholesterol),
            },
            Self::MaxHeartRate => FieldView::Slider {
                ratio: ratio_int(obs.max_heart_rate, &MAX_HEART_RATE_RANGE),
                display: format!("{} bpm", obs.max_heart_rate),
            },
            Self::StDepression => FieldView::Slider {
                ratio: (obs.st_depression - ST_DEPRESSION_RANGE.start())
                    / (ST_DEPRESSION_RANGE.end() - ST_DEPRESSION_RANGE.start()),
                display: format!("{:.1}", obs.st_depression),
            },
            Self::Vessels => FieldView::Choice {
                options: vec!["0", "1", "2", "3"],
                selected: usize::from(obs.vessels),
            },
            Self::Sex => FieldView::Choice {
                options: Sex::ALL.iter().map(|s| s.label()).collect(),
                selected: position(&Sex::ALL, &obs.sex),
            },
            Self::ChestPain => FieldView::Choice {
                options: ChestPain::ALL.iter().map(|c| c.label()).collect(),
                selected: position(&ChestPain::ALL, &obs.chest_pain),
            },
            Self::RestingEcg => FieldView::Choice {
                options: RestingEcg::ALL.iter().map(|r| r.label()).collect(),
                selected: position(&RestingEcg::ALL, &obs.resting_ecg),
            },
            Self::Thal => FieldView::Choice {
                options: Thal::ALL.iter().map(|t| t.label()).collect(),
                selected: position(&Thal::ALL, &obs.thal),
            },
            Self::FastingSugar => FieldView::Choice {
                options: vec!["Normal", "Elevated"],
                selected: usize::from(obs.fasting_sugar_elevated),
            },
            Self::ExerciseAngina => FieldView::Choice {
                options: vec!["No", "Yes"],
                selected: usize::from(obs.exercise_angina),
            },
        }
    }
}

/// Form state
#[derive(Debug, Clone)]
pub struct PatientFormState {
    pub tab: FormTab,
    /// Index into `tab.fields()`
    pub selected_field: usize,
    pub observation: ClinicalObservation,
}

impl Default for PatientFormState {
    fn default() -> Self {
        Self {
            tab: FormTab::Biometrics,
            selected_field: 0,
            observation: ClinicalObservation::default(),
        }
    }
}

impl PatientFormState {
    #[must_use]
    pub fn selected(&self) -> Field {
        let fields = self.tab.fields();
        fields[self.selected_field.min(fields.len() - 1)]
    }

    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.tab.fields().len();
    }

    pub fn prev_field(&mut self) {
        let len = self.tab.fields().len();
        self.selected_field = (self.selected_field + len - 1) % len;
    }

    pub fn switch_tab(&mut self) {
        self.tab = self.tab.toggled();
        self.selected_field = 0;
    }

    /// Adjust the selected field.
    pub fn adjust(&mut self, steps: i32) {
        self.selected().adjust(&mut self.observation, steps);
    }

    /// Restore the default observation.
    pub fn reset(&mut self) {
        self.observation = ClinicalObservation::default();
    }
}

/// Render the tabbed form
pub fn render_patient_form(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Fields
        ])
        .split(area);

    let tabs = Tabs::new(
        FormTab::ALL
            .iter()
            .map(|t| Line::from(format!("  {}  ", t.title()))),
    )
    .select(state.tab.index())
    .style(CardioTheme::text_secondary())
    .highlight_style(CardioTheme::tab_selected())
    .divider(symbols::DOT)
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(CardioTheme::border()),
    );
    f.render_widget(tabs, chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    let selected = state.selected();
    for ((title, fields), column) in state.tab.groups().iter().zip(columns.iter()) {
        render_group(f, *column, title, fields, &state.observation, selected);
    }
}

fn render_group(
    f: &mut Frame,
    area: Rect,
    title: &str,
    fields: &[Field],
    obs: &ClinicalObservation,
    selected: Field,
) {
    let block = Block::default()
        .title(Span::styled(format!(" {title} "), CardioTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(CardioTheme::border())
        .style(CardioTheme::card());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .margin(1)
        .split(inner);

    for (field, row) in fields.iter().zip(rows.iter()) {
        render_field(f, *row, *field, obs, *field == selected);
    }
}

fn render_field(f: &mut Frame, area: Rect, field: Field, obs: &ClinicalObservation, focused: bool) {
    let (label_style, border_style) = if focused {
        (CardioTheme::focused(), CardioTheme::border_focused())
    } else {
        (CardioTheme::text_secondary(), CardioTheme::border())
    };

    let block = Block::default()
        .title(Span::styled(format!(" {} ", field.label()), label_style))
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    f.render_widget(block, area);

    match field.view(obs) {
        FieldView::Slider { ratio, display } => {
            let gauge = LineGauge::default()
                .filled_style(CardioTheme::border_focused())
                .unfilled_style(CardioTheme::border())
                .line_set(symbols::line::THICK)
                .ratio(ratio.clamp(0.0, 1.0))
                .label(Span::styled(format!("{display:>12} "), CardioTheme::text()));
            f.render_widget(gauge, inner);
        }
        FieldView::Choice { options, selected } => {
            let mut spans = Vec::with_capacity(options.len() * 2);
            for (i, option) in options.iter().enumerate() {
                let style = if i == selected {
                    CardioTheme::tab_selected()
                } else {
                    CardioTheme::text_muted()
                };
                spans.push(Span::styled(format!(" {option} "), style));
                spans.push(Span::raw(" "));
            }
            f.render_widget(Paragraph::new(Line::from(spans)), inner);
        }
    }
}
