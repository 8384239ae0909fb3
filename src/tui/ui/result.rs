//! Analysis progress and result panel.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::domain::{Assessment, RiskCategory};
use crate::tui::styles::CardioTheme;

/// Phase of a running analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisPhase {
    Scanning,
    Computing,
}

impl AnalysisPhase {
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Scanning => "Scanning Biological Markers...",
            Self::Computing => "Computing probability gradients...",
        }
    }
}

/// Result panel state
#[derive(Debug, Clone, Default)]
pub enum AnalysisState {
    /// Nothing analyzed yet
    #[default]
    Idle,
    /// Worker running
    Running { phase: AnalysisPhase, progress: f64 },
    /// Finished with an assessment
    Complete { assessment: Assessment },
    /// Pipeline aborted
    Error { message: String },
}

impl AnalysisState {
    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }
}

/// Render the result panel
pub fn render_result_panel(f: &mut Frame, area: Rect, state: &AnalysisState) {
    match state {
        AnalysisState::Idle => render_idle(f, area),
        AnalysisState::Running { phase, progress } => render_progress(f, area, *phase, *progress),
        AnalysisState::Complete { assessment } => render_assessment(f, area, assessment),
        AnalysisState::Error { message } => render_error(f, area, message),
    }
}

fn render_idle(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            " ⚡ ANALYZE CARDIAC RISK ",
            CardioTheme::button(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Adjust the biometrics and diagnostics, then press [Enter]",
            CardioTheme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(CardioTheme::border()),
    );

    f.render_widget(content, area);
}

fn render_progress(f: &mut Frame, area: Rect, phase: AnalysisPhase, progress: f64) {
    let block = Block::default()
        .title(Span::styled(" Analysis ", CardioTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(CardioTheme::border());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(1), Constraint::Min(0)])
        .margin(1)
        .split(inner);

    let label = Paragraph::new(Line::from(Span::styled(
        phase.description(),
        CardioTheme::focused(),
    )))
    .alignment(Alignment::Center);
    f.render_widget(label, chunks[0]);

    let gauge = Gauge::default()
        .gauge_style(CardioTheme::info())
        .ratio(progress.clamp(0.0, 1.0))
        .label(format!("{:.0}%", progress * 100.0));
    f.render_widget(gauge, chunks[1]);
}

fn render_assessment(f: &mut Frame, area: Rect, assessment: &Assessment) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    // Outcome card
    let category_style = CardioTheme::category(assessment.category);
    let icon = match assessment.category {
        RiskCategory::Critical => "⚠",
        RiskCategory::Stable => "✓",
    };

    let card = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{icon} {}", assessment.category),
            category_style.add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            assessment.probability_display(),
            CardioTheme::subtitle(),
        )),
        Line::from(Span::styled(
            assessment.category.description(),
            CardioTheme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(category_style),
    );
    f.render_widget(card, columns[0]);

    // Risk diagnostics
    let block = Block::default()
        .title(Span::styled(" Risk Diagnostics ", CardioTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(CardioTheme::border());
    let inner = block.inner(columns[1]);
    f.render_widget(block, columns[1]);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Probability bar
            Constraint::Length(1), // Timestamp
            Constraint::Length(2), // Confidence
            Constraint::Min(0),    // Recommendation
        ])
        .margin(1)
        .split(inner);

    let gauge = Gauge::default()
        .gauge_style(category_style)
        .ratio(assessment.gauge_ratio())
        .label(assessment.probability_display());
    f.render_widget(gauge, rows[0]);

    let timestamp = Paragraph::new(Line::from(Span::styled(
        format!("Assessed {}", assessment.assessed_at_display()),
        CardioTheme::text_dim(),
    )));
    f.render_widget(timestamp, rows[1]);

    let confidence = Paragraph::new(Line::from(Span::styled(
        assessment.confidence_narrative(),
        CardioTheme::text_secondary(),
    )))
    .wrap(Wrap { trim: true });
    f.render_widget(confidence, rows[2]);

    let recommendation = Paragraph::new(Line::from(vec![
        Span::styled(
            "Recommendation: ",
            CardioTheme::recommendation(assessment.category).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            assessment.recommendation(),
            CardioTheme::recommendation(assessment.category),
        ),
    ]))
    .wrap(Wrap { trim: true });
    f.render_widget(recommendation, rows[3]);
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("! Error", CardioTheme::danger())),
        Line::from(""),
        Line::from(Span::styled(message, CardioTheme::text())),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(CardioTheme::danger()),
    );

    f.render_widget(content, area);
}
