//! Sidebar: branding, system status, key help.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::application::ModelInfo;
use crate::tui::styles::CardioTheme;

/// What the status panel shows.
#[derive(Debug, Clone, Default)]
pub struct SidebarState {
    /// `None` when the model failed to load
    pub model: Option<ModelInfo>,
    /// File name of the configured artifact
    pub model_file: String,
    pub environment: String,
}

pub fn render_sidebar(f: &mut Frame, area: Rect, state: &SidebarState) {
    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(CardioTheme::border())
        .style(CardioTheme::sidebar());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Branding
            Constraint::Length(7), // System status
            Constraint::Min(0),    // Keys
        ])
        .margin(1)
        .split(inner);

    let brand = Paragraph::new(vec![
        Line::from(Span::styled("❤ HeartCare", CardioTheme::title())),
        Line::from(Span::styled(
            "Cardiovascular risk AI",
            CardioTheme::text_muted(),
        )),
    ]);
    f.render_widget(brand, chunks[0]);

    render_status(f, chunks[1], state);
    render_keys(f, chunks[2]);
}

fn render_status(f: &mut Frame, area: Rect, state: &SidebarState) {
    let (icon, style) = if state.model.is_some() {
        ("OK", CardioTheme::success())
    } else {
        ("FAIL", CardioTheme::danger())
    };

    let fingerprint = state
        .model
        .as_ref()
        .map_or("-", |info| info.short_fingerprint());

    let items = vec![
        Line::from(vec![
            Span::styled("Model ", CardioTheme::text_secondary()),
            Span::styled(icon, style),
        ]),
        Line::from(Span::styled(state.model_file.as_str(), CardioTheme::text())),
        Line::from(vec![
            Span::styled("SHA ", CardioTheme::text_secondary()),
            Span::styled(fingerprint, CardioTheme::text_dim()),
        ]),
        Line::from(vec![
            Span::styled("Environment: ", CardioTheme::text_secondary()),
            Span::styled(state.environment.as_str(), CardioTheme::text()),
        ]),
    ];

    let status = Paragraph::new(items).block(
        Block::default()
            .title(Span::styled(" System Status ", CardioTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(CardioTheme::border()),
    );
    f.render_widget(status, area);
}

fn render_keys(f: &mut Frame, area: Rect) {
    let keys = [
        ("↑↓", "Select field"),
        ("←→", "Adjust"),
        ("PgUp/Dn", "Adjust ×10"),
        ("Tab", "Switch tab"),
        ("Enter", "Analyze"),
        ("R", "Reset form"),
        ("Q", "Quit"),
    ];

    let lines: Vec<Line> = keys
        .iter()
        .map(|(key, desc)| {
            Line::from(vec![
                Span::styled(format!("[{key}] "), CardioTheme::key_hint()),
                Span::styled(*desc, CardioTheme::key_desc()),
            ])
        })
        .collect();

    let help = Paragraph::new(lines).block(
        Block::default()
            .title(Span::styled(" Keys ", CardioTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(CardioTheme::border()),
    );
    f.render_widget(help, area);
}
