//! UI module: View components for the TUI.

pub mod form;
pub mod result;
pub mod sidebar;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::CardioTheme;

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(vec![Span::styled(
            "HEARTCARE AI v2.0 | For research use. Estimates do not replace a clinical evaluation.",
            CardioTheme::text_muted(),
        )]),
        Line::from(vec![Span::styled(
            "Consult a cardiologist before acting on any result.",
            CardioTheme::text_dim(),
        )]),
    ];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(CardioTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Assessment, PredictionResult};
    use ratatui::{backend::TestBackend, Terminal};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    fn draw_result(state: &result::AnalysisState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 16)).expect("terminal");
        terminal
            .draw(|f| result::render_result_panel(f, f.area(), state))
            .expect("draw");
        buffer_text(&terminal)
    }

    #[test]
    fn test_result_panel_shows_critical_outcome() {
        let state = result::AnalysisState::Complete {
            assessment: Assessment::present(PredictionResult::from_probability(0.73)),
        };
        let text = draw_result(&state);

        assert!(text.contains("CRITICAL RISK"));
        assert!(text.contains("73.0%"));
        assert!(text.contains("Risk Diagnostics"));
        assert!(text.contains("Assessed "));
    }

    #[test]
    fn test_result_panel_shows_running_phase() {
        let state = result::AnalysisState::Running {
            phase: result::AnalysisPhase::Computing,
            progress: 0.5,
        };
        assert!(draw_result(&state).contains("Computing probability gradients..."));
    }

    #[test]
    fn test_result_panel_shows_error_message() {
        let state = result::AnalysisState::Error {
            message: "Model file not found".to_string(),
        };
        assert!(draw_result(&state).contains("Model file not found"));
    }

    #[test]
    fn test_form_and_sidebar_render() {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).expect("terminal");
        let form = form::PatientFormState::default();
        let sidebar = sidebar::SidebarState {
            model: None,
            model_file: "heart_model.json".to_string(),
            environment: "Production v2.0".to_string(),
        };

        terminal
            .draw(|f| {
                let area = f.area();
                let left = Rect::new(area.x, area.y, 30, area.height);
                let right = Rect::new(30, area.y, area.width - 30, area.height);
                sidebar::render_sidebar(f, left, &sidebar);
                form::render_patient_form(f, right, &form);
            })
            .expect("draw");

        let text = buffer_text(&terminal);
        assert!(text.contains("FAIL"));
        assert!(text.contains("BIOMETRICS"));
    }
}
