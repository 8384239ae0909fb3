//! Main TUI application state machine.
//!
//! Handles:
//! - Input event handling
//! - Service integration
//! - Analysis via background worker

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};

use crate::application::{AnalysisService, ModelGateway};
use crate::config::AppConfig;

use super::ui::{
    form::{render_patient_form, PatientFormState, COARSE_STEPS},
    render_disclaimer,
    result::{render_result_panel, AnalysisPhase, AnalysisState},
    sidebar::{render_sidebar, SidebarState},
};
use super::worker::{AnalysisProgress, AnalysisWorker, AnalysisWorkerHandle};

const SIDEBAR_WIDTH: u16 = 30;

/// Main application state
pub struct App {
    /// Whether the app should quit
    should_quit: bool,

    service: Arc<AnalysisService>,

    form: PatientFormState,

    analysis_state: AnalysisState,

    sidebar: SidebarState,

    /// Pending analysis worker (if running)
    pending_worker: Option<AnalysisWorkerHandle>,

    /// When the current phase started (for UI animation)
    phase_started_at: Option<Instant>,
}

impl App {
    /// Create a new application instance on the process-wide model gateway.
    ///
    /// A missing or corrupt model does not prevent startup; the status
    /// panel shows it as failed and analyses report the error.
    ///
    /// # Errors
    /// Does not fail today; model problems are reported in the UI.
    pub fn new() -> Result<Self> {
        let config = AppConfig::from_env();
        let service = Arc::new(AnalysisService::new(ModelGateway::global()));
        Ok(Self::with_dependencies(&config, service))
    }

    /// Create application with injected dependencies (Composition Root pattern).
    ///
    /// Loads the model eagerly so the status panel is accurate from the
    /// first frame.
    #[must_use]
    pub fn with_dependencies(config: &AppConfig, service: Arc<AnalysisService>) -> Self {
        let gateway = service.gateway();
        let model = gateway.info();
        let model_file = gateway
            .path()
            .file_name()
            .map_or_else(|| gateway.path().display().to_string(), |name| {
                name.to_string_lossy().into_owned()
            });

        match &model {
            Some(info) => tracing::info!(
                "Model ready: {} ({})",
                info.model_type,
                info.short_fingerprint()
            ),
            None => tracing::warn!("Starting without a model; analyses will fail"),
        }

        Self {
            should_quit: false,
            service,
            form: PatientFormState::default(),
            analysis_state: AnalysisState::default(),
            sidebar: SidebarState {
                model,
                model_file,
                environment: config.environment.clone(),
            },
            pending_worker: None,
            phase_started_at: None,
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Main loop
        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            self.poll_worker();
            self.tick_progress();

            terminal.draw(|f| self.draw(f))?;

            // Handle input (short poll to stay responsive)
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key.code, key.modifiers);
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn draw(&self, f: &mut Frame) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(f.area());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(rows[0]);

        let main = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(19),    // Form
                Constraint::Length(10), // Result
            ])
            .split(columns[1]);

        render_sidebar(f, columns[0], &self.sidebar);
        render_patient_form(f, main[0], &self.form);
        render_result_panel(f, main[1], &self.analysis_state);
        render_disclaimer(f, rows[1]);
    }

    /// Poll the background worker for progress updates.
    fn poll_worker(&mut self) {
        loop {
            let Some(progress) = self
                .pending_worker
                .as_ref()
                .and_then(AnalysisWorkerHandle::try_recv)
            else {
                break;
            };

            match progress {
                AnalysisProgress::Scanning => self.set_phase(AnalysisPhase::Scanning),
                AnalysisProgress::Computing => self.set_phase(AnalysisPhase::Computing),
                AnalysisProgress::Complete(assessment) => {
                    self.finish(AnalysisState::Complete { assessment });
                    break;
                }
                AnalysisProgress::Error(message) => {
                    self.finish(AnalysisState::Error { message });
                    break;
                }
            }
        }
    }

    fn finish(&mut self, state: AnalysisState) {
        self.analysis_state = state;
        self.pending_worker = None;
        self.phase_started_at = None;
    }

    fn set_phase(&mut self, phase: AnalysisPhase) {
        let current = match self.analysis_state {
            AnalysisState::Running { progress, .. } => progress,
            _ => 0.0,
        };
        let floor = match phase {
            AnalysisPhase::Scanning => 0.0,
            AnalysisPhase::Computing => 0.45,
        };

        self.phase_started_at = Some(Instant::now());
        self.analysis_state = AnalysisState::Running {
            phase,
            progress: current.max(floor),
        };
    }

    fn tick_progress(&mut self) {
        if self.pending_worker.is_none() {
            return;
        }
        let Some(started_at) = self.phase_started_at else {
            return;
        };
        let AnalysisState::Running { phase, progress } = self.analysis_state else {
            return;
        };

        let elapsed = Instant::now()
            .saturating_duration_since(started_at)
            .as_secs_f64();

        let (start_floor, target, tau) = match phase {
            AnalysisPhase::Scanning => (0.02, 0.45, 0.3),
            AnalysisPhase::Computing => (0.45, 0.95, 0.6),
        };

        // Approaches the phase target asymptotically, never moves backwards.
        let k = 1.0 - (-elapsed / tau).exp();
        let desired = start_floor + (target - start_floor) * k;

        self.analysis_state = AnalysisState::Running {
            phase,
            progress: desired.max(progress).min(target),
        };
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Up => self.form.prev_field(),
            KeyCode::Down => self.form.next_field(),
            KeyCode::Left => self.form.adjust(-1),
            KeyCode::Right => self.form.adjust(1),
            KeyCode::PageDown => self.form.adjust(-COARSE_STEPS),
            KeyCode::PageUp => self.form.adjust(COARSE_STEPS),
            KeyCode::Tab | KeyCode::BackTab => self.form.switch_tab(),
            KeyCode::Enter => self.start_analysis(),
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.form.reset();
                if !self.analysis_state.is_running() {
                    self.analysis_state = AnalysisState::Idle;
                }
            }
            _ => {}
        }
    }

    fn start_analysis(&mut self) {
        if self.pending_worker.is_some() {
            return;
        }

        // Abort before encoding anything when there is no model.
        if let Err(e) = self.service.gateway().classifier() {
            tracing::warn!("Analysis requested without a model");
            self.analysis_state = AnalysisState::Error {
                message: e.user_message(),
            };
            return;
        }

        self.analysis_state = AnalysisState::Idle;
        self.set_phase(AnalysisPhase::Scanning);
        self.pending_worker = Some(AnalysisWorker::spawn(
            self.service.clone(),
            self.form.observation,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RiskCategory;

    fn app_with_model(path: impl Into<std::path::PathBuf>) -> App {
        let gateway = Arc::new(ModelGateway::new(path));
        App::with_dependencies(
            &AppConfig::default(),
            Arc::new(AnalysisService::new(gateway)),
        )
    }

    fn press(app: &mut App, key: KeyCode) {
        app.handle_key(key, KeyModifiers::NONE);
    }

    fn wait_for_result(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while app.pending_worker.is_some() && Instant::now() < deadline {
            app.poll_worker();
            app.tick_progress();
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn test_status_panel_reflects_model() {
        let app = app_with_model("models/heart_model.json");
        assert!(app.sidebar.model.is_some());
        assert_eq!(app.sidebar.model_file, "heart_model.json");
        assert_eq!(app.sidebar.environment, "Production v2.0");
    }

    #[test]
    fn test_keys_adjust_selected_field() {
        let mut app = app_with_model("models/heart_model.json");
        let age = app.form.observation.age;

        press(&mut app, KeyCode::Right);
        assert_eq!(app.form.observation.age, age + 1);

        press(&mut app, KeyCode::PageUp);
        assert_eq!(app.form.observation.age, age + 11);

        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.form.observation.age, age);
    }

    #[test]
    fn test_tab_switches_form_page() {
        let mut app = app_with_model("models/heart_model.json");
        let first = app.form.tab;

        press(&mut app, KeyCode::Tab);
        assert_ne!(app.form.tab, first);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.form.tab, first);
    }

    #[test]
    fn test_enter_runs_analysis_to_completion() {
        let mut app = app_with_model("models/heart_model.json");

        press(&mut app, KeyCode::Enter);
        assert!(app.analysis_state.is_running());

        // Ignored while a worker is pending
        press(&mut app, KeyCode::Enter);

        wait_for_result(&mut app);
        match &app.analysis_state {
            AnalysisState::Complete { assessment } => {
                assert_eq!(assessment.category, RiskCategory::Stable);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_missing_model_reports_error_without_worker() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut app = app_with_model(temp.path().join("heart_model.json"));
        assert!(app.sidebar.model.is_none());

        press(&mut app, KeyCode::Enter);

        assert!(app.pending_worker.is_none());
        match &app.analysis_state {
            AnalysisState::Error { message } => assert!(message.contains("Model file not found")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app_with_model("models/heart_model.json");
        app.handle_key(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(app.should_quit);

        let mut app = app_with_model("models/heart_model.json");
        press(&mut app, KeyCode::Char('Q'));
        assert!(app.should_quit);
    }
}
