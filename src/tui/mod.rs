//! TUI module: Terminal User Interface using Ratatui.
//!
//! One screen with three regions:
//! - Sidebar with model status
//! - Tabbed clinical form (biometrics and diagnostics)
//! - Result panel with the risk assessment

mod app;
mod styles;
mod ui;
mod worker;

pub use app::App;
pub use styles::CardioTheme;
pub use worker::{AnalysisProgress, AnalysisWorker, AnalysisWorkerHandle};
