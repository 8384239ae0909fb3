//! Background analysis worker.
//!
//! Runs the analyze pipeline off the UI thread and streams progress phases
//! back over a channel, so the terminal keeps redrawing while it runs.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::application::AnalysisService;
use crate::domain::{Assessment, ClinicalObservation};

/// Pause between phases so each one is visible at least briefly.
const PHASE_PAUSE: Duration = Duration::from_millis(150);

/// Progress updates from the analysis worker.
#[derive(Debug, Clone)]
pub enum AnalysisProgress {
    /// Encoding the observation
    Scanning,
    /// Running the classifier
    Computing,
    /// Analysis complete
    Complete(Assessment),
    /// Analysis failed; user-facing message
    Error(String),
}

/// Handle to a running analysis.
pub struct AnalysisWorkerHandle {
    progress_rx: Receiver<AnalysisProgress>,
    _handle: JoinHandle<()>,
}

impl AnalysisWorkerHandle {
    /// Try to receive the next progress update (non-blocking).
    #[must_use]
    pub fn try_recv(&self) -> Option<AnalysisProgress> {
        self.progress_rx.try_recv().ok()
    }

    /// Block until the next progress update, or `None` once the worker is gone.
    #[must_use]
    pub fn recv(&self) -> Option<AnalysisProgress> {
        self.progress_rx.recv().ok()
    }
}

pub struct AnalysisWorker;

impl AnalysisWorker {
    /// Spawn one analysis in the background.
    pub fn spawn(
        service: Arc<AnalysisService>,
        observation: ClinicalObservation,
    ) -> AnalysisWorkerHandle {
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            Self::run_with_progress(&service, &observation, &tx);
        });

        AnalysisWorkerHandle {
            progress_rx: rx,
            _handle: handle,
        }
    }

    fn run_with_progress(
        service: &AnalysisService,
        observation: &ClinicalObservation,
        tx: &Sender<AnalysisProgress>,
    ) {
        let _ = tx.send(AnalysisProgress::Scanning);
        thread::sleep(PHASE_PAUSE);

        let _ = tx.send(AnalysisProgress::Computing);
        let outcome = service.analyze(observation);
        thread::sleep(PHASE_PAUSE);

        let _ = match outcome {
            Ok(assessment) => tx.send(AnalysisProgress::Complete(assessment)),
            Err(e) => tx.send(AnalysisProgress::Error(e.user_message())),
        };
    }
}
