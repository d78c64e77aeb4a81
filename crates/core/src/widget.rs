//! The upload-and-analyze widget: inputs, submission and result state of one session.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
};

use uuid::Uuid;

use crate::{
    analyzer::Analyzer,
    error::SubmitError,
    input::InputCollector,
    projector::{Popups, SummaryView},
    store::{Action, SessionState, SubmissionState},
    types::{AnalysisFrame, PostureCategory, VideoFile},
};

/// Marks the submission failed if the `submit` future is dropped before the analyzer returns.
struct InFlight<'a> {
    state: &'a Mutex<SessionState>,
    request_id: u64,
    armed: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.state.lock().expect("SessionState poisoned");
        if state.apply(Action::SubmitFailed {
            request_id: self.request_id,
        }) {
            tracing::warn!(request_id = self.request_id, "Submission cancelled before completion");
        }
    }
}

/// User-visible, non-silent error surfacing.
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

pub struct UploadAnalyzeWidget {
    session_id: Uuid,
    inputs: Mutex<InputCollector>,
    state: Mutex<SessionState>,
    next_request: AtomicU64,
    analyzer: Arc<dyn Analyzer>,
    notifier: Arc<dyn Notifier>,
}

impl UploadAnalyzeWidget {
    pub fn new(analyzer: Arc<dyn Analyzer>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            inputs: Mutex::new(InputCollector::new()),
            state: Mutex::new(SessionState::new()),
            next_request: AtomicU64::new(0),
            analyzer,
            notifier,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn set_file(&self, file: VideoFile) {
        self.inputs.lock().expect("InputCollector poisoned").set_file(file);
    }

    pub fn set_category(&self, category: PostureCategory) {
        self.inputs
            .lock()
            .expect("InputCollector poisoned")
            .set_category(category);
    }

    pub fn inputs(&self) -> InputCollector {
        self.inputs.lock().expect("InputCollector poisoned").clone()
    }

    /// Validate inputs, upload the video and project the result.
    ///
    /// Only one submission runs at a time; a second call while one is outstanding is rejected
    /// with [`SubmitError::Busy`]. Every error raises exactly one alert.
    pub async fn submit(&self) -> Result<(), SubmitError> {
        let (video, category) = {
            let inputs = self.inputs.lock().expect("InputCollector poisoned");
            (inputs.file().cloned(), inputs.category())
        };
        let Some(video) = video else {
            return Err(self.surface(SubmitError::MissingInput));
        };

        let request_id = {
            let mut state = self.state.lock().expect("SessionState poisoned");
            if state.is_busy() {
                None
            } else {
                let request_id = self.next_request.fetch_add(1, Ordering::Relaxed) + 1;
                state.apply(Action::SubmitStarted { request_id });
                Some(request_id)
            }
        };
        let Some(request_id) = request_id else {
            return Err(self.surface(SubmitError::Busy));
        };

        let mut in_flight = InFlight {
            state: &self.state,
            request_id,
            armed: true,
        };

        tracing::info!(
            session_id = %self.session_id,
            request_id,
            file = %video.path.display(),
            category = category.wire_value(),
            "Submitting video for analysis"
        );

        let result = self.analyzer.analyze(&video, category).await;
        in_flight.armed = false;

        match result {
            Ok(reply) => {
                let frame_count = reply.analysis.len();
                let applied = self.dispatch(Action::SubmitSucceeded {
                    request_id,
                    frames: reply.analysis,
                });
                if applied {
                    tracing::info!(request_id, frame_count, "Analysis completed");
                } else {
                    tracing::debug!(request_id, "Discarded stale analysis result");
                }
                Ok(())
            }
            Err(err) => {
                tracing::error!(request_id, error = %err, "Posture analysis failed");
                self.dispatch(Action::SubmitFailed { request_id });
                Err(self.surface(err.into()))
            }
        }
    }

    pub fn close_summary(&self) {
        self.dispatch(Action::CloseSummary);
    }

    pub fn open_frame_wise(&self) {
        self.dispatch(Action::OpenFrameWise);
    }

    pub fn close_frame_wise(&self) {
        self.dispatch(Action::CloseFrameWise);
    }

    pub fn status(&self) -> SubmissionState {
        self.state.lock().expect("SessionState poisoned").status()
    }

    /// Busy indicator.
    pub fn is_busy(&self) -> bool {
        self.state.lock().expect("SessionState poisoned").is_busy()
    }

    pub fn popups(&self) -> Popups {
        self.state.lock().expect("SessionState poisoned").popups()
    }

    pub fn summary_view(&self) -> SummaryView {
        self.state.lock().expect("SessionState poisoned").summary_view()
    }

    pub fn frames(&self) -> Vec<AnalysisFrame> {
        self.state
            .lock()
            .expect("SessionState poisoned")
            .frames()
            .to_vec()
    }

    fn dispatch(&self, action: Action) -> bool {
        self.state.lock().expect("SessionState poisoned").apply(action)
    }

    fn surface(&self, err: SubmitError) -> SubmitError {
        if matches!(err, SubmitError::MissingInput | SubmitError::Busy) {
            tracing::warn!(session_id = %self.session_id, error = %err, "Submission rejected");
        }
        self.notifier.alert(err.user_message());
        err
    }
}
