//! Session state of one widget, mutated only through [`SessionState::apply`].

use crate::{
    projector::{Popups, SummaryView, summarize},
    types::AnalysisFrame,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SubmitStarted { request_id: u64 },
    SubmitSucceeded { request_id: u64, frames: Vec<AnalysisFrame> },
    SubmitFailed { request_id: u64 },
    CloseSummary,
    OpenFrameWise,
    CloseFrameWise,
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    status: SubmissionState,
    current_request: u64,
    frames: Vec<AnalysisFrame>,
    summary: Vec<String>,
    popups: Popups,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an action. Returns `false` when the action was discarded because it belongs to a
    /// request other than the most recent one.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::SubmitStarted { request_id } => {
                if request_id <= self.current_request {
                    return false;
                }
                self.current_request = request_id;
                self.status = SubmissionState::Submitting;
                self.frames.clear();
                self.summary.clear();
                self.popups = Popups::default();
            }
            Action::SubmitSucceeded { request_id, frames } => {
                if request_id != self.current_request {
                    return false;
                }
                self.summary = summarize(&frames);
                self.frames = frames;
                self.status = SubmissionState::Completed;
                self.popups.on_analysis_completed();
            }
            Action::SubmitFailed { request_id } => {
                if request_id != self.current_request {
                    return false;
                }
                self.status = SubmissionState::Failed;
            }
            Action::CloseSummary => self.popups.close_summary(),
            Action::OpenFrameWise => self.popups.open_frame_wise(),
            Action::CloseFrameWise => self.popups.close_frame_wise(),
        }
        true
    }

    pub fn status(&self) -> SubmissionState {
        self.status
    }

    pub fn is_busy(&self) -> bool {
        self.status == SubmissionState::Submitting
    }

    pub fn current_request(&self) -> u64 {
        self.current_request
    }

    pub fn frames(&self) -> &[AnalysisFrame] {
        &self.frames
    }

    pub fn summary(&self) -> &[String] {
        &self.summary
    }

    pub fn summary_view(&self) -> SummaryView {
        SummaryView::from_summary(&self.summary)
    }

    pub fn popups(&self) -> Popups {
        self.popups
    }
}
