//! Posture Core Library
//!
//! Client side of the posture-analysis service: collect a video and a posture category,
//! upload it, and project the per-frame feedback into a summary and a frame-wise view.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod format;
pub mod input;
pub mod projector;
pub mod store;
pub mod types;
pub mod widget;

// Re-export commonly used items at crate root
pub use analyzer::{Analyzer, HttpAnalyzer};
pub use config::ClientConfig;
pub use error::{AnalyzeError, ConfigError, Result, SubmitError};
pub use format::{NO_ISSUES_MESSAGE, format_frame_wise_panel, format_summary_panel};
pub use input::InputCollector;
pub use projector::{Popups, SummaryView, frame_line, summarize};
pub use store::{Action, SessionState, SubmissionState};
pub use types::{AnalysisFrame, AnalyzeReply, PostureCategory, VideoFile};
pub use widget::{Notifier, UploadAnalyzeWidget};
