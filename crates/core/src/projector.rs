//! Turns the per-frame analysis into what the two panels show.

use std::collections::HashSet;

use crate::types::AnalysisFrame;

/// Distinct feedback strings across all frames, in first-occurrence order.
pub fn summarize(frames: &[AnalysisFrame]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut summary = Vec::new();

    for frame in frames {
        for message in &frame.feedback {
            if seen.insert(message.as_str()) {
                summary.push(message.clone());
            }
        }
    }

    summary
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryView {
    NoIssues,
    Issues(Vec<String>),
}

impl SummaryView {
    pub fn from_summary(summary: &[String]) -> Self {
        if summary.is_empty() {
            SummaryView::NoIssues
        } else {
            SummaryView::Issues(summary.to_vec())
        }
    }
}

/// Frame-wise line. Only the first feedback message of a frame is shown.
pub fn frame_line(frame: &AnalysisFrame) -> String {
    match frame.feedback.first() {
        Some(message) => format!("Frame {}: {}", frame.frame, message),
        None => format!("Frame {}:", frame.frame),
    }
}

/// Visibility of the summary and frame-wise panels. The two flags are independent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Popups {
    pub summary_open: bool,
    pub frame_wise_open: bool,
}

impl Popups {
    pub fn on_analysis_completed(&mut self) {
        self.summary_open = true;
        self.frame_wise_open = false;
    }

    pub fn close_summary(&mut self) {
        self.summary_open = false;
    }

    pub fn open_frame_wise(&mut self) {
        self.frame_wise_open = true;
    }

    pub fn close_frame_wise(&mut self) {
        self.frame_wise_open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(index: u32, feedback: &[&str]) -> AnalysisFrame {
        AnalysisFrame {
            frame: index,
            feedback: feedback.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn summary_keeps_first_occurrence_order() {
        let frames = vec![
            frame(1, &["slouching"]),
            frame(2, &["slouching", "knee bend"]),
        ];
        assert_eq!(summarize(&frames), vec!["slouching", "knee bend"]);
    }

    #[test]
    fn summary_scans_frames_in_given_order() {
        let frames = vec![
            frame(1, &["b", "a"]),
            frame(2, &["c", "b"]),
            frame(3, &["a", "d"]),
        ];
        assert_eq!(summarize(&frames), vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn empty_feedback_renders_no_issues() {
        let frames = vec![frame(1, &[]), frame(2, &[])];
        let summary = summarize(&frames);
        assert!(summary.is_empty());
        assert_eq!(SummaryView::from_summary(&summary), SummaryView::NoIssues);
    }

    #[test]
    fn frame_line_shows_only_first_message() {
        assert_eq!(frame_line(&frame(3, &["a", "b"])), "Frame 3: a");
        assert_eq!(frame_line(&frame(7, &[])), "Frame 7:");
    }

    #[test]
    fn popups_are_independent() {
        let mut popups = Popups::default();
        popups.on_analysis_completed();
        popups.open_frame_wise();
        assert!(popups.summary_open);

        popups.close_summary();
        assert!(popups.frame_wise_open);

        popups.close_frame_wise();
        assert_eq!(popups, Popups::default());
    }

    #[test]
    fn completion_closes_frame_wise_panel() {
        let mut popups = Popups {
            summary_open: false,
            frame_wise_open: true,
        };
        popups.on_analysis_completed();
        assert!(popups.summary_open);
        assert!(!popups.frame_wise_open);
    }
}
