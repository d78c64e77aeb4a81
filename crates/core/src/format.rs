use crate::{
    projector::{SummaryView, frame_line},
    types::AnalysisFrame,
};

pub const NO_ISSUES_MESSAGE: &str = "No posture issues detected 🎉";

/// Format the summary panel
pub fn format_summary_panel(view: &SummaryView) -> String {
    let mut output = String::new();
    output.push_str("## Posture Summary\n\n");

    match view {
        SummaryView::NoIssues => {
            output.push_str(NO_ISSUES_MESSAGE);
            output.push('\n');
        }
        SummaryView::Issues(items) => {
            for item in items {
                output.push_str(&format!("• {}\n", item));
            }
        }
    }

    output
}

/// Format the frame-wise panel, one line per frame
pub fn format_frame_wise_panel(frames: &[AnalysisFrame]) -> String {
    let mut output = String::new();
    output.push_str("## Frame-wise Feedback\n\n");
    for frame in frames {
        output.push_str(&frame_line(frame));
        output.push('\n');
    }
    output
}
