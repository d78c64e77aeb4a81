use crate::types::{PostureCategory, VideoFile};

/// User-chosen inputs of the form: a video file and a posture category.
#[derive(Debug, Clone, Default)]
pub struct InputCollector {
    file: Option<VideoFile>,
    category: PostureCategory,
}

impl InputCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selected file. No type or size checks happen here; the service validates.
    pub fn set_file(&mut self, file: VideoFile) {
        self.file = Some(file);
    }

    pub fn set_category(&mut self, category: PostureCategory) {
        self.category = category;
    }

    pub fn file(&self) -> Option<&VideoFile> {
        self.file.as_ref()
    }

    pub fn category(&self) -> PostureCategory {
        self.category
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_without_file_and_with_squat() {
        let inputs = InputCollector::new();
        assert!(inputs.file().is_none());
        assert_eq!(inputs.category(), PostureCategory::Squat);
    }

    #[test]
    fn set_file_replaces_previous_selection() {
        let mut inputs = InputCollector::new();
        inputs.set_file(VideoFile::new("first.mp4"));
        inputs.set_file(VideoFile::new("notes.txt"));
        assert_eq!(inputs.file(), Some(&VideoFile::new("notes.txt")));
    }
}
