use std::{fmt, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};

/// One analyzed frame of the uploaded video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisFrame {
    pub frame: u32,
    #[serde(default)]
    pub feedback: Vec<String>,
}

/// Body returned by `POST /analyze`.
///
/// `summary` is what the service computed on its side. It comes from an unordered set, so the
/// client keeps it only for diagnostics and derives its own ordered summary from `analysis`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeReply {
    #[serde(default)]
    pub analysis: Vec<AnalysisFrame>,
    #[serde(default)]
    pub summary: Vec<String>,
}

impl AnalyzeReply {
    /// Parse a response body. A body that is not JSON is an error; a JSON body whose
    /// `analysis` is missing or not an array yields an empty analysis. Frames that do not
    /// parse are skipped one by one, the rest are kept in order.
    pub fn from_body(body: &str) -> serde_json::Result<Self> {
        let value: serde_json::Value = serde_json::from_str(body)?;

        let analysis = match value.get("analysis") {
            None | Some(serde_json::Value::Null) => Vec::new(),
            Some(serde_json::Value::Array(items)) => items
                .iter()
                .enumerate()
                .filter_map(|(index, item)| {
                    serde_json::from_value::<AnalysisFrame>(item.clone())
                        .map_err(|e| {
                            tracing::warn!(index, error = %e, "Skipping malformed analysis frame");
                        })
                        .ok()
                })
                .collect(),
            Some(_) => {
                tracing::warn!("Ignoring analysis field that is not an array");
                Vec::new()
            }
        };
        let summary = value
            .get("summary")
            .and_then(|raw| serde_json::from_value(raw.clone()).ok())
            .unwrap_or_default();

        Ok(Self { analysis, summary })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PostureCategory {
    #[default]
    Squat,
    DeskSitting,
}

impl PostureCategory {
    /// Value sent as the `postureType` form field.
    pub fn wire_value(&self) -> &'static str {
        match self {
            PostureCategory::Squat => "squat",
            PostureCategory::DeskSitting => "desk",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PostureCategory::Squat => "Squat",
            PostureCategory::DeskSitting => "Desk Sitting",
        }
    }
}

impl fmt::Display for PostureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown posture category {0:?} (expected squat or desk)")]
pub struct UnknownCategory(pub String);

impl FromStr for PostureCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "squat" => Ok(PostureCategory::Squat),
            "desk" | "desk-sitting" | "desk_sitting" => Ok(PostureCategory::DeskSitting),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

/// A video picked by the user. Only the path is held; bytes are read at submit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFile {
    pub path: PathBuf,
}

impl VideoFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "video".to_string())
    }
}
