use std::path::PathBuf;
use thiserror::Error;

/// Underlying cause of a failed analysis call. Kept for diagnostics only.
#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("Analysis service returned {status}: {}", .message.as_deref().unwrap_or("no error message"))]
    Status { status: u16, message: Option<String> },

    #[error("Malformed response body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    #[error("Failed to read video {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AnalyzeError {
    /// Map a reqwest error to `Timeout` when the client deadline expired.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AnalyzeError::Timeout
        } else {
            AnalyzeError::Http(err)
        }
    }
}

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("No video file selected")]
    MissingInput,

    #[error("An analysis is already in progress")]
    Busy,

    #[error("Analysis timed out: {0}")]
    Timeout(#[source] AnalyzeError),

    #[error("Analysis request failed: {0}")]
    RequestFailure(#[source] AnalyzeError),
}

impl SubmitError {
    /// Text shown to the user in the alert. Never includes the diagnostic cause.
    pub fn user_message(&self) -> &'static str {
        match self {
            SubmitError::MissingInput => "Please select a video file!",
            SubmitError::Busy => "An analysis is already running. Please wait for it to finish.",
            SubmitError::Timeout(_) | SubmitError::RequestFailure(_) => "Error analyzing posture.",
        }
    }
}

impl From<AnalyzeError> for SubmitError {
    fn from(err: AnalyzeError) -> Self {
        match err {
            AnalyzeError::Timeout => SubmitError::Timeout(err),
            other => SubmitError::RequestFailure(other),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid endpoint {endpoint}: must start with http:// or https://")]
    InvalidEndpoint { endpoint: String },

    #[error("Invalid timeout {value}: {env_var} must be a positive number of seconds")]
    InvalidTimeout { env_var: String, value: String },
}

pub type Result<T> = std::result::Result<T, AnalyzeError>;
