use async_trait::async_trait;
use reqwest::multipart;
use tokio::fs;

use crate::{
    config::ClientConfig,
    error::{AnalyzeError, Result},
    types::{AnalyzeReply, PostureCategory, VideoFile},
};

/// The remote side of the widget: something that turns a video into per-frame feedback.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, video: &VideoFile, category: PostureCategory) -> Result<AnalyzeReply>;
}

/// Talks to the analysis service over HTTP.
pub struct HttpAnalyzer {
    config: ClientConfig,
    client: reqwest::Client,
}

impl HttpAnalyzer {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    /// Health check against `GET /ping`.
    pub async fn ping(&self) -> Result<String> {
        let response = self
            .client
            .get(self.config.ping_url())
            .send()
            .await
            .map_err(AnalyzeError::from_transport)?;

        let status = response.status();
        let body = response.text().await.map_err(AnalyzeError::from_transport)?;
        if !status.is_success() {
            return Err(AnalyzeError::Status {
                status: status.as_u16(),
                message: Some(body),
            });
        }
        Ok(body.trim().to_string())
    }
}

#[async_trait]
impl Analyzer for HttpAnalyzer {
    async fn analyze(&self, video: &VideoFile, category: PostureCategory) -> Result<AnalyzeReply> {
        let bytes = fs::read(&video.path)
            .await
            .map_err(|source| AnalyzeError::Io {
                path: video.path.clone(),
                source,
            })?;

        tracing::debug!(
            file = %video.path.display(),
            size = bytes.len(),
            category = category.wire_value(),
            "Uploading video"
        );

        let video_part = multipart::Part::bytes(bytes).file_name(video.file_name());
        let form = multipart::Form::new()
            .part("video", video_part)
            .text("postureType", category.wire_value());

        let response = self
            .client
            .post(self.config.analyze_url())
            .multipart(form)
            .send()
            .await
            .map_err(AnalyzeError::from_transport)?;

        let status = response.status();
        let body = response.text().await.map_err(AnalyzeError::from_transport)?;

        if !status.is_success() {
            // The service reports failures as {"error": "..."}
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|value| value["error"].as_str().map(str::to_string));
            return Err(AnalyzeError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let reply = AnalyzeReply::from_body(&body)?;
        tracing::debug!(
            frames = reply.analysis.len(),
            service_summary = ?reply.summary,
            "Received analysis"
        );
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use axum::{
        Json, Router,
        extract::{Multipart, State},
        http::StatusCode,
        response::IntoResponse,
        routing::{get, post},
    };
    use serde_json::json;

    use super::*;

    #[derive(Debug, Clone)]
    struct ReceivedField {
        name: String,
        file_name: Option<String>,
        data: Vec<u8>,
    }

    #[derive(Clone, Default)]
    struct Received {
        fields: Arc<Mutex<Vec<ReceivedField>>>,
    }

    async fn record_upload(State(received): State<Received>, mut multipart: Multipart) {
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(str::to_string);
            let data = field.bytes().await.unwrap().to_vec();
            received.fields.lock().unwrap().push(ReceivedField {
                name,
                file_name,
                data,
            });
        }
    }

    async fn analyze_ok(state: State<Received>, multipart: Multipart) -> impl IntoResponse {
        record_upload(state, multipart).await;
        Json(json!({
            "summary": ["knee bend", "slouching"],
            "analysis": [
                {"frame": 1, "feedback": ["slouching"]},
                {"frame": 2, "feedback": ["knee bend"]},
            ],
        }))
    }

    async fn analyze_rejected(state: State<Received>, multipart: Multipart) -> impl IntoResponse {
        record_upload(state, multipart).await;
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Invalid file format"})),
        )
    }

    async fn analyze_slow() -> impl IntoResponse {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Json(json!({"analysis": []}))
    }

    async fn spawn_service(router: Router) -> ClientConfig {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        ClientConfig {
            endpoint: format!("http://{}", addr),
            timeout: Duration::from_secs(5),
        }
    }

    async fn temp_video(contents: &[u8]) -> VideoFile {
        let path = std::env::temp_dir().join(format!("posture-{}.mp4", uuid::Uuid::new_v4()));
        fs::write(&path, contents).await.unwrap();
        VideoFile::new(path)
    }

    #[tokio::test]
    async fn uploads_video_and_category_as_multipart() {
        let received = Received::default();
        let router = Router::new()
            .route("/analyze", post(analyze_ok))
            .with_state(received.clone());
        let analyzer = HttpAnalyzer::new(spawn_service(router).await).unwrap();
        let video = temp_video(b"not really a video").await;

        let reply = analyzer
            .analyze(&video, PostureCategory::DeskSitting)
            .await
            .unwrap();

        assert_eq!(reply.analysis.len(), 2);
        assert_eq!(reply.analysis[0].feedback, vec!["slouching"]);

        let fields = received.fields.lock().unwrap().clone();
        assert_eq!(fields.len(), 2);
        let video_field = fields.iter().find(|f| f.name == "video").unwrap();
        assert_eq!(video_field.data, b"not really a video");
        assert_eq!(video_field.file_name.as_deref(), Some(video.file_name().as_str()));
        let category_field = fields.iter().find(|f| f.name == "postureType").unwrap();
        assert_eq!(category_field.data, b"desk");

        fs::remove_file(&video.path).await.unwrap();
    }

    #[tokio::test]
    async fn non_success_status_keeps_service_error_message() {
        let router = Router::new()
            .route("/analyze", post(analyze_rejected))
            .with_state(Received::default());
        let analyzer = HttpAnalyzer::new(spawn_service(router).await).unwrap();
        let video = temp_video(b"abc").await;

        let err = analyzer
            .analyze(&video, PostureCategory::Squat)
            .await
            .unwrap_err();

        match err {
            AnalyzeError::Status { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message.as_deref(), Some("Invalid file format"));
            }
            other => panic!("expected status error, got {other:?}"),
        }

        fs::remove_file(&video.path).await.unwrap();
    }

    #[tokio::test]
    async fn slow_service_is_classified_as_timeout() {
        let router = Router::new().route("/analyze", post(analyze_slow));
        let mut config = spawn_service(router).await;
        config.timeout = Duration::from_millis(200);
        let analyzer = HttpAnalyzer::new(config).unwrap();
        let video = temp_video(b"abc").await;

        let err = analyzer
            .analyze(&video, PostureCategory::Squat)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyzeError::Timeout), "got {err:?}");

        fs::remove_file(&video.path).await.unwrap();
    }

    #[tokio::test]
    async fn missing_video_fails_before_any_request() {
        let analyzer = HttpAnalyzer::new(ClientConfig::default()).unwrap();
        let video = VideoFile::new(std::env::temp_dir().join("posture-missing-video.mp4"));

        let err = analyzer
            .analyze(&video, PostureCategory::Squat)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyzeError::Io { .. }));
    }

    #[tokio::test]
    async fn ping_returns_pong() {
        let router = Router::new().route("/ping", get(|| async { "pong" }));
        let analyzer = HttpAnalyzer::new(spawn_service(router).await).unwrap();

        assert_eq!(analyzer.ping().await.unwrap(), "pong");
    }
}
