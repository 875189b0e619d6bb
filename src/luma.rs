use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::config::VideoConfig;
use crate::driver::VideoBackend;
use crate::error::{Result, VideoError};
use crate::types::{GenerationRequest, JobState, JobStatus};

fn normalize(endpoint: String) -> String {
    endpoint.trim_end_matches('/').to_string()
}

/// HTTP transport for the Luma Dream Machine generations API.
///
/// Handles the wire contract only: one POST to create a generation and
/// one GET per status poll, both bearer-authenticated. The poll loop
/// itself lives in [`VideoJobDriver`](crate::driver::VideoJobDriver).
#[derive(Debug, Clone)]
pub struct LumaClient {
    http: Client,
    config: VideoConfig,
}

impl LumaClient {
    /// Create a new client from the given configuration.
    ///
    /// Fails with [`VideoError::MissingApiKey`] when no credential is
    /// configured.
    pub fn new(mut config: VideoConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(VideoError::MissingApiKey);
        }
        config.endpoint = normalize(config.endpoint);
        Ok(Self {
            http: Client::new(),
            config,
        })
    }

    /// Use a custom `reqwest::Client` (for connection pooling, proxies, TLS).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// Returns the configured endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    // ── Create ──────────────────────────────────────────────────────

    /// Start a generation. Returns the provider-assigned job id.
    pub async fn create_generation(&self, request: &GenerationRequest) -> Result<String> {
        let body = creation_body(request, &self.config);

        let resp = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .timeout(Duration::from_secs(30))
            .json(&body)
            .send()
            .await
            .map_err(|e| VideoError::Network {
                context: format!("Cannot reach provider at {}", self.config.endpoint),
                source: e,
            })?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(VideoError::Unauthenticated);
        }
        if !status.is_success() {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(VideoError::Http {
                status: status.as_u16(),
                body: body_text,
            });
        }

        let json: Value = resp.json().await.map_err(|e| VideoError::Network {
            context: "Failed to parse generation creation response".into(),
            source: e,
        })?;

        extract_generation_id(&json)
    }

    // ── Status ──────────────────────────────────────────────────────

    /// Fetch the current status of a generation.
    pub async fn generation_status(&self, id: &str) -> Result<JobStatus> {
        let url = format!("{}/{}", self.config.endpoint, id);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.config.api_key)
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| VideoError::Network {
                context: format!("Failed to poll generation {}", id),
                source: e,
            })?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(VideoError::Unauthenticated);
        }
        if !status.is_success() {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(VideoError::Http {
                status: status.as_u16(),
                body: body_text,
            });
        }

        let json: Value = resp.json().await.map_err(|e| VideoError::Network {
            context: "Failed to parse generation status response".into(),
            source: e,
        })?;

        Ok(parse_status(&json))
    }
}

impl VideoBackend for LumaClient {
    async fn create_job(&self, request: &GenerationRequest) -> Result<String> {
        self.create_generation(request).await
    }

    async fn job_status(&self, id: &str) -> Result<JobStatus> {
        self.generation_status(id).await
    }
}

/// Build the creation payload: prompt plus the source frame keyed as
/// `keyframes.frame0`, the shape Dream Machine expects for image-to-video.
fn creation_body(request: &GenerationRequest, config: &VideoConfig) -> Value {
    serde_json::json!({
        "prompt": request.prompt,
        "keyframes": {
            "frame0": {
                "type": "image",
                "url": request.image_url,
            }
        },
        "loop": config.loop_video,
        "aspect_ratio": config.aspect_ratio,
    })
}

fn extract_generation_id(json: &Value) -> Result<String> {
    json.get("id")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .ok_or(VideoError::SubmissionRejected)
}

/// Parse a status payload into a [`JobStatus`].
///
/// The asset lives at `assets.video` and is only present on completed
/// generations; `failure_reason` only on failed ones.
fn parse_status(json: &Value) -> JobStatus {
    let state = json
        .get("state")
        .and_then(|v| v.as_str())
        .map(JobState::from_provider_state)
        .unwrap_or(JobState::Pending);

    let video_url = json
        .pointer("/assets/video")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    let failure_reason = json
        .get("failure_reason")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    JobStatus {
        state,
        video_url,
        failure_reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Provider;

    fn test_config() -> VideoConfig {
        VideoConfig::new("test-key")
    }

    #[test]
    fn test_missing_key_rejected_at_construction() {
        let result = LumaClient::new(VideoConfig::default());
        assert!(matches!(result, Err(VideoError::MissingApiKey)));
    }

    #[test]
    fn test_endpoint_normalized() {
        let config = VideoConfig::builder()
            .with_api_key("k")
            .with_endpoint("http://localhost:9900/generations///")
            .build();
        let client = LumaClient::new(config).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:9900/generations");
    }

    #[test]
    fn test_creation_body_shape() {
        let request = GenerationRequest::new("https://img.example/f0.png", "slow dolly in")
            .with_provider(Provider::Luma);
        let body = creation_body(&request, &test_config());

        assert_eq!(body["prompt"], "slow dolly in");
        assert_eq!(body["keyframes"]["frame0"]["type"], "image");
        assert_eq!(body["keyframes"]["frame0"]["url"], "https://img.example/f0.png");
        assert_eq!(body["loop"], false);
        assert_eq!(body["aspect_ratio"], "16:9");
    }

    #[test]
    fn test_extract_generation_id() {
        let json: Value = serde_json::from_str(r#"{"id": "gen-abc-123", "state": "queued"}"#).unwrap();
        assert_eq!(extract_generation_id(&json).unwrap(), "gen-abc-123");
    }

    #[test]
    fn test_missing_id_is_submission_rejected() {
        let json: Value = serde_json::from_str(r#"{"state": "queued"}"#).unwrap();
        assert!(matches!(
            extract_generation_id(&json),
            Err(VideoError::SubmissionRejected)
        ));

        let json: Value = serde_json::from_str(r#"{"id": ""}"#).unwrap();
        assert!(matches!(
            extract_generation_id(&json),
            Err(VideoError::SubmissionRejected)
        ));
    }

    #[test]
    fn test_parse_status_completed() {
        let json: Value = serde_json::from_str(
            r#"{
                "id": "gen-1",
                "state": "completed",
                "assets": {"video": "https://cdn.lumalabs.ai/v/gen-1.mp4"}
            }"#,
        )
        .unwrap();
        let status = parse_status(&json);
        assert_eq!(status.state, JobState::Completed);
        assert_eq!(
            status.video_url.as_deref(),
            Some("https://cdn.lumalabs.ai/v/gen-1.mp4")
        );
        assert!(status.failure_reason.is_none());
    }

    #[test]
    fn test_parse_status_failed() {
        let json: Value = serde_json::from_str(
            r#"{"id": "gen-2", "state": "failed", "failure_reason": "content_moderation"}"#,
        )
        .unwrap();
        let status = parse_status(&json);
        assert_eq!(status.state, JobState::Failed);
        assert_eq!(status.failure_reason.as_deref(), Some("content_moderation"));
        assert!(status.video_url.is_none());
    }

    #[test]
    fn test_parse_status_in_progress_variants() {
        for state in ["queued", "dreaming", "processing", "brand_new_state"] {
            let json = serde_json::json!({"id": "gen-3", "state": state});
            assert_eq!(parse_status(&json).state, JobState::Pending, "state {}", state);
        }
    }

    #[test]
    fn test_parse_status_missing_state_stays_pending() {
        let json: Value = serde_json::from_str(r#"{"id": "gen-4"}"#).unwrap();
        assert_eq!(parse_status(&json).state, JobState::Pending);
    }
}
