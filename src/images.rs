use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

/// Configuration for the image sequence requester.
#[derive(Debug, Clone)]
pub struct ImageConfig {
    /// API key for the image generation provider.
    pub api_key: String,
    /// Generation endpoint URL.
    pub endpoint: String,
    /// Number of frames requested per sequence.
    pub num_frames: u32,
    /// Request timeout (default: 120s).
    pub timeout: Duration,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: "https://fal.run/fal-ai/flux/schnell".to_string(),
            num_frames: 5,
            timeout: Duration::from_secs(120),
        }
    }
}

impl ImageConfig {
    /// Create a config with the given API key and default everything else.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Read the API key from `FAL_KEY`.
    pub fn from_env() -> Result<Self, ImageError> {
        match std::env::var("FAL_KEY") {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key)),
            _ => Err(ImageError::MissingApiKey),
        }
    }

    /// Set the generation endpoint.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the number of frames per sequence.
    pub fn num_frames(mut self, n: u32) -> Self {
        self.num_frames = n;
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Client for the storyboard image sequence API.
///
/// Unlike the video path, sequence generation is a single
/// request/response: one prompt in, one ordered list of frame URLs out.
/// There is no job id and nothing to poll.
#[derive(Debug, Clone)]
pub struct ImageSequenceClient {
    http: Client,
    config: ImageConfig,
}

impl ImageSequenceClient {
    /// Create a new client from the given configuration.
    pub fn new(config: ImageConfig) -> Result<Self, ImageError> {
        if config.api_key.trim().is_empty() {
            return Err(ImageError::MissingApiKey);
        }
        Ok(Self {
            http: Client::new(),
            config,
        })
    }

    /// Use a custom `reqwest::Client`.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// Generate an ordered sequence of frame images for a prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt is empty, the endpoint is
    /// unreachable, or the response contains no images.
    pub async fn generate_sequence(&self, prompt: &str) -> Result<Vec<String>, ImageError> {
        if prompt.trim().is_empty() {
            return Err(ImageError::EmptyPrompt);
        }

        let body = json!({
            "prompt": prompt,
            "num_images": self.config.num_frames,
        });

        let resp = self
            .http
            .post(&self.config.endpoint)
            .header("Authorization", format!("Key {}", self.config.api_key))
            .timeout(self.config.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| ImageError::Connection(self.config.endpoint.clone(), e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let text = resp.text().await.unwrap_or_default();
            return Err(ImageError::Http(status, text));
        }

        let json: Value = resp
            .json()
            .await
            .map_err(|e| ImageError::InvalidResponse(e.to_string()))?;

        let urls = extract_image_urls(&json);
        if urls.is_empty() {
            return Err(ImageError::GenerationFailed(
                "response contained no images".into(),
            ));
        }
        Ok(urls)
    }
}

/// Pull the ordered frame URLs out of a generation response.
fn extract_image_urls(json: &Value) -> Vec<String> {
    json.get("images")
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|img| img.get("url").and_then(|u| u.as_str()))
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// Errors that can occur while requesting an image sequence.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("No API key configured — set FAL_KEY or pass one explicitly")]
    MissingApiKey,

    #[error("Prompt must not be empty")]
    EmptyPrompt,

    #[error("Cannot connect to image API at {0}: {1}")]
    Connection(String, String),

    #[error("Image API returned HTTP {0}: {1}")]
    Http(u16, String),

    #[error("Invalid response from image API: {0}")]
    InvalidResponse(String),

    #[error("Sequence generation failed: {0}")]
    GenerationFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_rejected_at_construction() {
        let result = ImageSequenceClient::new(ImageConfig::default());
        assert!(matches!(result, Err(ImageError::MissingApiKey)));
    }

    #[test]
    fn test_config_setters() {
        let config = ImageConfig::new("k")
            .endpoint("http://localhost:7700/sequences")
            .num_frames(8)
            .timeout(Duration::from_secs(30));
        assert_eq!(config.endpoint, "http://localhost:7700/sequences");
        assert_eq!(config.num_frames, 8);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_extract_image_urls_ordered() {
        let json: Value = serde_json::from_str(
            r#"{
                "images": [
                    {"url": "https://cdn.example/f0.png", "width": 1024},
                    {"url": "https://cdn.example/f1.png", "width": 1024},
                    {"url": "https://cdn.example/f2.png", "width": 1024}
                ]
            }"#,
        )
        .unwrap();
        let urls = extract_image_urls(&json);
        assert_eq!(
            urls,
            vec![
                "https://cdn.example/f0.png",
                "https://cdn.example/f1.png",
                "https://cdn.example/f2.png",
            ]
        );
    }

    #[test]
    fn test_extract_image_urls_empty_or_missing() {
        let json: Value = serde_json::from_str(r#"{"images": []}"#).unwrap();
        assert!(extract_image_urls(&json).is_empty());

        let json: Value = serde_json::from_str(r#"{"detail": "error"}"#).unwrap();
        assert!(extract_image_urls(&json).is_empty());
    }

    #[tokio::test]
    async fn test_empty_prompt_rejected_before_network() {
        // Endpoint is unroutable on purpose — the call must fail on the
        // prompt check, not on the connection.
        let config = ImageConfig::new("k").endpoint("http://0.0.0.0:1/never");
        let client = ImageSequenceClient::new(config).unwrap();
        let result = client.generate_sequence("   ").await;
        assert!(matches!(result, Err(ImageError::EmptyPrompt)));
    }
}
