use crate::error::{Result, VideoError};
use std::time::Duration;

/// Default Dream Machine generations endpoint.
pub const DEFAULT_LUMA_ENDPOINT: &str = "https://api.lumalabs.ai/dream-machine/v1/generations";

/// Configuration for the video generation driver.
///
/// Use [`VideoConfig::builder()`] for ergonomic construction, or
/// [`VideoConfig::from_env()`] to pull the API key from the environment.
#[derive(Debug, Clone)]
pub struct VideoConfig {
    /// Bearer token for the provider API.
    pub api_key: String,

    /// Generation-collection endpoint URL.
    pub endpoint: String,

    /// Delay between consecutive status polls.
    pub poll_interval: Duration,

    /// Upper bound on a single wait-for-completion call.
    pub deadline: Duration,

    /// Aspect ratio requested for generated videos.
    pub aspect_ratio: String,

    /// Whether generated videos should loop.
    pub loop_video: bool,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: DEFAULT_LUMA_ENDPOINT.to_string(),
            poll_interval: Duration::from_secs(3),
            deadline: Duration::from_secs(600),
            aspect_ratio: "16:9".to_string(),
            loop_video: false,
        }
    }
}

impl VideoConfig {
    /// Create a config with the given API key and default everything else.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Read the API key from `LUMA_API_KEY`.
    ///
    /// A missing or empty variable is a configuration error, not
    /// something to retry at runtime.
    pub fn from_env() -> Result<Self> {
        match std::env::var("LUMA_API_KEY") {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key)),
            _ => Err(VideoError::MissingApiKey),
        }
    }

    /// Start building a config with the builder pattern.
    pub fn builder() -> VideoConfigBuilder {
        VideoConfigBuilder::default()
    }
}

/// Builder for [`VideoConfig`].
#[derive(Default)]
pub struct VideoConfigBuilder {
    config: VideoConfig,
}

impl VideoConfigBuilder {
    /// Set the provider API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Point the driver at a different endpoint (e.g. a test server).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    /// Set the delay between status polls.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    /// Set the wall-clock deadline for waiting on a single job.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.config.deadline = deadline;
        self
    }

    /// Set the requested aspect ratio (e.g. "16:9", "1:1").
    pub fn with_aspect_ratio(mut self, ratio: impl Into<String>) -> Self {
        self.config.aspect_ratio = ratio.into();
        self
    }

    /// Request looping videos.
    pub fn with_loop(mut self, loop_video: bool) -> Self {
        self.config.loop_video = loop_video;
        self
    }

    /// Build the final [`VideoConfig`].
    pub fn build(self) -> VideoConfig {
        self.config
    }
}
