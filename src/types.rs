use crate::error::{Result, VideoError};
use serde::{Deserialize, Serialize};

/// Video generation engines the driver knows about.
///
/// This is a closed set: every variant either has a working transport or
/// is rejected by [`ensure_implemented`](Provider::ensure_implemented)
/// before any network call is made. Only `Luma` is wired up today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provider {
    Luma,
    Kling,
}

impl Provider {
    pub fn as_str(&self) -> &str {
        match self {
            Provider::Luma => "luma",
            Provider::Kling => "kling",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "luma" => Some(Provider::Luma),
            "kling" => Some(Provider::Kling),
            _ => None,
        }
    }

    /// Whether this engine has a working submit/poll implementation.
    pub fn is_implemented(&self) -> bool {
        matches!(self, Provider::Luma)
    }

    /// Fail fast on engines that cannot serve requests yet.
    pub fn ensure_implemented(&self) -> Result<()> {
        if self.is_implemented() {
            Ok(())
        } else {
            Err(VideoError::ProviderNotImplemented(*self))
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Job lifecycle: Pending -> Completed/Failed. Terminal states are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    Pending,
    Completed,
    Failed,
}

impl JobState {
    pub fn as_str(&self) -> &str {
        match self {
            JobState::Pending => "pending",
            JobState::Completed => "completed",
            JobState::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobState::Pending)
    }

    /// Classify a raw provider state string.
    ///
    /// Providers report a handful of in-progress states ("queued",
    /// "dreaming", ...) and may add new ones; anything that is not an
    /// explicit terminal state keeps the job in `Pending`.
    pub fn from_provider_state(s: &str) -> Self {
        match s {
            "completed" => JobState::Completed,
            "failed" => JobState::Failed,
            _ => JobState::Pending,
        }
    }
}

/// A single video-generation attempt: one source frame, one prompt,
/// one engine. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// URL of the source image to animate.
    pub image_url: String,
    /// Free-text motion prompt.
    pub prompt: String,
    /// Engine to submit to.
    pub provider: Provider,
}

impl GenerationRequest {
    /// Create a request targeting the default engine (Luma).
    pub fn new(image_url: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
            prompt: prompt.into(),
            provider: Provider::Luma,
        }
    }

    /// Select a different engine (builder pattern).
    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.provider = provider;
        self
    }
}

/// One parsed observation from the provider's status endpoint.
#[derive(Debug, Clone)]
pub struct JobStatus {
    pub state: JobState,
    pub video_url: Option<String>,
    pub failure_reason: Option<String>,
}

/// An in-flight or completed provider job.
///
/// The id is assigned by the provider at submission and is required
/// before any poll. The state only ever advances: once a job is
/// terminal, further status observations are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationJob {
    pub id: String,
    pub state: JobState,
    pub video_url: Option<String>,
    pub failure_reason: Option<String>,
}

impl GenerationJob {
    /// Create a freshly-submitted job in the `Pending` state.
    pub fn pending(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: JobState::Pending,
            video_url: None,
            failure_reason: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Fold a status observation into the job. No-op once terminal.
    pub fn apply(&mut self, status: JobStatus) {
        if self.is_terminal() {
            return;
        }
        self.state = status.state;
        if status.video_url.is_some() {
            self.video_url = status.video_url;
        }
        if status.failure_reason.is_some() {
            self.failure_reason = status.failure_reason;
        }
    }
}

/// Successful outcome of a video generation job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoResult {
    /// URL of the produced video.
    pub video_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_roundtrip() {
        assert_eq!(Provider::parse("luma"), Some(Provider::Luma));
        assert_eq!(Provider::parse("kling"), Some(Provider::Kling));
        assert_eq!(Provider::parse("sora"), None);
        assert_eq!(Provider::Luma.as_str(), "luma");
    }

    #[test]
    fn test_only_luma_is_implemented() {
        assert!(Provider::Luma.ensure_implemented().is_ok());
        match Provider::Kling.ensure_implemented() {
            Err(VideoError::ProviderNotImplemented(Provider::Kling)) => {}
            other => panic!("Expected ProviderNotImplemented, got {:?}", other),
        }
    }

    #[test]
    fn test_state_classification() {
        assert_eq!(JobState::from_provider_state("completed"), JobState::Completed);
        assert_eq!(JobState::from_provider_state("failed"), JobState::Failed);
        assert_eq!(JobState::from_provider_state("queued"), JobState::Pending);
        assert_eq!(JobState::from_provider_state("dreaming"), JobState::Pending);
        assert_eq!(JobState::from_provider_state("???"), JobState::Pending);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!JobState::Pending.is_terminal());
        assert!(JobState::Completed.is_terminal());
        assert!(JobState::Failed.is_terminal());
    }

    #[test]
    fn test_job_applies_pending_then_completed() {
        let mut job = GenerationJob::pending("gen-1");
        job.apply(JobStatus {
            state: JobState::Pending,
            video_url: None,
            failure_reason: None,
        });
        assert_eq!(job.state, JobState::Pending);

        job.apply(JobStatus {
            state: JobState::Completed,
            video_url: Some("https://cdn.example/video.mp4".into()),
            failure_reason: None,
        });
        assert_eq!(job.state, JobState::Completed);
        assert_eq!(job.video_url.as_deref(), Some("https://cdn.example/video.mp4"));
    }

    #[test]
    fn test_terminal_job_ignores_later_observations() {
        let mut job = GenerationJob::pending("gen-2");
        job.apply(JobStatus {
            state: JobState::Failed,
            video_url: None,
            failure_reason: Some("content_moderation".into()),
        });
        assert_eq!(job.state, JobState::Failed);

        // A stray poll result must not resurrect the job.
        job.apply(JobStatus {
            state: JobState::Completed,
            video_url: Some("https://cdn.example/late.mp4".into()),
            failure_reason: None,
        });
        assert_eq!(job.state, JobState::Failed);
        assert!(job.video_url.is_none());
        assert_eq!(job.failure_reason.as_deref(), Some("content_moderation"));
    }

    #[test]
    fn test_request_builder() {
        let req = GenerationRequest::new("https://img.example/frame.png", "slow pan")
            .with_provider(Provider::Kling);
        assert_eq!(req.provider, Provider::Kling);
        assert_eq!(req.image_url, "https://img.example/frame.png");
    }
}
